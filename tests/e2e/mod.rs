use assert_cmd::Command;
use std::path::PathBuf;
use tempfile::TempDir;

pub mod cli;
pub mod remove;
pub mod update;

/// Test context that provides isolated environment for each test
pub struct TestContext {
    pub temp: TempDir,
    pub wingetup_home: PathBuf,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    /// Create a new test context with isolated environment
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let wingetup_home = config_dir(&temp).join("wingetup");
        std::fs::create_dir_all(&wingetup_home).unwrap();
        Self {
            temp,
            wingetup_home,
        }
    }

    /// Point the GitHub API at a mock server
    pub fn with_api(self, api_url: &str) -> Self {
        std::fs::write(
            self.wingetup_home.join("config.yaml"),
            format!("github_api_url: {}\n", api_url),
        )
        .unwrap();
        self
    }

    /// Create a Command for running wingetup with proper environment
    pub fn wingetup(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("wingetup").unwrap();
        cmd.current_dir(self.temp.path());
        cmd.env("GITHUB_TOKEN", "ghp_test");
        cmd.env_remove("RUST_LOG");

        // Set platform-specific env vars that dirs crate uses
        let config_dir = config_dir(&self.temp);
        if cfg!(target_os = "windows") {
            cmd.env("APPDATA", &config_dir);
            cmd.env("USERPROFILE", self.temp.path());
        } else if cfg!(target_os = "linux") {
            cmd.env("XDG_CONFIG_HOME", &config_dir);
            cmd.env("HOME", self.temp.path());
        } else {
            // dirs derives ~/Library/Application Support from HOME
            cmd.env("HOME", self.temp.path());
        }

        cmd
    }
}

fn config_dir(temp: &TempDir) -> PathBuf {
    if cfg!(target_os = "macos") {
        temp.path().join("Library").join("Application Support")
    } else {
        temp.path().join("config")
    }
}
