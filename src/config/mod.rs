use crate::core::credentials::GITHUB_TOKEN_KEY;
use crate::core::path::{config_file, ensure_dir};
use crate::core::{CredentialStore, WingetError, WingetResult};
use crate::di::ConfigProvider;
use serde::{Deserialize, Serialize};
use std::fs;
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// GitHub REST API base URL
    #[serde(default = "default_github_api_url")]
    pub github_api_url: String,

    /// Owner of the manifest repository pull requests are opened against
    #[serde(default = "default_upstream_owner")]
    pub upstream_owner: String,

    /// Name of the manifest repository
    #[serde(default = "default_upstream_repo")]
    pub upstream_repo: String,

    /// Branch of the manifest repository that new branches start from
    /// and pull requests target
    #[serde(default = "default_upstream_branch")]
    pub upstream_branch: String,

    /// Manifest schema version written by this release.
    /// Existing manifests with a newer schema keep their version.
    #[serde(default = "default_manifest_version")]
    pub manifest_version: String,

    /// GitHub token stored in plain text (the OS keychain is preferred,
    /// see `wingetup login`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_token: Option<String>,
}

fn default_github_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_upstream_owner() -> String {
    "microsoft".to_string()
}

fn default_upstream_repo() -> String {
    "winget-pkgs".to_string()
}

fn default_upstream_branch() -> String {
    "master".to_string()
}

fn default_manifest_version() -> String {
    "1.4.0".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            github_api_url: default_github_api_url(),
            upstream_owner: default_upstream_owner(),
            upstream_repo: default_upstream_repo(),
            upstream_branch: default_upstream_branch(),
            manifest_version: default_manifest_version(),
            github_token: None,
        }
    }
}

impl Config {
    /// Load config from platform-specific config directory, creating default if it doesn't exist
    ///
    /// Config locations:
    /// - Windows: %APPDATA%\wingetup\config.yaml
    /// - Linux: ~/.config/wingetup/config.yaml
    /// - macOS: ~/Library/Application Support/wingetup/config.yaml
    pub fn load() -> WingetResult<Self> {
        let config_path = config_file()?;

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let content = fs::read_to_string(&config_path)?;
        Self::from_yaml(&content)
    }

    /// Parse config from YAML text, filling in defaults for missing keys
    pub fn from_yaml(content: &str) -> WingetResult<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| WingetError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Save config to platform-specific config directory
    pub fn save(&self) -> WingetResult<()> {
        let config_path = config_file()?;
        let config_dir = config_path
            .parent()
            .ok_or_else(|| WingetError::Path("Invalid config path".to_string()))?;

        ensure_dir(config_dir)?;

        let content = serde_yaml::to_string(self)
            .map_err(|e| WingetError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(&config_path, content)?;
        Ok(())
    }

    /// GitHub token to authenticate with.
    ///
    /// Checked in order: `GITHUB_TOKEN`, the OS keychain, the config file.
    pub fn resolve_token(&self) -> Option<String> {
        pick_token(
            std::env::var("GITHUB_TOKEN").ok(),
            || CredentialStore::retrieve(GITHUB_TOKEN_KEY).ok(),
            self.github_token.clone(),
        )
    }
}

// The keychain is only queried when the environment has no token
fn pick_token(
    env: Option<String>,
    keychain: impl FnOnce() -> Option<String>,
    config: Option<String>,
) -> Option<String> {
    let non_blank = |token: &Option<String>| token.as_deref().is_some_and(|t| !t.trim().is_empty());
    if non_blank(&env) {
        debug!("Using GitHub token from GITHUB_TOKEN");
        return env;
    }
    let keychain = keychain();
    if non_blank(&keychain) {
        debug!("Using GitHub token from keychain");
        keychain
    } else if non_blank(&config) {
        debug!("Using GitHub token from config file");
        config
    } else {
        None
    }
}

impl ConfigProvider for Config {
    fn github_api_url(&self) -> &str {
        &self.github_api_url
    }

    fn upstream_owner(&self) -> &str {
        &self.upstream_owner
    }

    fn upstream_repo(&self) -> &str {
        &self.upstream_repo
    }

    fn upstream_branch(&self) -> &str {
        &self.upstream_branch
    }

    fn manifest_version(&self) -> &str {
        &self.manifest_version
    }

    fn github_token(&self) -> Option<&str> {
        self.github_token.as_deref()
    }
}
