use crate::core::error::{WingetError, WingetResult};
use std::path::{Path, PathBuf};

/// Get the Wingetup home directory
///
/// Platform-specific locations:
/// - Windows: %APPDATA%\wingetup
/// - Linux: ~/.config/wingetup
/// - macOS: ~/Library/Application Support/wingetup
pub fn wingetup_home() -> WingetResult<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| WingetError::Path("Could not determine config directory".to_string()))?;
    Ok(config_dir.join("wingetup"))
}

/// Get the config file path (`<wingetup_home>/config.yaml`)
pub fn config_file() -> WingetResult<PathBuf> {
    Ok(wingetup_home()?.join("config.yaml"))
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> WingetResult<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}
