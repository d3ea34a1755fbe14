use crate::core::error::WingetError;

/// A short remediation hint attached to an error message.
pub trait ErrorHelp {
    fn help(&self) -> Option<&'static str>;
}

impl ErrorHelp for WingetError {
    fn help(&self) -> Option<&'static str> {
        match self {
            WingetError::Credential(_) => {
                Some("Run 'wingetup login' or set GITHUB_TOKEN to authenticate with GitHub.")
            }
            WingetError::Github(msg) if msg.contains("401") || msg.contains("403") => {
                Some("Your GitHub token may be invalid or missing the 'public_repo' scope.")
            }
            WingetError::Http(_) => Some("Check your network connection and try again."),
            WingetError::Download(_) => {
                Some("Check that the installer URL is correct and publicly downloadable.")
            }
            WingetError::Config(_) => {
                Some("Check ~/.config/wingetup/config.yaml or delete it to restore defaults.")
            }
            WingetError::Manifest(_) | WingetError::Yaml(_) => Some(
                "The published manifest could not be processed; it may use an unsupported schema.",
            ),
            WingetError::NotFound(_) => Some("Check the package identifier and version."),
            _ => None,
        }
    }
}

/// Render an error with its hint (if any) for display on stderr.
pub fn format_error_with_help(error: &WingetError) -> String {
    match error.help() {
        Some(help) => format!("Error: {}\n  help: {}", error, help),
        None => format!("Error: {}", error),
    }
}
