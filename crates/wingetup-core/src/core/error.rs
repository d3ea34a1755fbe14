use thiserror::Error;

pub type WingetResult<T> = Result<T, WingetError>;

#[derive(Error, Debug)]
pub enum WingetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Path error: {0}")]
    Path(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("GitHub error: {0}")]
    Github(String),

    #[error("Manifest error: {0}")]
    Manifest(String),

    #[error("Version error: {0}")]
    Version(String),

    #[error("Credential error: {0}")]
    Credential(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// The repository host refused to create something that is already there.
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Download error: {0}")]
    Download(String),

    /// The requested resource does not exist on the repository host.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The user cancelled an interactive prompt (Ctrl-C or closed stdin).
    #[error("Interrupted by user")]
    Interrupted,
}

impl WingetError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, WingetError::NotFound(_))
    }
}
