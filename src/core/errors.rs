use thiserror::Error;

#[derive(Error, Debug)]
pub enum LexineError {
    #[error("no API credential configured")]
    CredentialMissing,

    #[error("content service unreachable: {0}")]
    Transport(Box<reqwest::Error>),

    #[error("malformed content response: {0}")]
    MalformedResponse(String),

    #[error("invalid recall score: {0} (expected 0, 2 or 5)")]
    InvalidScore(u8),

    #[error("I/O error: {0}")]
    Io(Box<std::io::Error>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("LexineError: {0}")]
    Custom(String),
}

impl From<std::io::Error> for LexineError {
    fn from(error: std::io::Error) -> Self {
        LexineError::Io(Box::new(error))
    }
}

impl From<reqwest::Error> for LexineError {
    fn from(error: reqwest::Error) -> Self {
        LexineError::Transport(Box::new(error))
    }
}
