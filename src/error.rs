use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Not authorized, check the GitHub access token in \"github_token\"")]
    Auth,

    #[error("GitHub server error ({status}), try again later or check the GitHub status page")]
    Upstream { status: u16 },

    #[error("GitHub request failed with status code {status}: {reason}")]
    Request { status: u16, reason: String },

    #[error("Malformed search item at index {index}: {reason}")]
    MalformedItem { index: usize, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Output file already exists: {}", .0.display())]
    OutputExists(PathBuf),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Server-side failures can be re-run later; everything else needs a fix first.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Upstream { .. } | Error::Network(_))
    }
}
