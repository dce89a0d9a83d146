use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config directory already exists at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("Missing credential '{field}'. Set it in config.toml or via {env}.")]
    MissingCredential {
        field: &'static str,
        env: &'static str,
    },

    #[error("Invalid --now value '{0}'. Expected YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS")]
    InvalidNow(String),

    #[error("Invalid invoice payload from {origin}: {source}")]
    InvalidPayload {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("HTTP request failed: {0}")]
    Http(#[from] ureq::Error),

    #[error("Unexpected response from {service}: {reason}")]
    UnexpectedResponse {
        service: &'static str,
        reason: String,
    },

    #[error("Spreadsheet '{0}' not found or not shared with this account")]
    SpreadsheetNotFound(String),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ExportError>;
