use thiserror::Error;

#[derive(Error, Debug)]
pub enum YandexError {
    #[error("Network request failed: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Request timeout for URL: {0}")]
    RequestTimeout(String),

    #[error("HTTP error {status} for URL: {url}")]
    HttpError { status: u16, url: String },

    #[error("Invalid URL format: {0}")]
    InvalidUrl(String),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Failed to parse XML: {0}")]
    XmlError(#[from] quick_xml::DeError),

    #[error("Track not found: {0}")]
    TrackNotFound(String),

    #[error("No mp3 stream available for track: {0}")]
    StreamNotFound(String),

    #[error("Invalid header value: {0}")]
    HeaderError(#[from] reqwest::header::InvalidHeaderValue),

    #[error("Invalid config: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, YandexError>;
