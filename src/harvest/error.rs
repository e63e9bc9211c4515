use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to parse JSON returned by {url}")]
    JsonParse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("No data table found in page {0}")]
    TableNotFound(String),

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Invalid scraping pattern")]
    Pattern(#[from] regex::Error),

    #[error("Data download failed")]
    DownloadIo(#[source] std::io::Error),

    #[error("Failed to create directory '{0}'")]
    DirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to read file '{0}'")]
    FileRead(PathBuf, #[source] std::io::Error),

    #[error("Failed to write file '{0}'")]
    FileWrite(PathBuf, #[source] std::io::Error),

    #[error("Failed to remove file '{0}'")]
    FileRemoval(PathBuf, #[source] std::io::Error),

    #[error("Failed to extract archive '{0}'")]
    ZipExtract(PathBuf, #[source] zip::result::ZipError),

    #[error("Failed to build the output table")]
    FrameBuild(#[source] PolarsError),

    // Errors during export (inside blocking task)
    #[error("I/O error writing output file '{0}'")]
    ExportIo(PathBuf, #[source] std::io::Error),
    #[error("Encoding error writing output file '{0}'")]
    ExportPolars(PathBuf, #[source] PolarsError),

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}
