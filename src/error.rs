use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid source url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("unsupported source url scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid tls server name: {0}")]
    ServerName(String),

    #[error("connection failed: {0}")]
    Io(#[from] io::Error),

    #[error("failed to build request: {0}")]
    Request(#[from] http::Error),

    #[error("http error: {0}")]
    Http(#[from] hyper::Error),

    #[error("server responded with {0}")]
    Status(hyper::StatusCode),

    #[error("request timed out after {0}s")]
    Timeout(u64),
}

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] serde_yaml::Error),

    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse settings {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error("download failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("no valid VLESS servers found")]
    EmptyResult,

    #[error(transparent)]
    Write(#[from] WriteError),
}
