//! Error classification for the download and extraction pipeline.

use std::path::PathBuf;

/// Errors with a distinguishable cause that callers may want to handle
/// individually. Carried inside `anyhow::Error` and recovered by downcast.
#[derive(Debug)]
pub enum DownloaderError {
    /// A required string parameter was missing or empty (parameter name)
    InvalidArgument(&'static str),
    /// The release index body was not parseable JSON
    MalformedResponse(serde_json::Error),
    /// The requested version does not exist in the release index
    ReleaseNotFound(String),
    /// The requested file kind is not published for the given release
    FileNotFound { file: String, version: String },
    /// A GET returned a non-success HTTP status
    DownloadFailed {
        url: String,
        status: reqwest::StatusCode,
    },
    /// Extract was called on a file that is neither tar-gzip nor zip
    UnsupportedExtension(String),
    /// The decompress or unpack stage of an extraction failed
    ExtractionFailed { archive: PathBuf, detail: String },
}

impl std::fmt::Display for DownloaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DownloaderError::InvalidArgument(name) => {
                write!(f, "Invalid argument: {} must be a non-empty string", name)
            }
            DownloaderError::MalformedResponse(e) => {
                write!(f, "Malformed release index response: {}", e)
            }
            DownloaderError::ReleaseNotFound(version) => {
                write!(f, "Release {} was not found in the index", version)
            }
            DownloaderError::FileNotFound { file, version } => {
                write!(f, "File {} is not published for release {}", file, version)
            }
            DownloaderError::DownloadFailed { url, status } => {
                write!(f, "Download of {} failed with HTTP status {}", url, status)
            }
            DownloaderError::UnsupportedExtension(ext) => {
                write!(f, "Unsupported archive extension: {}", ext)
            }
            DownloaderError::ExtractionFailed { archive, detail } => {
                write!(f, "Failed to extract {}: {}", archive.display(), detail)
            }
        }
    }
}

impl std::error::Error for DownloaderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DownloaderError::MalformedResponse(e) => Some(e),
            _ => None,
        }
    }
}
