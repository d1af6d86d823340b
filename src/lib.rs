//! nodedl - download and extract Node.js release artifacts.
//!
//! The pipeline has three stages: resolve a release from the nodejs.org
//! index, stream one platform artifact to disk, and extract the downloaded
//! archive into a sibling directory.

pub mod archive;
pub mod download;
pub mod error;
pub mod file;
pub mod http;
pub mod release;

pub use archive::extract;
pub use download::{Artifact, DownloadOptions, download_node_file};
pub use error::DownloaderError;
pub use file::NodeFile;
pub use release::{
    DEFAULT_TIMEOUT, NODEJS_RELEASE_BASE_URL, NodeRelease, ReleaseClient, local_node_version,
};
