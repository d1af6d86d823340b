//! Artifact resolution and the download facade.

use anyhow::{Context, Result, bail};
use log::info;
use std::path::{Path, PathBuf};

use crate::error::DownloaderError;
use crate::file::NodeFile;
use crate::release::{ReleaseClient, local_node_version};

/// Caller options for one download; both fields have defaults.
#[derive(Debug, Clone, Default)]
pub struct DownloadOptions {
    /// Release tag, e.g. `v11.0.0`. Defaults to the locally installed
    /// Node.js version.
    pub version: Option<String>,
    /// Directory the artifact is written into. Defaults to the current
    /// working directory.
    pub destination: Option<PathBuf>,
}

/// Remote URL and local path for one (version, file kind) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub url: String,
    pub path: PathBuf,
}

impl Artifact {
    /// Computes the artifact locations. Pure; performs no I/O and does not
    /// require `destination` to exist.
    pub fn resolve(base_url: &str, version: &str, file: NodeFile, destination: &Path) -> Artifact {
        let file_name = format!("node-{}{}", version, file.suffix());
        Artifact {
            url: format!("{}/{}/{}", base_url, version, file_name),
            path: destination.join(file_name),
        }
    }
}

/// Downloads one release artifact and returns the local path it was
/// written to.
///
/// The version defaults to the local `node --version`, the destination to
/// the current working directory. The release is resolved first and the
/// requested file kind verified against its `files` set, so an unknown
/// version or unpublished file fails before any artifact transfer starts.
#[tracing::instrument(skip(client))]
pub async fn download_node_file(
    client: &ReleaseClient,
    file: NodeFile,
    options: &DownloadOptions,
) -> Result<PathBuf> {
    if let Some(version) = &options.version
        && version.is_empty()
    {
        bail!(DownloaderError::InvalidArgument("version"));
    }
    if let Some(destination) = &options.destination
        && destination.as_os_str().is_empty()
    {
        bail!(DownloaderError::InvalidArgument("destination"));
    }

    let version = match &options.version {
        Some(version) => version.clone(),
        None => local_node_version().context("Failed to determine the local Node.js version")?,
    };
    let destination = match &options.destination {
        Some(destination) => destination.clone(),
        None => std::env::current_dir().context("Failed to determine the current directory")?,
    };

    let release = client
        .release(&version)
        .await?
        .ok_or_else(|| DownloaderError::ReleaseNotFound(version.clone()))?;

    if !release.files.contains(file.suffix()) {
        bail!(DownloaderError::FileNotFound {
            file: file.to_string(),
            version,
        });
    }

    let artifact = Artifact::resolve(client.base_url(), &version, file, &destination);

    info!("Downloading {} to {:?}...", artifact.url, artifact.path);
    client.http().download_to(&artifact.url, &artifact.path).await?;
    info!("Download complete.");

    Ok(artifact.path)
}
