//! Release index client: fetches the nodejs.org index, finds one entry by
//! version and normalizes it into a typed [`NodeRelease`].

pub mod api;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use log::debug;
use std::collections::HashSet;
use std::time::Duration;

use crate::error::DownloaderError;
use crate::http::HttpClient;

/// Default release mirror root.
pub const NODEJS_RELEASE_BASE_URL: &str = "https://nodejs.org/download/release";

/// Whole-request deadline applied by [`ReleaseClient::with_defaults`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// One normalized entry from the release index.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRelease {
    /// Canonical tag, e.g. `v11.0.0`.
    pub version: String,
    /// LTS codename, or `N/A` for non-LTS releases.
    pub name: String,
    pub date: NaiveDate,
    /// Suffix tokens published for this release; membership checks are
    /// byte-exact against these.
    pub files: HashSet<String>,
    pub npm: Option<String>,
    pub v8: Option<String>,
    pub uv: Option<String>,
    pub zlib: Option<String>,
    pub openssl: Option<String>,
    /// Native module ABI version.
    pub modules: Option<u32>,
    pub lts: bool,
}

impl TryFrom<api::Release> for NodeRelease {
    type Error = anyhow::Error;

    fn try_from(raw: api::Release) -> Result<Self> {
        let (lts, name) = match raw.lts {
            api::Lts::Label(label) if !label.is_empty() => (true, label),
            _ => (false, "N/A".to_string()),
        };

        let date = NaiveDate::parse_from_str(&raw.date, "%Y-%m-%d")
            .with_context(|| format!("Invalid release date '{}'", raw.date))?;

        Ok(NodeRelease {
            version: raw.version,
            name,
            date,
            files: raw.files.into_iter().collect(),
            npm: raw.npm,
            v8: raw.v8,
            uv: raw.uv,
            zlib: raw.zlib,
            openssl: raw.openssl,
            modules: raw.modules.and_then(|m| m.parse().ok()),
            lts,
        })
    }
}

/// Client for the release index endpoint.
pub struct ReleaseClient {
    http: HttpClient,
    base_url: String,
}

impl ReleaseClient {
    /// Creates a client over the given reqwest Client. `base_url` defaults
    /// to the nodejs.org release mirror when omitted.
    pub fn new(client: reqwest::Client, base_url: Option<String>) -> Self {
        let base_url = base_url.unwrap_or_else(|| NODEJS_RELEASE_BASE_URL.to_string());
        Self {
            http: HttpClient::new(client),
            base_url,
        }
    }

    /// Creates a client with a default reqwest Client carrying
    /// [`DEFAULT_TIMEOUT`] as the whole-request deadline.
    pub fn with_defaults() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self::new(client, None))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Fetches the release index and returns the entry for `version`, or
    /// `Ok(None)` when no entry matches. Every call performs a fresh fetch;
    /// nothing is cached.
    #[tracing::instrument(skip(self))]
    pub async fn release(&self, version: &str) -> Result<Option<NodeRelease>> {
        if version.is_empty() {
            bail!(DownloaderError::InvalidArgument("version"));
        }

        let url = format!("{}/index.json", self.base_url);
        let body = self.http.get_text(&url).await?;

        let index: Vec<api::Release> =
            serde_json::from_str(&body).map_err(DownloaderError::MalformedResponse)?;

        debug!("Index has {} releases; looking for {}", index.len(), version);

        // Exact string match, first hit wins; the index holds one entry per
        // version. Only the matched record is normalized.
        index
            .into_iter()
            .find(|entry| entry.version == version)
            .map(NodeRelease::try_from)
            .transpose()
    }
}

/// Returns the version tag of the locally installed Node.js by running
/// `node --version`. Deliberately synchronous; used only to default an
/// omitted version.
pub fn local_node_version() -> Result<String> {
    let output = std::process::Command::new("node")
        .arg("--version")
        .output()
        .context("Failed to run 'node --version'")?;

    if !output.status.success() {
        bail!("'node --version' exited with {}", output.status);
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
