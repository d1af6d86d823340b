//! Wire types for the release index, shaped exactly as nodejs.org serves
//! them. Component fields are optional because records predating 2011 omit
//! them; the whole index must still parse.

use serde::Deserialize;

/// One raw entry of the release index.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Release {
    pub version: String,
    pub date: String,
    pub files: Vec<String>,
    pub npm: Option<String>,
    pub v8: Option<String>,
    pub uv: Option<String>,
    pub zlib: Option<String>,
    pub openssl: Option<String>,
    pub modules: Option<String>,
    #[serde(default)]
    pub lts: Lts,
}

/// The `lts` index field is either a codename string or a boolean marker.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Lts {
    Label(String),
    Flag(bool),
}

impl Default for Lts {
    fn default() -> Self {
        Lts::Flag(false)
    }
}
