//! The closed table of downloadable Node.js artifact kinds.

use crate::error::DownloaderError;
use std::str::FromStr;

/// One downloadable artifact kind of a Node.js release.
///
/// Each variant owns the suffix appended to `node-{version}` to form both
/// the remote artifact name and the token in a release's `files` set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeFile {
    Headers,
    AixPpc64,
    DarwinX64,
    LinuxArm64,
    LinuxArmv6l,
    LinuxArmv7l,
    LinuxPpc64le,
    LinuxS390x,
    LinuxX64,
    SunosX64,
    WinX64Zip,
    WinX86Zip,
    WinX64Msi,
    WinX86Msi,
}

impl NodeFile {
    /// Every artifact kind, in suffix-table order.
    pub const ALL: [NodeFile; 14] = [
        NodeFile::Headers,
        NodeFile::AixPpc64,
        NodeFile::DarwinX64,
        NodeFile::LinuxArm64,
        NodeFile::LinuxArmv6l,
        NodeFile::LinuxArmv7l,
        NodeFile::LinuxPpc64le,
        NodeFile::LinuxS390x,
        NodeFile::LinuxX64,
        NodeFile::SunosX64,
        NodeFile::WinX64Zip,
        NodeFile::WinX86Zip,
        NodeFile::WinX64Msi,
        NodeFile::WinX86Msi,
    ];

    /// The suffix token as published in the release index `files` set,
    /// e.g. `-headers.tar.gz`.
    pub fn suffix(&self) -> &'static str {
        match self {
            NodeFile::Headers => "-headers.tar.gz",
            NodeFile::AixPpc64 => "-aix-ppc64.tar.gz",
            NodeFile::DarwinX64 => "-darwin-x64.tar.gz",
            NodeFile::LinuxArm64 => "-linux-arm64.tar.gz",
            NodeFile::LinuxArmv6l => "-linux-armv6l.tar.gz",
            NodeFile::LinuxArmv7l => "-linux-armv7l.tar.gz",
            NodeFile::LinuxPpc64le => "-linux-ppc64le.tar.gz",
            NodeFile::LinuxS390x => "-linux-s390x.tar.gz",
            NodeFile::LinuxX64 => "-linux-x64.tar.gz",
            NodeFile::SunosX64 => "-sunos-x64.tar.gz",
            NodeFile::WinX64Zip => "-win-x64.zip",
            NodeFile::WinX86Zip => "-win-x86.zip",
            NodeFile::WinX64Msi => "-x64.msi",
            NodeFile::WinX86Msi => "-x86.msi",
        }
    }

    /// The short name used on the CLI boundary.
    pub fn name(&self) -> &'static str {
        match self {
            NodeFile::Headers => "headers",
            NodeFile::AixPpc64 => "aix-ppc64",
            NodeFile::DarwinX64 => "darwin-x64",
            NodeFile::LinuxArm64 => "linux-arm64",
            NodeFile::LinuxArmv6l => "linux-armv6l",
            NodeFile::LinuxArmv7l => "linux-armv7l",
            NodeFile::LinuxPpc64le => "linux-ppc64le",
            NodeFile::LinuxS390x => "linux-s390x",
            NodeFile::LinuxX64 => "linux-x64",
            NodeFile::SunosX64 => "sunos-x64",
            NodeFile::WinX64Zip => "win-x64-zip",
            NodeFile::WinX86Zip => "win-x86-zip",
            NodeFile::WinX64Msi => "win-x64-msi",
            NodeFile::WinX86Msi => "win-x86-msi",
        }
    }
}

impl std::fmt::Display for NodeFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NodeFile {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(DownloaderError::InvalidArgument("file").into());
        }
        NodeFile::ALL
            .into_iter()
            .find(|file| file.name() == s)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Unknown file kind '{}' (expected one of: {})",
                    s,
                    NodeFile::ALL.map(|f| f.name()).join(", ")
                )
            })
    }
}
