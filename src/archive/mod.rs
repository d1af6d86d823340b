//! Archive extraction: dispatches on file extension to a tar+gzip pipeline
//! or a zip unpacker.

mod tar_gz;
mod zip;

use anyhow::{Context, Result, bail};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::DownloaderError;

/// Extracts a downloaded archive into a sibling directory named after the
/// archive with its suffix stripped, and returns that directory's path.
///
/// Supported extensions are `.gz` (treated as `.tar.gz`) and `.zip`;
/// anything else fails with [`DownloaderError::UnsupportedExtension`]
/// without touching the filesystem. If either stage of the pipeline fails,
/// a destination directory created by this call is removed again, so the
/// caller never receives a partially populated directory as success.
#[tracing::instrument]
pub fn extract(file: &Path) -> Result<PathBuf> {
    if file.as_os_str().is_empty() {
        bail!(DownloaderError::InvalidArgument("file"));
    }

    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let (stem, unpack): (&str, fn(&Path, &Path) -> Result<()>) = if name.ends_with(".gz") {
        let stem = name
            .strip_suffix(".tar.gz")
            .or_else(|| name.strip_suffix(".gz"))
            .unwrap_or(&name);
        (stem, tar_gz::unpack)
    } else if name.ends_with(".zip") {
        (name.strip_suffix(".zip").unwrap_or(&name), zip::unpack)
    } else {
        let ext = file
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_else(|| name.clone());
        bail!(DownloaderError::UnsupportedExtension(ext));
    };

    let dest = file.with_file_name(stem);
    let created = !dest.exists();
    fs::create_dir_all(&dest)
        .with_context(|| format!("Failed to create destination directory {:?}", dest))?;

    debug!("Extracting {:?} into {:?}...", file, dest);

    if let Err(e) = unpack(file, &dest) {
        if created && let Err(remove_err) = fs::remove_dir_all(&dest) {
            debug!(
                "Failed to remove partial directory {:?}: {}",
                dest, remove_err
            );
        }
        bail!(DownloaderError::ExtractionFailed {
            archive: file.to_path_buf(),
            detail: format!("{:#}", e),
        });
    }

    info!("Extracted {:?} to {:?}", file, dest);
    Ok(dest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::collections::HashMap;
    use std::fs::File;
    use std::io::Write;
    use tar::Builder;
    use tempfile::tempdir;

    fn create_tar_gz_archive(path: &Path, files: HashMap<&str, &str>) -> Result<()> {
        let file = File::create(path)?;
        let enc = GzEncoder::new(file, Compression::default());
        let mut tar = Builder::new(enc);

        let mut header = tar::Header::new_gnu();
        for (f, content) in files.iter() {
            header.set_path(f)?;
            header.set_size(content.len() as u64);
            header.set_cksum();
            tar.append(&header, content.as_bytes())?;
        }

        tar.finish()?;
        Ok(())
    }

    fn create_zip_archive(path: &Path, files: HashMap<&str, &str>) -> Result<()> {
        use ::zip::CompressionMethod;
        use ::zip::ZipWriter;
        use ::zip::write::FileOptions;

        let file = File::create(path)?;
        let mut zip = ZipWriter::new(file);
        let options: FileOptions<()> =
            FileOptions::default().compression_method(CompressionMethod::Deflated);

        for (name, content) in files.iter() {
            zip.start_file(*name, options)?;
            zip.write_all(content.as_bytes())?;
        }

        zip.finish()?;
        Ok(())
    }

    #[test]
    fn test_extract_tar_gz_into_sibling_dir() -> Result<()> {
        let dir = tempdir()?;
        let archive_path = dir.path().join("node-v11.0.0-linux-x64.tar.gz");

        create_tar_gz_archive(
            &archive_path,
            HashMap::from([("bin/node", "binary"), ("README.md", "docs")]),
        )?;

        let dest = extract(&archive_path)?;

        assert_eq!(dest, dir.path().join("node-v11.0.0-linux-x64"));
        assert_eq!(fs::read_to_string(dest.join("bin/node"))?, "binary");
        assert_eq!(fs::read_to_string(dest.join("README.md"))?, "docs");
        Ok(())
    }

    #[test]
    fn test_extract_zip_into_sibling_dir() -> Result<()> {
        let dir = tempdir()?;
        let archive_path = dir.path().join("node-v11.0.0-win-x64.zip");

        create_zip_archive(
            &archive_path,
            HashMap::from([("node.exe", "binary"), ("docs/README.md", "docs")]),
        )?;

        let dest = extract(&archive_path)?;

        assert_eq!(dest, dir.path().join("node-v11.0.0-win-x64"));
        assert_eq!(fs::read_to_string(dest.join("node.exe"))?, "binary");
        assert_eq!(fs::read_to_string(dest.join("docs/README.md"))?, "docs");
        Ok(())
    }

    #[test]
    fn test_extract_preserves_archive_layout() -> Result<()> {
        // A single top-level directory stays a directory, no flattening
        let dir = tempdir()?;
        let archive_path = dir.path().join("bundle.tar.gz");

        create_tar_gz_archive(
            &archive_path,
            HashMap::from([("node-v11.0.0-linux-x64/bin/node", "binary")]),
        )?;

        let dest = extract(&archive_path)?;

        assert_eq!(
            fs::read_to_string(dest.join("node-v11.0.0-linux-x64/bin/node"))?,
            "binary"
        );
        Ok(())
    }

    #[test]
    fn test_extract_unsupported_extension_names_it() {
        let dir = tempdir().unwrap();
        let archive_path = dir.path().join("anything.rar");
        fs::write(&archive_path, "rar bytes").unwrap();

        let err = extract(&archive_path).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<DownloaderError>(),
            Some(DownloaderError::UnsupportedExtension(ext)) if ext == ".rar"
        ));
        // No directory may appear at any derived path
        assert!(!dir.path().join("anything").exists());
    }

    #[test]
    fn test_extract_empty_path_is_invalid_argument() {
        let err = extract(Path::new("")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DownloaderError>(),
            Some(DownloaderError::InvalidArgument("file"))
        ));
    }

    #[test]
    fn test_extract_corrupted_tar_gz_removes_destination() {
        let dir = tempdir().unwrap();
        let archive_path = dir.path().join("broken.tar.gz");
        fs::write(&archive_path, "not gzip at all").unwrap();

        let err = extract(&archive_path).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<DownloaderError>(),
            Some(DownloaderError::ExtractionFailed { archive, .. }) if archive == &archive_path
        ));
        assert!(
            !dir.path().join("broken").exists(),
            "partial directory should have been removed"
        );
    }

    #[test]
    fn test_extract_corrupted_zip_removes_destination() {
        let dir = tempdir().unwrap();
        let archive_path = dir.path().join("broken.zip");
        fs::write(&archive_path, "not a zip").unwrap();

        let err = extract(&archive_path).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<DownloaderError>(),
            Some(DownloaderError::ExtractionFailed { .. })
        ));
        assert!(!dir.path().join("broken").exists());
    }

    #[test]
    fn test_extract_missing_archive_fails() {
        let dir = tempdir().unwrap();
        let archive_path = dir.path().join("missing.tar.gz");

        let result = extract(&archive_path);
        assert!(result.is_err());
    }

    #[test]
    #[cfg(unix)]
    fn test_extract_zip_preserves_unix_permissions() -> Result<()> {
        use ::zip::CompressionMethod;
        use ::zip::ZipWriter;
        use ::zip::write::FileOptions;
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir()?;
        let archive_path = dir.path().join("tools.zip");

        {
            let file = File::create(&archive_path)?;
            let mut zip = ZipWriter::new(file);

            let options: FileOptions<()> = FileOptions::default()
                .compression_method(CompressionMethod::Deflated)
                .unix_permissions(0o755);
            zip.start_file("bin/node", options)?;
            zip.write_all(b"binary")?;

            zip.finish()?;
        }

        let dest = extract(&archive_path)?;

        let mode = fs::metadata(dest.join("bin/node"))?.permissions().mode();
        assert!(
            mode & 0o111 != 0,
            "Expected bin/node to be executable, but mode was {:o}",
            mode
        );
        Ok(())
    }
}
