use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use log::debug;
use std::fs::File;
use std::path::Path;
use tar::Archive;

/// Unpacks a tar+gzip archive into `dest`, preserving the archive layout.
///
/// The gzip decode and the tar unpack form one pipeline; a failure in
/// either stage fails the whole call.
pub fn unpack(archive_path: &Path, dest: &Path) -> Result<()> {
    debug!("Unpacking tar.gz archive {:?}...", archive_path);

    let file = File::open(archive_path)
        .with_context(|| format!("Failed to open archive at {:?}", archive_path))?;

    let decoder = GzDecoder::new(file);
    let mut archive = Archive::new(decoder);

    archive
        .unpack(dest)
        .with_context(|| format!("Failed to unpack tar archive {:?}", archive_path))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::fs;
    use tar::Builder;
    use tempfile::tempdir;

    fn write_tar_gz(path: &Path, entries: &[(&str, &str, u32)]) -> Result<()> {
        let file = File::create(path)?;
        let enc = GzEncoder::new(file, Compression::default());
        let mut tar = Builder::new(enc);

        for (name, content, mode) in entries {
            let mut header = tar::Header::new_gnu();
            header.set_path(name)?;
            header.set_size(content.len() as u64);
            header.set_mode(*mode);
            header.set_cksum();
            tar.append(&header, content.as_bytes())?;
        }

        tar.finish()?;
        Ok(())
    }

    #[test]
    fn test_unpack_restores_files() -> Result<()> {
        let dir = tempdir()?;
        let archive_path = dir.path().join("test.tar.gz");
        let dest = dir.path().join("out");
        fs::create_dir(&dest)?;

        write_tar_gz(
            &archive_path,
            &[("a.txt", "alpha", 0o644), ("nested/b.txt", "beta", 0o644)],
        )?;

        unpack(&archive_path, &dest)?;

        assert_eq!(fs::read_to_string(dest.join("a.txt"))?, "alpha");
        assert_eq!(fs::read_to_string(dest.join("nested/b.txt"))?, "beta");
        Ok(())
    }

    #[test]
    #[cfg(unix)]
    fn test_unpack_preserves_executable_mode() -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir()?;
        let archive_path = dir.path().join("test.tar.gz");
        let dest = dir.path().join("out");
        fs::create_dir(&dest)?;

        write_tar_gz(&archive_path, &[("bin/run.sh", "#!/bin/sh\n", 0o755)])?;

        unpack(&archive_path, &dest)?;

        let mode = fs::metadata(dest.join("bin/run.sh"))?.permissions().mode();
        assert!(mode & 0o111 != 0, "expected executable, mode was {:o}", mode);
        Ok(())
    }

    #[test]
    fn test_unpack_truncated_gzip_fails() {
        let dir = tempdir().unwrap();
        let archive_path = dir.path().join("test.tar.gz");
        let dest = dir.path().join("out");
        fs::create_dir(&dest).unwrap();

        // Valid gzip magic followed by garbage
        fs::write(&archive_path, [0x1f, 0x8b, 0x00, 0x01, 0x02]).unwrap();

        let result = unpack(&archive_path, &dest);
        assert!(result.is_err());
    }

    #[test]
    fn test_unpack_missing_archive_fails() {
        let dir = tempdir().unwrap();
        let result = unpack(&dir.path().join("missing.tar.gz"), dir.path());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to open archive")
        );
    }
}
