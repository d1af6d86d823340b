use anyhow::{Context, Result};
use log::debug;
use std::fs::File;
use std::path::Path;
use zip::ZipArchive;

/// Unpacks a zip archive into `dest`, preserving the archive layout.
///
/// Entries whose names escape the destination are skipped; Unix modes are
/// restored where the archive carries them.
pub fn unpack(archive_path: &Path, dest: &Path) -> Result<()> {
    debug!("Unpacking zip archive {:?}...", archive_path);

    let file = File::open(archive_path)
        .with_context(|| format!("Failed to open archive at {:?}", archive_path))?;

    let mut archive = ZipArchive::new(file).context("Failed to parse ZIP archive")?;

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .with_context(|| format!("Failed to read ZIP entry {}", i))?;

        let entry_path = match entry.enclosed_name() {
            Some(path) => path.to_path_buf(),
            None => {
                debug!("Skipping entry with unsafe path: {}", entry.name());
                continue;
            }
        };

        let full_path = dest.join(&entry_path);

        if entry.is_dir() {
            std::fs::create_dir_all(&full_path)
                .with_context(|| format!("Failed to create directory {:?}", full_path))?;
        } else {
            if let Some(parent) = full_path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory {:?}", parent))?;
            }
            let mut dest_file = File::create(&full_path)
                .with_context(|| format!("Failed to create file {:?}", full_path))?;
            std::io::copy(&mut entry, &mut dest_file)
                .with_context(|| format!("Failed to extract file {:?}", full_path))?;

            #[cfg(unix)]
            if let Some(mode) = entry.unix_mode() {
                use std::os::unix::fs::PermissionsExt;
                if let Err(e) =
                    std::fs::set_permissions(&full_path, std::fs::Permissions::from_mode(mode))
                {
                    debug!("Failed to set permissions on {:?}: {}", full_path, e);
                }
            }
        }
    }

    Ok(())
}
