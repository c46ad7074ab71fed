//! Per-file operations used when applying a remediation plan.

use std::fs;

use crate::constants::backup_file_name;
use crate::error::{Error, Result};
use crate::path::NormalizedPath;

fn ensure_parent(path: &NormalizedPath) -> Result<()> {
    let native = path.to_native();
    if let Some(parent) = native.parent()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    Ok(())
}

/// Delete a single file.
pub fn remove_file(path: &NormalizedPath) -> Result<()> {
    fs::remove_file(path.to_native()).map_err(|e| Error::io(path.to_native(), e))
}

/// Move a file, creating the destination directory as needed.
pub fn move_file(src: &NormalizedPath, dst: &NormalizedPath) -> Result<()> {
    ensure_parent(dst)?;
    fs::rename(src.to_native(), dst.to_native()).map_err(|e| Error::io(src.to_native(), e))
}

/// Copy a file, creating the destination directory as needed and carrying
/// over the source's modification time.
pub fn copy_with_mtime(src: &NormalizedPath, dst: &NormalizedPath) -> Result<u64> {
    ensure_parent(dst)?;
    let bytes = fs::copy(src.to_native(), dst.to_native())
        .map_err(|e| Error::io(src.to_native(), e))?;

    let modified = fs::metadata(src.to_native())
        .and_then(|m| m.modified())
        .map_err(|e| Error::io(src.to_native(), e))?;
    let dst_file = fs::OpenOptions::new()
        .write(true)
        .open(dst.to_native())
        .map_err(|e| Error::io(dst.to_native(), e))?;
    dst_file
        .set_modified(modified)
        .map_err(|e| Error::io(dst.to_native(), e))?;

    Ok(bytes)
}

/// Rename a file in place to its backup name (`boot.wav` becomes
/// `boot.original.wav`) and return the backup path. The original content
/// is preserved under the new name, never deleted.
pub fn backup_in_place(path: &NormalizedPath) -> Result<NormalizedPath> {
    let filename = path
        .file_name()
        .and_then(backup_file_name)
        .ok_or_else(|| Error::BackupName {
            path: path.to_native(),
        })?;
    let backup = match path.parent() {
        Some(parent) => parent.join(&filename),
        None => NormalizedPath::new(&filename),
    };
    fs::rename(path.to_native(), backup.to_native())
        .map_err(|e| Error::io(path.to_native(), e))?;
    Ok(backup)
}
