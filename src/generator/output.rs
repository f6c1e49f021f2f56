//! Output directory handling.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::app::{EstuaryError, Result};

/// Remove `dir` with everything in it and create it again, empty.
pub fn reset_dir(dir: &Path) -> Result<()> {
    match fs::remove_dir_all(dir) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(EstuaryError::io(dir, e)),
    }

    fs::create_dir_all(dir).map_err(|e| EstuaryError::io(dir, e))
}

/// Copy each `source/<name>` tree to `output/<name>`.
///
/// The output subdirectory is always created. A missing source subdirectory
/// just means there is nothing to copy. Returns the number of files copied.
pub fn copy_assets(source: &Path, output: &Path, names: &[String]) -> Result<usize> {
    let mut copied = 0;

    for name in names {
        let src = source.join(name);
        let dst = output.join(name);
        fs::create_dir_all(&dst).map_err(|e| EstuaryError::io(&dst, e))?;

        match fs::read_dir(&src) {
            Ok(_) => copied += copy_tree(&src, &dst)?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("No assets in {}", src.display());
            }
            Err(e) => return Err(EstuaryError::io(&src, e)),
        }
    }

    Ok(copied)
}

fn copy_tree(src: &Path, dst: &Path) -> Result<usize> {
    let mut copied = 0;

    for entry in fs::read_dir(src).map_err(|e| EstuaryError::io(src, e))? {
        let entry = entry.map_err(|e| EstuaryError::io(src, e))?;
        let from = entry.path();
        let to = dst.join(entry.file_name());
        let file_type = entry.file_type().map_err(|e| EstuaryError::io(&from, e))?;

        if file_type.is_dir() {
            fs::create_dir_all(&to).map_err(|e| EstuaryError::io(&to, e))?;
            copied += copy_tree(&from, &to)?;
        } else {
            fs::copy(&from, &to).map_err(|e| EstuaryError::io(&from, e))?;
            copied += 1;
        }
    }

    Ok(copied)
}

pub fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    fs::write(path, contents).map_err(|e| EstuaryError::io(path, e))
}
