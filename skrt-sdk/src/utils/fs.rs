use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::Error;

/// Direct children of `dir`, sorted by file name.
pub fn entries(dir: &Path) -> Result<Vec<PathBuf>, Error> {
	WalkDir::new(dir)
		.min_depth(1)
		.max_depth(1)
		.sort_by_file_name()
		.into_iter()
		.map(|entry| entry.map(|e| e.into_path()).map_err(|e| Error::Io(e.into())))
		.collect()
}

/// Direct sub-directories of `dir`, sorted by file name. Symlinks to
/// directories count as directories.
pub fn subdirs(dir: &Path) -> Result<Vec<PathBuf>, Error> {
	Ok(entries(dir)?.into_iter().filter(|path| path.is_dir()).collect())
}

pub fn ensure_parent_dir_exists(path: &Path) -> std::io::Result<()> {
	if let Some(parent) = path.parent() {
		if !parent.as_os_str().is_empty() && !parent.exists() {
			std::fs::create_dir_all(parent)?;
		}
	}
	Ok(())
}
