use dyn_clone::DynClone;
use dyn_eq::DynEq;
use std::{
	fmt::Debug,
	io::ErrorKind,
	path::{Path, PathBuf},
};

use crate::{error::Error, utils::fs::ensure_parent_dir_exists};

dyn_clone::clone_trait_object!(Merger);
dyn_eq::eq_trait_object!(Merger);

/// The text of one file to be merged, together with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeInput {
	pub path: PathBuf,
	pub content: String,
}

impl MergeInput {
	pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
		Self {
			path: path.into(),
			content: content.into(),
		}
	}

	pub fn read(path: &Path) -> Result<Self, Error> {
		match std::fs::read_to_string(path) {
			Ok(content) => Ok(Self::new(path, content)),
			Err(e) if e.kind() == ErrorKind::NotFound => Err(Error::MissingInputFile(path.to_path_buf())),
			Err(e) => Err(Error::Io(e)),
		}
	}
}

#[typetag::serde(tag = "type")]
pub trait Merger: DynEq + DynClone + Sync + Send + Debug {
	fn name(&self) -> &str;

	/// Merges the inputs, in order, into the text of a single file.
	fn merge(&self, inputs: &[MergeInput]) -> Result<String, Error>;

	/// Reads `inputs`, merges them and writes the result to `output`.
	///
	/// Without an output path nothing happens beyond a warning. The merged
	/// text is only written once every input has been read and merged, so a
	/// failure never leaves a partial file behind.
	fn merge_files(&self, inputs: &[PathBuf], output: Option<&Path>) -> Result<Option<PathBuf>, Error> {
		let Some(output) = output.filter(|p| !p.as_os_str().is_empty()) else {
			tracing::warn!("Path to output file not defined");
			return Ok(None);
		};

		if let Some(missing) = inputs.iter().find(|p| !p.exists()) {
			return Err(Error::MissingInputFile(missing.clone()));
		}

		let inputs = inputs.iter().map(|p| MergeInput::read(p)).collect::<Result<Vec<_>, _>>()?;
		let merged = self.merge(&inputs)?;

		ensure_parent_dir_exists(output)?;
		std::fs::write(output, merged)?;
		tracing::info!("{} merger wrote {} input(s) to {}", self.name(), inputs.len(), output.display());
		Ok(Some(output.to_path_buf()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use tempfile::tempdir;

	#[test]
	fn read_missing_file() {
		let dir = tempdir().unwrap();
		let path = dir.path().join("absent.csv");
		assert!(matches!(MergeInput::read(&path), Err(Error::MissingInputFile(p)) if p == path));
	}

	#[test]
	fn read_existing_file() {
		let dir = tempdir().unwrap();
		let path = dir.path().join("a.json");
		std::fs::write(&path, "{}").unwrap();
		assert_eq!(MergeInput::read(&path).unwrap(), MergeInput::new(&path, "{}"));
	}
}
