use skrt_stdx::path::{Expand, PathExt};
use std::path::{Path, PathBuf};

use crate::{error::Error, utils::fs::subdirs};

pub mod partition;

pub use partition::{partition, Partition, PartitionOptions, PartitionSize, Slice};

/// A leaf unit of work: the path of an image, a scan or a patient folder.
pub type Item = String;

/// Owning key (patient folder) with its ordered items, in the order
/// partitions are emitted in. A folder listed twice in the dataset appears
/// as two groups.
pub type Groups = Vec<(String, Vec<Item>)>;

/// An ordered list of patient folders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientDataset {
	pub paths: Vec<PathBuf>,
}

impl PatientDataset {
	pub fn new<I, P>(paths: I) -> Self
	where
		I: IntoIterator<Item = P>,
		P: Into<PathBuf>,
	{
		Self {
			paths: paths.into_iter().map(|p| p.into().expand_user().normalize()).collect(),
		}
	}

	/// Every visible sub-directory of `root`, in name order.
	pub fn from_root(root: &Path) -> Result<Self, Error> {
		let root = root.to_path_buf().expand_user().normalize();
		if !root.is_dir() {
			return Err(Error::Config(format!("dataset root {} is not a directory", root.display())));
		}
		let paths = subdirs(&root)?.into_iter().filter(|p| !p.is_hidden()).collect();
		Ok(Self { paths })
	}

	pub fn sorted(&self) -> Self {
		let mut paths = self.paths.clone();
		paths.sort();
		Self { paths }
	}

	pub fn len(&self) -> usize {
		self.paths.len()
	}

	pub fn is_empty(&self) -> bool {
		self.paths.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &Path> {
		self.paths.iter().map(PathBuf::as_path)
	}
}

/// Key under which a patient folder appears in [`Groups`].
pub fn group_key(path: &Path) -> String {
	path.to_string_lossy().into_owned()
}
