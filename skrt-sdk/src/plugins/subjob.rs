use std::path::PathBuf;

use crate::{dataset::Partition, error::Error};

/// What a [`SubjobFactory`] produced for one partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjobHandle {
	pub index: usize,
	pub dir: PathBuf,
	pub manifest: PathBuf,
	/// Patient folders the subjob reads.
	pub paths: Vec<String>,
}

/// Turns a partition into one unit of remote work.
pub trait SubjobFactory {
	fn build(&self, index: usize, partition: &Partition) -> Result<SubjobHandle, Error>;

	fn build_all(&self, partitions: &[Partition]) -> Result<Vec<SubjobHandle>, Error> {
		partitions
			.iter()
			.enumerate()
			.map(|(index, partition)| self.build(index, partition))
			.collect()
	}
}
