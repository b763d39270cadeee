use serde::{Deserialize, Serialize};
use skrt_sdk::{
	dataset::{group_key, Partition, PartitionSize, PatientDataset},
	error::Error,
	plugins::splitter::Splitter,
};

/// Hands each subjob up to `patients_per_subjob` whole patient folders.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PatientSplitter {
	#[serde(default)]
	pub patients_per_subjob: PartitionSize,
}

#[typetag::serde(name = "patient")]
impl Splitter for PatientSplitter {
	fn name(&self) -> &str {
		self.typetag_name()
	}

	#[tracing::instrument(level = "debug", skip(dataset), fields(patients = dataset.len()))]
	fn split(&self, dataset: &PatientDataset) -> Result<Vec<Partition>, Error> {
		// each folder is its own slice, holding the folder as its only item
		let paths: Vec<String> = dataset.iter().map(group_key).collect();
		Ok(paths
			.chunks(self.patients_per_subjob.get())
			.map(|chunk| chunk.iter().map(|key| (key.as_str(), vec![key.clone()])).collect())
			.collect())
	}
}
