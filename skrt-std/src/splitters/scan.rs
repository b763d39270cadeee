use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use skrt_sdk::{
	dataset::{partition, Item, Partition, PartitionOptions, PartitionSize, PatientDataset},
	error::Error,
	plugins::{
		discovery::{ItemDiscovery, Listed},
		splitter::Splitter,
	},
};

use super::default_true;
use crate::discovery::{KvMode, ScanDiscovery};

/// Splits a dataset at scan level, using each patient's latest study.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ScanSplitter {
	#[serde(default)]
	pub process_kv: KvMode,
	#[serde(default)]
	pub scans_per_subjob: PartitionSize,
	#[serde(default = "default_true")]
	pub separate_patients: bool,
	/// Scans already known per patient id; skips discovery when non-empty.
	#[serde(default, alias = "mvct_dict", skip_serializing_if = "IndexMap::is_empty")]
	pub scans: IndexMap<String, Vec<Item>>,
}

impl Default for ScanSplitter {
	fn default() -> Self {
		Self {
			process_kv: KvMode::default(),
			scans_per_subjob: PartitionSize::ONE,
			separate_patients: true,
			scans: IndexMap::new(),
		}
	}
}

#[typetag::serde(name = "scan")]
impl Splitter for ScanSplitter {
	fn name(&self) -> &str {
		self.typetag_name()
	}

	fn option_name(&self) -> Option<&'static str> {
		Some("mvct_dict")
	}

	#[tracing::instrument(level = "debug", skip(dataset), fields(patients = dataset.len()))]
	fn split(&self, dataset: &PatientDataset) -> Result<Vec<Partition>, Error> {
		let dataset = dataset.sorted();
		let mut groups = if self.scans.is_empty() {
			ScanDiscovery::new(self.process_kv).enumerate(&dataset)?
		} else {
			Listed::new(&self.scans).enumerate(&dataset)?
		};
		groups.iter_mut().for_each(|(_, scans)| scans.sort());
		let options = PartitionOptions::new(self.scans_per_subjob, self.separate_patients);
		Ok(partition(&groups, &options))
	}
}
