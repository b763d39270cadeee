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
use crate::discovery::ImageDiscovery;

/// Splits a dataset at image level.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ImageSplitter {
	/// Type folders to consider, matched case-insensitively. Empty means all.
	#[serde(default)]
	pub image_types: Vec<String>,
	#[serde(default)]
	pub images_per_subjob: PartitionSize,
	/// Limit every subjob to the images of a single patient.
	#[serde(default = "default_true")]
	pub separate_patients: bool,
	/// Images already known per patient id; skips discovery when non-empty.
	#[serde(default, skip_serializing_if = "IndexMap::is_empty")]
	pub images: IndexMap<String, Vec<Item>>,
}

impl Default for ImageSplitter {
	fn default() -> Self {
		Self {
			image_types: Vec::new(),
			images_per_subjob: PartitionSize::ONE,
			separate_patients: true,
			images: IndexMap::new(),
		}
	}
}

#[typetag::serde(name = "image")]
impl Splitter for ImageSplitter {
	fn name(&self) -> &str {
		self.typetag_name()
	}

	fn option_name(&self) -> Option<&'static str> {
		Some("images")
	}

	#[tracing::instrument(level = "debug", skip(dataset), fields(patients = dataset.len()))]
	fn split(&self, dataset: &PatientDataset) -> Result<Vec<Partition>, Error> {
		let dataset = dataset.sorted();
		let groups = if self.images.is_empty() {
			ImageDiscovery::new(&self.image_types).enumerate(&dataset)?
		} else {
			Listed::new(&self.images).enumerate(&dataset)?
		};
		let options = PartitionOptions::new(self.images_per_subjob, self.separate_patients);
		Ok(partition(&groups, &options))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;
	use tempfile::tempdir;

	fn listed() -> IndexMap<String, Vec<Item>> {
		IndexMap::from([
			("P2".to_string(), vec!["/d/P2/i4".to_string(), "/d/P2/i5".to_string()]),
			(
				"P1".to_string(),
				vec!["/d/P1/i1".to_string(), "/d/P1/i2".to_string(), "/d/P1/i3".to_string()],
			),
		])
	}

	fn item_counts(partitions: &[Partition]) -> Vec<usize> {
		partitions.iter().map(Partition::len).collect()
	}

	#[test]
	fn separate_patients_with_listed_images() {
		let splitter = ImageSplitter {
			images_per_subjob: PartitionSize::new(2).unwrap(),
			images: listed(),
			..Default::default()
		};
		let partitions = splitter.split(&PatientDataset::new(["/d/P2", "/d/P1"])).unwrap();

		assert_eq!(item_counts(&partitions), vec![2, 1, 2]);
		let keys: Vec<Vec<&str>> = partitions.iter().map(|p| p.keys().collect()).collect();
		assert_eq!(keys, vec![vec!["/d/P1"], vec!["/d/P1"], vec!["/d/P2"]]);
	}

	#[test]
	fn packed_patients_with_listed_images() {
		let splitter = ImageSplitter {
			images_per_subjob: PartitionSize::new(2).unwrap(),
			separate_patients: false,
			images: listed(),
			..Default::default()
		};
		let partitions = splitter.split(&PatientDataset::new(["/d/P1", "/d/P2"])).unwrap();

		assert_eq!(item_counts(&partitions), vec![2, 2, 1]);
		assert_eq!(partitions[1].keys().collect::<Vec<_>>(), vec!["/d/P1", "/d/P2"]);
	}

	#[test]
	fn repeated_patient_gets_its_images_twice() {
		let splitter = ImageSplitter {
			images_per_subjob: PartitionSize::new(5).unwrap(),
			images: listed(),
			..Default::default()
		};
		let partitions = splitter.split(&PatientDataset::new(["/d/P2", "/d/P2"])).unwrap();
		assert_eq!(item_counts(&partitions), vec![2, 2]);
	}

	#[test]
	fn discovers_images_on_disk() {
		let root = tempdir().unwrap();
		for rel in ["P1/20200101_000000/CT/20200101_000100", "P1/20200101_000000/CT/20200101_000200"] {
			std::fs::create_dir_all(root.path().join(rel)).unwrap();
		}
		let splitter = ImageSplitter {
			image_types: vec!["ct".into()],
			..Default::default()
		};
		let partitions = splitter.split(&PatientDataset::new([root.path().join("P1")])).unwrap();
		assert_eq!(item_counts(&partitions), vec![1, 1]);
		assert_eq!(splitter.option_name(), Some("images"));
	}
}
