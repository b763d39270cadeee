use skrt_sdk::{
	dataset::{group_key, Groups, PatientDataset},
	error::Error,
	plugins::discovery::ItemDiscovery,
	utils::fs::{entries, subdirs},
};
use skrt_stdx::path::PathExt;
use std::{
	collections::HashSet,
	path::{Path, PathBuf},
};

use super::studies;

/// Finds the images of each patient: `<patient>/<study>/<TYPE>/2*`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageDiscovery {
	/// Upper-cased image types to keep; empty keeps every type.
	image_types: HashSet<String>,
}

impl ImageDiscovery {
	pub fn new<I, S>(image_types: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		Self {
			image_types: image_types.into_iter().map(|t| t.as_ref().to_uppercase()).collect(),
		}
	}

	fn type_folders(&self, study: &Path) -> Result<Vec<PathBuf>, Error> {
		let mut folders: Vec<(String, PathBuf)> = subdirs(study)?
			.into_iter()
			.filter(|folder| !folder.is_hidden())
			.map(|folder| (folder.entity_name().to_uppercase(), folder))
			.filter(|(name, _)| self.image_types.is_empty() || self.image_types.contains(name))
			.collect();
		folders.sort_by(|a, b| a.0.cmp(&b.0));
		Ok(folders.into_iter().map(|(_, folder)| folder).collect())
	}
}

impl ItemDiscovery for ImageDiscovery {
	#[tracing::instrument(level = "debug", skip(dataset), fields(patients = dataset.len()))]
	fn enumerate(&self, dataset: &PatientDataset) -> Result<Groups, Error> {
		let mut groups = Groups::new();
		for patient in dataset.iter() {
			let mut images = Vec::new();
			for study in studies(patient)? {
				for folder in self.type_folders(&study)? {
					images.extend(
						entries(&folder)?
							.into_iter()
							.filter(|image| image.starts_with_char('2'))
							.map(|image| group_key(&image)),
					);
				}
			}
			tracing::debug!("{}: {} image(s)", patient.display(), images.len());
			groups.push((group_key(patient), images));
		}
		Ok(groups)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;
	use tempfile::{tempdir, TempDir};

	fn mkdirs(root: &Path, rels: &[&str]) {
		for rel in rels {
			std::fs::create_dir_all(root.join(rel)).unwrap();
		}
	}

	fn dataset() -> TempDir {
		let root = tempdir().unwrap();
		mkdirs(
			root.path(),
			&[
				"P1/20200101_090000/CT/20200101_090500",
				"P1/20200101_090000/MR/20200101_091000",
				"P1/20200101_090000/MR/notes",
				"P1/20200101_090000/.hidden/20200101_000000",
				"P1/20210301_100000/ct/20210301_100500",
				"P1/scratch/CT/20200101_000000",
				"P2/20200202_080000/RTSTRUCT/20200202_080100",
			],
		);
		root
	}

	fn names(items: &[String]) -> Vec<String> {
		items
			.iter()
			.map(|i| Path::new(i).components().rev().take(3).collect::<Vec<_>>())
			.map(|parts| {
				parts
					.iter()
					.rev()
					.map(|c| c.as_os_str().to_string_lossy().into_owned())
					.collect::<Vec<_>>()
					.join("/")
			})
			.collect()
	}

	#[test]
	fn all_types() {
		let root = dataset();
		let data = PatientDataset::new([root.path().join("P1"), root.path().join("P2")]);
		let groups = ImageDiscovery::new(Vec::<String>::new()).enumerate(&data).unwrap();

		assert_eq!(
			names(&groups[0].1),
			vec![
				"20200101_090000/CT/20200101_090500",
				"20200101_090000/MR/20200101_091000",
				"20210301_100000/ct/20210301_100500",
			]
		);
		assert_eq!(
			names(&groups[1].1),
			vec!["20200202_080000/RTSTRUCT/20200202_080100"]
		);
	}

	#[test]
	fn selected_types_are_case_insensitive() {
		let root = dataset();
		let data = PatientDataset::new([root.path().join("P1"), root.path().join("P2")]);
		let groups = ImageDiscovery::new(["Ct"]).enumerate(&data).unwrap();

		assert_eq!(
			names(&groups[0].1),
			vec!["20200101_090000/CT/20200101_090500", "20210301_100000/ct/20210301_100500"]
		);
		assert!(groups[1].1.is_empty());
	}
}
