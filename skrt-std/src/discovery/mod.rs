use skrt_sdk::{error::Error, utils::fs::subdirs};
use skrt_stdx::path::PathExt;
use std::path::{Path, PathBuf};

mod image;
mod scan;

pub use image::ImageDiscovery;
pub use scan::{KvMode, ScanDiscovery};

/// True for study folder names of the form `<digits>_<digits>`.
pub fn is_study_timestamp(name: &str) -> bool {
	match name.split_once('_') {
		Some((date, time)) => [date, time]
			.iter()
			.all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit())),
		None => false,
	}
}

/// Study folders of a patient, oldest first.
pub fn studies(patient: &Path) -> Result<Vec<PathBuf>, Error> {
	Ok(subdirs(patient)?
		.into_iter()
		.filter(|study| study.starts_with_char('2') && is_study_timestamp(&study.entity_name()))
		.collect())
}

/// The most recent study folder of a patient, if there is one.
pub fn latest_study(patient: &Path) -> Result<Option<PathBuf>, Error> {
	Ok(subdirs(patient)?
		.into_iter()
		.rev()
		.find(|study| is_study_timestamp(&study.entity_name())))
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;
	use tempfile::tempdir;

	#[test]
	fn timestamps() {
		assert!(is_study_timestamp("20200101_120000"));
		assert!(is_study_timestamp("2_3"));
		assert!(!is_study_timestamp("20200101"));
		assert!(!is_study_timestamp("20200101_"));
		assert!(!is_study_timestamp("_120000"));
		assert!(!is_study_timestamp("20200101_1200_00"));
		assert!(!is_study_timestamp("2020a101_120000"));
		assert!(!is_study_timestamp(""));
	}

	#[test]
	fn studies_are_filtered_and_sorted() {
		let patient = tempdir().unwrap();
		for name in ["20210101_000000", "20200101_000000", "2020_notes", "CT"] {
			std::fs::create_dir(patient.path().join(name)).unwrap();
		}
		std::fs::write(patient.path().join("20190101_000000"), "").unwrap();

		assert_eq!(
			studies(patient.path()).unwrap(),
			vec![patient.path().join("20200101_000000"), patient.path().join("20210101_000000")]
		);
		assert_eq!(latest_study(patient.path()).unwrap(), Some(patient.path().join("20210101_000000")));
	}

	#[test]
	fn no_study() {
		let patient = tempdir().unwrap();
		std::fs::create_dir(patient.path().join("misc")).unwrap();
		assert_eq!(latest_study(patient.path()).unwrap(), None);
		assert!(studies(patient.path()).unwrap().is_empty());
	}
}
