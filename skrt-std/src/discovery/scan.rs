use serde::{Deserialize, Serialize};
use skrt_sdk::{
	dataset::{group_key, Groups, PatientDataset},
	error::Error,
	plugins::discovery::ItemDiscovery,
	utils::fs::entries,
};
use std::fmt;

use super::latest_study;

/// Which scans of the latest study are processed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "KvModeRepr")]
pub enum KvMode {
	/// MV scans only.
	#[default]
	Omit,
	/// kV as well as MV scans.
	Include,
	/// kV scans only.
	Only,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum KvModeRepr {
	Legacy(i64),
	Name(String),
}

impl TryFrom<KvModeRepr> for KvMode {
	type Error = InvalidKvMode;

	fn try_from(repr: KvModeRepr) -> Result<Self, Self::Error> {
		match repr {
			KvModeRepr::Legacy(0) => Ok(Self::Omit),
			KvModeRepr::Legacy(1) => Ok(Self::Include),
			KvModeRepr::Legacy(-1) => Ok(Self::Only),
			KvModeRepr::Legacy(other) => Err(InvalidKvMode(other.to_string())),
			KvModeRepr::Name(name) => match name.to_lowercase().as_str() {
				"omit" => Ok(Self::Omit),
				"include" => Ok(Self::Include),
				"only" => Ok(Self::Only),
				_ => Err(InvalidKvMode(name)),
			},
		}
	}
}

#[derive(Debug)]
pub struct InvalidKvMode(String);

impl fmt::Display for InvalidKvMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "invalid process_kv `{}`, expected omit (0), include (1) or only (-1)", self.0)
	}
}

impl KvMode {
	pub fn folders(self) -> &'static [&'static str] {
		match self {
			Self::Omit => &["MVCT"],
			Self::Include => &["CT", "CT_HD", "MVCT"],
			Self::Only => &["CT", "CT_HD"],
		}
	}
}

/// Finds the scans of each patient's latest study:
/// `<patient>/<latest study>/{CT,CT_HD,MVCT}/*`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanDiscovery {
	pub process_kv: KvMode,
}

impl ScanDiscovery {
	pub fn new(process_kv: KvMode) -> Self {
		Self { process_kv }
	}
}

impl ItemDiscovery for ScanDiscovery {
	#[tracing::instrument(level = "debug", skip(dataset), fields(patients = dataset.len()))]
	fn enumerate(&self, dataset: &PatientDataset) -> Result<Groups, Error> {
		let mut groups = Groups::new();
		for patient in dataset.iter() {
			let mut scans = Vec::new();
			match latest_study(patient)? {
				Some(study) => {
					for folder in self.process_kv.folders() {
						let dir = study.join(folder);
						if dir.is_dir() {
							scans.extend(entries(&dir)?.iter().map(|scan| group_key(scan)));
						}
					}
					scans.sort();
				}
				None => tracing::warn!("{} has no study folder", patient.display()),
			}
			tracing::debug!("{}: {} scan(s)", patient.display(), scans.len());
			groups.push((group_key(patient), scans));
		}
		Ok(groups)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;
	use serde::de::{self, IntoDeserializer};
	use std::path::Path;
	use tempfile::tempdir;

	fn layout(root: &Path) {
		for rel in [
			"P1/20200101_000000/MVCT/20200105_000000",
			"P1/20200301_000000/MVCT/20200310_000000",
			"P1/20200301_000000/MVCT/20200303_000000",
			"P1/20200301_000000/CT/20200301_010000",
			"P1/20200301_000000/CT_HD/20200301_020000",
			"P1/notes",
			"P2/misc",
		] {
			std::fs::create_dir_all(root.join(rel)).unwrap();
		}
	}

	fn scans(mode: KvMode, root: &Path) -> Groups {
		let data = PatientDataset::new([root.join("P1"), root.join("P2")]);
		ScanDiscovery::new(mode).enumerate(&data).unwrap()
	}

	#[test]
	fn mv_only_uses_latest_study() {
		let root = tempdir().unwrap();
		layout(root.path());
		let groups = scans(KvMode::Omit, root.path());
		let study = root.path().join("P1/20200301_000000");
		assert_eq!(
			groups[0].1,
			vec![
				group_key(&study.join("MVCT/20200303_000000")),
				group_key(&study.join("MVCT/20200310_000000")),
			]
		);
	}

	#[test]
	fn kv_and_mv_sorted_together() {
		let root = tempdir().unwrap();
		layout(root.path());
		let groups = scans(KvMode::Include, root.path());
		let study = root.path().join("P1/20200301_000000");
		assert_eq!(
			groups[0].1,
			vec![
				group_key(&study.join("CT/20200301_010000")),
				group_key(&study.join("CT_HD/20200301_020000")),
				group_key(&study.join("MVCT/20200303_000000")),
				group_key(&study.join("MVCT/20200310_000000")),
			]
		);
	}

	#[test]
	fn kv_only() {
		let root = tempdir().unwrap();
		layout(root.path());
		let groups = scans(KvMode::Only, root.path());
		assert_eq!(groups[0].1.len(), 2);
	}

	#[test]
	fn patient_without_study_is_empty() {
		let root = tempdir().unwrap();
		layout(root.path());
		let groups = scans(KvMode::Include, root.path());
		assert!(groups[1].1.is_empty());
	}

	fn kv_mode<T>(value: T) -> Result<KvMode, de::value::Error>
	where
		T: IntoDeserializer<'static, de::value::Error>,
	{
		KvMode::deserialize(value.into_deserializer())
	}

	#[test]
	fn kv_mode_accepts_names_and_legacy_integers() {
		assert_eq!(kv_mode(0i64).unwrap(), KvMode::Omit);
		assert_eq!(kv_mode(1i64).unwrap(), KvMode::Include);
		assert_eq!(kv_mode(-1i64).unwrap(), KvMode::Only);
		assert_eq!(kv_mode("only").unwrap(), KvMode::Only);
		assert_eq!(kv_mode("Include").unwrap(), KvMode::Include);
		assert!(kv_mode(2i64).is_err());
		assert!(kv_mode("sometimes").is_err());
		assert_eq!(serde_json::to_string(&KvMode::Include).unwrap(), "\"include\"");
	}
}
