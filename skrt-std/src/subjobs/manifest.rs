use indexmap::IndexMap;
use serde_json::{json, Map, Value};
use skrt_sdk::{
	dataset::{Item, Partition},
	error::Error,
	plugins::subjob::{SubjobFactory, SubjobHandle},
};
use skrt_stdx::path::PathExt;
use std::{
	fs::File,
	io::{BufWriter, Write},
	path::{Path, PathBuf},
};

pub const MANIFEST_NAME: &str = "subjob.json";

/// Writes one `<output_dir>/<index>/subjob.json` per partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestFactory {
	pub output_dir: PathBuf,
	/// Key of the patient id to items map, see [`Splitter::option_name`].
	///
	/// [`Splitter::option_name`]: skrt_sdk::plugins::splitter::Splitter::option_name
	pub option: Option<String>,
}

impl ManifestFactory {
	pub fn new(output_dir: impl Into<PathBuf>, option: Option<&str>) -> Self {
		Self {
			output_dir: output_dir.into(),
			option: option.map(str::to_string),
		}
	}

	fn manifest(&self, index: usize, partition: &Partition) -> (Vec<String>, Value) {
		let paths: Vec<String> = partition.keys().map(str::to_string).collect();
		let mut doc = Map::new();
		doc.insert("index".into(), json!(index));
		doc.insert("paths".into(), json!(paths));

		if let Some(option) = &self.option {
			let mut by_id: IndexMap<String, Vec<Item>> = IndexMap::new();
			for slice in &partition.slices {
				by_id
					.entry(Path::new(&slice.key).entity_name())
					.or_default()
					.extend(slice.items.iter().cloned());
			}
			doc.insert(option.clone(), json!(by_id));
		}
		(paths, Value::Object(doc))
	}
}

impl SubjobFactory for ManifestFactory {
	#[tracing::instrument(level = "debug", skip(self, partition), fields(items = partition.len()))]
	fn build(&self, index: usize, partition: &Partition) -> Result<SubjobHandle, Error> {
		let dir = self.output_dir.join(index.to_string());
		std::fs::create_dir_all(&dir)?;

		let (paths, doc) = self.manifest(index, partition);
		let manifest = dir.join(MANIFEST_NAME);
		let mut writer = BufWriter::new(File::create(&manifest)?);
		serde_json::to_writer_pretty(&mut writer, &doc)?;
		writer.write_all(b"\n")?;
		writer.flush()?;

		tracing::debug!("subjob {index}: {} patient(s), manifest {}", paths.len(), manifest.display());
		Ok(SubjobHandle {
			index,
			dir,
			manifest,
			paths,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;
	use tempfile::tempdir;

	fn partition() -> Partition {
		Partition::from_iter([
			("/d/P1", vec!["/d/P1/s/CT/a".to_string()]),
			("/d/P2", vec!["/d/P2/s/CT/b".to_string(), "/d/P2/s/CT/c".to_string()]),
		])
	}

	#[test]
	fn writes_manifest_with_items_by_patient_id() {
		let out = tempdir().unwrap();
		let factory = ManifestFactory::new(out.path(), Some("images"));
		let handle = factory.build(3, &partition()).unwrap();

		assert_eq!(handle.dir, out.path().join("3"));
		assert_eq!(handle.paths, vec!["/d/P1", "/d/P2"]);

		let doc: Value = serde_json::from_str(&std::fs::read_to_string(&handle.manifest).unwrap()).unwrap();
		assert_eq!(
			doc,
			json!({
				"index": 3,
				"paths": ["/d/P1", "/d/P2"],
				"images": {"P1": ["/d/P1/s/CT/a"], "P2": ["/d/P2/s/CT/b", "/d/P2/s/CT/c"]},
			})
		);
	}

	#[test]
	fn paths_only_without_option() {
		let out = tempdir().unwrap();
		let factory = ManifestFactory::new(out.path(), None);
		let handle = factory.build(0, &partition()).unwrap();
		let doc: Value = serde_json::from_str(&std::fs::read_to_string(&handle.manifest).unwrap()).unwrap();
		assert_eq!(doc, json!({"index": 0, "paths": ["/d/P1", "/d/P2"]}));
	}

	#[test]
	fn build_all_numbers_subjobs() {
		let out = tempdir().unwrap();
		let factory = ManifestFactory::new(out.path(), None);
		let handles = factory.build_all(&[partition(), partition()]).unwrap();
		assert_eq!(handles.iter().map(|h| h.index).collect::<Vec<_>>(), vec![0, 1]);
		assert!(out.path().join("1").join(MANIFEST_NAME).is_file());
	}
}
