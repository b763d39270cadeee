use itertools::Itertools;
use serde::{Deserialize, Serialize};
use skrt_sdk::{
	error::Error,
	plugins::merger::{MergeInput, Merger},
};
use std::{collections::BTreeSet, path::Path};

/// Merges CSV files whose columns may differ. The merged header is the
/// sorted union of every input header and missing cells are left empty.
///
/// Fields are split on every comma: quoted fields containing commas are
/// not supported.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CsvMerger {}

struct Table<'a> {
	path: &'a Path,
	labels: Vec<&'a str>,
	/// Data rows with their 1-based line numbers.
	rows: Vec<(usize, &'a str)>,
}

impl<'a> Table<'a> {
	fn parse(input: &'a MergeInput) -> Self {
		let mut lines = input.content.lines().map(str::trim_end).enumerate();
		let labels = match lines.next() {
			Some((_, header)) if !header.is_empty() => header.split(',').collect(),
			_ => {
				tracing::warn!("{} has no header", input.path.display());
				Vec::new()
			}
		};
		let rows = lines
			.filter(|(_, line)| !line.is_empty())
			.map(|(index, line)| (index + 1, line))
			.collect();
		Self {
			path: &input.path,
			labels,
			rows,
		}
	}
}

#[typetag::serde(name = "csv")]
impl Merger for CsvMerger {
	fn name(&self) -> &str {
		self.typetag_name()
	}

	#[tracing::instrument(level = "debug", skip_all, fields(inputs = inputs.len()))]
	fn merge(&self, inputs: &[MergeInput]) -> Result<String, Error> {
		let tables: Vec<Table> = inputs.iter().map(Table::parse).collect();
		let all_labels: Vec<&str> = tables
			.iter()
			.flat_map(|table| table.labels.iter().copied())
			.collect::<BTreeSet<_>>()
			.into_iter()
			.collect();

		let mut lines = vec![all_labels.iter().join(",")];
		for table in &tables {
			let positions: Vec<Option<usize>> = all_labels
				.iter()
				.map(|label| table.labels.iter().position(|l| l == label))
				.collect();

			for &(line, row) in &table.rows {
				let values: Vec<&str> = row.split(',').collect();
				if values.len() != table.labels.len() {
					return Err(Error::MalformedRow {
						path: table.path.to_path_buf(),
						line,
						expected: table.labels.len(),
						actual: values.len(),
					});
				}
				lines.push(positions.iter().map(|p| p.map_or("", |i| values[i])).join(","));
			}
		}
		Ok(lines.join("\n"))
	}
}
