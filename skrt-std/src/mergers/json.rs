use serde::{Deserialize, Serialize};
use serde_json::Value;
use skrt_sdk::{
	error::Error,
	plugins::merger::{MergeInput, Merger},
};

use super::layout::LayoutFormatter;

fn default_indent() -> Option<usize> {
	Some(1)
}

fn default_separators() -> (String, String) {
	(",".to_string(), ":".to_string())
}

fn default_sort_keys() -> bool {
	true
}

/// Wraps every input document, in order, into one JSON array.
///
/// Numbers are copied as written, whatever their size or precision.
/// Strings are written as raw UTF-8 unless `ensure_ascii` is set, which
/// escapes every non-ASCII character the way Python's `json.dump` does by
/// default.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct JsonMerger {
	/// Spaces per nesting level; `None` writes a single line.
	#[serde(default = "default_indent")]
	pub indent: Option<usize>,
	/// Separator between items, and between a key and its value.
	#[serde(default = "default_separators")]
	pub separators: (String, String),
	/// Sort the keys of every object, at every depth.
	#[serde(default = "default_sort_keys")]
	pub sort_keys: bool,
	#[serde(default)]
	pub ensure_ascii: bool,
}

impl Default for JsonMerger {
	fn default() -> Self {
		Self {
			indent: default_indent(),
			separators: default_separators(),
			sort_keys: default_sort_keys(),
			ensure_ascii: false,
		}
	}
}

fn sort_keys(value: Value) -> Value {
	match value {
		Value::Object(map) => {
			let mut members: Vec<(String, Value)> = map.into_iter().collect();
			members.sort_by(|a, b| a.0.cmp(&b.0));
			Value::Object(members.into_iter().map(|(k, v)| (k, sort_keys(v))).collect())
		}
		Value::Array(values) => Value::Array(values.into_iter().map(sort_keys).collect()),
		other => other,
	}
}

#[typetag::serde(name = "json")]
impl Merger for JsonMerger {
	fn name(&self) -> &str {
		self.typetag_name()
	}

	#[tracing::instrument(level = "debug", skip_all, fields(inputs = inputs.len()))]
	fn merge(&self, inputs: &[MergeInput]) -> Result<String, Error> {
		let documents = inputs
			.iter()
			.map(|input| {
				serde_json::from_str::<Value>(&input.content).map_err(|source| Error::Parse {
					source,
					path: input.path.clone(),
				})
			})
			.map(|document| document.map(|d| if self.sort_keys { sort_keys(d) } else { d }))
			.collect::<Result<Vec<_>, _>>()?;

		let (item_separator, key_separator) = &self.separators;
		let mut out = Vec::new();
		let formatter = LayoutFormatter::new(self.indent, item_separator, key_separator).ensure_ascii(self.ensure_ascii);
		let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
		Value::Array(documents).serialize(&mut serializer)?;
		String::from_utf8(out).map_err(|e| Error::Other(e.into()))
	}
}
