use serde::{Deserialize, Serialize};
use skrt_sdk::{
	error::Error,
	plugins::merger::{MergeInput, Merger},
};

/// Concatenates inputs in order, for files that share one layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TextMerger {
	/// Drop the first line of every input except the first.
	#[serde(default)]
	pub strip_headers: bool,
}

#[typetag::serde(name = "text")]
impl Merger for TextMerger {
	fn name(&self) -> &str {
		self.typetag_name()
	}

	#[tracing::instrument(level = "debug", skip_all, fields(inputs = inputs.len()))]
	fn merge(&self, inputs: &[MergeInput]) -> Result<String, Error> {
		let mut merged = String::new();
		for (index, input) in inputs.iter().enumerate() {
			let body = if index > 0 && self.strip_headers {
				input.content.split_once('\n').map_or("", |(_, rest)| rest)
			} else {
				input.content.as_str()
			};
			if body.is_empty() {
				continue;
			}
			// a file without a trailing newline must not glue onto the next one
			if !merged.is_empty() && !merged.ends_with('\n') {
				merged.push('\n');
			}
			merged.push_str(body);
		}
		Ok(merged)
	}
}
