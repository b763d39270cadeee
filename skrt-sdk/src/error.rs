use std::path::PathBuf;
use thiserror::Error;

/// The primary error type for splitting and merging.
#[derive(Error, Debug)]
pub enum Error {
	#[error("Partition size must be a positive integer, got {0}")]
	InvalidPartitionSize(i64),

	#[error("Malformed row in {path:?} at line {line}: expected {expected} fields, found {actual}")]
	MalformedRow {
		path: PathBuf,
		line: usize,
		expected: usize,
		actual: usize,
	},

	#[error("Could not parse {path:?} as JSON")]
	Parse {
		#[source]
		source: serde_json::Error,
		path: PathBuf,
	},

	#[error("Input file not found: {0:?}")]
	MissingInputFile(PathBuf),

	#[error("Error in configuration: {0}")]
	Config(String),

	#[error("Error converting to value")]
	Json(#[from] serde_json::Error),

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Other(#[from] anyhow::Error),
}
