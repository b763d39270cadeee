use anyhow::{Context, Result};
use clap::{Parser, ValueEnum, ValueHint};
use skrt_sdk::plugins::merger::Merger;
use skrt_std::mergers::{CsvMerger, JsonMerger, TextMerger};
use std::path::PathBuf;

use super::Cmd;
use crate::config::JobConfig;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum MergerKind {
	/// Union of columns, sorted by label
	Csv,
	/// Array of every input document
	Json,
	/// Plain concatenation, dropping repeated headers
	Text,
}

impl MergerKind {
	fn merger(self) -> Box<dyn Merger> {
		match self {
			Self::Csv => Box::new(CsvMerger::default()),
			Self::Json => Box::new(JsonMerger::default()),
			Self::Text => Box::new(TextMerger { strip_headers: true }),
		}
	}
}

#[derive(Parser, Debug)]
pub struct Merge {
	#[arg(long, short = 'c', conflicts_with = "kind", value_hint = ValueHint::FilePath)]
	config: Option<PathBuf>,
	#[arg(long, short = 'k', value_enum, help = "Merge with default settings instead of the configured merger")]
	kind: Option<MergerKind>,
	#[arg(long, short = 'o', value_hint = ValueHint::FilePath)]
	output: Option<PathBuf>,
	#[arg(value_hint = ValueHint::FilePath)]
	inputs: Vec<PathBuf>,
}

impl Cmd for Merge {
	fn run(self) -> Result<()> {
		let merger = match self.kind {
			Some(kind) => kind.merger(),
			None => JobConfig::load(self.config)?
				.merger
				.context("no [merger] section in the configuration")?,
		};

		if let Some(path) = merger.merge_files(&self.inputs, self.output.as_deref())? {
			println!("merged {} file(s) into {}", self.inputs.len(), path.display());
		}
		Ok(())
	}
}
