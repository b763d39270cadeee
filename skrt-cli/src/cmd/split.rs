use anyhow::{Context, Result};
use clap::{Parser, ValueHint};
use itertools::Itertools;
use skrt_sdk::{
	dataset::PatientDataset,
	plugins::{splitter::Splitter, subjob::SubjobFactory},
};
use skrt_std::subjobs::ManifestFactory;
use std::path::PathBuf;

use super::Cmd;
use crate::config::JobConfig;

#[derive(Parser, Debug)]
pub struct Split {
	#[arg(long, short = 'c', value_hint = ValueHint::FilePath)]
	config: Option<PathBuf>,
	#[arg(long, conflicts_with = "paths", value_hint = ValueHint::DirPath, help = "Use every folder under this directory as a patient")]
	root: Option<PathBuf>,
	#[arg(long, short = 'o', default_value = "subjobs", value_hint = ValueHint::DirPath, help = "Directory receiving one folder per subjob")]
	output: PathBuf,
	#[arg(long, help = "List the subjobs without writing their manifests")]
	dry_run: bool,
	#[arg(value_hint = ValueHint::DirPath, help = "Patient folders, overriding the configured dataset")]
	paths: Vec<PathBuf>,
}

impl Split {
	fn dataset(&self, config: &JobConfig) -> Result<PatientDataset> {
		if !self.paths.is_empty() {
			return Ok(PatientDataset::new(self.paths.iter().cloned()));
		}
		match &self.root {
			Some(root) => Ok(PatientDataset::from_root(root)?),
			None => config.dataset.resolve(),
		}
	}
}

impl Cmd for Split {
	fn run(self) -> Result<()> {
		let config = JobConfig::load(self.config.clone())?;
		let splitter = config
			.splitter
			.clone()
			.context("no [splitter] section in the configuration")?;
		let dataset = self.dataset(&config)?;

		let partitions = splitter.split(&dataset)?;
		tracing::info!(
			"{} splitter made {} subjob(s) from {} patient folder(s)",
			splitter.name(),
			partitions.len(),
			dataset.len()
		);

		if self.dry_run {
			for (index, partition) in partitions.iter().enumerate() {
				println!("{index}\t{} item(s)\t{}", partition.len(), partition.keys().join(" "));
			}
			return Ok(());
		}

		let factory = ManifestFactory::new(&self.output, splitter.option_name());
		let handles = factory.build_all(&partitions)?;
		println!("wrote {} subjob manifest(s) to {}", handles.len(), self.output.display());
		Ok(())
	}
}
