use anyhow::{anyhow, bail, Context as ErrorContext, Result};
use config::{Config as LayeredConfig, Environment, File, FileFormat, Source};
use serde::Deserialize;
use skrt_sdk::{
	dataset::PatientDataset,
	plugins::{merger::Merger, splitter::Splitter},
	PROJECT_NAME,
};
use skrt_stdx::path::Expand;
use std::path::PathBuf;

/// Where the patient folders of a job come from. Explicit `paths` win
/// over `root`.
#[derive(Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DatasetConfig {
	pub root: Option<PathBuf>,
	#[serde(default)]
	pub paths: Vec<PathBuf>,
}

impl DatasetConfig {
	pub fn resolve(&self) -> Result<PatientDataset> {
		if !self.paths.is_empty() {
			return Ok(PatientDataset::new(self.paths.iter().cloned()));
		}
		match &self.root {
			Some(root) => Ok(PatientDataset::from_root(root)?),
			None => bail!("no dataset configured, set `dataset.root` or `dataset.paths`"),
		}
	}
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct JobConfig {
	#[serde(default)]
	pub dataset: DatasetConfig,
	pub splitter: Option<Box<dyn Splitter>>,
	pub merger: Option<Box<dyn Merger>>,
}

impl JobConfig {
	pub fn load(path: Option<PathBuf>) -> Result<Self> {
		let path = Self::resolve_path(path)?;
		if !path.exists() {
			return Err(anyhow!("Configuration file not found at {}", path.display()));
		}
		tracing::debug!("loading configuration from {}", path.display());
		Self::build(File::from(path))
	}

	pub fn from_toml(content: &str) -> Result<Self> {
		Self::build(File::from_str(content, FileFormat::Toml))
	}

	fn build<S>(source: S) -> Result<Self>
	where
		S: Source + Send + Sync + 'static,
	{
		let overrides = Environment::with_prefix(&PROJECT_NAME.to_uppercase())
			.prefix_separator("__")
			.separator("__")
			.try_parsing(true);
		LayeredConfig::builder()
			.add_source(source)
			.add_source(overrides)
			.build()?
			.try_deserialize::<JobConfig>()
			.context("Could not deserialize config")
	}

	pub fn resolve_path(path: Option<PathBuf>) -> Result<PathBuf> {
		if let Some(path) = path {
			return Ok(path.expand_user());
		}
		let config_var = format!("{}_CONFIG", PROJECT_NAME.to_uppercase());
		if let Ok(path) = std::env::var(&config_var) {
			return Ok(PathBuf::from(path).expand_user());
		}
		dirs::config_dir()
			.map(|dir| dir.join(PROJECT_NAME).join("config.toml"))
			.with_context(|| format!("could not find config directory, please set {config_var}"))
	}
}
