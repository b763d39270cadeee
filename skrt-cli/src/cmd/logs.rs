use anyhow::{Context, Result};
use chrono::Local;
use std::path::Path;
use tracing_appender::{
	non_blocking::WorkerGuard,
	rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{
	filter::LevelFilter,
	fmt::{self},
	layer::SubscriberExt,
	util::SubscriberInitExt,
	Layer,
};

fn level(verbosity: u8) -> LevelFilter {
	match verbosity {
		0 => LevelFilter::WARN,
		1 => LevelFilter::INFO,
		2 => LevelFilter::DEBUG,
		_ => LevelFilter::TRACE,
	}
}

/// `<dir>/<timestamp>.log`, creating `dir` if needed.
fn file_appender(dir: &Path) -> Result<RollingFileAppender> {
	// milliseconds keep back-to-back runs from sharing a file
	let timestamp = Local::now().format("%Y-%m-%d-%H-%M-%S%.3f").to_string();
	RollingFileAppender::builder()
		.rotation(Rotation::NEVER)
		.filename_prefix(timestamp)
		.filename_suffix("log")
		.build(dir)
		.with_context(|| format!("could not open a log file in {}", dir.display()))
}

/// Installs the global subscriber. The returned guard flushes the log file
/// when dropped, so it has to live until the command finishes.
pub fn init(verbosity: u8, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
	let stderr_layer = fmt::layer()
		.with_writer(std::io::stderr)
		.with_target(false)
		.with_filter(level(verbosity));

	let (file_layer, guard) = match log_dir {
		Some(dir) => {
			let (writer, guard) = tracing_appender::non_blocking(file_appender(dir)?);
			let layer = fmt::layer()
				.with_writer(writer)
				.with_ansi(false)
				.pretty()
				.with_filter(LevelFilter::TRACE);
			(Some(layer), Some(guard))
		}
		None => (None, None),
	};

	tracing_subscriber::registry().with(stderr_layer).with(file_layer).init();

	if let Some(dir) = log_dir {
		tracing::debug!("Logging initialized. Log file in: {}", dir.display());
	}
	Ok(guard)
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;
	use tempfile::tempdir;

	#[test]
	fn verbosity_levels() {
		assert_eq!(level(0), LevelFilter::WARN);
		assert_eq!(level(1), LevelFilter::INFO);
		assert_eq!(level(2), LevelFilter::DEBUG);
		assert_eq!(level(7), LevelFilter::TRACE);
	}

	#[test]
	fn log_dir_is_created() {
		let dir = tempdir().unwrap();
		let logs = dir.path().join("runs/logs");
		file_appender(&logs).unwrap();
		assert!(logs.is_dir());
	}

	#[test]
	fn unusable_log_dir_is_an_error() {
		let dir = tempdir().unwrap();
		let blocker = dir.path().join("logs");
		std::fs::write(&blocker, "").unwrap();

		let err = file_appender(&blocker.join("nested")).unwrap_err();
		assert!(err.to_string().contains("could not open a log file"));
		assert!(init(0, Some(&blocker.join("nested"))).is_err());
	}
}
