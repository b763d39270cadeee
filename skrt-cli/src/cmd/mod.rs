use clap::{ArgAction, Parser, Subcommand, ValueHint};
use merge::Merge;
use split::Split;
use std::path::PathBuf;

mod logs;
mod merge;
mod split;

#[derive(Subcommand)]
enum Command {
	Split(Split),
	Merge(Merge),
}

#[derive(Parser)]
#[command(about, author, version)]
pub struct App {
	#[arg(long, short = 'v', action = ArgAction::Count, global = true, help = "Increase log verbosity (-v info, -vv debug, -vvv trace)")]
	verbose: u8,
	#[arg(long, global = true, value_hint = ValueHint::DirPath, help = "Also write a log file for this run into this directory")]
	log_dir: Option<PathBuf>,
	#[command(subcommand)]
	command: Command,
}

pub trait Cmd {
	fn run(self) -> anyhow::Result<()>;
}

impl Cmd for App {
	fn run(self) -> anyhow::Result<()> {
		let _guard = logs::init(self.verbose, self.log_dir.as_deref())?;
		match self.command {
			Command::Split(split) => split.run(),
			Command::Merge(merge) => merge.run(),
		}
	}
}
