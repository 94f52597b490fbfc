#![allow(missing_docs)]

use clap::{Parser, Subcommand};

mod cmd;

#[derive(Parser)]
#[command(name = "esmdoc", about = "ESM/ESP plugin inspection tools")]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Print record, cell, and skip statistics for one plugin.
	Info(cmd::info::Args),
	/// List interior cells with their placed-reference counts.
	Cells(cmd::cells::Args),
	/// Look up one record by kind and form id.
	Record(cmd::record::Args),
}

fn main() {
	if let Err(err) = run() {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run() -> esmdoc::esm::Result<()> {
	let cli = Cli::parse();

	match cli.command {
		Commands::Info(args) => cmd::info::run(args),
		Commands::Cells(args) => cmd::cells::run(args),
		Commands::Record(args) => cmd::record::run(args),
	}
}
