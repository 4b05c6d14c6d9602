use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "scss-probe")]
#[command(about = "Checks that SCSS tree-sitter grammars load and parse")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Grammar configuration file (defaults to <runtime>/grammars.toml, then the builtin grammar)
	#[arg(long, short = 'c', value_name = "PATH")]
	pub config: Option<PathBuf>,

	/// Check a compiled SCSS grammar library instead of the configured grammars
	#[arg(long, short = 'l', value_name = "PATH", conflicts_with = "config")]
	pub library: Option<PathBuf>,

	/// Only check specific grammars (comma-separated)
	#[arg(long, value_delimiter = ',')]
	pub only: Option<Vec<String>>,

	/// Extra SCSS files every checked grammar must parse (SCSS grammars also parse the builtin sample)
	#[arg(long = "sample", short = 's', value_name = "FILE")]
	pub samples: Vec<PathBuf>,

	/// Verbose logging
	#[arg(long, short = 'v')]
	pub verbose: bool,
}
