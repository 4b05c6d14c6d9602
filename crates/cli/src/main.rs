//! scss-probe binary.
//!
//! Loads every configured SCSS grammar, checks its node kinds, parses the
//! samples and prints one line per grammar.

mod cli;
#[cfg(test)]
mod tests;

use anyhow::{Context, bail};
use clap::Parser;
use cli::Cli;
use scss_probe_language::{GrammarConfig, default_grammar_configs, load_grammar_configs, runtime_dir};
use tracing::{info, warn};

fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();
	setup_tracing(cli.verbose);

	let configs = select_configs(&cli)?;
	if configs.is_empty() {
		bail!("no grammars selected");
	}

	let mut failed = 0;
	for config in &configs {
		match config.verify() {
			Ok(report) => {
				println!(
					"ok {} ({}, ABI {}, {} node kinds)",
					report.name, report.source, report.abi_version, report.node_kinds
				);
				for (label, summary) in &report.samples {
					println!("  parsed {label}: {} top-level nodes", summary.named_children);
				}
			}
			Err(e) => {
				failed += 1;
				println!("FAIL {}: {e}", config.name);
			}
		}
	}

	if failed > 0 {
		bail!("{failed} of {} grammars failed", configs.len());
	}
	Ok(())
}

/// Resolves which grammars to check from the command line.
fn select_configs(cli: &Cli) -> anyhow::Result<Vec<GrammarConfig>> {
	let mut configs = if let Some(library) = &cli.library {
		vec![GrammarConfig::library("scss", library)]
	} else if let Some(path) = &cli.config {
		load_grammar_configs(path).with_context(|| format!("loading {}", path.display()))?
	} else {
		let runtime_config = runtime_dir().join("grammars.toml");
		if runtime_config.exists() {
			info!(path = %runtime_config.display(), "Using runtime grammar config");
			load_grammar_configs(&runtime_config)?
		} else {
			default_grammar_configs()?
		}
	};

	if let Some(only) = &cli.only {
		for name in only {
			if !configs.iter().any(|c| &c.name == name) {
				warn!(grammar = %name, "No such grammar configured");
			}
		}
		configs.retain(|c| only.contains(&c.name));
	}

	for config in &mut configs {
		config.samples.extend(cli.samples.iter().cloned());
	}

	Ok(configs)
}

fn setup_tracing(verbose: bool) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
		if verbose {
			EnvFilter::new("scss_probe=debug,scss_probe_language=debug")
		} else {
			EnvFilter::new("warn")
		}
	});

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.init();
}
