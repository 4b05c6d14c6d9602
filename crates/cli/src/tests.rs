use std::path::PathBuf;

use clap::Parser;
use pretty_assertions::assert_eq;
use scss_probe_language::config::SourceConfig;

use super::select_configs;
use crate::cli::Cli;

fn parse(rest: &[&str]) -> Result<Cli, clap::Error> {
	Cli::try_parse_from(std::iter::once("scss-probe").chain(rest.iter().copied()))
}

fn write_config(dir: &tempfile::TempDir) -> PathBuf {
	let path = dir.path().join("grammars.toml");
	std::fs::write(
		&path,
		r#"
[[grammar]]
name = "scss"
source = "builtin"

[[grammar]]
name = "scss-next"
display = "SCSS (next)"
source = { path = "grammars" }
"#,
	)
	.unwrap();
	path
}

#[test]
fn library_overrides_configuration() {
	let cli = parse(&["--library", "/opt/libscss.so"]).unwrap();
	let configs = select_configs(&cli).unwrap();

	assert_eq!(configs.len(), 1);
	assert_eq!(configs[0].name, "scss");
	assert_eq!(
		configs[0].source,
		SourceConfig::Library {
			path: PathBuf::from("/opt/libscss.so")
		}
	);
}

#[test]
fn library_conflicts_with_config() {
	assert!(parse(&["--library", "a.so", "--config", "grammars.toml"]).is_err());
}

#[test]
fn only_filters_configured_grammars() {
	let dir = tempfile::tempdir().unwrap();
	let path = write_config(&dir);
	let path = path.to_str().unwrap();

	let all = select_configs(&parse(&["--config", path]).unwrap()).unwrap();
	assert_eq!(all.len(), 2);
	assert_eq!(
		all[1].source,
		SourceConfig::Library {
			path: dir.path().join("grammars")
		}
	);

	let only = select_configs(&parse(&["--config", path, "--only", "scss-next,less"]).unwrap()).unwrap();
	let names: Vec<_> = only.iter().map(|c| c.name.as_str()).collect();
	assert_eq!(names, vec!["scss-next"]);
}

#[test]
fn samples_are_appended_to_every_grammar() {
	let dir = tempfile::tempdir().unwrap();
	let path = write_config(&dir);

	let cli = parse(&["-c", path.to_str().unwrap(), "-s", "a.scss", "--sample", "b.scss"]).unwrap();
	for config in select_configs(&cli).unwrap() {
		assert_eq!(config.samples, vec![PathBuf::from("a.scss"), PathBuf::from("b.scss")]);
	}
}

#[test]
fn missing_config_is_an_error() {
	let dir = tempfile::tempdir().unwrap();
	let missing = dir.path().join("missing.toml");
	let cli = parse(&["--config", missing.to_str().unwrap()]).unwrap();

	let err = select_configs(&cli).unwrap_err();
	assert!(err.to_string().starts_with("loading "), "{err}");
}
