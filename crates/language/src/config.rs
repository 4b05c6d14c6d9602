//! Grammar configuration.
//!
//! Grammars to check are declared in a `grammars.toml` file:
//!
//! ```toml
//! [[grammar]]
//! name = "scss"
//! display = "SCSS"
//! source = { path = "target/grammars/libscss.so" }
//! required-kinds = ["mixin_statement", "include_statement"]
//! samples = ["styles/main.scss"]
//! ```
//!
//! Relative paths are resolved against the directory of the file they appear in.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::grammar::{GrammarError, GrammarSource, find_grammar_library_in};
use crate::kinds::scss_required_kinds;
use crate::loader::load_language;
use crate::provider::{BuiltinScss, GrammarProvider, SharedLibrary};
use crate::sample::{ParseSummary, SAMPLE_SCSS, parse_sample};

/// Default configuration shipped with the crate.
pub const DEFAULT_GRAMMARS_TOML: &str = include_str!("../runtime/grammars.toml");

/// Errors from reading configuration or running configured checks.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error reading a configuration or sample file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// Error parsing TOML syntax or structure.
	#[error("failed to parse grammars.toml: {0}")]
	Parse(#[from] toml::de::Error),

	/// `source = "builtin"` names a grammar that is not linked in.
	#[error("no builtin grammar named '{0}'")]
	UnknownGrammar(String),

	/// Loading or verifying the grammar failed.
	#[error(transparent)]
	Grammar(#[from] GrammarError),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// One `[[grammar]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GrammarConfig {
	/// Grammar name, also used to derive the library symbol.
	pub name: String,
	/// Name used in messages; defaults to the upper-cased grammar name.
	#[serde(default)]
	pub display: Option<String>,
	/// Where to load the grammar from.
	pub source: SourceConfig,
	/// Node kinds the grammar must declare.
	#[serde(default)]
	pub required_kinds: Option<Vec<String>>,
	/// SCSS files that must parse without errors.
	#[serde(default)]
	pub samples: Vec<PathBuf>,
}

/// Grammar location in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SourceConfig {
	/// `source = "builtin"`
	Builtin(BuiltinTag),
	/// `source = { path = "..." }`, a library file or a directory to search.
	Library { path: PathBuf },
}

/// The literal `"builtin"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuiltinTag {
	Builtin,
}

#[derive(Debug, Deserialize)]
struct GrammarsFile {
	#[serde(default)]
	grammar: Vec<GrammarConfig>,
}

/// Outcome of a successful [`GrammarConfig::verify`].
#[derive(Debug, Clone)]
pub struct GrammarReport {
	pub name: String,
	pub source: GrammarSource,
	pub abi_version: usize,
	pub node_kinds: usize,
	/// Sample label (file path or `<builtin sample>`) and its parse summary.
	pub samples: Vec<(String, ParseSummary)>,
}

impl GrammarConfig {
	/// A config entry for a grammar library at `path`.
	pub fn library(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
		Self {
			name: name.into(),
			display: None,
			source: SourceConfig::Library { path: path.into() },
			required_kinds: None,
			samples: Vec::new(),
		}
	}

	/// Name used in user-facing messages.
	pub fn display_name(&self) -> String {
		self.display
			.clone()
			.unwrap_or_else(|| self.name.to_uppercase())
	}

	/// Node kinds to require; SCSS grammars default to the full SCSS set.
	pub fn required_kinds(&self) -> Vec<String> {
		match &self.required_kinds {
			Some(kinds) => kinds.clone(),
			None if self.name == BuiltinScss::NAME => scss_required_kinds()
				.into_iter()
				.map(str::to_string)
				.collect(),
			None => Vec::new(),
		}
	}

	/// Builds the provider this entry describes.
	pub fn provider(&self) -> Result<Box<dyn GrammarProvider>> {
		match &self.source {
			SourceConfig::Builtin(BuiltinTag::Builtin) => {
				if self.name != BuiltinScss::NAME {
					return Err(ConfigError::UnknownGrammar(self.name.clone()));
				}
				Ok(Box::new(BuiltinScss))
			}
			SourceConfig::Library { path } => {
				let path = if path.is_dir() {
					find_grammar_library_in(&self.name, [path])?
				} else {
					path.clone()
				};
				let library = SharedLibrary::open(&self.name, self.display_name(), path)?;
				Ok(Box::new(library))
			}
		}
	}

	/// Loads the grammar, checks its node kinds and parses the samples.
	///
	/// SCSS grammars always parse [`SAMPLE_SCSS`] before the configured samples.
	pub fn verify(&self) -> Result<GrammarReport> {
		let provider = self.provider()?;
		let handle = load_language(provider.as_ref())?;
		handle.check_node_kinds(self.required_kinds().as_slice())?;

		let mut samples = Vec::new();
		if self.name == BuiltinScss::NAME {
			samples.push(("<builtin sample>".to_string(), parse_sample(&handle, SAMPLE_SCSS)?));
		}
		for path in &self.samples {
			let source = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
				path: path.clone(),
				error,
			})?;
			debug!(grammar = %self.name, sample = %path.display(), "Parsing sample");
			samples.push((path.display().to_string(), parse_sample(&handle, &source)?));
		}

		info!(grammar = %self.name, samples = samples.len(), "Grammar verified");
		Ok(GrammarReport {
			name: self.name.clone(),
			source: handle.source().clone(),
			abi_version: handle.abi_version(),
			node_kinds: handle.language().node_kind_count(),
			samples,
		})
	}

	fn resolve_paths(&mut self, base: &Path) {
		if let SourceConfig::Library { path } = &mut self.source
			&& path.is_relative()
		{
			*path = base.join(&*path);
		}
		for sample in &mut self.samples {
			if sample.is_relative() {
				*sample = base.join(&*sample);
			}
		}
	}
}

/// Parses grammar configurations from TOML text.
pub fn parse_grammar_configs(content: &str) -> Result<Vec<GrammarConfig>> {
	let file: GrammarsFile = toml::from_str(content)?;
	Ok(file.grammar)
}

/// Loads grammar configurations from a file, resolving relative paths.
pub fn load_grammar_configs(path: &Path) -> Result<Vec<GrammarConfig>> {
	let content = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
		path: path.to_path_buf(),
		error,
	})?;
	let mut configs = parse_grammar_configs(&content)?;

	let base = path.parent().unwrap_or_else(|| Path::new("."));
	for config in &mut configs {
		config.resolve_paths(base);
	}
	debug!(path = %path.display(), grammars = configs.len(), "Loaded grammar config");
	Ok(configs)
}

/// Grammar configurations from the embedded `grammars.toml`.
pub fn default_grammar_configs() -> Result<Vec<GrammarConfig>> {
	parse_grammar_configs(DEFAULT_GRAMMARS_TOML)
}
