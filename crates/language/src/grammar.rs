//! Grammar sources and search path configuration.
//!
//! Grammars are compiled tree-sitter parsers. They are either linked into the
//! binary (the published `tree-sitter-scss` crate) or loaded from a shared
//! library found on the search paths.
//!
//! Helix's runtime directories are checked as a fallback for users who already
//! have Helix installed with grammars built.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Environment variable overriding the runtime directory.
pub const RUNTIME_ENV: &str = "SCSS_PROBE_RUNTIME";

/// Errors that can occur when loading or verifying a grammar.
#[derive(Error, Debug)]
pub enum GrammarError {
	/// Grammar library not found in any search path.
	#[error("grammar not found: {0}")]
	NotFound(String),

	/// Failed to load the dynamic library.
	#[error("failed to load grammar library: {0}")]
	LoadError(String),

	/// Grammar library exists but doesn't export the expected symbol.
	#[error("grammar library missing language function: {0}")]
	MissingSymbol(String),

	/// The provider handed back a null language.
	#[error("Error loading {display} grammar")]
	Absent {
		/// Human-facing grammar name, e.g. `SCSS`.
		display: String,
	},

	/// The grammar was generated for an ABI the runtime cannot read.
	#[error("grammar '{grammar}' has ABI version {version}, supported range is {min}..={max}")]
	IncompatibleVersion {
		grammar: String,
		version: usize,
		min: usize,
		max: usize,
	},

	/// A parser refused the language.
	#[error("parser rejected grammar '{grammar}': {reason}")]
	Rejected { grammar: String, reason: String },

	/// The language lacks node kinds the grammar is expected to declare.
	#[error("grammar '{grammar}' is missing node kinds: {}", kinds.join(", "))]
	MissingKinds { grammar: String, kinds: Vec<String> },

	/// A sample document did not parse cleanly.
	#[error("failed to parse sample with grammar '{grammar}': {reason}")]
	Parse { grammar: String, reason: String },

	/// Filesystem I/O error.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
}

/// Source for loading a grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarSource {
	/// Grammar built into the binary.
	Builtin(&'static str),
	/// Grammar loaded from a shared library file.
	Library(PathBuf),
}

impl std::fmt::Display for GrammarSource {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Builtin(name) => write!(f, "builtin:{name}"),
			Self::Library(path) => write!(f, "{}", path.display()),
		}
	}
}

/// Returns the symbol a grammar library exports its language function under.
pub fn grammar_symbol_name(name: &str) -> String {
	format!("tree_sitter_{}", name.replace('-', "_"))
}

/// Returns the platform-specific library filename for a grammar.
pub fn grammar_library_name(name: &str) -> String {
	let safe_name = name.replace('-', "_");
	#[cfg(target_os = "macos")]
	{
		format!("lib{safe_name}.dylib")
	}
	#[cfg(target_os = "windows")]
	{
		format!("{safe_name}.dll")
	}
	#[cfg(not(any(target_os = "macos", target_os = "windows")))]
	{
		format!("lib{safe_name}.so")
	}
}

/// Returns the primary runtime directory: `~/.local/share/scss-probe/`.
pub fn runtime_dir() -> PathBuf {
	if let Ok(runtime) = std::env::var(RUNTIME_ENV) {
		return PathBuf::from(runtime);
	}

	dirs::data_local_dir()
		.map(|d| d.join("scss-probe"))
		.unwrap_or_else(|| PathBuf::from("."))
}

/// Returns directories to search for compiled grammar libraries.
pub fn grammar_search_paths() -> Vec<PathBuf> {
	let mut paths = Vec::new();

	if let Ok(runtime) = std::env::var(RUNTIME_ENV) {
		paths.push(PathBuf::from(runtime).join("grammars"));
	}

	if let Some(cache) = dirs::cache_dir() {
		paths.push(cache.join("scss-probe").join("grammars"));
	}

	if let Some(data) = dirs::data_local_dir() {
		paths.push(data.join("scss-probe").join("grammars"));
	}

	for helix_dir in helix_runtime_dirs() {
		paths.push(helix_dir.join("grammars"));
	}

	paths
}

/// Finds the first library for `name` in the given directories.
pub fn find_grammar_library_in<I, P>(name: &str, dirs: I) -> Result<PathBuf, GrammarError>
where
	I: IntoIterator<Item = P>,
	P: AsRef<Path>,
{
	let lib_name = grammar_library_name(name);

	dirs.into_iter()
		.map(|dir| dir.as_ref().join(&lib_name))
		.find(|path| path.exists())
		.ok_or_else(|| GrammarError::NotFound(name.to_string()))
}

/// Finds a grammar library on the default search paths.
pub fn find_grammar_library(name: &str) -> Result<PathBuf, GrammarError> {
	find_grammar_library_in(name, grammar_search_paths())
}

/// Returns Helix runtime directories for fallback grammar loading.
fn helix_runtime_dirs() -> Vec<PathBuf> {
	let mut paths = Vec::new();

	if let Ok(runtime) = std::env::var("HELIX_RUNTIME") {
		paths.push(PathBuf::from(runtime));
	}

	if let Some(config) = dirs::config_dir() {
		let helix_runtime = config.join("helix").join("runtime");
		if helix_runtime.exists() {
			paths.push(helix_runtime);
		}
	}

	paths
}
