//! Grammar providers.
//!
//! A provider hands out the raw language function a tree-sitter grammar
//! exports. The builtin SCSS grammar comes from the `tree-sitter-scss` crate;
//! other builds are opened from shared libraries at runtime.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use libloading::Library;
use tracing::debug;
use tree_sitter_language::LanguageFn;

use crate::grammar::{GrammarError, GrammarSource, find_grammar_library, grammar_symbol_name};

/// Raw language function signature generated by the tree-sitter CLI.
pub type RawLanguageFn = unsafe extern "C" fn() -> *const ();

/// Opaque handle to a compiled grammar.
///
/// Keeps the originating shared library (if any) loaded for as long as the
/// descriptor or any handle built from it is alive.
#[derive(Clone)]
pub struct GrammarDescriptor {
	func: RawLanguageFn,
	library: Option<Arc<Library>>,
}

impl GrammarDescriptor {
	/// Wraps a raw language function.
	///
	/// # Safety
	///
	/// `func` must take no arguments and return either null or a pointer to a
	/// `TSLanguage` generated by the tree-sitter CLI.
	pub unsafe fn from_raw(func: RawLanguageFn) -> Self {
		Self {
			func,
			library: None,
		}
	}

	/// Calls the language function and reports whether it returned a language.
	pub fn is_present(&self) -> bool {
		// SAFETY: constructors guarantee `func` is a tree-sitter language function.
		!unsafe { (self.func)() }.is_null()
	}

	pub(crate) fn language_fn(&self) -> LanguageFn {
		// SAFETY: constructors guarantee `func` is a tree-sitter language function.
		unsafe { LanguageFn::from_raw(self.func) }
	}

	pub(crate) fn library(&self) -> Option<Arc<Library>> {
		self.library.clone()
	}
}

impl std::fmt::Debug for GrammarDescriptor {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("GrammarDescriptor")
			.field("dynamic", &self.library.is_some())
			.finish()
	}
}

/// Supplies the descriptor for one grammar.
pub trait GrammarProvider: Send + Sync {
	/// Grammar name, e.g. `scss`.
	fn name(&self) -> &str;

	/// Name used in user-facing messages, e.g. `SCSS`.
	fn display_name(&self) -> &str;

	/// Where the grammar comes from.
	fn source(&self) -> GrammarSource;

	/// Returns the grammar descriptor.
	fn descriptor(&self) -> Result<GrammarDescriptor, GrammarError>;
}

// Generated parser linked in by the `tree-sitter-scss` crate.
unsafe extern "C" {
	fn tree_sitter_scss() -> *const ();
}

/// The SCSS grammar linked in from the `tree-sitter-scss` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinScss;

impl BuiltinScss {
	pub const NAME: &'static str = "scss";
	pub const DISPLAY: &'static str = "SCSS";

	/// Contents of the grammar's `node-types.json`.
	pub const NODE_TYPES: &'static str = tree_sitter_scss::NODE_TYPES;
}

impl GrammarProvider for BuiltinScss {
	fn name(&self) -> &str {
		Self::NAME
	}

	fn display_name(&self) -> &str {
		Self::DISPLAY
	}

	fn source(&self) -> GrammarSource {
		GrammarSource::Builtin(Self::NAME)
	}

	fn descriptor(&self) -> Result<GrammarDescriptor, GrammarError> {
		// SAFETY: `tree_sitter_scss` is the parser generated by the tree-sitter CLI.
		Ok(unsafe { GrammarDescriptor::from_raw(tree_sitter_scss) })
	}
}

/// A grammar opened from a compiled shared library.
pub struct SharedLibrary {
	name: String,
	display: String,
	path: PathBuf,
	library: Arc<Library>,
}

impl SharedLibrary {
	/// Opens the grammar library at `path`.
	pub fn open(
		name: impl Into<String>,
		display: impl Into<String>,
		path: impl AsRef<Path>,
	) -> Result<Self, GrammarError> {
		let path = path.as_ref().to_path_buf();
		let name = name.into();
		debug!(grammar = %name, path = %path.display(), "Opening grammar library");

		// SAFETY: Loading a tree-sitter grammar runs no initialisers beyond the C runtime's.
		let library = unsafe { Library::new(&path) }
			.map_err(|e| GrammarError::LoadError(format!("{}: {}", path.display(), e)))?;

		Ok(Self {
			name,
			display: display.into(),
			path,
			library: Arc::new(library),
		})
	}

	/// Opens the first library for `name` found on the grammar search paths.
	pub fn discover(name: &str, display: impl Into<String>) -> Result<Self, GrammarError> {
		let path = find_grammar_library(name)?;
		Self::open(name, display, path)
	}

	/// Path of the opened library.
	pub fn path(&self) -> &Path {
		&self.path
	}
}

impl std::fmt::Debug for SharedLibrary {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SharedLibrary")
			.field("name", &self.name)
			.field("path", &self.path)
			.finish_non_exhaustive()
	}
}

impl GrammarProvider for SharedLibrary {
	fn name(&self) -> &str {
		&self.name
	}

	fn display_name(&self) -> &str {
		&self.display
	}

	fn source(&self) -> GrammarSource {
		GrammarSource::Library(self.path.clone())
	}

	fn descriptor(&self) -> Result<GrammarDescriptor, GrammarError> {
		let symbol = grammar_symbol_name(&self.name);

		// SAFETY: tree-sitter grammars export `tree_sitter_<name>` with this signature.
		let func = unsafe { self.library.get::<RawLanguageFn>(symbol.as_bytes()) }
			.map(|sym| *sym)
			.map_err(|e| GrammarError::MissingSymbol(format!("{symbol} in {}: {e}", self.path.display())))?;

		Ok(GrammarDescriptor {
			func,
			library: Some(Arc::clone(&self.library)),
		})
	}
}
