//! Grammar load verification.
//!
//! Turns a provider's descriptor into a [`LanguageHandle`] through
//! [`tree_sitter::Language::new`], rejecting null languages, unsupported ABI
//! versions and languages a parser refuses.

use std::sync::Arc;

use libloading::Library;
use tracing::{debug, info, warn};
use tree_sitter::{LANGUAGE_VERSION, Language, MIN_COMPATIBLE_LANGUAGE_VERSION, Parser};

use crate::grammar::{GrammarError, GrammarSource};
use crate::kinds::missing_kinds;
use crate::provider::{BuiltinScss, GrammarProvider};

/// A loaded, parser-accepted tree-sitter language.
#[derive(Debug, Clone)]
pub struct LanguageHandle {
	language: Language,
	name: String,
	display: String,
	source: GrammarSource,
	// Must outlive `language` when the grammar was opened dynamically.
	_library: Option<Arc<Library>>,
}

impl LanguageHandle {
	/// The tree-sitter language.
	pub fn language(&self) -> &Language {
		&self.language
	}

	/// Grammar name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Name used in user-facing messages.
	pub fn display_name(&self) -> &str {
		&self.display
	}

	/// Where the grammar was loaded from.
	pub fn source(&self) -> &GrammarSource {
		&self.source
	}

	/// ABI version the grammar was generated with.
	pub fn abi_version(&self) -> usize {
		self.language.abi_version()
	}

	/// Creates a parser set to this language.
	pub fn parser(&self) -> Result<Parser, GrammarError> {
		let mut parser = Parser::new();
		parser
			.set_language(&self.language)
			.map_err(|e| GrammarError::Rejected {
				grammar: self.name.clone(),
				reason: e.to_string(),
			})?;
		Ok(parser)
	}

	/// Fails with [`GrammarError::MissingKinds`] unless every kind is a named node of this language.
	pub fn check_node_kinds<S: AsRef<str>>(&self, kinds: &[S]) -> Result<(), GrammarError> {
		let missing = missing_kinds(&self.language, kinds);
		if missing.is_empty() {
			return Ok(());
		}
		warn!(grammar = %self.name, missing = ?missing, "Grammar is missing node kinds");
		Err(GrammarError::MissingKinds {
			grammar: self.name.clone(),
			kinds: missing,
		})
	}
}

/// Loads the grammar supplied by `provider` and verifies it is usable.
pub fn load_language(provider: &dyn GrammarProvider) -> Result<LanguageHandle, GrammarError> {
	let name = provider.name();
	let source = provider.source();
	debug!(grammar = name, source = %source, "Constructing language handle");

	let descriptor = provider.descriptor()?;
	if !descriptor.is_present() {
		warn!(grammar = name, source = %source, "Grammar returned a null language");
		return Err(GrammarError::Absent {
			display: provider.display_name().to_string(),
		});
	}

	let language = Language::new(descriptor.language_fn());

	let version = language.abi_version();
	if !(MIN_COMPATIBLE_LANGUAGE_VERSION..=LANGUAGE_VERSION).contains(&version) {
		warn!(grammar = name, version, "Incompatible grammar ABI version");
		return Err(GrammarError::IncompatibleVersion {
			grammar: name.to_string(),
			version,
			min: MIN_COMPATIBLE_LANGUAGE_VERSION,
			max: LANGUAGE_VERSION,
		});
	}

	let handle = LanguageHandle {
		language,
		name: name.to_string(),
		display: provider.display_name().to_string(),
		source,
		_library: descriptor.library(),
	};
	handle.parser()?;

	info!(
		grammar = name,
		abi = version,
		node_kinds = handle.language.node_kind_count(),
		"Grammar loaded"
	);
	Ok(handle)
}

/// Loads the builtin SCSS grammar.
///
/// Fails with `Error loading SCSS grammar` when the grammar yields no language.
pub fn verify_grammar_loads() -> Result<LanguageHandle, GrammarError> {
	load_language(&BuiltinScss)
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::kinds::SCSS_STATEMENT_KINDS;
	use crate::provider::GrammarDescriptor;

	unsafe extern "C" fn null_language() -> *const () {
		std::ptr::null()
	}

	struct NullProvider;

	impl GrammarProvider for NullProvider {
		fn name(&self) -> &str {
			"scss"
		}

		fn display_name(&self) -> &str {
			"SCSS"
		}

		fn source(&self) -> GrammarSource {
			GrammarSource::Builtin("scss")
		}

		fn descriptor(&self) -> Result<GrammarDescriptor, GrammarError> {
			// SAFETY: returns null and touches nothing.
			Ok(unsafe { GrammarDescriptor::from_raw(null_language) })
		}
	}

	struct FailingProvider;

	impl GrammarProvider for FailingProvider {
		fn name(&self) -> &str {
			"scss"
		}

		fn display_name(&self) -> &str {
			"SCSS"
		}

		fn source(&self) -> GrammarSource {
			GrammarSource::Library("/nonexistent/libscss.so".into())
		}

		fn descriptor(&self) -> Result<GrammarDescriptor, GrammarError> {
			Err(GrammarError::MissingSymbol("tree_sitter_scss".to_string()))
		}
	}

	#[test]
	fn test_can_load_grammar() {
		let handle = verify_grammar_loads().expect("Error loading SCSS grammar");
		assert_eq!(handle.name(), "scss");
		assert_eq!(handle.display_name(), "SCSS");
		assert_eq!(handle.source(), &GrammarSource::Builtin("scss"));
		assert!(handle.language().node_kind_count() > 0);
	}

	#[test]
	fn test_abi_version_in_supported_range() {
		let handle = verify_grammar_loads().unwrap();
		assert!(handle.abi_version() >= MIN_COMPATIBLE_LANGUAGE_VERSION);
		assert!(handle.abi_version() <= LANGUAGE_VERSION);
	}

	#[test]
	fn test_null_language_reports_load_failure() {
		let err = load_language(&NullProvider).unwrap_err();
		assert!(matches!(err, GrammarError::Absent { .. }));
		assert_eq!(err.to_string(), "Error loading SCSS grammar");
	}

	#[test]
	fn test_descriptor_errors_propagate() {
		let err = load_language(&FailingProvider).unwrap_err();
		assert!(matches!(err, GrammarError::MissingSymbol(sym) if sym == "tree_sitter_scss"));
	}

	#[test]
	fn test_repeated_loads_agree() {
		let first = verify_grammar_loads().unwrap();
		for _ in 0..8 {
			let next = verify_grammar_loads().unwrap();
			assert_eq!(next.abi_version(), first.abi_version());
			assert_eq!(next.language().node_kind_count(), first.language().node_kind_count());
		}
		for _ in 0..3 {
			assert_eq!(
				load_language(&NullProvider).unwrap_err().to_string(),
				"Error loading SCSS grammar"
			);
		}
	}

	#[test]
	fn test_handle_checks_statement_kinds() {
		let handle = verify_grammar_loads().unwrap();
		handle.check_node_kinds(SCSS_STATEMENT_KINDS).unwrap();

		let err = handle.check_node_kinds(&["use_statement", "no_such_node"]).unwrap_err();
		match err {
			GrammarError::MissingKinds { grammar, kinds } => {
				assert_eq!(grammar, "scss");
				assert_eq!(kinds, vec!["no_such_node".to_string()]);
			}
			other => panic!("unexpected error: {other}"),
		}
	}
}
