//! SCSS node kinds.
//!
//! Named nodes the SCSS grammar adds on top of the CSS grammar it extends.
//! A grammar build that lacks any of them was generated from the wrong
//! sources or an incompatible grammar revision.

use tree_sitter::Language;

/// Root node of every SCSS document.
pub const SCSS_ROOT_KIND: &str = "stylesheet";

/// At-rule statements.
pub const SCSS_STATEMENT_KINDS: &[&str] = &[
	"use_statement",
	"forward_statement",
	"mixin_statement",
	"include_statement",
	"function_statement",
	"return_statement",
	"extend_statement",
	"error_statement",
	"warn_statement",
	"debug_statement",
	"at_root_statement",
	"if_statement",
	"each_statement",
	"for_statement",
	"while_statement",
];

/// Values, expressions and clauses.
pub const SCSS_VALUE_KINDS: &[&str] = &[
	"variable",
	"interpolation",
	"placeholder",
	"list_value",
	"binary_expression",
	"call_expression",
	"parameters",
	"parameter",
	"else_clause",
	"else_if_clause",
];

/// All node kinds a loaded SCSS grammar must know.
pub fn scss_required_kinds() -> Vec<&'static str> {
	let mut kinds = Vec::with_capacity(SCSS_STATEMENT_KINDS.len() + SCSS_VALUE_KINDS.len() + 1);
	kinds.push(SCSS_ROOT_KIND);
	kinds.extend_from_slice(SCSS_STATEMENT_KINDS);
	kinds.extend_from_slice(SCSS_VALUE_KINDS);
	kinds
}

/// Returns the kinds `language` has no named node for, in input order.
pub fn missing_kinds<S: AsRef<str>>(language: &Language, kinds: &[S]) -> Vec<String> {
	kinds
		.iter()
		.map(AsRef::as_ref)
		.filter(|kind| language.id_for_node_kind(kind, true) == 0)
		.map(str::to_string)
		.collect()
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use rstest::rstest;

	use super::*;
	use crate::loader::verify_grammar_loads;

	#[test]
	fn test_scss_grammar_has_all_kinds() {
		let handle = verify_grammar_loads().unwrap();
		let missing = missing_kinds(handle.language(), scss_required_kinds().as_slice());
		assert_eq!(missing, Vec::<String>::new());
	}

	#[rstest]
	#[case::unknown(&["bogus_statement"], &["bogus_statement"])]
	#[case::mixed(&["mixin_statement", "bogus", "variable"], &["bogus"])]
	#[case::anonymous_only(&["@mixin"], &["@mixin"])]
	#[case::empty(&[], &[])]
	fn test_missing_kinds(#[case] kinds: &[&str], #[case] expected: &[&str]) {
		let handle = verify_grammar_loads().unwrap();
		assert_eq!(missing_kinds(handle.language(), kinds), expected);
	}

	#[test]
	fn test_required_kinds_are_unique() {
		let kinds = scss_required_kinds();
		let mut sorted = kinds.clone();
		sorted.sort_unstable();
		sorted.dedup();
		assert_eq!(sorted.len(), kinds.len());
	}
}
