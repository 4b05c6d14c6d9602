//! Parse smoke check.

use std::collections::BTreeSet;

use tracing::debug;

use crate::grammar::GrammarError;
use crate::kinds::SCSS_ROOT_KIND;
use crate::loader::LanguageHandle;

/// A small document touching variables, mixins, nesting and control flow.
pub const SAMPLE_SCSS: &str = r#"@use "sass:math";

$primary: #336699;
$radius: 4px;

@mixin rounded($size: $radius) {
  border-radius: $size;
}

%message {
  padding: 8px;
}

.button {
  color: $primary;
  @include rounded(8px);

  &:hover {
    color: darken($primary, 10%);
  }
}

.notice {
  @extend .button;
}

@if $radius {
  .card {
    margin: 0;
  }
} @else {
  .card {
    margin: 4px;
  }
}
"#;

/// What a successful parse produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSummary {
	/// Kind of the root node.
	pub root_kind: &'static str,
	/// Number of named top-level children.
	pub named_children: usize,
	/// Distinct top-level statement kinds, sorted.
	pub statement_kinds: BTreeSet<&'static str>,
}

/// Parses `source` with `handle` and requires an error-free stylesheet.
pub fn parse_sample(handle: &LanguageHandle, source: &str) -> Result<ParseSummary, GrammarError> {
	let parse_error = |reason: String| GrammarError::Parse {
		grammar: handle.name().to_string(),
		reason,
	};

	let mut parser = handle.parser()?;
	let tree = parser
		.parse(source, None)
		.ok_or_else(|| parse_error("parser returned no tree".to_string()))?;
	let root = tree.root_node();

	if root.kind() != SCSS_ROOT_KIND {
		return Err(parse_error(format!(
			"root node is '{}', expected '{SCSS_ROOT_KIND}'",
			root.kind()
		)));
	}

	if root.has_error() {
		let at = first_error_position(root)
			.map(|p| format!(" at {}:{}", p.row + 1, p.column + 1))
			.unwrap_or_default();
		return Err(parse_error(format!("syntax error{at}")));
	}

	let mut cursor = root.walk();
	let statement_kinds = root
		.named_children(&mut cursor)
		.map(|child| child.kind())
		.filter(|kind| kind.ends_with("_statement"))
		.collect();

	let summary = ParseSummary {
		root_kind: root.kind(),
		named_children: root.named_child_count(),
		statement_kinds,
	};
	debug!(grammar = handle.name(), summary = ?summary, "Parsed sample");
	Ok(summary)
}

/// Depth-first search for the first error or missing node.
fn first_error_position(node: tree_sitter::Node<'_>) -> Option<tree_sitter::Point> {
	if node.is_error() || node.is_missing() {
		return Some(node.start_position());
	}
	let mut cursor = node.walk();
	node.children(&mut cursor)
		.filter(|child| child.has_error())
		.find_map(first_error_position)
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::loader::verify_grammar_loads;

	#[test]
	fn test_sample_parses_cleanly() {
		let handle = verify_grammar_loads().unwrap();
		let summary = parse_sample(&handle, SAMPLE_SCSS).unwrap();

		assert_eq!(summary.root_kind, "stylesheet");
		assert!(summary.named_children >= 8, "{summary:?}");
		for kind in ["use_statement", "mixin_statement", "if_statement"] {
			assert!(summary.statement_kinds.contains(kind), "missing {kind}: {summary:?}");
		}
	}

	#[test]
	fn test_empty_document() {
		let handle = verify_grammar_loads().unwrap();
		let summary = parse_sample(&handle, "").unwrap();
		assert_eq!(summary.root_kind, "stylesheet");
		assert_eq!(summary.named_children, 0);
		assert!(summary.statement_kinds.is_empty());
	}

	#[test]
	fn test_broken_document_is_rejected() {
		let handle = verify_grammar_loads().unwrap();
		let err = parse_sample(&handle, ".a { color: red; \n @mixin { }").unwrap_err();
		match err {
			GrammarError::Parse { grammar, reason } => {
				assert_eq!(grammar, "scss");
				assert!(reason.starts_with("syntax error"), "{reason}");
			}
			other => panic!("unexpected error: {other}"),
		}
	}
}
