// Library code reports through tracing, never stderr.
#![deny(clippy::print_stderr)]

//! SCSS tree-sitter grammar loading
//!
//! This crate turns a compiled SCSS grammar into a usable
//! [`tree_sitter::Language`] and verifies it along the way.
//!
//! # Architecture
//!
//! * [`grammar`]: Grammar sources, search paths and errors
//! * [`provider`]: Where grammar descriptors come from (builtin or shared library)
//! * [`loader`]: Load verification producing a [`LanguageHandle`]
//! * [`kinds`]: SCSS node kinds a grammar must declare
//! * [`sample`]: Parse smoke check
//! * [`config`]: `grammars.toml` loading and configured checks

pub mod config;
pub mod grammar;
pub mod kinds;
pub mod loader;
pub mod provider;
pub mod sample;

pub use config::{ConfigError, GrammarConfig, GrammarReport, default_grammar_configs, load_grammar_configs};
pub use grammar::{GrammarError, GrammarSource, find_grammar_library, grammar_search_paths, runtime_dir};
pub use loader::{LanguageHandle, load_language, verify_grammar_loads};
pub use provider::{BuiltinScss, GrammarDescriptor, GrammarProvider, SharedLibrary};
pub use sample::{ParseSummary, SAMPLE_SCSS, parse_sample};
