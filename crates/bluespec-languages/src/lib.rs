//! Grammar providers for the tree-sitter Bluespec grammar.
//!
//! * [`grammar`]: static metadata (names, symbols, file types)
//! * [`provider`]: the [`GrammarProvider`] seam and statically linked grammars
//! * [`library`]: grammars built as shared libraries, found on a search path
//! * [`handle`]: [`LanguageHandle`], a loaded grammar ready for a parser
//! * [`error`]: [`GrammarLoadFailure`]

pub mod error;
pub mod grammar;
pub mod handle;
pub mod library;
pub mod provider;

// Re-export tree-sitter for consumers of the handle
pub use tree_sitter;
pub use tree_sitter_language::LanguageFn;

pub use error::{GrammarLoadFailure, LoadFailureReason};
pub use grammar::{GrammarInfo, BLUESPEC, KNOWN_GRAMMARS};
pub use handle::{is_supported_abi, LanguageHandle};
pub use library::{GrammarSearch, SharedLibraryGrammar, GRAMMAR_DIR_ENV, GRAMMAR_LIB_ENV};
pub use provider::{GrammarDescriptor, GrammarProvider, RawLanguageFn, StaticGrammar};
