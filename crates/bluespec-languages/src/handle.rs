//! Loaded grammars, ready to hand to a parser.

use std::fmt;
use std::sync::Arc;

use libloading::Library;
use tree_sitter::{Language, LanguageError, Parser};

use crate::error::{GrammarLoadFailure, LoadFailureReason};
use crate::provider::GrammarDescriptor;

/// A loaded grammar.
///
/// Only [`LanguageHandle::from_descriptor`] creates one, and it refuses null
/// languages, so a handle always points at real parse tables.
#[derive(Clone)]
pub struct LanguageHandle {
    name: String,
    // Declared before `library` so the language is released while its
    // tables are still mapped.
    language: Language,
    library: Option<Arc<Library>>,
}

impl LanguageHandle {
    /// Call the descriptor's language function once and wrap the result.
    pub fn from_descriptor(
        name: &str,
        descriptor: GrammarDescriptor,
    ) -> Result<Self, GrammarLoadFailure> {
        // SAFETY: descriptors only hold tree-sitter language functions, which
        // take no arguments and return a pointer to static data.
        let raw = unsafe { (descriptor.entry)() };
        if raw.is_null() {
            return Err(GrammarLoadFailure::new(
                name,
                LoadFailureReason::NullDescriptor,
            ));
        }

        // SAFETY: checked non-null above; the pointer refers to the grammar's
        // TSLanguage, kept mapped by `descriptor.library` when it came from a
        // shared library.
        let language =
            unsafe { Language::from_raw(raw.cast::<tree_sitter::ffi::TSLanguage>()) };

        Ok(Self {
            name: name.to_string(),
            language,
            library: descriptor.library,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn language(&self) -> &Language {
        &self.language
    }

    /// Tree-sitter ABI version the grammar was generated for
    pub fn abi_version(&self) -> usize {
        self.language.abi_version()
    }

    pub fn is_abi_compatible(&self) -> bool {
        is_supported_abi(self.abi_version())
    }

    pub fn node_kind_count(&self) -> usize {
        self.language.node_kind_count()
    }

    /// Whether the grammar defines a named node kind (a rule, not a keyword).
    pub fn has_node_kind(&self, kind: &str) -> bool {
        self.language.id_for_node_kind(kind, true) != 0
    }

    /// Whether the grammar has an anonymous token with this text, e.g. a keyword.
    pub fn has_token(&self, text: &str) -> bool {
        self.language.id_for_node_kind(text, false) != 0
    }

    /// Whether the handle keeps a shared library mapped
    pub fn is_dynamically_loaded(&self) -> bool {
        self.library.is_some()
    }

    /// Create a parser set up for this grammar.
    pub fn new_parser(&self) -> Result<Parser, LanguageError> {
        let mut parser = Parser::new();
        parser.set_language(&self.language)?;
        Ok(parser)
    }
}

/// Whether the linked tree-sitter runtime can use grammars generated for `version`.
pub fn is_supported_abi(version: usize) -> bool {
    (tree_sitter::MIN_COMPATIBLE_LANGUAGE_VERSION..=tree_sitter::LANGUAGE_VERSION)
        .contains(&version)
}

impl fmt::Debug for LanguageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LanguageHandle")
            .field("name", &self.name)
            .field("abi_version", &self.abi_version())
            .field("node_kind_count", &self.node_kind_count())
            .field("dynamically_loaded", &self.is_dynamically_loaded())
            .finish()
    }
}
