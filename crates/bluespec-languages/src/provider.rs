//! The seam between compiled grammars and whoever loads them.
//!
//! A [`GrammarProvider`] hands out a [`GrammarDescriptor`]: the grammar's
//! exported language function plus whatever must stay alive for the tables it
//! returns to remain valid. Implementations:
//! - [`StaticGrammar`]: a grammar linked into the binary (`LANGUAGE` constants)
//! - [`SharedLibraryGrammar`](crate::SharedLibraryGrammar): a grammar built as a shared library
//!
//! Tests substitute their own providers to exercise failure paths.

use std::fmt;
use std::sync::Arc;

use libloading::Library;
use tree_sitter_language::LanguageFn;

use crate::error::GrammarLoadFailure;

/// Signature of the function every compiled tree-sitter grammar exports.
pub type RawLanguageFn = unsafe extern "C" fn() -> *const ();

/// Trait for obtaining a compiled grammar from some source.
pub trait GrammarProvider {
    /// Name of the grammar this provider yields
    fn name(&self) -> &str;

    /// Produce the grammar's language function.
    ///
    /// Must not invoke the language function itself.
    fn descriptor(&self) -> Result<GrammarDescriptor, GrammarLoadFailure>;
}

/// Opaque entry point into a compiled grammar.
pub struct GrammarDescriptor {
    pub(crate) entry: RawLanguageFn,
    pub(crate) library: Option<Arc<Library>>,
}

impl GrammarDescriptor {
    pub fn new(language_fn: LanguageFn) -> Self {
        Self {
            entry: language_fn.into_raw(),
            library: None,
        }
    }

    /// Entry point resolved from a shared library, which must outlive every
    /// language built from it.
    pub(crate) fn from_library(entry: RawLanguageFn, library: Arc<Library>) -> Self {
        Self {
            entry,
            library: Some(library),
        }
    }
}

impl fmt::Debug for GrammarDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GrammarDescriptor")
            .field("entry", &(self.entry as *const ()))
            .field("from_library", &self.library.is_some())
            .finish()
    }
}

/// A grammar compiled into the binary.
pub struct StaticGrammar {
    name: String,
    language_fn: LanguageFn,
}

impl StaticGrammar {
    pub fn new(name: impl Into<String>, language_fn: LanguageFn) -> Self {
        Self {
            name: name.into(),
            language_fn,
        }
    }
}

impl GrammarProvider for StaticGrammar {
    fn name(&self) -> &str {
        &self.name
    }

    fn descriptor(&self) -> Result<GrammarDescriptor, GrammarLoadFailure> {
        Ok(GrammarDescriptor::new(self.language_fn))
    }
}

impl fmt::Debug for StaticGrammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticGrammar")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
