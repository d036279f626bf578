// Shared helpers for integration tests

#![allow(dead_code)]

pub mod tracing;

use bluespec_grammar::{
    GrammarDescriptor, GrammarLoadFailure, GrammarProvider, LanguageFn, StaticGrammar,
};

/// Provider whose language function returns null, standing in for a broken build
pub struct NullGrammar {
    pub name: &'static str,
}

unsafe extern "C" fn null_language() -> *const () {
    std::ptr::null()
}

impl GrammarProvider for NullGrammar {
    fn name(&self) -> &str {
        self.name
    }

    fn descriptor(&self) -> Result<GrammarDescriptor, GrammarLoadFailure> {
        // SAFETY: `null_language` has the language function signature
        Ok(GrammarDescriptor::new(unsafe {
            LanguageFn::from_raw(null_language)
        }))
    }
}

/// A real compiled grammar, linked statically
pub fn rust_grammar() -> StaticGrammar {
    StaticGrammar::new("rust", tree_sitter_rust::LANGUAGE)
}
