// Grammar loading checks for the tree-sitter Bluespec grammar

pub mod config;
#[cfg(feature = "runtime")]
pub mod tracing_setup;
pub mod validator;

pub use bluespec_languages::{
    GrammarDescriptor, GrammarInfo, GrammarLoadFailure, GrammarProvider, GrammarSearch, LanguageFn,
    LanguageHandle, LoadFailureReason, SharedLibraryGrammar, StaticGrammar, BLUESPEC,
};
pub use config::CheckConfig;
pub use validator::{validate_with, GrammarValidator, ValidationOptions, ValidationState};

/// Check that the compiled Bluespec grammar loads.
///
/// The library comes from `BLUESPEC_GRAMMAR_LIB` if set, otherwise from the
/// standard grammar search path. The grammar must also define its core node
/// kinds.
pub fn validate_grammar_loads() -> Result<LanguageHandle, GrammarLoadFailure> {
    let provider = config::GrammarSourceConfig::default().provider()?;
    validate_with(&provider, &ValidationOptions::for_grammar(provider.info()))
}
