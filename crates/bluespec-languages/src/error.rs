//! The single failure kind for grammar loading.

use std::path::PathBuf;

use thiserror::Error;

/// A compiled grammar could not be turned into a usable language handle.
///
/// There is exactly one failure kind; `reason` records which step of the
/// load gave up. Nothing retries or falls back to another grammar.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Error loading {grammar} grammar: {reason}")]
pub struct GrammarLoadFailure {
    /// Name of the grammar that failed to load
    pub grammar: String,
    /// The step that failed
    pub reason: LoadFailureReason,
}

impl GrammarLoadFailure {
    pub fn new(grammar: impl Into<String>, reason: LoadFailureReason) -> Self {
        Self {
            grammar: grammar.into(),
            reason,
        }
    }
}

/// Which step of loading a grammar failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadFailureReason {
    #[error("no grammar named `{0}` is known")]
    UnknownGrammar(String),

    #[error("no compiled grammar library found in {} search directories", .searched.len())]
    NotFound { searched: Vec<PathBuf> },

    #[error("failed to load grammar library {}: {message}", .path.display())]
    Library { path: PathBuf, message: String },

    #[error("grammar library is missing the `{symbol}` language function")]
    MissingSymbol { symbol: String },

    #[error("grammar provider returned a null language")]
    NullDescriptor,

    #[error("grammar ABI version {version} is outside the supported range {min}..={max}")]
    IncompatibleAbi {
        version: usize,
        min: usize,
        max: usize,
    },

    #[error("parser rejected the language: {0}")]
    ParserRejected(String),

    #[error("grammar has no `{0}` node kind")]
    MissingNodeKind(String),

    #[error("smoke parse failed: {0}")]
    SmokeParse(String),
}
