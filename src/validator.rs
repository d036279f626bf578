//! Grammar load validation.
//!
//! A [`GrammarValidator`] takes a grammar from a provider and decides, once,
//! whether it is usable. The checks run in order and stop at the first
//! failure:
//!
//! 1. the provider yields a descriptor
//! 2. the language function returns a non-null language
//! 3. the ABI version is one the linked tree-sitter runtime accepts
//! 4. a parser accepts the language
//! 5. every required node kind exists
//! 6. the smoke source (if any) parses without errors to the expected root kind

use bluespec_languages::{
    GrammarInfo, GrammarLoadFailure, GrammarProvider, LanguageHandle, LoadFailureReason,
};

/// Where a validator is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationState {
    Unverified,
    Verified,
    Failed,
}

/// What a grammar must satisfy beyond loading.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationOptions {
    /// Node kinds the grammar must define
    pub required_node_kinds: Vec<String>,
    /// Source text that must parse without errors
    pub smoke_source: Option<String>,
    /// Kind the smoke parse must be rooted at
    pub root_kind: Option<String>,
}

impl ValidationOptions {
    /// Options matching a known grammar's metadata: its core node kinds and root kind.
    pub fn for_grammar(info: &GrammarInfo) -> Self {
        Self {
            required_node_kinds: info
                .core_node_kinds
                .iter()
                .map(|kind| kind.to_string())
                .collect(),
            smoke_source: None,
            root_kind: Some(info.root_kind.to_string()),
        }
    }

    pub fn with_smoke_source(mut self, source: impl Into<String>) -> Self {
        self.smoke_source = Some(source.into());
        self
    }
}

/// Single-use check that a grammar loads.
#[derive(Debug)]
pub struct GrammarValidator {
    options: ValidationOptions,
    outcome: Option<Result<LanguageHandle, GrammarLoadFailure>>,
}

impl GrammarValidator {
    pub fn new(options: ValidationOptions) -> Self {
        Self {
            options,
            outcome: None,
        }
    }

    pub fn options(&self) -> &ValidationOptions {
        &self.options
    }

    pub fn state(&self) -> ValidationState {
        match &self.outcome {
            None => ValidationState::Unverified,
            Some(Ok(_)) => ValidationState::Verified,
            Some(Err(_)) => ValidationState::Failed,
        }
    }

    /// Validate the grammar from `provider`.
    ///
    /// Both verified and failed are terminal: once an outcome is recorded it is
    /// returned again without consulting any provider.
    pub fn validate(
        &mut self,
        provider: &dyn GrammarProvider,
    ) -> Result<LanguageHandle, GrammarLoadFailure> {
        if let Some(outcome) = &self.outcome {
            tracing::debug!(
                "Grammar {} already validated ({:?})",
                provider.name(),
                self.state()
            );
            return outcome.clone();
        }

        let outcome = run_checks(provider, &self.options);
        match &outcome {
            Ok(handle) => tracing::info!(
                "Loaded {} grammar (ABI {}, {} node kinds)",
                handle.name(),
                handle.abi_version(),
                handle.node_kind_count()
            ),
            Err(e) => tracing::warn!("{}", e),
        }

        self.outcome = Some(outcome.clone());
        outcome
    }
}

/// Validate `provider` with a fresh validator.
pub fn validate_with(
    provider: &dyn GrammarProvider,
    options: &ValidationOptions,
) -> Result<LanguageHandle, GrammarLoadFailure> {
    GrammarValidator::new(options.clone()).validate(provider)
}

fn run_checks(
    provider: &dyn GrammarProvider,
    options: &ValidationOptions,
) -> Result<LanguageHandle, GrammarLoadFailure> {
    let name = provider.name();
    let fail = |reason: LoadFailureReason| GrammarLoadFailure::new(name, reason);

    tracing::debug!("Requesting {} grammar from provider", name);
    let descriptor = provider.descriptor()?;
    let handle = LanguageHandle::from_descriptor(name, descriptor)?;

    if !handle.is_abi_compatible() {
        return Err(fail(LoadFailureReason::IncompatibleAbi {
            version: handle.abi_version(),
            min: tree_sitter::MIN_COMPATIBLE_LANGUAGE_VERSION,
            max: tree_sitter::LANGUAGE_VERSION,
        }));
    }

    let mut parser = handle
        .new_parser()
        .map_err(|e| fail(LoadFailureReason::ParserRejected(e.to_string())))?;

    if let Some(missing) = options
        .required_node_kinds
        .iter()
        .find(|kind| !handle.has_node_kind(kind))
    {
        return Err(fail(LoadFailureReason::MissingNodeKind(missing.clone())));
    }

    if let Some(source) = &options.smoke_source {
        tracing::debug!("Smoke parsing {} bytes with {} grammar", source.len(), name);
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| fail(LoadFailureReason::SmokeParse("parser produced no tree".into())))?;
        let root = tree.root_node();

        if root.has_error() {
            let at = root.start_position();
            return Err(fail(LoadFailureReason::SmokeParse(format!(
                "syntax error in smoke source ({}:{}..)",
                at.row + 1,
                at.column + 1
            ))));
        }

        if let Some(expected) = &options.root_kind {
            if root.kind() != expected.as_str() {
                return Err(fail(LoadFailureReason::SmokeParse(format!(
                    "root node is `{}`, expected `{}`",
                    root.kind(),
                    expected
                ))));
            }
        }
    }

    Ok(handle)
}
