use anyhow::Context;
use bluespec_languages::{
    GrammarInfo, GrammarLoadFailure, GrammarSearch, LoadFailureReason, SharedLibraryGrammar,
    BLUESPEC, GRAMMAR_LIB_ENV,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::validator::ValidationOptions;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckConfig {
    #[serde(default)]
    pub grammar: GrammarSourceConfig,

    #[serde(default)]
    pub validation: ValidationConfig,
}

/// Where the compiled grammar comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrammarSourceConfig {
    /// Grammar name (must be a known grammar)
    #[serde(default = "default_grammar_name")]
    pub name: String,

    /// Explicit path to the compiled grammar library.
    /// Takes priority over `BLUESPEC_GRAMMAR_LIB` and the search path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub library: Option<PathBuf>,

    /// Extra directories searched before the standard ones
    #[serde(default)]
    pub search_dirs: Vec<PathBuf>,
}

fn default_grammar_name() -> String {
    BLUESPEC.name.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for GrammarSourceConfig {
    fn default() -> Self {
        Self {
            name: default_grammar_name(),
            library: None,
            search_dirs: Vec::new(),
        }
    }
}

/// What the loaded grammar is checked against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Node kinds the grammar must define.
    /// When unset, the grammar's core node kinds are required.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_node_kinds: Option<Vec<String>>,

    /// Inline source to smoke-parse
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smoke_source: Option<String>,

    /// File to smoke-parse (read when validation starts, wins over `smoke_source`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smoke_file: Option<PathBuf>,

    /// Whether the smoke parse must be rooted at the grammar's root node kind
    #[serde(default = "default_true")]
    pub check_root_kind: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            required_node_kinds: None,
            smoke_source: None,
            smoke_file: None,
            check_root_kind: true,
        }
    }
}

impl CheckConfig {
    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Load from `path` if given, otherwise use defaults
    pub fn load_or_default(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let contents =
            serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path.as_ref(), contents)
            .with_context(|| format!("Failed to write config file {}", path.as_ref().display()))
    }
}

impl GrammarSourceConfig {
    pub fn info(&self) -> Result<GrammarInfo, GrammarLoadFailure> {
        GrammarInfo::by_name(&self.name).ok_or_else(|| {
            GrammarLoadFailure::new(
                self.name.clone(),
                LoadFailureReason::UnknownGrammar(self.name.clone()),
            )
        })
    }

    /// Build the provider for the configured grammar.
    ///
    /// Order: configured `library`, then `BLUESPEC_GRAMMAR_LIB`, then the search path.
    pub fn provider(&self) -> Result<SharedLibraryGrammar, GrammarLoadFailure> {
        let info = self.info()?;
        let env_library = std::env::var_os(GRAMMAR_LIB_ENV).map(PathBuf::from);

        match resolve_library(self.library.as_deref(), env_library) {
            Some(path) => Ok(SharedLibraryGrammar::from_path(info, path)),
            None => SharedLibraryGrammar::discover(info, &self.search()),
        }
    }

    pub fn search(&self) -> GrammarSearch {
        GrammarSearch::standard_with(&self.search_dirs)
    }
}

/// Pick the library path: explicit configuration wins over the environment.
pub fn resolve_library(configured: Option<&Path>, env: Option<PathBuf>) -> Option<PathBuf> {
    configured
        .map(Path::to_path_buf)
        .or_else(|| env.filter(|path| !path.as_os_str().is_empty()))
}

impl ValidationConfig {
    /// Turn this configuration into validator options for `info`.
    pub fn options(&self, info: &GrammarInfo) -> anyhow::Result<ValidationOptions> {
        let mut options = ValidationOptions::for_grammar(info);

        if let Some(kinds) = &self.required_node_kinds {
            options.required_node_kinds = kinds.clone();
        }

        options.smoke_source = match &self.smoke_file {
            Some(path) => Some(
                std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read smoke file {}", path.display()))?,
            ),
            None => self.smoke_source.clone(),
        };

        if !self.check_root_kind {
            options.root_kind = None;
        }

        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = CheckConfig::default();
        assert_eq!(config.grammar.name, "bluespec");
        assert!(config.grammar.library.is_none());
        assert!(config.grammar.search_dirs.is_empty());
        assert!(config.validation.check_root_kind);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: CheckConfig =
            serde_json::from_str(r#"{ "grammar": { "search_dirs": ["/opt/grammars"] } }"#)
                .unwrap();
        assert_eq!(config.grammar.name, "bluespec");
        assert_eq!(config.grammar.search_dirs, vec![PathBuf::from("/opt/grammars")]);
        assert_eq!(config.validation, ValidationConfig::default());
    }

    #[test]
    fn test_load_and_save_roundtrip() {
        let mut config = CheckConfig::default();
        config.grammar.library = Some(PathBuf::from("/tmp/libtree-sitter-bluespec.so"));
        config.validation.smoke_source = Some("package Top; endpackage".to_string());

        let file = NamedTempFile::new().unwrap();
        config.save_to_file(file.path()).unwrap();
        let loaded = CheckConfig::load_from_file(file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let err = CheckConfig::load_from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_load_or_default_without_path() {
        assert_eq!(CheckConfig::load_or_default(None).unwrap(), CheckConfig::default());
    }

    #[test]
    fn test_unknown_grammar() {
        let source = GrammarSourceConfig {
            name: "verilog".to_string(),
            ..Default::default()
        };
        let err = source.provider().unwrap_err();
        assert_eq!(
            err.reason,
            LoadFailureReason::UnknownGrammar("verilog".to_string())
        );
    }

    #[test]
    fn test_configured_library_is_used_verbatim() {
        let source = GrammarSourceConfig {
            library: Some(PathBuf::from("/nonexistent/bluespec.so")),
            ..Default::default()
        };
        let provider = source.provider().unwrap();
        assert_eq!(provider.path(), Path::new("/nonexistent/bluespec.so"));
    }

    #[test]
    fn test_resolve_library_precedence() {
        let configured = PathBuf::from("/from/config.so");
        let env = PathBuf::from("/from/env.so");

        assert_eq!(
            resolve_library(Some(configured.as_path()), Some(env.clone())),
            Some(configured.clone())
        );
        assert_eq!(resolve_library(None, Some(env.clone())), Some(env));
        assert_eq!(resolve_library(None, Some(PathBuf::new())), None);
        assert_eq!(resolve_library(None, None), None);
    }

    #[test]
    fn test_search_puts_configured_dirs_first() {
        let source = GrammarSourceConfig {
            search_dirs: vec![PathBuf::from("/first")],
            ..Default::default()
        };
        assert_eq!(source.search().dirs()[0], PathBuf::from("/first"));
    }

    #[test]
    fn test_validation_options_defaults_to_core_kinds() {
        let options = ValidationConfig::default().options(&BLUESPEC).unwrap();
        assert_eq!(options, ValidationOptions::for_grammar(&BLUESPEC));
    }

    #[test]
    fn test_validation_options_overrides() {
        let mut smoke = NamedTempFile::new().unwrap();
        write!(smoke, "package Top;\nendpackage\n").unwrap();

        let config = ValidationConfig {
            required_node_kinds: Some(vec!["source_file".to_string()]),
            smoke_source: Some("ignored".to_string()),
            smoke_file: Some(smoke.path().to_path_buf()),
            check_root_kind: false,
        };
        let options = config.options(&BLUESPEC).unwrap();
        assert_eq!(options.required_node_kinds, vec!["source_file".to_string()]);
        assert_eq!(
            options.smoke_source.as_deref(),
            Some("package Top;\nendpackage\n")
        );
        assert!(options.root_kind.is_none());
    }

    #[test]
    fn test_missing_smoke_file() {
        let config = ValidationConfig {
            smoke_file: Some(PathBuf::from("/nonexistent/Top.bsv")),
            ..Default::default()
        };
        let err = config.options(&BLUESPEC).unwrap_err();
        assert!(err.to_string().contains("Failed to read smoke file"));
    }
}
