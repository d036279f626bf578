//! Grammars compiled to shared libraries, loaded with dlopen.
//!
//! `tree-sitter build` turns a grammar into a shared library exporting a single
//! `tree_sitter_<name>` function. This module finds such a library on disk and
//! resolves that function at runtime, so the checker works without the grammar
//! being compiled into it.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use libloading::{Library, Symbol};

use crate::error::{GrammarLoadFailure, LoadFailureReason};
use crate::grammar::GrammarInfo;
use crate::provider::{GrammarDescriptor, GrammarProvider, RawLanguageFn};

/// Environment variable naming the compiled grammar library directly
pub const GRAMMAR_LIB_ENV: &str = "BLUESPEC_GRAMMAR_LIB";

/// Environment variable naming an extra directory to search for grammars
pub const GRAMMAR_DIR_ENV: &str = "BLUESPEC_GRAMMAR_DIR";

/// Ordered list of directories searched for compiled grammars.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrammarSearch {
    dirs: Vec<PathBuf>,
}

impl GrammarSearch {
    /// Search exactly these directories, in order.
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    /// The standard search path.
    ///
    /// Order: `BLUESPEC_GRAMMAR_DIR`, user config dir, user data dir, next to
    /// the executable, then `../share/bluespec/grammars` for installed packages.
    pub fn standard() -> Self {
        let mut dirs = Vec::new();

        if let Some(dir) = std::env::var_os(GRAMMAR_DIR_ENV) {
            dirs.push(PathBuf::from(dir));
        }

        // ~/.config/bluespec/grammars
        if let Some(config_dir) = dirs::config_dir() {
            dirs.push(config_dir.join("bluespec").join("grammars"));
        }

        if let Some(data_dir) = dirs::data_local_dir() {
            dirs.push(data_dir.join("bluespec").join("grammars"));
        }

        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                dirs.push(exe_dir.join("grammars"));
                dirs.push(
                    exe_dir
                        .join("..")
                        .join("share")
                        .join("bluespec")
                        .join("grammars"),
                );
            }
        }

        Self { dirs }
    }

    /// The standard search path with `extra` searched first.
    pub fn standard_with(extra: &[PathBuf]) -> Self {
        let mut search = Self::new(extra.to_vec());
        search.dirs.extend(Self::standard().dirs);
        search
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// First existing library file for `info`, trying each directory in order.
    pub fn find(&self, info: &GrammarInfo) -> Option<PathBuf> {
        let names = info.library_file_names();
        for dir in &self.dirs {
            for name in &names {
                let candidate = dir.join(name);
                tracing::trace!("Grammar search: trying {:?}", candidate);
                if candidate.is_file() {
                    return Some(candidate);
                }
            }
        }
        None
    }
}

/// A grammar loaded from a shared library on disk.
pub struct SharedLibraryGrammar {
    info: GrammarInfo,
    path: PathBuf,
    library: OnceLock<Arc<Library>>,
}

impl SharedLibraryGrammar {
    /// Use the library at `path`. Nothing is loaded until a descriptor is requested.
    pub fn from_path(info: GrammarInfo, path: impl Into<PathBuf>) -> Self {
        Self {
            info,
            path: path.into(),
            library: OnceLock::new(),
        }
    }

    /// Locate the grammar's library on the search path.
    pub fn discover(info: GrammarInfo, search: &GrammarSearch) -> Result<Self, GrammarLoadFailure> {
        match search.find(&info) {
            Some(path) => {
                tracing::debug!("Found {} grammar library at {:?}", info.name, path);
                Ok(Self::from_path(info, path))
            }
            None => {
                tracing::debug!(
                    "No {} grammar library in {} directories",
                    info.name,
                    search.dirs().len()
                );
                Err(GrammarLoadFailure::new(
                    info.name,
                    LoadFailureReason::NotFound {
                        searched: search.dirs().to_vec(),
                    },
                ))
            }
        }
    }

    pub fn info(&self) -> &GrammarInfo {
        &self.info
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_library(&self) -> Result<Arc<Library>, GrammarLoadFailure> {
        if let Some(library) = self.library.get() {
            return Ok(Arc::clone(library));
        }

        tracing::debug!("Loading {} grammar from {:?}", self.info.name, self.path);
        // SAFETY: tree-sitter grammar libraries have no initialisers with side
        // effects; loading one only maps the parse tables and scanner code.
        let library = unsafe { Library::new(&self.path) }.map_err(|e| {
            GrammarLoadFailure::new(
                self.info.name,
                LoadFailureReason::Library {
                    path: self.path.clone(),
                    message: e.to_string(),
                },
            )
        })?;

        Ok(Arc::clone(self.library.get_or_init(|| Arc::new(library))))
    }
}

impl GrammarProvider for SharedLibraryGrammar {
    fn name(&self) -> &str {
        self.info.name
    }

    fn descriptor(&self) -> Result<GrammarDescriptor, GrammarLoadFailure> {
        let library = self.load_library()?;

        // SAFETY: the symbol is declared in the grammar's C header as
        // `const TSLanguage *tree_sitter_<name>(void)`.
        let entry: RawLanguageFn = unsafe {
            let symbol: Symbol<RawLanguageFn> =
                library.get(self.info.symbol.as_bytes()).map_err(|e| {
                    tracing::debug!("Symbol lookup for {} failed: {}", self.info.symbol, e);
                    GrammarLoadFailure::new(
                        self.info.name,
                        LoadFailureReason::MissingSymbol {
                            symbol: self.info.symbol.to_string(),
                        },
                    )
                })?;
            *symbol
        };

        Ok(GrammarDescriptor::from_library(entry, library))
    }
}

impl fmt::Debug for SharedLibraryGrammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedLibraryGrammar")
            .field("grammar", &self.info.name)
            .field("path", &self.path)
            .field("loaded", &self.library.get().is_some())
            .finish()
    }
}
