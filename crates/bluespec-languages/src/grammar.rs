//! Static metadata describing compiled grammars.

use std::fmt;
use std::path::Path;

/// What we know about a compiled grammar before loading it.
///
/// The parse tables themselves live behind the grammar's exported language
/// function; this only names things.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrammarInfo {
    /// Grammar name as declared in `grammar.js`
    pub name: &'static str,
    /// C symbol exported by the compiled grammar, returning `const TSLanguage *`
    pub symbol: &'static str,
    /// File stem of the shared library built from the grammar
    pub library_stem: &'static str,
    /// Kind of the node every successful parse is rooted at
    pub root_kind: &'static str,
    /// Node kinds every build of the grammar is expected to define
    pub core_node_kinds: &'static [&'static str],
    /// Source file extensions handled by the grammar
    pub extensions: &'static [&'static str],
}

/// The tree-sitter Bluespec SystemVerilog grammar.
pub const BLUESPEC: GrammarInfo = GrammarInfo {
    name: "bluespec",
    symbol: "tree_sitter_bluespec",
    library_stem: "tree-sitter-bluespec",
    root_kind: "source_file",
    core_node_kinds: &["source_file", "package", "comment", "identifier"],
    extensions: &["bsv"],
};

/// Every grammar this crate knows how to locate.
pub const KNOWN_GRAMMARS: &[GrammarInfo] = &[BLUESPEC];

impl GrammarInfo {
    /// Look up a known grammar by name (case-insensitive)
    pub fn by_name(name: &str) -> Option<Self> {
        KNOWN_GRAMMARS
            .iter()
            .find(|info| info.name.eq_ignore_ascii_case(name))
            .copied()
    }

    /// Detect the grammar for a source file from its extension
    pub fn from_path(path: &Path) -> Option<Self> {
        KNOWN_GRAMMARS
            .iter()
            .find(|info| info.matches_path(path))
            .copied()
    }

    pub fn matches_path(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.extensions
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(ext))
            })
    }

    /// File names a compiled build of this grammar may have on this platform.
    ///
    /// Covers `tree-sitter build` output (`bluespec.so`) as well as the
    /// library names produced by the C bindings' Makefile.
    pub fn library_file_names(&self) -> Vec<String> {
        let prefix = std::env::consts::DLL_PREFIX;
        let ext = std::env::consts::DLL_EXTENSION;

        let mut names = vec![
            format!("{prefix}{}.{ext}", self.library_stem),
            format!("{}.{ext}", self.library_stem),
            format!("{}.{ext}", self.name),
        ];
        names.dedup();
        names
    }
}

impl fmt::Display for GrammarInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path() {
        assert_eq!(GrammarInfo::from_path(Path::new("Top.bsv")), Some(BLUESPEC));
        assert_eq!(GrammarInfo::from_path(Path::new("src/FIFO.BSV")), Some(BLUESPEC));
        assert_eq!(GrammarInfo::from_path(Path::new("main.rs")), None);
        assert_eq!(GrammarInfo::from_path(Path::new("Makefile")), None);
    }

    #[test]
    fn test_by_name() {
        assert_eq!(GrammarInfo::by_name("bluespec"), Some(BLUESPEC));
        assert_eq!(GrammarInfo::by_name("Bluespec"), Some(BLUESPEC));
        assert!(GrammarInfo::by_name("verilog").is_none());
    }

    #[test]
    fn test_library_file_names() {
        let names = BLUESPEC.library_file_names();
        let ext = std::env::consts::DLL_EXTENSION;

        assert!(names.contains(&format!("tree-sitter-bluespec.{ext}")));
        assert!(names.contains(&format!("bluespec.{ext}")));
        #[cfg(target_os = "linux")]
        assert_eq!(names[0], "libtree-sitter-bluespec.so");
    }

    #[test]
    fn test_root_kind_is_a_core_kind() {
        assert!(BLUESPEC.core_node_kinds.contains(&BLUESPEC.root_kind));
    }
}
