use anyhow::{Context, Result as AnyhowResult};
use bluespec_grammar::config::CheckConfig;
use bluespec_grammar::tracing_setup;
use bluespec_grammar::validator::validate_with;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

/// Check that a compiled tree-sitter Bluespec grammar can be loaded
#[derive(Parser, Debug)]
#[command(name = "bluespec-grammar-check")]
#[command(about = "Load a compiled tree-sitter grammar and check that it is usable", long_about = None)]
#[command(version)]
struct Args {
    /// Compiled grammar library (overrides config and BLUESPEC_GRAMMAR_LIB)
    #[arg(long, value_name = "PATH")]
    library: Option<PathBuf>,

    /// Extra directory to search for the grammar library (repeatable)
    #[arg(long = "grammar-dir", value_name = "DIR")]
    grammar_dirs: Vec<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Source file that must parse without errors
    #[arg(long, value_name = "FILE")]
    smoke_file: Option<PathBuf>,

    /// Write diagnostics to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn main() -> AnyhowResult<ExitCode> {
    let args = Args::parse();

    tracing_setup::init_global(args.log_file.as_deref())
        .context("Failed to initialize logging")?;

    let mut config = CheckConfig::load_or_default(args.config.as_deref())?;
    if let Some(library) = args.library {
        config.grammar.library = Some(library);
    }
    if !args.grammar_dirs.is_empty() {
        let mut search_dirs = args.grammar_dirs;
        search_dirs.append(&mut config.grammar.search_dirs);
        config.grammar.search_dirs = search_dirs;
    }
    if let Some(smoke_file) = args.smoke_file {
        config.validation.smoke_file = Some(smoke_file);
    }
    tracing::debug!("Effective configuration: {:?}", config);

    let result = match config.grammar.provider() {
        Ok(provider) => {
            let options = config.validation.options(provider.info())?;
            validate_with(&provider, &options)
        }
        Err(e) => Err(e),
    };

    match result {
        Ok(handle) => {
            println!(
                "{} grammar loaded (ABI {}, {} node kinds)",
                handle.name(),
                handle.abi_version(),
                handle.node_kind_count()
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("{e}");
            Ok(ExitCode::FAILURE)
        }
    }
}
