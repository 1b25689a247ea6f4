//! Command-line argument parsing.

use clap::Parser;
use std::path::PathBuf;

/// React to Angular component converter
#[derive(Parser, Debug, Clone)]
#[command(name = "react2ng")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Component files or directories to convert
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Directory the generated files are written to [default: output]
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,

    /// Path to react2ng.json
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Prefix of generated component selectors [default: app]
    #[arg(long)]
    pub selector_prefix: Option<String>,

    /// Do not write the empty .component.css placeholder
    #[arg(long)]
    pub skip_stylesheet: bool,

    /// Fail when an input binding calls a setter with no useState declaration
    #[arg(long)]
    pub strict_state_mapping: bool,

    /// Print the generated files instead of writing them
    #[arg(long)]
    pub dry_run: bool,

    /// Output format
    #[arg(long, default_value = "human")]
    pub output: OutputFormat,

    /// Re-run when an input changes
    #[arg(short, long)]
    pub watch: bool,

    /// Ignore patterns (glob)
    #[arg(long)]
    pub ignore: Vec<String>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    #[default]
    Human,
    /// JSON lines
    Json,
}
