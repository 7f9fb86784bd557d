use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use yaml_key_audit::output::OutputFormat;

#[derive(Parser)]
#[command(
    name = "yaml-key-audit",
    version,
    about = "Structural checks for YAML files"
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(long, short, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Audit a YAML file or a directory of YAML files
    Audit {
        /// Path to a file or directory
        path: PathBuf,

        /// Output format
        #[arg(long, short, default_value = "pretty", value_enum)]
        format: OutputFormat,

        /// Write output to file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,

        /// Custom config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List the check templates and their parameters
    ListRules,

    /// Show full explanation for a check template
    Explain {
        /// Check name (e.g., "required-key")
        check: String,
    },
}
