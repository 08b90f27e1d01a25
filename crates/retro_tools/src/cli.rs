//! CLI interface for the `retro` tool

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "retro")]
#[command(about = "Run backtracking parses over JSON grammars and print their traces")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse a token sequence and print the configuration trace
    Parse {
        /// JSON grammar file
        #[arg(short, long)]
        grammar: PathBuf,

        /// Source file, split into tokens by the standard tokenizer
        #[arg(short, long, conflicts_with = "tokens", required_unless_present = "tokens")]
        input: Option<PathBuf>,

        /// Whitespace-separated tokens, e.g. "a a b"
        #[arg(short, long)]
        tokens: Option<String>,

        /// Non-terminal to start from (default: the grammar's entry point)
        #[arg(short, long)]
        start: Option<String>,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,

        /// Step budget; 0 disables the limit
        #[arg(long, default_value_t = 1_000_000)]
        max_steps: usize,

        /// Print run metrics to stderr
        #[arg(long)]
        stats: bool,
    },

    /// Build a grammar and report its warnings
    Check {
        /// JSON grammar file
        #[arg(short, long)]
        grammar: PathBuf,
    },

    /// Split a source file into tokens, one line of tokens per source line
    Tokenize {
        /// Source file
        #[arg(short, long)]
        input: PathBuf,

        /// Token pattern, tried in order (default: the standard patterns)
        #[arg(short, long = "pattern")]
        patterns: Vec<String>,
    },

    /// Parse the bundled demo program with the demo grammar
    Demo {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,

        /// Print run metrics to stderr
        #[arg(long)]
        stats: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Summary,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" | "text" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "summary" => Ok(OutputFormat::Summary),
            _ => Err(format!(
                "Unknown format: {}. Supported: table, json, summary",
                s
            )),
        }
    }
}
