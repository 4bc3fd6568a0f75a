//! Command line argument parsing for the lectio CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// Lectio - hybrid lexical search over religious text passages
#[derive(Parser, Debug, Clone)]
#[command(name = "lectio")]
#[command(about = "Hybrid lexical search over religious text passages")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct LectioArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl LectioArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1,
                n => n + 1,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Search a JSONL corpus
    Search(SearchArgs),

    /// Show how a query is normalized and expanded
    Expand(ExpandArgs),

    /// Show corpus statistics
    Stats(StatsArgs),
}

/// Arguments for searching
#[derive(Parser, Debug, Clone)]
pub struct SearchArgs {
    /// Path to the JSONL corpus file
    #[arg(value_name = "CORPUS")]
    pub corpus: PathBuf,

    /// Query string
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Confession filter (e.g. orthodox, sunni, shia)
    #[arg(short, long)]
    pub confession: Option<String>,

    /// Maximum number of results to return (default from configuration)
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Search configuration file (JSON)
    #[arg(long, value_name = "CONFIG_FILE", env = "LECTIO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Synonym and theme dictionary file (JSON)
    #[arg(short, long, value_name = "DICTIONARY_FILE", env = "LECTIO_DICTIONARY")]
    pub dictionary: Option<PathBuf>,

    /// Include per-stage diagnostics and score breakdowns
    #[arg(long)]
    pub explain: bool,
}

/// Arguments for query expansion
#[derive(Parser, Debug, Clone)]
pub struct ExpandArgs {
    /// Query string
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Synonym and theme dictionary file (JSON)
    #[arg(short, long, value_name = "DICTIONARY_FILE", env = "LECTIO_DICTIONARY")]
    pub dictionary: Option<PathBuf>,
}

/// Arguments for corpus statistics
#[derive(Parser, Debug, Clone)]
pub struct StatsArgs {
    /// Path to the JSONL corpus file
    #[arg(value_name = "CORPUS")]
    pub corpus: PathBuf,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_search_command() {
        let args = LectioArgs::try_parse_from([
            "lectio",
            "search",
            "/path/to/corpus.jsonl",
            "молитва",
            "--limit",
            "5",
            "--confession",
            "orthodox",
            "--explain",
        ])
        .unwrap();

        if let Command::Search(search_args) = args.command {
            assert_eq!(search_args.corpus, PathBuf::from("/path/to/corpus.jsonl"));
            assert_eq!(search_args.query, "молитва");
            assert_eq!(search_args.limit, Some(5));
            assert_eq!(search_args.confession.as_deref(), Some("orthodox"));
            assert!(search_args.explain);
        } else {
            panic!("Expected Search command");
        }
    }

    #[test]
    fn test_expand_command() {
        let args = LectioArgs::try_parse_from([
            "lectio",
            "expand",
            "храм",
            "--dictionary",
            "dict.json",
        ])
        .unwrap();

        if let Command::Expand(expand_args) = args.command {
            assert_eq!(expand_args.query, "храм");
            assert_eq!(expand_args.dictionary, Some(PathBuf::from("dict.json")));
        } else {
            panic!("Expected Expand command");
        }
    }

    #[test]
    fn test_global_flags() {
        let args = LectioArgs::try_parse_from([
            "lectio", "-vv", "--format", "json", "--pretty", "stats", "corpus.jsonl",
        ])
        .unwrap();

        assert_eq!(args.verbose, 2);
        assert_eq!(args.verbosity(), 3);
        assert_eq!(args.output_format, OutputFormat::Json);
        assert!(args.pretty);
        assert!(matches!(args.command, Command::Stats(_)));
    }

    #[test]
    fn test_verbosity_levels() {
        let args = LectioArgs::try_parse_from(["lectio", "stats", "c.jsonl"]).unwrap();
        assert_eq!(args.verbosity(), 1);

        let args = LectioArgs::try_parse_from(["lectio", "-q", "-v", "stats", "c.jsonl"]).unwrap();
        assert_eq!(args.verbosity(), 0);
    }
}
