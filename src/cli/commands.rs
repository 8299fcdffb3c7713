//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Default configuration file
pub const DEFAULT_CONFIG_FILE: &str = "warmcache.yaml";

/// Pre-warming cache for paginated REST APIs
#[derive(Parser, Debug)]
#[command(name = "warmcache")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server mode with scheduled refreshes
    Serve {
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Run one refresh sweep and exit
    Refresh {
        /// Refresh only this key, ignoring freshness
        #[arg(long)]
        key: Option<String>,
    },

    /// Read a tracked resource through the cache
    Get {
        /// Resource key
        key: String,

        /// Field to sort by
        #[arg(long)]
        sort: Option<String>,

        /// Field that breaks ties on `--sort`
        #[arg(long, requires = "sort")]
        then: Option<String>,

        /// Sort descending
        #[arg(long)]
        desc: bool,

        /// Maximum items to print
        #[arg(long)]
        limit: Option<usize>,
    },

    /// List keys currently held by the store
    Keys,

    /// Remove cached entries
    Clear {
        /// Remove only this key
        #[arg(long)]
        key: Option<String>,
    },

    /// List tracked resources
    Resources,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON
    Json,
    /// Indented JSON
    Pretty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::try_parse_from(["warmcache", "keys"]).unwrap();
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_FILE));
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(matches!(cli.command, Commands::Keys));
    }

    #[test]
    fn test_parse_get_with_view() {
        let cli = Cli::try_parse_from([
            "warmcache", "get", "courses", "--sort", "name", "--then", "id", "--desc", "--limit",
            "5", "-c", "prod.yaml",
        ])
        .unwrap();
        assert_eq!(cli.config, PathBuf::from("prod.yaml"));
        match cli.command {
            Commands::Get {
                key,
                sort,
                then,
                desc,
                limit,
            } => {
                assert_eq!(key, "courses");
                assert_eq!(sort.as_deref(), Some("name"));
                assert_eq!(then.as_deref(), Some("id"));
                assert!(desc);
                assert_eq!(limit, Some(5));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_serve_port() {
        let cli = Cli::try_parse_from(["warmcache", "serve", "--port", "9000"]).unwrap();
        assert!(matches!(cli.command, Commands::Serve { port: Some(9000) }));
    }

    #[test]
    fn test_then_requires_sort() {
        assert!(Cli::try_parse_from(["warmcache", "get", "courses", "--then", "id"]).is_err());
    }

    #[test]
    fn test_get_requires_key() {
        assert!(Cli::try_parse_from(["warmcache", "get"]).is_err());
    }
}
