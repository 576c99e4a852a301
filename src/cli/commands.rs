//! CLI commands and argument parsing

use crate::config::DEFAULT_BASE_URL;
use crate::pagination::DEFAULT_LIMIT;
use crate::resources::ResourceKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line client for the evaluation platform API
#[derive(Parser, Debug)]
#[command(name = "evalkit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// API key (falls back to EVALKIT_API_KEY)
    #[arg(long, global = true, env = "EVALKIT_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// API base URL
    #[arg(long, global = true, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Request timeout in seconds
    #[arg(long, global = true, default_value = "60")]
    pub timeout: u64,

    /// Retries per request after the first attempt
    #[arg(long, global = true, default_value = "2")]
    pub max_retries: u32,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List objects of a kind (project, dataset, experiment, prompt, function)
    List {
        /// Object kind
        kind: ResourceKind,

        /// Page size
        #[arg(long, default_value_t = DEFAULT_LIMIT)]
        limit: usize,

        /// Resume after this object id
        #[arg(long)]
        starting_after: Option<String>,

        /// Skip objects whose value at this field was already printed
        #[arg(long)]
        unique_by: Option<String>,

        /// Stop after this many objects
        #[arg(long)]
        max: Option<usize>,

        /// Extra query filter, as key=value (repeatable)
        #[arg(long = "filter", value_parser = parse_key_val)]
        filters: Vec<(String, String)>,
    },

    /// Fetch one object by id
    Get {
        /// Object kind
        kind: ResourceKind,
        /// Object id
        id: String,
    },

    /// Delete one object by id
    Delete {
        /// Object kind
        kind: ResourceKind,
        /// Object id
        id: String,
    },

    /// Insert log events into a project from a JSON file (object or array)
    Insert {
        /// Project id
        project_id: String,
        /// JSON file with the events
        file: PathBuf,
    },

    /// Fetch a project's log events
    Fetch {
        /// Project id
        project_id: String,

        /// Page size
        #[arg(long, default_value_t = DEFAULT_LIMIT)]
        limit: usize,

        /// Stop after this many events
        #[arg(long)]
        max: Option<usize>,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one object per line)
    Json,
    /// Indented JSON
    Pretty,
}

/// Parse a `key=value` pair
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{s}'"))?;
    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_command() {
        let cli = Cli::parse_from([
            "evalkit",
            "--api-key",
            "sk-test",
            "list",
            "experiments",
            "--limit",
            "10",
            "--filter",
            "project_id=p1",
            "--max",
            "3",
        ]);

        assert_eq!(cli.api_key.as_deref(), Some("sk-test"));
        assert_eq!(cli.base_url, DEFAULT_BASE_URL);
        match cli.command {
            Commands::List {
                kind,
                limit,
                filters,
                max,
                ..
            } => {
                assert_eq!(kind, ResourceKind::Experiment);
                assert_eq!(limit, 10);
                assert_eq!(max, Some(3));
                assert_eq!(filters, vec![("project_id".to_string(), "p1".to_string())]);
            }
            other => panic!("Expected List, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_get_command() {
        let cli = Cli::parse_from(["evalkit", "get", "project", "p1", "--max-retries", "0"]);
        assert_eq!(cli.max_retries, 0);
        assert!(matches!(
            cli.command,
            Commands::Get { kind: ResourceKind::Project, ref id } if id == "p1"
        ));
    }

    #[test]
    fn test_parse_key_val() {
        assert_eq!(
            parse_key_val("a=b=c"),
            Ok(("a".to_string(), "b=c".to_string()))
        );
        assert!(parse_key_val("novalue").is_err());
    }
}
