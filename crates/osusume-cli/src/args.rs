use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "osusume")]
#[command(about = "Find anime to recommend, by title or at random", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file to use instead of the per-user one.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print machine-readable JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Search titles, most popular first.
    Search {
        #[arg(required = true, num_args = 1..)]
        term: Vec<String>,

        #[arg(long)]
        limit: Option<u32>,

        /// Ask the secondary catalog when the primary fails or has nothing.
        #[arg(long)]
        fallback: bool,
    },

    /// Popular titles from a random genre and page.
    Random,

    /// Trending titles followed by popular ones.
    Trending {
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Interactive search and selection.
    Session {
        /// Collect weekly recommendations instead of a single pick.
        #[arg(long)]
        weekly: bool,
    },
}

impl Command {
    pub fn is_interactive(&self) -> bool {
        matches!(self, Self::Session { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_joins_words() {
        let cli = Cli::parse_from(["osusume", "search", "one", "piece", "--limit", "3"]);
        match cli.command {
            Command::Search {
                term,
                limit,
                fallback,
            } => {
                assert_eq!(term.join(" "), "one piece");
                assert_eq!(limit, Some(3));
                assert!(!fallback);
            }
            _ => panic!("Expected search"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["osusume", "session", "--weekly", "--json", "-v"]);
        assert!(cli.json);
        assert!(cli.verbose);
        assert!(cli.command.is_interactive());
    }

    #[test]
    fn test_search_requires_term() {
        assert!(Cli::try_parse_from(["osusume", "search"]).is_err());
    }
}
