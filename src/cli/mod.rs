//! Command-line interface for City Explorer.

use clap::{Parser, Subcommand};

/// City Explorer - location aggregation backend
/// Geocodes a place and serves cached weather, events, reviews, movies and trails
#[derive(Parser, Debug)]
#[command(name = "city-explorer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the HTTP server (default)
    #[command(alias = "web")]
    Serve,

    /// Resolve a place name once and print the stored location as JSON
    #[command(alias = "l")]
    Locate {
        /// Place name to geocode
        #[arg(required = true)]
        query: Vec<String>,
    },
}

impl Cli {
    /// The subcommand to run, defaulting to the server.
    #[must_use]
    pub fn command(self) -> Commands {
        self.command.unwrap_or(Commands::Serve)
    }
}
