use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// `AskHR` router - sends HR questions to policy search or Workday.
#[derive(Parser, Debug)]
#[command(name = "askhr-router")]
#[command(version)]
#[command(about = "Route HR questions between policy search and Workday.", long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.askhr/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP gateway
    Serve {
        /// Host to bind to (default from config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (use 0 for random available port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Ask the router where a single query would go and print the decision
    Route {
        /// The query to classify
        query: String,
    },

    /// Run messages as consecutive turns of one new session
    Ask {
        /// Messages, sent in order
        #[arg(required = true)]
        messages: Vec<String>,

        /// User id for the session
        #[arg(long, default_value = "anonymous")]
        user: String,
    },
}
