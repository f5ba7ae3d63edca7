//! WeRead CLI - Command-line access to a WeRead library

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use weread_core::{ClientConfig, Credential, SessionClient, WereadError, WereadTools};

/// Parse the timeout argument (whole seconds, at least 1)
fn parse_timeout(s: &str) -> Result<u64, String> {
    let n: u64 = s.parse().map_err(|_| format!("'{}' is not a valid number", s))?;
    if n < 1 {
        Err("timeout must be at least 1 second".to_string())
    } else {
        Ok(n)
    }
}

#[derive(Parser)]
#[command(name = "weread")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Session cookie ("wr_vid=...; wr_skey=...")
    #[arg(long, env = "WEREAD_COOKIE", global = true, hide_env_values = true)]
    cookie: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, value_parser = parse_timeout)]
    timeout: Option<u64>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether the session cookie is accepted
    Auth,

    /// List every book on the shelf
    Books,

    /// Search the shelf by title or author
    Search {
        /// Text to look for
        query: String,
    },

    /// Show details of one book
    Book {
        book_id: String,
    },

    /// List a book's highlights, oldest first
    Bookmarks {
        book_id: String,
    },

    /// List a book's chapters
    Chapters {
        book_id: String,
    },

    /// Show reading progress for a book
    Progress {
        book_id: String,
    },

    /// List your reviews and notes for a book
    Reviews {
        book_id: String,
    },

    /// Print the web reader URL for a book
    Url {
        book_id: String,
    },

    /// Render a book's highlights as markdown
    Highlights {
        book_id: String,

        /// Render at most this many highlights
        #[arg(short, long, allow_negative_numbers = true)]
        max: Option<i64>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "weread_cli=debug,weread_core=debug"
    } else {
        "weread_cli=info,weread_core=warn"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(err) = run(cli).await {
        match err.downcast_ref::<WereadError>() {
            Some(weread) => eprintln!("error[{}]: {}", weread.kind(), weread),
            None => eprintln!("error: {:#}", err),
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = ClientConfig::from_env();
    if let Some(secs) = cli.timeout {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    let credential = Credential::new(cli.cookie.as_deref().unwrap_or_default());
    let tools = WereadTools::new(std::sync::Arc::new(SessionClient::new(config, credential)?));
    let json = cli.json;

    match cli.command {
        Commands::Auth => commands::auth(&tools, json).await,
        Commands::Books => commands::books(&tools, json).await,
        Commands::Search { query } => commands::search(&tools, &query, json).await,
        Commands::Book { book_id } => commands::book(&tools, &book_id, json).await,
        Commands::Bookmarks { book_id } => commands::bookmarks(&tools, &book_id, json).await,
        Commands::Chapters { book_id } => commands::chapters(&tools, &book_id, json).await,
        Commands::Progress { book_id } => commands::progress(&tools, &book_id, json).await,
        Commands::Reviews { book_id } => commands::reviews(&tools, &book_id, json).await,
        Commands::Url { book_id } => commands::url(&tools, &book_id, json),
        Commands::Highlights { book_id, max } => {
            commands::highlights(&tools, &book_id, max, json).await
        }
    }
}
