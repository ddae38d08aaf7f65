use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use ragwidget_core::identity::Role;

mod commands;
mod context;
mod render;

use context::GlobalArgs;

#[derive(Parser)]
#[command(name = "ragwidget")]
#[command(about = "RAG Widget - chat with and manage a knowledge base from the terminal", long_about = None)]
struct Cli {
    /// Base URL of the backend API (overrides config and environment)
    #[arg(long, global = true)]
    api_base_url: Option<String>,

    /// Act as the given role instead of the one in the stored token
    #[arg(long, global = true, value_parser = parse_role)]
    as_role: Option<Role>,

    /// Path to an alternative config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive chat
    Chat,
    /// Ask a single question
    Query {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Scrape one page into the knowledge base
    Scrape { url: String },
    /// Crawl a site and ingest the discovered pages
    BulkScrape { base_url: String },
    /// Upload a document into the knowledge base
    Upload { path: PathBuf },
    /// Show knowledge base statistics
    Stats,
    /// Delete every document in the knowledge base
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Print the resolved role
    Whoami,
    /// Store a bearer token
    Login {
        #[arg(long)]
        token: String,
    },
    /// Remove the stored bearer token
    Logout,
    /// Print the embeddable loader script
    Embed {
        /// Origin serving the widget UI
        #[arg(long)]
        origin: Option<String>,
        /// Path of the embed page on that origin
        #[arg(long)]
        path: Option<String>,
    },
}

fn parse_role(value: &str) -> Result<Role, String> {
    value.parse()
}

fn init_tracing(default_level: &str) {
    // stderr keeps log lines out of the chat output
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let args = GlobalArgs {
        api_base_url: cli.api_base_url,
        as_role: cli.as_role,
        config: cli.config,
    };

    match cli.command {
        Commands::Chat => commands::chat::run(&args).await?,
        Commands::Query { text } => commands::operations::query(&args, &text.join(" ")).await?,
        Commands::Scrape { url } => commands::operations::scrape(&args, &url).await?,
        Commands::BulkScrape { base_url } => {
            commands::operations::bulk_scrape(&args, &base_url).await?
        }
        Commands::Upload { path } => commands::operations::upload(&args, &path).await?,
        Commands::Stats => commands::operations::stats(&args).await?,
        Commands::Clear { yes } => commands::operations::clear(&args, yes).await?,
        Commands::Whoami => commands::account::whoami(&args)?,
        Commands::Login { token } => commands::account::login(&token)?,
        Commands::Logout => commands::account::logout(&args)?,
        Commands::Embed { origin, path } => {
            commands::embed::run(&args, origin.as_deref(), path.as_deref())?
        }
    }

    Ok(())
}
