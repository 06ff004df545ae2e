//! Puzzle Literature - Entry Point
//!
//! Serves the literature endpoint over HTTP, or runs one query from the command line.

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use puzzle_literature::{
    LiteratureRequest, LiteratureSearch,
    config::Config,
    formatters, llm,
    server::LiteratureServer,
};

#[derive(Parser, Debug)]
#[command(name = "puzzle-literature")]
#[command(about = "Tiered literature discovery over OpenAlex")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG", global = true)]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server
    Serve {
        /// HTTP server port
        #[arg(long, default_value = "8000", env = "PORT")]
        port: u16,
    },
    /// Run a single literature query and print the result
    Search {
        /// Research query
        query: String,

        /// Subfield to situate the query
        #[arg(long)]
        subfield: Option<String>,

        /// Maximum papers to return
        #[arg(long)]
        limit: Option<usize>,

        /// Output format
        #[arg(long, default_value = "markdown")]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    /// Human-readable Markdown
    #[default]
    Markdown,
    /// Compact JSON
    Json,
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    // Logs go to stderr so `search` output stays clean on stdout.
    if json {
        subscriber
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    let config = Config::from_env()?;
    if !config.has_llm_key() {
        tracing::warn!(
            provider = ?config.llm.provider,
            "No LLM_API_KEY set; expansion, term generation and relevance screening will degrade"
        );
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        provider = ?config.llm.provider,
        "Starting puzzle-literature"
    );

    let generator = llm::from_config(&config.llm)?;
    let search = LiteratureSearch::new(&config, generator)?;

    match cli.command {
        Command::Serve { port } => {
            LiteratureServer::new(search).run_http(port).await?;
        }
        Command::Search { query, subfield, limit, format } => {
            let request = LiteratureRequest { query, subfield, limit };
            let response = search.search(&request).await?;
            let output = match format {
                OutputFormat::Markdown => formatters::format_literature_markdown(&response),
                OutputFormat::Json => {
                    serde_json::to_string_pretty(&formatters::compact_literature(&response))?
                }
            };
            println!("{output}");
        }
    }

    Ok(())
}
