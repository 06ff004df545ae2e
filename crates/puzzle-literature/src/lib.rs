//! Puzzle Literature
//!
//! Literature discovery for research puzzles. Given a research query, finds
//! foundational ("classic") and recent papers from quality journals through the
//! OpenAlex works API, broadening the search in up to three tiers when direct
//! matches are scarce.
//!
//! # Features
//!
//! - **Tiered search**: exact query and synonyms, then context-abstracted terms, then
//!   foundational theories at a relaxed citation floor
//! - **Journal tiers**: curated lists with abbreviation, substring and prefix matching
//! - **LLM-assisted**: query expansion, term generation and relevance screening through
//!   a pluggable text-generation backend; every step fails soft
//! - **Cached**: expanded terms and screened paper pools expire on an injectable clock
//!
//! # Example
//!
//! ```no_run
//! use puzzle_literature::{LiteratureRequest, LiteratureSearch, config::Config, llm};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let generator = llm::from_config(&config.llm)?;
//!     let search = LiteratureSearch::new(&config, generator)?;
//!
//!     let response = search.search(&LiteratureRequest::new("team dissolution")).await?;
//!     println!("{} classics, {} recent", response.classics.len(), response.recent.len());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod discovery;
pub mod error;
pub mod formatters;
pub mod llm;
pub mod models;
pub mod server;

pub use client::OpenAlexClient;
pub use config::Config;
pub use discovery::{JournalClassifier, LiteratureSearch};
pub use error::{ClientError, SearchError};
pub use models::{JournalTier, LiteratureRequest, LiteratureResponse, Paper};
