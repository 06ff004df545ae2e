//! Live tests against the public OpenAlex API.
//!
//! Run with: `cargo test --features integration -- --nocapture`
//! The full-search test also needs `LLM_API_KEY`.

#![cfg(feature = "integration")]

use puzzle_literature::client::{OpenAlexClient, WorksQuery};
use puzzle_literature::config::Config;
use puzzle_literature::discovery::{JournalClassifier, LiteratureSearch};
use puzzle_literature::llm;
use puzzle_literature::models::LiteratureRequest;

#[tokio::test]
async fn test_live_works_search() {
    let config = Config::default();
    let client = OpenAlexClient::new(&config).expect("Failed to create client");

    let works = client
        .try_search_works(&WorksQuery::new("psychological safety teams", 10, 10))
        .await
        .expect("Search should succeed");

    assert!(works.meta.count > 0, "Should have total count");
    assert!(!works.results.is_empty(), "Should return some works");
    assert!(works.results.iter().all(|w| w.cited_by_count > 10));
}

#[tokio::test]
async fn test_live_papers_carry_journal_tiers() {
    let config = Config::default();
    let client = OpenAlexClient::new(&config).expect("Failed to create client");

    let query = WorksQuery::new("psychological safety", 25, 100);
    let papers = client.search_papers(&query, &JournalClassifier::builtin()).await;

    assert!(!papers.is_empty());
    assert!(papers.iter().all(|p| !p.id.is_empty() && !p.title.is_empty()));
}

#[tokio::test]
async fn test_live_tiered_search() {
    let config = Config::from_env().expect("valid environment");
    if !config.has_llm_key() {
        eprintln!("LLM_API_KEY not set, skipping");
        return;
    }

    let generator = llm::from_config(&config.llm).expect("generator");
    let search = LiteratureSearch::new(&config, generator).expect("search");

    let response = search
        .search(&LiteratureRequest::new("organizational team dissolution"))
        .await
        .expect("Search should succeed");

    let metadata = response.search_metadata.expect("metadata");
    assert!((1..=3).contains(&metadata.tier));
    assert!(!metadata.search_terms.is_empty());
    assert!(response.classics.len() <= 5 && response.recent.len() <= 5);
}
