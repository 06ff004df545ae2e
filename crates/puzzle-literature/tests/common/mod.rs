//! Shared fixtures: OpenAlex record builders and a scripted text generator.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use serde_json::{Value, json};
use wiremock::MockServer;

use puzzle_literature::client::OpenAlexClient;
use puzzle_literature::config::Config;
use puzzle_literature::discovery::{
    JournalCatalog, JournalClassifier, LiteratureSearch, ManualClock,
};
use puzzle_literature::error::{ClientError, ClientResult};
use puzzle_literature::llm::{CompletionRequest, TextGenerator};

/// Year the manual clock starts in.
pub const CURRENT_YEAR: i32 = 2025;

/// Sample OpenAlex work JSON.
pub fn work_json(id: &str, title: &str, year: i32, citations: u32, journal: &str) -> Value {
    json!({
        "id": format!("https://openalex.org/{id}"),
        "title": title,
        "display_name": title,
        "publication_year": year,
        "doi": format!("https://doi.org/10.1234/{id}"),
        "primary_location": {
            "source": {"id": "https://openalex.org/S1", "display_name": journal}
        },
        "authorships": [{"author": {"display_name": "Test Author"}}],
        "cited_by_count": citations,
        "abstract_inverted_index": {"Teams": [0], "dissolve": [1]},
        "concepts": [
            {"display_name": "Sociology", "level": 0, "score": 0.7},
            {"display_name": "Psychology", "level": 0, "score": 0.4}
        ]
    })
}

/// Sample works response JSON.
pub fn works_response(works: Vec<Value>) -> Value {
    json!({
        "meta": {"count": works.len()},
        "results": works
    })
}

/// `count` classics (year 2000) from a top composite journal, ids `{prefix}1..`.
pub fn classics(prefix: &str, count: usize, citations: u32) -> Vec<Value> {
    (1..=count)
        .map(|i| {
            work_json(
                &format!("{prefix}{i}"),
                &format!("Classic study {prefix}{i}"),
                2000,
                citations,
                "Academy of Management Journal",
            )
        })
        .collect()
}

/// `count` recent papers (year 2023) from a top disciplinary journal.
pub fn recent(prefix: &str, count: usize) -> Vec<Value> {
    (1..=count)
        .map(|i| {
            work_json(
                &format!("{prefix}{i}"),
                &format!("Recent study {prefix}{i}"),
                2023,
                40,
                "American Sociological Review",
            )
        })
        .collect()
}

/// Canned answers per generation step, matched on prompt content.
#[derive(Debug, Clone, Default)]
pub struct Script {
    pub expansion: Option<String>,
    pub synonyms: Option<String>,
    pub context: Option<String>,
    pub theories: Option<String>,
    pub relevance: Option<String>,
}

/// Generator that returns no synonyms and fails every other step.
pub fn no_synonyms() -> Arc<ScriptedGenerator> {
    ScriptedGenerator::new(Script { synonyms: Some("[]".into()), ..Script::default() })
}

/// Text generator answering from a [`Script`]. Steps without an answer fail.
#[derive(Debug, Default)]
pub struct ScriptedGenerator {
    script: Script,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new(script: Script) -> Arc<Self> {
        Arc::new(Self { script, prompts: Mutex::new(Vec::new()) })
    }

    /// Every prompt received, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    /// Number of prompts containing `needle`.
    pub fn count_containing(&self, needle: &str) -> usize {
        self.prompts().iter().filter(|p| p.contains(needle)).count()
    }
}

#[async_trait::async_trait]
impl TextGenerator for ScriptedGenerator {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn complete(&self, request: CompletionRequest) -> ClientResult<String> {
        let prompt = request.last_user_text().to_string();
        self.prompts.lock().unwrap().push(prompt.clone());

        let answer = if prompt.contains("Rewrite this as") {
            &self.script.expansion
        } else if prompt.contains("SYNONYM") {
            &self.script.synonyms
        } else if prompt.contains("CONTEXT-ABSTRACTED") {
            &self.script.context
        } else if prompt.contains("FOUNDATIONAL THEORY") {
            &self.script.theories
        } else if prompt.contains("indices") {
            &self.script.relevance
        } else {
            &None
        };

        answer.clone().ok_or_else(|| ClientError::provider("no scripted answer"))
    }
}

/// Built-in journal lists with every identifier removed, so each term is searched
/// once without a whitelist.
pub fn names_only_catalog() -> JournalCatalog {
    let mut catalog = JournalCatalog::builtin();
    for list in &mut catalog.lists {
        for journal in &mut list.journals {
            journal.source_id = None;
            journal.issn = None;
        }
    }
    catalog
}

/// Search engine over a mock server with a manual clock and unfiltered searches.
pub fn setup_search(
    mock_server: &MockServer,
    generator: Arc<ScriptedGenerator>,
) -> (LiteratureSearch, Arc<ManualClock>) {
    setup_search_with_catalog(mock_server, generator, &names_only_catalog())
}

/// Search engine over a mock server using the given journal catalog.
pub fn setup_search_with_catalog(
    mock_server: &MockServer,
    generator: Arc<ScriptedGenerator>,
    catalog: &JournalCatalog,
) -> (LiteratureSearch, Arc<ManualClock>) {
    let config = Config::for_testing(&mock_server.uri());
    let client = OpenAlexClient::new(&config).unwrap();
    let clock = Arc::new(ManualClock::at_year(CURRENT_YEAR));
    let search = LiteratureSearch::with_components(
        &config,
        client,
        generator,
        JournalClassifier::new(catalog),
        clock.clone(),
    );
    (search, clock)
}
