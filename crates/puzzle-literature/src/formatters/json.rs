//! JSON output formatting with token efficiency.

use serde_json::{Value, json};

use crate::models::{LiteratureResponse, Paper};

/// Create a compact paper representation for JSON output.
///
/// Drops the abstract and empty optional fields.
#[must_use]
pub fn compact_paper(paper: &Paper) -> Value {
    let mut obj = json!({
        "id": paper.id,
        "title": paper.title,
        "year": paper.year,
        "citations": paper.citation_count,
        "journalTier": paper.journal_tier,
    });

    if !paper.authors.is_empty() {
        obj["authors"] = json!(paper.authors);
    }

    if !paper.journal.is_empty() {
        obj["journal"] = json!(paper.journal);
    }

    if let Some(url) = &paper.url {
        obj["url"] = json!(url);
    }

    if let Some(discipline) = &paper.discipline {
        obj["discipline"] = json!(discipline);
    }

    if paper.is_cross_disciplinary {
        obj["crossDisciplinary"] = json!(true);
    }

    obj
}

/// Compact representation of a whole literature response.
#[must_use]
pub fn compact_literature(response: &LiteratureResponse) -> Value {
    let mut obj = json!({
        "totalFound": response.total_found,
        "cached": response.cached,
        "classics": response.classics.iter().map(compact_paper).collect::<Vec<_>>(),
        "recent": response.recent.iter().map(compact_paper).collect::<Vec<_>>(),
    });

    if let Some(analysis) = &response.analysis {
        obj["analysis"] = json!(analysis);
    }

    if let Some(metadata) = &response.search_metadata {
        obj["tier"] = json!(metadata.tier);
        obj["searchTerms"] = json!(metadata.search_terms);
    }

    obj
}
