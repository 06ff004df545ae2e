//! Raw work records as returned by the OpenAlex works endpoint.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Search response wrapper.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorksResponse {
    /// Result-set metadata.
    #[serde(default)]
    pub meta: WorksMeta,

    /// Works in this page, in relevance order.
    #[serde(default)]
    pub results: Vec<Work>,
}

/// Result-set metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorksMeta {
    /// Total number of matching works.
    #[serde(default)]
    pub count: u64,
}

/// A single bibliographic work.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Work {
    /// Work URL id (e.g. `https://openalex.org/W2741809807`).
    #[serde(default)]
    pub id: Option<String>,

    /// Title.
    #[serde(default)]
    pub title: Option<String>,

    /// Display name (same as the title on current API versions).
    #[serde(default)]
    pub display_name: Option<String>,

    /// Publication year.
    #[serde(default)]
    pub publication_year: Option<i32>,

    /// DOI URL.
    #[serde(default)]
    pub doi: Option<String>,

    /// Where the work was primarily published.
    #[serde(default)]
    pub primary_location: Option<Location>,

    /// Authorships in order.
    #[serde(default)]
    pub authorships: Vec<Authorship>,

    /// Citation count.
    #[serde(default)]
    pub cited_by_count: u32,

    /// Abstract as word -> positions.
    #[serde(default)]
    pub abstract_inverted_index: Option<HashMap<String, Vec<usize>>>,

    /// Concept tags.
    #[serde(default)]
    pub concepts: Vec<Concept>,

    /// Relevance score for the query that found this work.
    #[serde(default)]
    pub relevance_score: Option<f64>,
}

impl Work {
    /// Short identifier: last path segment of the work URL.
    #[must_use]
    pub fn short_id(&self) -> Option<&str> {
        let id = self.id.as_deref()?.trim();
        let short = id.rsplit('/').next().unwrap_or(id);
        (!short.is_empty()).then_some(short)
    }

    /// Title, falling back to the display name. Blank titles count as missing.
    #[must_use]
    pub fn title_text(&self) -> Option<&str> {
        self.title
            .as_deref()
            .or(self.display_name.as_deref())
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// Display name of the primary source, if any.
    #[must_use]
    pub fn source_name(&self) -> Option<&str> {
        self.primary_location.as_ref()?.source.as_ref()?.display_name.as_deref()
    }
}

/// A publication location.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Location {
    /// The hosting source (journal, repository).
    #[serde(default)]
    pub source: Option<Source>,
}

/// A journal or repository.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Source {
    /// Source URL id.
    #[serde(default)]
    pub id: Option<String>,

    /// Source display name.
    #[serde(default)]
    pub display_name: Option<String>,
}

/// One authorship entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Authorship {
    /// The author.
    #[serde(default)]
    pub author: WorkAuthor,
}

/// Author as nested in an authorship.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkAuthor {
    /// Author display name.
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Concept tag with hierarchy level and confidence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Concept {
    /// Concept name.
    #[serde(default)]
    pub display_name: Option<String>,

    /// 0 for top-level disciplines.
    #[serde(default)]
    pub level: u32,

    /// Tag confidence in `[0, 1]`.
    #[serde(default)]
    pub score: f64,
}
