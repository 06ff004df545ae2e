//! Input model for the literature query surface.

use serde::{Deserialize, Serialize};

use crate::config::search;
use crate::error::{SearchError, SearchResult};

/// A literature query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiteratureRequest {
    /// Free-text research query (e.g., "organizational team dissolution").
    pub query: String,

    /// Optional subfield to situate the query (e.g., "organizational behavior").
    #[serde(default)]
    pub subfield: Option<String>,

    /// Maximum papers to return in `papers`.
    #[serde(default)]
    pub limit: Option<usize>,
}

impl LiteratureRequest {
    /// Create a request for a query.
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self { query: query.into(), subfield: None, limit: None }
    }

    /// Set the subfield.
    #[must_use]
    pub fn with_subfield(mut self, subfield: impl Into<String>) -> Self {
        self.subfield = Some(subfield.into());
        self
    }

    /// Set the response limit.
    #[must_use]
    pub const fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Reject empty queries and out-of-range limits.
    pub fn validate(&self) -> SearchResult<()> {
        if self.query.trim().is_empty() {
            return Err(SearchError::validation("query", "cannot be empty"));
        }
        if let Some(limit) = self.limit {
            if limit == 0 || limit > search::MAX_RESPONSE_LIMIT {
                return Err(SearchError::validation(
                    "limit",
                    format!("must be between 1 and {}", search::MAX_RESPONSE_LIMIT),
                ));
            }
        }
        Ok(())
    }

    /// Effective response limit.
    #[must_use]
    pub fn effective_limit(&self) -> usize {
        self.limit.unwrap_or(search::DEFAULT_RESPONSE_LIMIT)
    }

    /// Subfield with surrounding whitespace removed, if non-empty.
    #[must_use]
    pub fn subfield(&self) -> Option<&str> {
        self.subfield.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}
