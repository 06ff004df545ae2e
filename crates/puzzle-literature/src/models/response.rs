//! Response model for the literature query surface.

use serde::{Deserialize, Serialize};

use super::Paper;

/// Audit trail of one tiered search run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMetadata {
    /// Search tier that ended the run (1, 2 or 3).
    pub tier: u8,

    /// Tier 1 satisfied the request.
    pub exact_match_found: bool,

    /// Synonym terms were generated and searched.
    pub synonym_expansion_used: bool,

    /// Context-abstracted or theory terms were searched.
    pub broadening_used: bool,

    /// A search ran at the relaxed citation floor.
    pub citation_threshold_relaxed: bool,

    /// Every issued search term, in issue order.
    pub search_terms: Vec<String>,

    /// Classic citation threshold applied to the returned selection.
    pub classic_threshold: u32,

    /// Human-readable summary of how the result was reached.
    pub explanation: String,
}

/// Result of a literature query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiteratureResponse {
    /// Relevant papers, in relevance order, capped at the request limit.
    pub papers: Vec<Paper>,

    /// Foundational papers (old and highly cited).
    pub classics: Vec<Paper>,

    /// Papers from the recent window.
    pub recent: Vec<Paper>,

    /// Size of the accumulated paper pool.
    pub total_found: usize,

    /// Served from the paper-pool cache.
    pub cached: bool,

    /// Explanation shown when the search ended without a full selection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,

    /// Audit trail of the run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_metadata: Option<SearchMetadata>,
}
