//! Per-request search state: the deduplicated paper pool and the issued-term log.

use std::collections::{HashMap, HashSet};

use super::normalize_query;
use crate::models::{JournalTier, Paper, SearchMetadata};

/// Transient state of one tiered search.
#[derive(Debug, Default)]
pub struct SearchSession {
    pool: Vec<Paper>,
    positions: HashMap<String, usize>,
    used_terms: HashSet<String>,
    tier: u8,
    /// Audit trail, filled in as the search runs.
    pub metadata: SearchMetadata,
}

impl SearchSession {
    /// Empty session at tier 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tier: 1,
            metadata: SearchMetadata { tier: 1, ..SearchMetadata::default() },
            ..Self::default()
        }
    }

    /// Current search tier.
    #[must_use]
    pub const fn tier(&self) -> u8 {
        self.tier
    }

    /// Move to a later tier.
    pub fn enter_tier(&mut self, tier: u8) {
        debug_assert!(tier >= self.tier, "tiers only escalate");
        self.tier = tier;
        self.metadata.tier = tier;
        tracing::info!(tier, pool = self.pool.len(), "Entering search tier");
    }

    /// Record a term as issued. Returns false for blanks and terms already issued.
    pub fn claim_term(&mut self, term: &str) -> bool {
        let key = normalize_query(term);
        if key.is_empty() || !self.used_terms.insert(key) {
            return false;
        }
        self.metadata.search_terms.push(term.trim().to_string());
        true
    }

    /// Log a term that is issued again on purpose, bypassing deduplication.
    pub fn reissue_term(&mut self, term: &str) {
        let term = term.trim();
        self.used_terms.insert(normalize_query(term));
        self.metadata.search_terms.push(term.to_string());
    }

    /// Whether a term has been issued.
    #[must_use]
    pub fn is_issued(&self, term: &str) -> bool {
        self.used_terms.contains(&normalize_query(term))
    }

    /// Issued terms in issue order.
    #[must_use]
    pub fn issued_terms(&self) -> &[String] {
        &self.metadata.search_terms
    }

    /// Add papers found in one search. Papers already in the pool are skipped, but a
    /// higher-priority `context` tier overwrites their tier label. New papers take the
    /// context tier when one is given. Returns the number of new papers.
    pub fn add_papers(&mut self, papers: Vec<Paper>, context: Option<JournalTier>) -> usize {
        let mut added = 0;
        for mut paper in papers {
            if let Some(&pos) = self.positions.get(&paper.id) {
                if let Some(tier) = context {
                    let existing = &mut self.pool[pos];
                    if tier < existing.journal_tier {
                        existing.journal_tier = tier;
                    }
                }
                continue;
            }

            if let Some(tier) = context {
                paper.journal_tier = tier;
            }
            self.positions.insert(paper.id.clone(), self.pool.len());
            self.pool.push(paper);
            added += 1;
        }
        added
    }

    /// Accumulated papers in insertion order.
    #[must_use]
    pub fn pool(&self) -> &[Paper] {
        &self.pool
    }
}
