//! Classic/recent partition of a ranked pool.

use crate::config::search;
use crate::models::Paper;

/// Selection parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionParams {
    /// Minimum citations for a classic.
    pub classic_threshold: u32,

    /// Year ages are measured from.
    pub current_year: i32,

    /// Bucket capacity.
    pub target: usize,

    /// Recent window in years.
    pub recent_window: i32,

    /// Restrict to quality-tier journals.
    pub quality_only: bool,
}

impl SelectionParams {
    /// Standard parameters for a classic threshold.
    #[must_use]
    pub const fn new(classic_threshold: u32, current_year: i32) -> Self {
        Self {
            classic_threshold,
            current_year,
            target: search::BUCKET_TARGET,
            recent_window: search::RECENT_WINDOW_YEARS,
            quality_only: true,
        }
    }

    /// Include papers from any journal.
    #[must_use]
    pub const fn any_journal(mut self) -> Self {
        self.quality_only = false;
        self
    }
}

/// Classics and recent papers, each in ranked order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    /// Old, highly cited papers.
    pub classics: Vec<Paper>,

    /// Papers within the recent window.
    pub recent: Vec<Paper>,
}

impl Selection {
    /// Both buckets reached `target`.
    #[must_use]
    pub fn is_satisfied(&self, target: usize) -> bool {
        self.classics.len() >= target && self.recent.len() >= target
    }

    /// Papers across both buckets.
    #[must_use]
    pub fn total(&self) -> usize {
        self.classics.len() + self.recent.len()
    }
}

/// Partition a ranked pool in one forward pass.
///
/// Classics are checked before recent, so a paper lands in at most one bucket. The
/// pass stops once both buckets are full. Classics come back with `is_classic` set.
#[must_use]
pub fn select_classics_and_recent(pool: &[Paper], params: &SelectionParams) -> Selection {
    let mut selection = Selection::default();

    for paper in pool.iter().filter(|p| !params.quality_only || p.journal_tier.is_quality()) {
        if selection.classics.len() >= params.target && selection.recent.len() >= params.target {
            break;
        }

        if paper.is_classic_age(params.current_year, params.recent_window)
            && paper.citation_count >= params.classic_threshold
        {
            if selection.classics.len() < params.target {
                selection.classics.push(Paper { is_classic: true, ..paper.clone() });
            }
        } else if paper.is_recent(params.current_year, params.recent_window)
            && selection.recent.len() < params.target
        {
            selection.recent.push(Paper { is_classic: false, ..paper.clone() });
        }
    }

    selection
}
