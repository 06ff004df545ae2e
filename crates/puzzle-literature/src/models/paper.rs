//! Canonical paper record produced by the bibliographic client.

use serde::{Deserialize, Serialize};

/// Journal quality tier, in priority order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum JournalTier {
    /// Composite list of top management/business journals.
    #[serde(rename = "top-tier-composite")]
    TopComposite,

    /// Top journals of the parent disciplines.
    #[serde(rename = "top-disciplinary")]
    TopDisciplinary,

    /// Solid field journals.
    #[serde(rename = "quality-management")]
    QualityManagement,

    /// Anything not in a curated list.
    #[default]
    #[serde(rename = "other")]
    Other,
}

impl JournalTier {
    /// Curated tiers in priority order.
    pub const CURATED: [Self; 3] =
        [Self::TopComposite, Self::TopDisciplinary, Self::QualityManagement];

    /// Whether papers from this tier are eligible for classic/recent selection.
    #[must_use]
    pub const fn is_quality(self) -> bool {
        !matches!(self, Self::Other)
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::TopComposite => "top-tier-composite",
            Self::TopDisciplinary => "top-disciplinary",
            Self::QualityManagement => "quality-management",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for JournalTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A normalized literature record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paper {
    /// Source-assigned identifier (e.g. `W2741809807`).
    pub id: String,

    /// Paper title.
    pub title: String,

    /// Author display names, in authorship order.
    #[serde(default)]
    pub authors: Vec<String>,

    /// Publication year.
    pub year: i32,

    /// Abstract rebuilt from the inverted index (approximate).
    #[serde(default)]
    pub r#abstract: Option<String>,

    /// DOI or landing URL.
    #[serde(default)]
    pub url: Option<String>,

    /// Number of citations.
    #[serde(default)]
    pub citation_count: u32,

    /// Spans more than one top-level discipline.
    #[serde(default)]
    pub is_cross_disciplinary: bool,

    /// Dominant top-level discipline.
    #[serde(default)]
    pub discipline: Option<String>,

    /// Journal display name.
    #[serde(default)]
    pub journal: String,

    /// Journal quality tier.
    #[serde(default)]
    pub journal_tier: JournalTier,

    /// Set on the copies placed in a response's classics bucket.
    #[serde(default)]
    pub is_classic: bool,
}

impl Paper {
    /// Years since publication relative to `current_year`.
    #[must_use]
    pub const fn age(&self, current_year: i32) -> i32 {
        current_year - self.year
    }

    /// Old enough to be a classic (strictly more than the recent window).
    #[must_use]
    pub const fn is_classic_age(&self, current_year: i32, window: i32) -> bool {
        self.age(current_year) > window
    }

    /// Within the recent window.
    #[must_use]
    pub const fn is_recent(&self, current_year: i32, window: i32) -> bool {
        self.age(current_year) <= window
    }

    /// Get the first author's name if available.
    #[must_use]
    pub fn first_author(&self) -> Option<&str> {
        self.authors.first().map(String::as_str)
    }

    /// Get author names as a comma-separated string.
    #[must_use]
    pub fn author_names(&self) -> String {
        self.authors.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paper(year: i32) -> Paper {
        Paper {
            id: "W1".to_string(),
            title: "Team Dissolution".to_string(),
            authors: vec!["A. Author".to_string(), "B. Author".to_string()],
            year,
            r#abstract: None,
            url: None,
            citation_count: 10,
            is_cross_disciplinary: false,
            discipline: None,
            journal: "Organization Science".to_string(),
            journal_tier: JournalTier::TopComposite,
            is_classic: false,
        }
    }

    #[test]
    fn test_age_boundaries() {
        let p = paper(2020);
        assert!(p.is_recent(2025, 5));
        assert!(!p.is_classic_age(2025, 5));
        assert!(p.is_classic_age(2026, 5));
        assert!(!p.is_recent(2026, 5));
    }

    #[test]
    fn test_tier_order_and_labels() {
        assert!(JournalTier::TopComposite < JournalTier::QualityManagement);
        assert!(!JournalTier::Other.is_quality());
        assert_eq!(
            serde_json::to_value(JournalTier::TopComposite).unwrap(),
            serde_json::json!("top-tier-composite")
        );
    }

    #[test]
    fn test_paper_serializes_camel_case() {
        let value = serde_json::to_value(paper(2019)).unwrap();
        assert_eq!(value["citationCount"], 10);
        assert_eq!(value["journalTier"], "top-tier-composite");
        assert_eq!(paper(2019).author_names(), "A. Author, B. Author");
        assert_eq!(paper(2019).first_author(), Some("A. Author"));
    }
}
