//! Journal catalog and tier classifier.
//!
//! Classification tries, in order: exact normalized match, the abbreviation table
//! (both directions), substring containment when the shorter name has at least
//! [`MIN_SUBSTRING_LEN`] characters, and word-boundary prefix match. Only the
//! top-tier-composite and top-disciplinary lists are consulted; the
//! quality-management list exists for whitelisted searches.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::client::SourceWhitelist;
use crate::models::JournalTier;

/// Shortest normalized name allowed to take part in substring matching.
pub const MIN_SUBSTRING_LEN: usize = 15;

/// Tiers the classifier assigns from names alone.
const CLASSIFIED_TIERS: [JournalTier; 2] =
    [JournalTier::TopComposite, JournalTier::TopDisciplinary];

/// `(name, linking ISSN)` per curated journal.
const TOP_COMPOSITE: &[(&str, &str)] = &[
    ("Academy of Management Journal", "0001-4273"),
    ("Academy of Management Review", "0363-7425"),
    ("Administrative Science Quarterly", "0001-8392"),
    ("Strategic Management Journal", "0143-2095"),
    ("Organization Science", "1047-7039"),
    ("Management Science", "0025-1909"),
    ("Journal of Applied Psychology", "0021-9010"),
    ("Journal of International Business Studies", "0047-2506"),
    ("Journal of Management", "0149-2063"),
    ("Journal of Management Studies", "0022-2380"),
    ("Organizational Behavior and Human Decision Processes", "0749-5978"),
    ("Personnel Psychology", "0031-5826"),
    ("Academy of Management Annals", "1941-6520"),
];

const TOP_DISCIPLINARY: &[(&str, &str)] = &[
    ("American Sociological Review", "0003-1224"),
    ("American Journal of Sociology", "0002-9602"),
    ("Annual Review of Sociology", "0360-0572"),
    ("Social Forces", "0037-7732"),
    ("American Economic Review", "0002-8282"),
    ("Econometrica", "0012-9682"),
    ("Quarterly Journal of Economics", "0033-5533"),
    ("Journal of Political Economy", "0022-3808"),
    ("Review of Economic Studies", "0034-6527"),
    ("Psychological Bulletin", "0033-2909"),
    ("Psychological Review", "0033-295X"),
    ("Psychological Science", "0956-7976"),
    ("Journal of Personality and Social Psychology", "0022-3514"),
    ("American Political Science Review", "0003-0554"),
    ("American Journal of Political Science", "0092-5853"),
];

const QUALITY_MANAGEMENT: &[(&str, &str)] = &[
    ("Journal of Business Venturing", "0883-9026"),
    ("Entrepreneurship Theory and Practice", "1042-2587"),
    ("Strategic Entrepreneurship Journal", "1932-4391"),
    ("Research Policy", "0048-7333"),
    ("Human Relations", "0018-7267"),
    ("Organization Studies", "0170-8406"),
    ("Journal of Organizational Behavior", "0894-3796"),
    ("The Leadership Quarterly", "1048-9843"),
    ("Journal of Business Ethics", "0167-4544"),
    ("Long Range Planning", "0024-6301"),
    ("British Journal of Management", "1045-3172"),
    ("Journal of Product Innovation Management", "0737-6782"),
    ("Industrial and Corporate Change", "0960-6491"),
    ("Journal of Occupational and Organizational Psychology", "0963-1798"),
];

pub const ABBREVIATIONS: &[(&str, &str)] = &[
    ("AMJ", "Academy of Management Journal"),
    ("AMR", "Academy of Management Review"),
    ("AMA", "Academy of Management Annals"),
    ("ASQ", "Administrative Science Quarterly"),
    ("SMJ", "Strategic Management Journal"),
    ("OrgSci", "Organization Science"),
    ("MgmtSci", "Management Science"),
    ("JAP", "Journal of Applied Psychology"),
    ("JIBS", "Journal of International Business Studies"),
    ("JOM", "Journal of Management"),
    ("JMS", "Journal of Management Studies"),
    ("OBHDP", "Organizational Behavior and Human Decision Processes"),
    ("PPsych", "Personnel Psychology"),
    ("ASR", "American Sociological Review"),
    ("AJS", "American Journal of Sociology"),
    ("AER", "American Economic Review"),
    ("QJE", "Quarterly Journal of Economics"),
    ("JPE", "Journal of Political Economy"),
    ("RES", "Review of Economic Studies"),
    ("JPSP", "Journal of Personality and Social Psychology"),
    ("APSR", "American Political Science Review"),
    ("AJPS", "American Journal of Political Science"),
    ("JBV", "Journal of Business Venturing"),
    ("ETP", "Entrepreneurship Theory and Practice"),
    ("SEJ", "Strategic Entrepreneurship Journal"),
    ("JOB", "Journal of Organizational Behavior"),
    ("LQ", "The Leadership Quarterly"),
    ("JPIM", "Journal of Product Innovation Management"),
    ("ICC", "Industrial and Corporate Change"),
    ("JOOP", "Journal of Occupational and Organizational Psychology"),
];

/// One journal in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    /// Display name.
    pub name: String,

    /// OpenAlex source id for whitelisted searches.
    #[serde(default)]
    pub source_id: Option<String>,

    /// Linking ISSN, used for whitelisted searches when the tier has no source ids.
    #[serde(default)]
    pub issn: Option<String>,
}

/// Curated journals for one tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalList {
    /// Tier these journals belong to.
    pub tier: JournalTier,

    /// Journals in the tier.
    pub journals: Vec<JournalEntry>,
}

/// Curated journal lists plus the abbreviation table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalCatalog {
    /// Curated lists.
    pub lists: Vec<JournalList>,

    /// `(abbreviation, full name)` pairs.
    #[serde(default)]
    pub abbreviations: Vec<(String, String)>,
}

impl JournalCatalog {
    /// The built-in catalog, identified by ISSN.
    #[must_use]
    pub fn builtin() -> Self {
        let list = |tier, journals: &[(&str, &str)]| JournalList {
            tier,
            journals: journals
                .iter()
                .map(|(name, issn)| JournalEntry {
                    name: (*name).to_string(),
                    source_id: None,
                    issn: Some((*issn).to_string()),
                })
                .collect(),
        };

        Self {
            lists: vec![
                list(JournalTier::TopComposite, TOP_COMPOSITE),
                list(JournalTier::TopDisciplinary, TOP_DISCIPLINARY),
                list(JournalTier::QualityManagement, QUALITY_MANAGEMENT),
            ],
            abbreviations: ABBREVIATIONS
                .iter()
                .map(|(abbr, full)| ((*abbr).to_string(), (*full).to_string()))
                .collect(),
        }
    }

    /// Load a catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading journal catalog {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("parsing journal catalog {}", path.display()))
    }

    /// Journals of a tier.
    #[must_use]
    pub fn journals(&self, tier: JournalTier) -> Vec<&JournalEntry> {
        self.lists.iter().filter(|l| l.tier == tier).flat_map(|l| &l.journals).collect()
    }

    /// Whitelist for a tier. Source ids win when any journal of the tier has one;
    /// otherwise ISSNs are used. `None` when the tier has neither.
    #[must_use]
    pub fn whitelist(&self, tier: JournalTier) -> Option<SourceWhitelist> {
        let journals = self.journals(tier);

        let ids: Vec<String> = journals.iter().filter_map(|j| j.source_id.clone()).collect();
        if !ids.is_empty() {
            return Some(SourceWhitelist::ids(ids));
        }

        let issns: Vec<String> = journals.iter().filter_map(|j| j.issn.clone()).collect();
        (!issns.is_empty()).then(|| SourceWhitelist::issns(issns))
    }
}

/// Normalize a journal name for matching.
///
/// Lowercases, turns `&` into `and`, replaces punctuation with spaces, collapses
/// whitespace and strips a leading "the".
#[must_use]
pub fn normalize_journal(name: &str) -> String {
    let lowered = name.to_lowercase().replace('&', " and ");
    let cleaned: String = lowered
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");

    match collapsed.strip_prefix("the ") {
        Some(rest) => rest.to_string(),
        None if collapsed == "the" => String::new(),
        None => collapsed,
    }
}

fn substring_match(a: &str, b: &str) -> bool {
    let (shorter, longer) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    shorter.chars().count() >= MIN_SUBSTRING_LEN && longer.contains(shorter)
}

fn prefix_match(a: &str, b: &str) -> bool {
    let (shorter, longer) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    if shorter.is_empty() {
        return false;
    }
    longer == shorter || longer.strip_prefix(shorter).is_some_and(|rest| rest.starts_with(' '))
}

/// Maps journal names to tiers.
#[derive(Debug, Clone)]
pub struct JournalClassifier {
    /// Normalized names per classified tier, in priority order.
    tiers: Vec<(JournalTier, HashSet<String>)>,

    /// Normalized name -> normalized counterparts from the abbreviation table.
    abbreviations: HashMap<String, Vec<String>>,

    /// Source whitelists per curated tier, in priority order.
    whitelists: Vec<(JournalTier, SourceWhitelist)>,
}

impl JournalClassifier {
    /// Build a classifier from a catalog.
    #[must_use]
    pub fn new(catalog: &JournalCatalog) -> Self {
        let tiers = CLASSIFIED_TIERS
            .iter()
            .map(|&tier| {
                let names = catalog
                    .journals(tier)
                    .iter()
                    .map(|j| normalize_journal(&j.name))
                    .collect();
                (tier, names)
            })
            .collect();

        let mut abbreviations: HashMap<String, Vec<String>> = HashMap::new();
        for (abbr, full) in &catalog.abbreviations {
            let (abbr, full) = (normalize_journal(abbr), normalize_journal(full));
            abbreviations.entry(abbr.clone()).or_default().push(full.clone());
            abbreviations.entry(full).or_default().push(abbr);
        }

        let whitelists = JournalTier::CURATED
            .iter()
            .filter_map(|&tier| catalog.whitelist(tier).map(|list| (tier, list)))
            .collect();

        Self { tiers, abbreviations, whitelists }
    }

    /// Classifier over the built-in catalog.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(&JournalCatalog::builtin())
    }

    /// Tier for a journal name.
    #[must_use]
    pub fn classify(&self, name: Option<&str>) -> JournalTier {
        let Some(name) = name else {
            return JournalTier::Other;
        };
        let normalized = normalize_journal(name);
        if normalized.is_empty() {
            return JournalTier::Other;
        }

        if let Some(tier) = self.find(|names| names.contains(&normalized)) {
            return tier;
        }

        if let Some(variants) = self.abbreviations.get(&normalized) {
            if let Some(tier) = self.find(|names| variants.iter().any(|v| names.contains(v))) {
                return tier;
            }
        }

        if let Some(tier) =
            self.find(|names| names.iter().any(|n| substring_match(&normalized, n)))
        {
            return tier;
        }

        self.find(|names| names.iter().any(|n| prefix_match(&normalized, n)))
            .unwrap_or(JournalTier::Other)
    }

    /// Whitelists for curated tiers that have any, in priority order.
    #[must_use]
    pub fn whitelists(&self) -> &[(JournalTier, SourceWhitelist)] {
        &self.whitelists
    }

    fn find(&self, matches: impl Fn(&HashSet<String>) -> bool) -> Option<JournalTier> {
        self.tiers.iter().find(|(_, names)| matches(names)).map(|(tier, _)| *tier)
    }
}

impl Default for JournalClassifier {
    fn default() -> Self {
        Self::builtin()
    }
}
