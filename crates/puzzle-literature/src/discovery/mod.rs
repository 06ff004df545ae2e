//! Literature discovery: journal classification, term generation, relevance
//! screening, and the tiered search that ties them together.

mod cache;
mod clock;
mod expansion;
mod journals;
mod orchestrator;
mod relevance;
mod selection;
mod session;
mod terms;

pub use cache::TtlCache;
pub use clock::{Clock, ManualClock, SystemClock};
pub use expansion::{QueryExpander, normalize_query};
pub use journals::{
    ABBREVIATIONS, JournalCatalog, JournalClassifier, JournalEntry, JournalList, MIN_SUBSTRING_LEN,
    normalize_journal,
};
pub use orchestrator::{LiteratureSearch, classic_threshold, pool_key};
pub use relevance::{RelevanceFilter, Strictness};
pub use selection::{Selection, SelectionParams, select_classics_and_recent};
pub use session::SearchSession;
pub use terms::{TermGenerator, TermKind};
