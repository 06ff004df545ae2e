//! Tiered literature search.
//!
//! Tier 1 searches the query, its expansion and synonyms and screens strictly.
//! Tier 2 adds context-abstracted terms, tier 3 adds foundational-theory terms at the
//! relaxed citation floor; both screen for recall. After each tier the whole pool is
//! re-screened and re-partitioned with that tier's classic threshold, and the search
//! stops as soon as both buckets are full.

use std::sync::Arc;

use futures::future::join_all;

use super::{
    Clock, JournalCatalog, JournalClassifier, QueryExpander, RelevanceFilter, SearchSession,
    Selection, SelectionParams, Strictness, SystemClock, TermGenerator, TtlCache, normalize_query,
    select_classics_and_recent,
};
use crate::client::{OpenAlexClient, WorksQuery};
use crate::config::{Config, search};
use crate::error::SearchResult;
use crate::llm::TextGenerator;
use crate::models::{JournalTier, LiteratureRequest, LiteratureResponse, Paper, SearchMetadata};

/// Pool retained between requests.
#[derive(Debug, Clone)]
struct CachedPool {
    papers: Vec<Paper>,
    total_found: usize,
    metadata: SearchMetadata,
}

/// Result of screening and partitioning the pool at a tier boundary.
#[derive(Debug)]
struct TierOutcome {
    screened: Vec<Paper>,
    selection: Selection,
    classic_threshold: u32,
}

/// Cache key for a query and optional subfield.
#[must_use]
pub fn pool_key(query: &str, subfield: Option<&str>) -> String {
    format!("{}|{}", normalize_query(query), subfield.map(normalize_query).unwrap_or_default())
}

/// Classic citation threshold for a search tier (1-based).
#[must_use]
pub fn classic_threshold(tier: u8) -> u32 {
    let index = usize::from(tier.clamp(1, 3)) - 1;
    search::CLASSIC_THRESHOLDS[index]
}

/// The literature query entry point.
pub struct LiteratureSearch {
    client: OpenAlexClient,
    classifier: Arc<JournalClassifier>,
    expander: QueryExpander,
    terms: TermGenerator,
    relevance: RelevanceFilter,
    pools: TtlCache<String, CachedPool>,
    clock: Arc<dyn Clock>,
    per_search_limit: usize,
    relevance_target: usize,
}

impl LiteratureSearch {
    /// Build from configuration with the wall clock.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built or the journal catalog file
    /// cannot be loaded.
    pub fn new(config: &Config, generator: Arc<dyn TextGenerator>) -> anyhow::Result<Self> {
        let catalog = match &config.journal_catalog {
            Some(path) => JournalCatalog::from_file(path)?,
            None => JournalCatalog::builtin(),
        };
        let client = OpenAlexClient::new(config)?;
        Ok(Self::with_components(
            config,
            client,
            generator,
            JournalClassifier::new(&catalog),
            Arc::new(SystemClock),
        ))
    }

    /// Build from explicit components.
    #[must_use]
    pub fn with_components(
        config: &Config,
        client: OpenAlexClient,
        generator: Arc<dyn TextGenerator>,
        classifier: JournalClassifier,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let expansions =
            TtlCache::new(config.expansion_ttl, config.cache_size_bound, clock.clone());
        let pools = TtlCache::new(config.pool_ttl, config.cache_size_bound, clock.clone());

        Self {
            client,
            classifier: Arc::new(classifier),
            expander: QueryExpander::new(generator.clone(), expansions),
            terms: TermGenerator::new(generator.clone()),
            relevance: RelevanceFilter::new(generator, config.relevance_sampling),
            pools,
            clock,
            per_search_limit: config.per_search_limit,
            relevance_target: config.relevance_target,
        }
    }

    /// Journal classifier in use.
    #[must_use]
    pub fn classifier(&self) -> &JournalClassifier {
        &self.classifier
    }

    /// Run a literature query.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty query or out-of-range limit. External
    /// failures never surface here; they shrink the result instead.
    pub async fn search(&self, request: &LiteratureRequest) -> SearchResult<LiteratureResponse> {
        request.validate()?;

        let query = request.query.trim();
        let subfield = request.subfield();
        let limit = request.effective_limit();
        let current_year = self.clock.current_year();
        let key = pool_key(query, subfield);

        if let Some(cached) = self.pools.get(&key).await {
            tracing::info!(query, "Serving literature from pool cache");
            let selection = select_classics_and_recent(
                &cached.papers,
                &SelectionParams::new(cached.metadata.classic_threshold, current_year),
            );
            return Ok(build_response(
                cached.papers,
                selection,
                cached.total_found,
                cached.metadata,
                true,
                limit,
            ));
        }

        tracing::info!(query, subfield, "Starting tiered literature search");
        let mut session = SearchSession::new();

        // Tier 1: the query as asked, its concrete expansion, and synonyms.
        let mut tier_terms = vec![query.to_string()];
        tier_terms.extend(self.expander.expand(query).await);
        let synonyms = self.terms.synonyms(query, subfield, &tier_terms).await;
        session.metadata.synonym_expansion_used = !synonyms.is_empty();
        tier_terms.extend(synonyms);

        self.search_terms(&mut session, &tier_terms, search::SEARCH_MIN_CITATIONS)
            .await;
        let outcome = self
            .evaluate(&session, query, subfield, Strictness::Strict, current_year)
            .await;
        if outcome.selection.is_satisfied(search::BUCKET_TARGET) {
            return Ok(self.finish(session, outcome, true, &key, limit).await);
        }

        // Tier 2: same constructs in other settings.
        session.enter_tier(2);
        let context = self
            .terms
            .context_abstracted(query, subfield, session.issued_terms())
            .await;
        let issued = self
            .search_terms(&mut session, &context, search::SEARCH_MIN_CITATIONS)
            .await;
        session.metadata.broadening_used |= issued > 0;

        let outcome = self
            .evaluate(&session, query, subfield, Strictness::Relaxed, current_year)
            .await;
        if outcome.selection.is_satisfied(search::BUCKET_TARGET) {
            return Ok(self.finish(session, outcome, true, &key, limit).await);
        }

        // Tier 3: underlying theory, searched at the relaxed citation floor.
        session.enter_tier(3);
        let theories = self
            .terms
            .foundational_theories(query, subfield, session.issued_terms())
            .await;
        let issued = self
            .search_terms(&mut session, &theories, search::RELAXED_MIN_CITATIONS)
            .await;
        session.metadata.broadening_used |= issued > 0;
        if issued == 0 {
            // The only term ever issued twice: the query itself, at the relaxed floor.
            session.reissue_term(query);
            self.search_issued(&mut session, query, search::RELAXED_MIN_CITATIONS)
                .await;
        }
        session.metadata.citation_threshold_relaxed = true;

        let outcome = self
            .evaluate(&session, query, subfield, Strictness::Relaxed, current_year)
            .await;
        let satisfied = outcome.selection.is_satisfied(search::BUCKET_TARGET);
        Ok(self.finish(session, outcome, satisfied, &key, limit).await)
    }

    /// Issue every not-yet-issued term. Returns how many were issued.
    async fn search_terms(
        &self,
        session: &mut SearchSession,
        terms: &[String],
        min_citations: u32,
    ) -> usize {
        let mut issued = 0;
        for term in terms {
            if session.claim_term(term) {
                self.search_issued(session, term, min_citations).await;
                issued += 1;
            }
        }
        issued
    }

    /// Search a term already recorded as issued and add what it finds to the pool.
    async fn search_issued(&self, session: &mut SearchSession, term: &str, min_citations: u32) {
        let mut added = 0;
        for (context, papers) in self.search_term(term.trim(), min_citations).await {
            added += session.add_papers(papers, context);
        }
        tracing::debug!(
            term,
            min_citations,
            added,
            pool = session.pool().len(),
            "Searched term"
        );
    }

    /// Search one term. With journal whitelists configured, one search per curated
    /// tier runs concurrently and the batches come back in tier-priority order.
    async fn search_term(
        &self,
        term: &str,
        min_citations: u32,
    ) -> Vec<(Option<JournalTier>, Vec<Paper>)> {
        let whitelists = self.classifier.whitelists();

        if whitelists.is_empty() {
            let query = WorksQuery::new(term, self.per_search_limit, min_citations);
            return vec![(None, self.client.search_papers(&query, &self.classifier).await)];
        }

        let searches = whitelists.iter().map(|(tier, sources)| async move {
            let query =
                WorksQuery::new(term, self.per_search_limit, min_citations).with_sources(sources);
            (Some(*tier), self.client.search_papers(&query, &self.classifier).await)
        });
        join_all(searches).await
    }

    /// Screen the whole pool and partition it with the current tier's threshold.
    async fn evaluate(
        &self,
        session: &SearchSession,
        query: &str,
        subfield: Option<&str>,
        strictness: Strictness,
        current_year: i32,
    ) -> TierOutcome {
        let classic_threshold = classic_threshold(session.tier());
        let screened = self
            .relevance
            .filter(
                session.pool(),
                query,
                subfield,
                strictness,
                self.relevance_target,
                current_year,
            )
            .await;
        let selection = select_classics_and_recent(
            &screened,
            &SelectionParams::new(classic_threshold, current_year),
        );

        tracing::info!(
            tier = session.tier(),
            pool = session.pool().len(),
            screened = screened.len(),
            classics = selection.classics.len(),
            recent = selection.recent.len(),
            "Evaluated search tier"
        );
        TierOutcome { screened, selection, classic_threshold }
    }

    async fn finish(
        &self,
        mut session: SearchSession,
        outcome: TierOutcome,
        satisfied: bool,
        key: &str,
        limit: usize,
    ) -> LiteratureResponse {
        let tier = session.tier();
        let total_found = session.pool().len();

        session.metadata.exact_match_found = satisfied && tier == 1;
        session.metadata.classic_threshold = outcome.classic_threshold;
        session.metadata.explanation = explain(tier, satisfied, &outcome.selection);

        tracing::info!(tier, satisfied, total_found, "Tiered literature search finished");

        if total_found > 0 {
            let cached = CachedPool {
                papers: outcome.screened.clone(),
                total_found,
                metadata: session.metadata.clone(),
            };
            self.pools.insert(key.to_string(), cached).await;
        }

        build_response(
            outcome.screened,
            outcome.selection,
            total_found,
            session.metadata,
            false,
            limit,
        )
    }
}

impl std::fmt::Debug for LiteratureSearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiteratureSearch")
            .field("client", &self.client)
            .field("expander", &self.expander)
            .field("relevance_target", &self.relevance_target)
            .finish()
    }
}

/// Human-readable account of how the search ended.
fn explain(tier: u8, satisfied: bool, selection: &Selection) -> String {
    let (classics, recent) = (selection.classics.len(), selection.recent.len());

    if satisfied {
        return match tier {
            1 => format!(
                "Found {classics} classic and {recent} recent papers matching your query directly."
            ),
            2 => format!(
                "Direct matches were limited, so the search broadened to related contexts and \
                 found {classics} classic and {recent} recent papers."
            ),
            _ => format!(
                "Found {classics} classic and {recent} recent papers by tracing the foundational \
                 theories behind your question."
            ),
        };
    }

    let total = selection.total();
    if total == 0 {
        "We couldn't find papers in quality journals matching this query. This may be a novel \
         research area worth pursuing."
            .to_string()
    } else if classics >= search::BUCKET_TARGET {
        format!(
            "Found foundational literature ({classics} classic papers) but only {recent} recent \
             papers; recent work on this topic appears sparse."
        )
    } else {
        format!(
            "This appears to be a niche area: found {total} quality papers after broadening the \
             search."
        )
    }
}

fn build_response(
    mut papers: Vec<Paper>,
    selection: Selection,
    total_found: usize,
    metadata: SearchMetadata,
    cached: bool,
    limit: usize,
) -> LiteratureResponse {
    papers.truncate(limit);
    let satisfied = selection.is_satisfied(search::BUCKET_TARGET);

    LiteratureResponse {
        papers,
        classics: selection.classics,
        recent: selection.recent,
        total_found,
        cached,
        analysis: (!satisfied).then(|| metadata.explanation.clone()),
        search_metadata: Some(metadata),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_key_normalizes() {
        assert_eq!(pool_key("  Team Dissolution ", Some(" OB ")), "team dissolution|ob");
        assert_eq!(pool_key("team dissolution", None), "team dissolution|");
    }

    #[test]
    fn test_thresholds_per_tier() {
        assert_eq!(classic_threshold(1), 500);
        assert_eq!(classic_threshold(2), 200);
        assert_eq!(classic_threshold(3), 100);
        assert_eq!(classic_threshold(0), 500);
        assert_eq!(classic_threshold(9), 100);
    }

    #[test]
    fn test_explanations() {
        let empty = Selection::default();
        assert!(explain(3, false, &empty).contains("novel research area"));

        let paper = Paper {
            id: "W1".into(),
            title: "t".into(),
            authors: vec![],
            year: 2010,
            r#abstract: None,
            url: None,
            citation_count: 150,
            is_cross_disciplinary: false,
            discipline: None,
            journal: String::new(),
            journal_tier: JournalTier::TopComposite,
            is_classic: true,
        };
        let niche = Selection { classics: vec![paper.clone()], recent: vec![paper.clone()] };
        assert!(explain(3, false, &niche).contains("niche area: found 2 quality papers"));

        let foundational = Selection { classics: vec![paper; 5], recent: vec![] };
        assert!(explain(3, false, &foundational).contains("foundational literature"));
    }
}
