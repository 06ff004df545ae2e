//! Conceptual query -> concrete search phrases.

use std::sync::Arc;

use super::TtlCache;
use crate::config::{llm, search};
use crate::llm::{CompletionRequest, TextGenerator, clean_terms, parse_string_array};

const SYSTEM: &str = "You are a research librarian who turns conceptual research questions \
                      into concrete bibliographic search phrases. Respond with a JSON array of \
                      strings only.";

/// Normalize a query for cache keys and deduplication.
#[must_use]
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Memoized query expansion.
pub struct QueryExpander {
    generator: Arc<dyn TextGenerator>,
    cache: TtlCache<String, Vec<String>>,
}

impl QueryExpander {
    /// Create an expander with its own cache.
    #[must_use]
    pub fn new(generator: Arc<dyn TextGenerator>, cache: TtlCache<String, Vec<String>>) -> Self {
        Self { generator, cache }
    }

    /// Expand a query into 1-5 search phrases.
    ///
    /// Queries of up to three words are already concrete and come back unchanged.
    /// Anything the generator cannot turn into a non-empty JSON array falls back to
    /// the original query. Fallbacks are not memoized.
    pub async fn expand(&self, query: &str) -> Vec<String> {
        let query = query.trim();
        if query.split_whitespace().count() <= search::CONCRETE_QUERY_WORDS {
            return vec![query.to_string()];
        }

        let key = normalize_query(query);
        if let Some(terms) = self.cache.get(&key).await {
            tracing::debug!(query, "Query expansion cache hit");
            return terms;
        }

        match self.generate(query).await {
            Some(terms) => {
                self.cache.insert(key, terms.clone()).await;
                terms
            }
            None => vec![query.to_string()],
        }
    }

    async fn generate(&self, query: &str) -> Option<Vec<String>> {
        let prompt = format!(
            "Research query: \"{query}\"\n\n\
             Rewrite this as 3-5 targeted search phrases that would find empirical papers on \
             the same phenomenon in management, sociology, psychology or economics journals. \
             Each phrase should be 2-5 words of concrete terminology a paper title or abstract \
             would use.\n\nReturn ONLY a JSON array of strings."
        );
        let request = CompletionRequest::single(SYSTEM, prompt, llm::TERM_MAX_TOKENS);

        let raw = match self.generator.complete(request).await {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(query, error = %err, "Query expansion failed, using original query");
                return None;
            }
        };

        let terms = parse_string_array(&raw)
            .map(|terms| clean_terms(terms, search::MAX_GENERATED_TERMS))
            .filter(|terms| !terms.is_empty());
        if terms.is_none() {
            tracing::warn!(query, "Query expansion returned no usable JSON, using original query");
        }
        terms
    }
}

impl std::fmt::Debug for QueryExpander {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryExpander").field("generator", &self.generator.name()).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;
    use crate::discovery::ManualClock;
    use crate::error::{ClientError, ClientResult};

    struct Scripted {
        reply: Option<&'static str>,
        /// Calls that fail before `reply` is served.
        failures: usize,
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl TextGenerator for Scripted {
        fn name(&self) -> &'static str {
            "scripted"
        }

        async fn complete(&self, _request: CompletionRequest) -> ClientResult<String> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                return Err(ClientError::server(503, "overloaded"));
            }
            self.reply.map(str::to_string).ok_or_else(|| ClientError::provider("down"))
        }
    }

    fn expander(reply: Option<&'static str>) -> (Arc<Scripted>, Arc<ManualClock>, QueryExpander) {
        flaky_expander(reply, 0)
    }

    fn flaky_expander(
        reply: Option<&'static str>,
        failures: usize,
    ) -> (Arc<Scripted>, Arc<ManualClock>, QueryExpander) {
        let generator = Arc::new(Scripted { reply, failures, calls: AtomicUsize::new(0) });
        let clock = Arc::new(ManualClock::at_year(2026));
        let cache = TtlCache::new(Duration::from_secs(3600), 100, clock.clone());
        (generator.clone(), clock, QueryExpander::new(generator, cache))
    }

    #[tokio::test]
    async fn test_short_query_passes_through() {
        let (generator, _, expander) = expander(Some(r#"["x"]"#));
        assert_eq!(expander.expand("  team dissolution ").await, vec!["team dissolution"]);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_long_query_expands() {
        let (_, _, expander) =
            expander(Some(r#"["team dissolution", "group breakup", "team exit", "a", "b", "c"]"#));
        let terms = expander.expand("why do high performing project teams fall apart").await;
        assert_eq!(terms.len(), 5);
        assert_eq!(terms[0], "team dissolution");
    }

    #[tokio::test]
    async fn test_unparsable_falls_back() {
        let (_, _, expander) = expander(Some("I think you should search for teams."));
        let query = "why do high performing project teams fall apart";
        assert_eq!(expander.expand(query).await, vec![query]);
    }

    #[tokio::test]
    async fn test_empty_array_falls_back() {
        let (_, _, expander) = expander(Some("[]"));
        let query = "why do high performing project teams fall apart";
        assert_eq!(expander.expand(query).await, vec![query]);
    }

    #[tokio::test]
    async fn test_memoized_within_ttl() {
        let (generator, clock, expander) = expander(Some(r#"["a phrase"]"#));
        expander.expand("Why Do Teams Fall Apart").await;
        expander.expand("  why do teams fall apart ").await;
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);

        clock.advance(Duration::from_secs(3600));
        expander.expand("why do teams fall apart").await;
        assert_eq!(generator.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_fallback_is_not_memoized() {
        let (generator, _, expander) = flaky_expander(Some(r#"["a phrase"]"#), 1);
        let query = "why do high performing project teams fall apart";

        assert_eq!(expander.expand(query).await, vec![query]);
        assert_eq!(expander.expand(query).await, vec!["a phrase"]);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 2);

        // The recovered answer is cached.
        expander.expand(query).await;
        assert_eq!(generator.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_unparsable_answer_is_retried_next_call() {
        let (generator, _, expander) = expander(Some("no array here"));
        let query = "why do high performing project teams fall apart";
        expander.expand(query).await;
        expander.expand(query).await;
        assert_eq!(generator.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_provider_error_falls_back() {
        let (_, _, expander) = expander(None);
        let query = "why do high performing project teams fall apart";
        assert_eq!(expander.expand(query).await, vec![query]);
    }
}
