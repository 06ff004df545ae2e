//! Bibliographic source client (OpenAlex works API).
//!
//! Provides async HTTP client with:
//! - Connection pooling via reqwest
//! - Polite-pool pacing via governor
//! - Per-call timeouts of a few seconds
//!
//! Searches never raise: transport failures and non-2xx answers are logged and
//! come back as an empty list, so callers treat "no results" and "error" alike.

mod middleware;
mod normalize;

use std::sync::Arc;

use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};

pub use middleware::PoliteLimiter;
pub use normalize::{MAX_ABSTRACT_POSITIONS, reconstruct_abstract, work_to_paper};

use crate::config::{Config, api};
use crate::discovery::JournalClassifier;
use crate::error::{ClientError, ClientResult};
use crate::models::{Paper, Work, WorksResponse};

/// Which source identifier a whitelist holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKey {
    /// OpenAlex source id (`S123`).
    Id,
    /// Linking ISSN of the journal.
    Issn,
}

impl SourceKey {
    const fn filter_field(self) -> &'static str {
        match self {
            Self::Id => "primary_location.source.id",
            Self::Issn => "primary_location.source.issn",
        }
    }
}

/// Journals a search is restricted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceWhitelist {
    /// Identifier kind of `values`.
    pub key: SourceKey,

    /// Source identifiers.
    pub values: Vec<String>,
}

impl SourceWhitelist {
    /// Whitelist of OpenAlex source ids.
    #[must_use]
    pub fn ids(values: Vec<String>) -> Self {
        Self { key: SourceKey::Id, values }
    }

    /// Whitelist of ISSNs.
    #[must_use]
    pub fn issns(values: Vec<String>) -> Self {
        Self { key: SourceKey::Issn, values }
    }

    /// Filter clause, or `None` when no usable identifier remains.
    fn clause(&self) -> Option<String> {
        let values: Vec<&str> = self
            .values
            .iter()
            .map(|v| v.trim())
            .map(|v| match self.key {
                SourceKey::Id => v.rsplit('/').next().unwrap_or(v),
                SourceKey::Issn => v,
            })
            .filter(|v| !v.is_empty())
            .collect();

        (!values.is_empty()).then(|| format!("{}:{}", self.key.filter_field(), values.join("|")))
    }
}

/// Parameters of one works search.
#[derive(Debug, Clone, Copy)]
pub struct WorksQuery<'a> {
    /// Free-text search.
    pub search: &'a str,

    /// Maximum records to return.
    pub limit: usize,

    /// Restrict to these sources (journal whitelist).
    pub sources: Option<&'a SourceWhitelist>,

    /// Only works cited more than this many times.
    pub min_citations: u32,
}

impl<'a> WorksQuery<'a> {
    /// Unrestricted search with a citation floor.
    #[must_use]
    pub const fn new(search: &'a str, limit: usize, min_citations: u32) -> Self {
        Self { search, limit, sources: None, min_citations }
    }

    /// Restrict to a journal whitelist.
    #[must_use]
    pub const fn with_sources(mut self, sources: &'a SourceWhitelist) -> Self {
        self.sources = Some(sources);
        self
    }

    /// Compound filter expression for the works endpoint.
    #[must_use]
    pub fn filter(&self) -> String {
        let mut filter = format!("type:article,cited_by_count:>{}", self.min_citations);

        if let Some(clause) = self.sources.and_then(SourceWhitelist::clause) {
            filter.push(',');
            filter.push_str(&clause);
        }

        filter
    }
}

/// OpenAlex API client.
#[derive(Clone)]
pub struct OpenAlexClient {
    /// HTTP client with middleware.
    client: ClientWithMiddleware,

    /// Works endpoint URL.
    works_url: String,

    /// Polite-pool contact.
    mailto: String,

    /// Request pacer shared by clones.
    limiter: Arc<PoliteLimiter>,
}

impl OpenAlexClient {
    /// Create a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(format!(
                "puzzle-literature/{} (mailto:{})",
                env!("CARGO_PKG_VERSION"),
                config.mailto
            ))
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(api::MAX_KEEPALIVE)
            .pool_idle_timeout(api::KEEPALIVE_EXPIRY)
            .gzip(true)
            .build()?;

        // Single attempt per call: no retry middleware.
        let client = ClientBuilder::new(client).build();

        Ok(Self {
            client,
            works_url: format!("{}/works", config.openalex_api_url.trim_end_matches('/')),
            mailto: config.mailto.clone(),
            limiter: Arc::new(PoliteLimiter::new(config.requests_per_second)),
        })
    }

    /// Search works, returning an empty list on any failure.
    pub async fn search_works(&self, query: &WorksQuery<'_>) -> Vec<Work> {
        match self.try_search_works(query).await {
            Ok(response) => {
                let mut works = response.results;
                works.truncate(query.limit);
                tracing::debug!(
                    term = query.search,
                    total = response.meta.count,
                    returned = works.len(),
                    "Works search completed"
                );
                works
            }
            Err(err) => {
                tracing::warn!(
                    term = query.search,
                    error = %err,
                    "Works search failed, treating as empty"
                );
                Vec::new()
            }
        }
    }

    /// Search works and normalize them into papers.
    pub async fn search_papers(
        &self,
        query: &WorksQuery<'_>,
        classifier: &JournalClassifier,
    ) -> Vec<Paper> {
        self.search_works(query)
            .await
            .iter()
            .filter_map(|work| work_to_paper(work, classifier))
            .collect()
    }

    /// Search works, surfacing errors.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure, non-2xx status, or undecodable body.
    pub async fn try_search_works(&self, query: &WorksQuery<'_>) -> ClientResult<WorksResponse> {
        let params = vec![
            ("search".to_string(), query.search.to_string()),
            ("per_page".to_string(), query.limit.clamp(1, 200).to_string()),
            ("mailto".to_string(), self.mailto.clone()),
            ("filter".to_string(), query.filter()),
            ("sort".to_string(), "relevance_score:desc".to_string()),
        ];

        self.limiter.until_ready().await;

        let response = self.client.get(&self.works_url).query(&params).send().await?;
        let response = handle_response(response).await?;
        let value: serde_json::Value = response.json().await?;

        serde_json::from_value(value).map_err(ClientError::from)
    }
}

/// Map API status codes to errors.
pub(crate) async fn handle_response(
    response: reqwest::Response,
) -> ClientResult<reqwest::Response> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    match status.as_u16() {
        429 => {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(60);

            Err(ClientError::rate_limited(retry_after))
        }
        500..=599 => {
            let text = response.text().await.unwrap_or_default();
            Err(ClientError::server(status.as_u16(), text))
        }
        _ => {
            let text = response.text().await.unwrap_or_default();
            Err(ClientError::UnexpectedStatus { status: status.as_u16(), message: text })
        }
    }
}

impl std::fmt::Debug for OpenAlexClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAlexClient")
            .field("works_url", &self.works_url)
            .field("paced", &self.limiter.is_enabled())
            .finish()
    }
}
