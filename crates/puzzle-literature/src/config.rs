//! Configuration for the literature discovery service.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;

/// Bibliographic API configuration constants.
pub mod api {
    use std::time::Duration;

    /// Base URL for the OpenAlex API.
    pub const OPENALEX_API: &str = "https://api.openalex.org";

    /// Contact address sent as `mailto` for polite-pool access.
    pub const DEFAULT_MAILTO: &str = "literature@puzzle-lab.org";

    /// Per-call timeout. A slow source must not stall a whole tier.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

    /// Polite-pool request rate (requests per second).
    pub const REQUESTS_PER_SECOND: u32 = 10;

    /// Results requested per search call.
    pub const PER_SEARCH_LIMIT: usize = 25;

    /// Maximum keepalive connections.
    pub const MAX_KEEPALIVE: usize = 10;

    /// Keepalive expiry.
    pub const KEEPALIVE_EXPIRY: Duration = Duration::from_secs(30);
}

/// Text-generation provider constants.
pub mod llm {
    use std::time::Duration;

    /// Anthropic Messages API base URL.
    pub const ANTHROPIC_API: &str = "https://api.anthropic.com";

    /// OpenAI-compatible API base URL.
    pub const OPENAI_API: &str = "https://api.openai.com";

    /// Default Anthropic model.
    pub const ANTHROPIC_MODEL: &str = "claude-sonnet-4-5";

    /// Default OpenAI model.
    pub const OPENAI_MODEL: &str = "gpt-4o-mini";

    /// Anthropic API version header value.
    pub const ANTHROPIC_VERSION: &str = "2023-06-01";

    /// Generation timeout.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Output budget for term generation.
    pub const TERM_MAX_TOKENS: u32 = 300;

    /// Output budget for relevance filtering.
    pub const FILTER_MAX_TOKENS: u32 = 600;
}

/// Discovery algorithm constants.
pub mod search {
    use std::time::Duration;

    /// Papers per bucket in a classic/recent partition.
    pub const BUCKET_TARGET: usize = 5;

    /// Papers at most this many years old count as recent.
    pub const RECENT_WINDOW_YEARS: i32 = 5;

    /// Classic citation thresholds for search tiers 1, 2 and 3.
    pub const CLASSIC_THRESHOLDS: [u32; 3] = [500, 200, 100];

    /// Citation floor sent with searches in tiers 1 and 2.
    pub const SEARCH_MIN_CITATIONS: u32 = 10;

    /// Relaxed citation floor for the tier-3 pass.
    pub const RELAXED_MIN_CITATIONS: u32 = 1;

    /// Queries with at most this many words skip expansion.
    pub const CONCRETE_QUERY_WORDS: usize = 3;

    /// Most terms kept from any single generation step.
    pub const MAX_GENERATED_TERMS: usize = 5;

    /// Largest pool passed through without relevance filtering.
    pub const RELEVANCE_TARGET: usize = 40;

    /// Classic-eligible candidates sampled for relevance filtering.
    pub const RELEVANCE_CLASSIC_SAMPLE: usize = 30;

    /// Recent-eligible candidates sampled for relevance filtering.
    pub const RELEVANCE_RECENT_SAMPLE: usize = 20;

    /// Candidates sampled when the age split yields nothing.
    pub const RELEVANCE_FALLBACK_SAMPLE: usize = 50;

    /// Abstract characters sent per sampled candidate.
    pub const RELEVANCE_ABSTRACT_CHARS: usize = 250;

    /// Expanded query terms TTL (1 hour).
    pub const EXPANSION_TTL: Duration = Duration::from_secs(3600);

    /// Paper pool TTL (30 minutes).
    pub const POOL_TTL: Duration = Duration::from_secs(1800);

    /// Entry count above which stale cache entries are swept.
    pub const CACHE_SIZE_BOUND: u64 = 500;

    /// Default number of papers in a response.
    pub const DEFAULT_RESPONSE_LIMIT: usize = 20;

    /// Upper bound for a caller-supplied limit.
    pub const MAX_RESPONSE_LIMIT: usize = 100;
}

/// Supported text-generation backends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LlmProvider {
    /// Anthropic Messages API.
    #[default]
    Anthropic,
    /// OpenAI-compatible chat completions.
    OpenAi,
}

impl std::str::FromStr for LlmProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "anthropic" | "claude" => Ok(Self::Anthropic),
            "openai" | "open-ai" | "open_ai" => Ok(Self::OpenAi),
            other => anyhow::bail!("unknown LLM provider: {other}"),
        }
    }
}

/// Text-generation backend configuration.
#[derive(Clone)]
pub struct LlmConfig {
    /// Which backend to talk to.
    pub provider: LlmProvider,

    /// Provider API key.
    pub api_key: Option<String>,

    /// Model name.
    pub model: String,

    /// Provider base URL (for testing with mock servers).
    pub base_url: String,

    /// Per-call timeout.
    pub request_timeout: Duration,
}

impl LlmConfig {
    /// Defaults for the given provider.
    #[must_use]
    pub fn new(provider: LlmProvider, api_key: Option<String>) -> Self {
        let (base_url, model) = match provider {
            LlmProvider::Anthropic => (llm::ANTHROPIC_API, llm::ANTHROPIC_MODEL),
            LlmProvider::OpenAi => (llm::OPENAI_API, llm::OPENAI_MODEL),
        };
        Self {
            provider,
            api_key,
            model: model.to_string(),
            base_url: base_url.to_string(),
            request_timeout: llm::REQUEST_TIMEOUT,
        }
    }

    /// Check if an API key is configured.
    #[must_use]
    pub const fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("has_api_key", &self.has_api_key())
            .finish()
    }
}

/// Relevance-filter sampling parameters.
///
/// The cutoffs are heuristics carried over as tunables, not derived limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelevanceSampling {
    /// Classic-eligible candidates to sample.
    pub classic_sample: usize,

    /// Recent-eligible candidates to sample.
    pub recent_sample: usize,

    /// Candidates taken from the head of the pool when the age split is empty.
    pub fallback_sample: usize,

    /// Abstract characters per candidate.
    pub abstract_chars: usize,
}

impl Default for RelevanceSampling {
    fn default() -> Self {
        Self {
            classic_sample: search::RELEVANCE_CLASSIC_SAMPLE,
            recent_sample: search::RELEVANCE_RECENT_SAMPLE,
            fallback_sample: search::RELEVANCE_FALLBACK_SAMPLE,
            abstract_chars: search::RELEVANCE_ABSTRACT_CHARS,
        }
    }
}

/// Service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bibliographic API base URL (for testing with mock servers).
    pub openalex_api_url: String,

    /// Contact email for polite-pool access.
    pub mailto: String,

    /// Per-call request timeout.
    pub request_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Bibliographic requests per second (0 disables the limiter).
    pub requests_per_second: u32,

    /// Results requested per search call.
    pub per_search_limit: usize,

    /// Expanded query terms TTL.
    pub expansion_ttl: Duration,

    /// Paper pool TTL.
    pub pool_ttl: Duration,

    /// Entry count that triggers a stale-entry sweep.
    pub cache_size_bound: u64,

    /// Largest pool passed through without relevance filtering.
    pub relevance_target: usize,

    /// Relevance-filter sampling parameters.
    pub relevance_sampling: RelevanceSampling,

    /// Text-generation backend.
    pub llm: LlmConfig,

    /// Optional journal catalog file replacing the built-in lists.
    pub journal_catalog: Option<PathBuf>,
}

impl Config {
    /// Create a configuration with the given text-generation backend.
    #[must_use]
    pub fn new(llm: LlmConfig) -> Self {
        Self {
            openalex_api_url: api::OPENALEX_API.to_string(),
            mailto: api::DEFAULT_MAILTO.to_string(),
            request_timeout: api::REQUEST_TIMEOUT,
            connect_timeout: api::CONNECT_TIMEOUT,
            requests_per_second: api::REQUESTS_PER_SECOND,
            per_search_limit: api::PER_SEARCH_LIMIT,
            expansion_ttl: search::EXPANSION_TTL,
            pool_ttl: search::POOL_TTL,
            cache_size_bound: search::CACHE_SIZE_BOUND,
            relevance_target: search::RELEVANCE_TARGET,
            relevance_sampling: RelevanceSampling::default(),
            llm,
            journal_catalog: None,
        }
    }

    /// Create a test configuration pointing both APIs at a mock server.
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        let mut llm = LlmConfig::new(LlmProvider::Anthropic, Some("test-key".to_string()));
        llm.base_url = base_url.to_string();
        llm.request_timeout = Duration::from_secs(5);

        Self {
            openalex_api_url: base_url.to_string(),
            mailto: "test@example.org".to_string(),
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            requests_per_second: 0, // No limiter in tests
            ..Self::new(llm)
        }
    }

    /// Create configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns error if environment variables are invalid.
    pub fn from_env() -> anyhow::Result<Self> {
        let provider = match std::env::var("LLM_PROVIDER") {
            Ok(raw) => raw.parse()?,
            Err(_) => LlmProvider::default(),
        };
        let mut llm = LlmConfig::new(provider, std::env::var("LLM_API_KEY").ok());
        if let Ok(model) = std::env::var("LLM_MODEL") {
            llm.model = model;
        }
        if let Ok(base) = std::env::var("LLM_BASE_URL") {
            llm.base_url = validate_base_url(&base)?;
        }

        let mut config = Self::new(llm);
        if let Ok(base) = std::env::var("OPENALEX_BASE_URL") {
            config.openalex_api_url = validate_base_url(&base)?;
        }
        if let Ok(mailto) = std::env::var("OPENALEX_MAILTO") {
            config.mailto = mailto;
        }
        config.journal_catalog = std::env::var("JOURNAL_CATALOG").ok().map(PathBuf::from);

        Ok(config)
    }

    /// Check if the text-generation backend has an API key.
    #[must_use]
    pub const fn has_llm_key(&self) -> bool {
        self.llm.has_api_key()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(LlmConfig::new(LlmProvider::default(), None))
    }
}

/// Parse a base URL and return it without a trailing slash.
pub fn validate_base_url(raw: &str) -> anyhow::Result<String> {
    let parsed = url::Url::parse(raw.trim()).with_context(|| format!("invalid base URL: {raw}"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        anyhow::bail!("base URL must be http(s): {raw}");
    }
    Ok(parsed.as_str().trim_end_matches('/').to_string())
}
