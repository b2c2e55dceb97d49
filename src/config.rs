use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE_URL: &str = "https://theposterdb.com/api";
pub const DEFAULT_SCRAPE_BASE_URL: &str = "https://theposterdb.com";

const DEFAULT_PRIORITY: u32 = 10;
const DEFAULT_PAGE_WAIT_SECS: u64 = 5;
const DEFAULT_SETTLE_DELAY_MS: u64 = 1000;

/// Which backend resolves lookups: the official JSON API, or a headless
/// browser scrape of the site when the API contract is unavailable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    #[default]
    Api,
    Scrape,
}

/// Plain immutable configuration handed to the provider at construction.
/// There is no ambient global; the host owns persistence.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Optional API key sent as `X-API-Key`; per-call keys override it.
    #[serde(default)]
    pub api_key: String,

    #[serde(default)]
    pub source: SourceMode,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    #[serde(default = "default_scrape_base_url")]
    pub scrape_base_url: String,

    #[serde(default = "default_true")]
    pub enable_for_movies: bool,

    #[serde(default = "default_true")]
    pub enable_for_shows: bool,

    #[serde(default = "default_true")]
    pub enable_for_seasons: bool,

    /// Provider ordering hint for the host (lower = earlier).
    #[serde(default = "default_priority")]
    pub priority: u32,

    /// Bounded wait for the page's script content, scrape path only.
    #[serde(default = "default_page_wait_secs")]
    pub page_wait_secs: u64,

    /// Fixed post-load delay that lets client-side rendering finish.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_scrape_base_url() -> String {
    DEFAULT_SCRAPE_BASE_URL.to_string()
}

fn default_true() -> bool {
    true
}

fn default_priority() -> u32 {
    DEFAULT_PRIORITY
}

fn default_page_wait_secs() -> u64 {
    DEFAULT_PAGE_WAIT_SECS
}

fn default_settle_delay_ms() -> u64 {
    DEFAULT_SETTLE_DELAY_MS
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            source: SourceMode::default(),
            api_base_url: default_api_base_url(),
            scrape_base_url: default_scrape_base_url(),
            enable_for_movies: true,
            enable_for_shows: true,
            enable_for_seasons: true,
            priority: DEFAULT_PRIORITY,
            page_wait_secs: DEFAULT_PAGE_WAIT_SECS,
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
        }
    }
}

impl ProviderConfig {
    /// Parses and validates a configuration document from the host.
    pub fn from_yaml(doc: &str) -> anyhow::Result<Self> {
        let config: Self = serde_yml::from_str(doc).context("provider config is malformed")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.api_base_url.trim().is_empty() {
            bail!("api_base_url must not be empty");
        }
        if self.scrape_base_url.trim().is_empty() {
            bail!("scrape_base_url must not be empty");
        }
        if self.page_wait_secs == 0 {
            bail!("page_wait_secs must be greater than 0");
        }
        Ok(())
    }

    /// The scrape source needs no key; the API works keyless with limits,
    /// so "configured" means a key is present or scraping is selected.
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty() || self.source == SourceMode::Scrape
    }
}
