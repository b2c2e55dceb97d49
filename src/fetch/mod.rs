pub mod api;
#[cfg(feature = "headless")]
pub mod headless;
pub mod session;

use crate::cache::CachePolicy;
use crate::cancel::CancelToken;
use crate::error::FetchError;
use crate::lookup::{LookupKey, LookupMode};
use crate::models::PosterCandidate;

/// Per-call inputs that are not part of the cache identity.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchContext<'a> {
    /// Overrides the configured API key for this call when present.
    pub api_key: Option<&'a str>,
    /// Host item kind, used by the scrape path to pick a search section.
    pub media_type: Option<&'a str>,
}

/// One way of locating candidates. Each source carries its own lookup-key
/// construction rule and its own cache-population policy; the two deployed
/// sources (JSON API, browser scrape) are deliberately not unified.
pub trait PosterSource: Send + Sync {
    fn name(&self) -> &'static str;

    fn lookup_mode(&self) -> LookupMode;

    fn cache_policy(&self) -> CachePolicy;

    /// Fetches and normalizes candidates for `key`. `Ok(vec![])` means
    /// "no match", which is an expected outcome, never an error.
    fn search(
        &self,
        key: &LookupKey,
        ctx: &SearchContext<'_>,
        cancel: &CancelToken,
    ) -> Result<Vec<PosterCandidate>, FetchError>;
}
