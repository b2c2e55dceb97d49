//! Resolution façade: the public entry point the host's image provider
//! calls. Combines strategy selection, the configured fetch source, and
//! the result cache. Every outcome is a structurally valid
//! [`SearchResult`]; errors never cross this boundary as panics.

use serde::Serialize;

use crate::cache::{CachePolicy, ResultCache};
use crate::cancel::CancelToken;
use crate::config::{ProviderConfig, SourceMode};
use crate::error::FetchError;
use crate::fetch::api::ApiSource;
#[cfg(feature = "headless")]
use crate::fetch::headless::ScrapeSource;
use crate::fetch::{PosterSource, SearchContext};
use crate::lookup::{self, ItemIdentity, LookupKey, LookupMode};
use crate::models::{RemoteImage, SearchResult};

/// External-id namespaces the host may hand us.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    Tmdb,
    Tvdb,
    Imdb,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderStatus {
    pub configured: bool,
    pub version: String,
}

pub struct PosterProvider {
    config: ProviderConfig,
    cache: ResultCache,
    source: Box<dyn PosterSource>,
}

impl PosterProvider {
    /// Builds a provider with the source selected by `config`. Fails only
    /// when the configuration asks for a backend this build lacks.
    pub fn new(config: ProviderConfig) -> anyhow::Result<Self> {
        let source: Box<dyn PosterSource> = match config.source {
            SourceMode::Api => Box::new(ApiSource::new(&config)),
            #[cfg(feature = "headless")]
            SourceMode::Scrape => Box::new(ScrapeSource::new(&config)),
            #[cfg(not(feature = "headless"))]
            SourceMode::Scrape => {
                anyhow::bail!("scrape source requires the `headless` feature")
            }
        };

        Ok(Self::with_source(config, source))
    }

    /// Wires an explicit source, bypassing config-based selection.
    pub fn with_source(config: ProviderConfig, source: Box<dyn PosterSource>) -> Self {
        Self {
            config,
            cache: ResultCache::new(),
            source,
        }
    }

    pub fn search_by_external_id(
        &self,
        kind: IdKind,
        id: &str,
        api_key: Option<&str>,
        cancel: &CancelToken,
    ) -> SearchResult {
        let id = id.trim().to_string();
        let key = match kind {
            IdKind::Tmdb => LookupKey::TmdbId(id),
            IdKind::Tvdb => LookupKey::TvdbId(id),
            IdKind::Imdb => LookupKey::ImdbId(id),
        };

        if self.source.lookup_mode() == LookupMode::TitleOnly {
            // the scrape site has no id endpoints; report it rather than
            // guess a title
            return SearchResult::failed(
                key.payload(),
                format!("{} does not support external id lookup", self.source.name()),
            );
        }

        let ctx = SearchContext {
            api_key,
            media_type: None,
        };
        self.resolve(key, ctx, cancel)
    }

    pub fn search_by_title(
        &self,
        title: &str,
        api_key: Option<&str>,
        cancel: &CancelToken,
    ) -> SearchResult {
        let ctx = SearchContext {
            api_key,
            media_type: None,
        };
        self.resolve(LookupKey::title(title), ctx, cancel)
    }

    /// Full provider flow for a host media item: the source's lookup mode
    /// picks the key (external id or title) and the item kind picks the
    /// scrape section.
    pub fn search_item(&self, item: &ItemIdentity, cancel: &CancelToken) -> SearchResult {
        let key = lookup::select(self.source.lookup_mode(), item);
        let ctx = SearchContext {
            api_key: None,
            media_type: Some(&item.media_type),
        };
        self.resolve(key, ctx, cancel)
    }

    fn resolve(
        &self,
        key: LookupKey,
        ctx: SearchContext<'_>,
        cancel: &CancelToken,
    ) -> SearchResult {
        if let Some(hit) = self.cache.get(&key) {
            log::debug!("cache hit for {key:?}");
            return hit;
        }

        let query = key.payload().to_string();
        let (result, cacheable) = match self.source.search(&key, &ctx, cancel) {
            Ok(candidates) => (SearchResult::ok(&query, candidates), true),
            Err(err) => {
                match &err {
                    FetchError::Parse(msg) => {
                        log::warn!("{}: parse failure for {query:?}: {msg}", self.source.name())
                    }
                    other => {
                        log::error!("{}: lookup failed for {query:?}: {other}", self.source.name())
                    }
                }
                // a cancelled call is the host's doing, not an answer for
                // the key; it must never occupy a cache slot
                let cacheable = !matches!(err, FetchError::Cancelled);
                (SearchResult::failed(&query, err.to_string()), cacheable)
            }
        };

        let store = cacheable
            && match self.source.cache_policy() {
                CachePolicy::Everything => true,
                CachePolicy::NonEmptySuccess => result.success && !result.results.is_empty(),
            };
        if store {
            self.cache.put(key, result.clone());
        }

        result
    }

    /// Whether this provider is enabled for a given host item kind.
    pub fn supports(&self, media_type: &str) -> bool {
        match media_type {
            "movie" => self.config.enable_for_movies,
            "show" | "series" | "episode" => self.config.enable_for_shows,
            "season" => self.config.enable_for_seasons,
            "collection" | "boxset" => self.config.enable_for_movies,
            _ => false,
        }
    }

    pub fn status(&self) -> ProviderStatus {
        ProviderStatus {
            configured: self.config.is_configured(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Projects a result into the host-facing image records. Failed
    /// results project to nothing; the host already got the structured
    /// failure from the search call.
    pub fn remote_images(&self, result: &SearchResult) -> Vec<RemoteImage> {
        if !result.success {
            return Vec::new();
        }
        result.results.iter().map(RemoteImage::from_candidate).collect()
    }
}
