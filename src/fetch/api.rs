//! Structured-API backend: authenticated GETs against the poster
//! database's fixed-path REST endpoints, JSON envelope parsing via
//! [`crate::extract`].

use std::time::Duration;

use crate::cache::CachePolicy;
use crate::cancel::CancelToken;
use crate::config::ProviderConfig;
use crate::error::FetchError;
use crate::extract;
use crate::fetch::{PosterSource, SearchContext};
use crate::lookup::{LookupKey, LookupMode};
use crate::models::PosterCandidate;

const USER_AGENT_DEFAULT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:124.0) Gecko/20100101 Firefox/124.0";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct ApiSource {
    base_url: String,
    api_key: String,
}

impl ApiSource {
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    fn key_for_call<'a>(&'a self, ctx: &SearchContext<'a>) -> Option<&'a str> {
        ctx.api_key
            .or(Some(self.api_key.as_str()))
            .filter(|key| !key.is_empty())
    }
}

impl PosterSource for ApiSource {
    fn name(&self) -> &'static str {
        "theposterdb-api"
    }

    fn lookup_mode(&self) -> LookupMode {
        LookupMode::IdFirst
    }

    fn cache_policy(&self) -> CachePolicy {
        CachePolicy::Everything
    }

    fn search(
        &self,
        key: &LookupKey,
        ctx: &SearchContext<'_>,
        cancel: &CancelToken,
    ) -> Result<Vec<PosterCandidate>, FetchError> {
        cancel.check()?;

        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT_DEFAULT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        let mut request = match key.id_route() {
            Some(route) => {
                client.get(format!("{}/posters/{route}/{}", self.base_url, key.payload()))
            }
            None => client
                .get(format!("{}/search", self.base_url))
                .query(&[("query", key.payload())]),
        };

        if let Some(api_key) = self.key_for_call(ctx) {
            request = request.header("X-API-Key", api_key);
        }

        log::debug!("{}: requesting {key:?}", self.name());
        let response = request.send()?;
        cancel.check()?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("{}: status {status} for {key:?}", self.name());
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        let body = response.text()?;
        extract::parse_api_payload(&body)
    }
}
