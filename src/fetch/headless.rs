//! Rendering backend: drives one long-lived headless browser and scrapes
//! the poster site's search and set pages. The browser session is created
//! lazily under [`SharedSession`]; individual pages are short-lived and
//! always closed, even on error or cancellation.

use std::ffi::OsStr;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::sleep;
use std::time::Duration;

use headless_chrome::{Browser, LaunchOptionsBuilder, Tab};
use url::Url;

use crate::cache::CachePolicy;
use crate::cancel::CancelToken;
use crate::config::ProviderConfig;
use crate::error::FetchError;
use crate::extract;
use crate::fetch::session::SharedSession;
use crate::fetch::{PosterSource, SearchContext};
use crate::lookup::{self, LookupKey, LookupMode};
use crate::models::PosterCandidate;

pub struct ScrapeSource {
    base_url: String,
    page_wait: Duration,
    settle_delay: Duration,
    session: SharedSession<Browser>,
}

/// Closes the tab when dropped so a page never leaks past its fetch,
/// whatever the exit path.
struct TabGuard {
    tab: Arc<Tab>,
}

impl Drop for TabGuard {
    fn drop(&mut self) {
        if let Err(err) = self.tab.close(true) {
            log::warn!("failed to close tab: {err}");
        }
    }
}

fn transport(err: anyhow::Error) -> FetchError {
    FetchError::Transport(err.to_string())
}

impl ScrapeSource {
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            base_url: config.scrape_base_url.trim_end_matches('/').to_string(),
            page_wait: Duration::from_secs(config.page_wait_secs),
            settle_delay: Duration::from_millis(config.settle_delay_ms),
            session: SharedSession::new(),
        }
    }

    fn browser(&self) -> Result<Arc<Browser>, FetchError> {
        self.session.get_or_init(|| {
            log::info!("launching headless browser");
            let options = LaunchOptionsBuilder::default()
                .sandbox(false)
                .path(std::env::var("CHROME_PATH").ok().map(PathBuf::from))
                .args(vec![OsStr::new("--disable-blink-features=AutomationControlled")])
                .build()
                .map_err(|err| anyhow::anyhow!("invalid launch options: {err}"))?;
            let browser = Browser::new(options)?;
            log::info!("headless browser ready");
            Ok(browser)
        })
    }

    /// Loads `url` in an isolated tab and returns the rendered HTML once
    /// scripts have settled. The tab is closed on every exit path.
    fn fetch_page(&self, url: &str, cancel: &CancelToken) -> Result<String, FetchError> {
        let browser = self.browser()?;
        cancel.check()?;

        let guard = TabGuard {
            tab: browser.new_tab().map_err(transport)?,
        };
        let tab = &guard.tab;
        tab.set_default_timeout(self.page_wait);

        tab.navigate_to(url).map_err(transport)?;
        tab.wait_until_navigated().map_err(transport)?;
        cancel.check()?;

        // the page is client-side rendered: wait for its scripts, then
        // give them a fixed moment to populate the DOM
        tab.wait_for_element_with_custom_timeout("script", self.page_wait)
            .map_err(|err| {
                FetchError::Transport(format!("{url}: no script content after page load: {err}"))
            })?;
        sleep(self.settle_delay);
        cancel.check()?;

        tab.get_content().map_err(transport)
    }
}

impl PosterSource for ScrapeSource {
    fn name(&self) -> &'static str {
        "theposterdb-scrape"
    }

    fn lookup_mode(&self) -> LookupMode {
        LookupMode::TitleOnly
    }

    fn cache_policy(&self) -> CachePolicy {
        CachePolicy::NonEmptySuccess
    }

    fn search(
        &self,
        key: &LookupKey,
        ctx: &SearchContext<'_>,
        cancel: &CancelToken,
    ) -> Result<Vec<PosterCandidate>, FetchError> {
        let term = key.payload();
        let section = lookup::section_for(ctx.media_type.unwrap_or_default());

        let mut search_url = Url::parse(&format!("{}/search", self.base_url))
            .map_err(|err| FetchError::Parse(format!("bad search url: {err}")))?;
        search_url
            .query_pairs_mut()
            .append_pair("term", term)
            .append_pair("section", section);

        log::info!("{}: searching {search_url}", self.name());
        let html = self.fetch_page(search_url.as_str(), cancel)?;

        let set_ids = extract::extract_set_ids(&html);
        let Some(first_set) = set_ids.first() else {
            // "no matching set" is an expected outcome, not a failure
            log::warn!("{}: no sets found for {term:?}", self.name());
            return Ok(Vec::new());
        };

        log::info!("{}: found set {first_set}, fetching posters", self.name());
        let set_html =
            self.fetch_page(&format!("{}/set/{first_set}", self.base_url), cancel)?;

        Ok(extract::parse_set_page(&set_html, &self.base_url))
    }
}
