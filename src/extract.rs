//! Pure payload extraction: JSON envelopes from the structured API and
//! rendered HTML from the scrape path, both normalized into
//! [`PosterCandidate`] records. Extraction is per-field fallible — a
//! missing or mistyped field falls back to its default instead of failing
//! the whole payload. Only a body that is not JSON at all is a hard error.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::error::FetchError;
use crate::models::{PosterCandidate, SOURCE_DISPLAY_NAME};

/// Nominal dimensions for scraped posters; the set page does not expose
/// real sizes.
pub const SCRAPED_POSTER_WIDTH: u32 = 1000;
pub const SCRAPED_POSTER_HEIGHT: u32 = 1500;

static SET_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/set/(\d+)").expect("set id regex is valid"));

static TRAILING_YEAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\((\d{4})\)\s*$").expect("year regex is valid"));

/// Parses the API's JSON envelope: `{ "data": [ { .. }, .. ] }`.
///
/// A missing `data` key or a non-array value is "no results", not an
/// error. Only an unparseable body yields `FetchError::Parse`.
pub fn parse_api_payload(body: &str) -> Result<Vec<PosterCandidate>, FetchError> {
    let root: Value =
        serde_json::from_str(body).map_err(|err| FetchError::Parse(err.to_string()))?;

    let Some(items) = root.get("data").and_then(Value::as_array) else {
        return Ok(Vec::new());
    };

    Ok(items.iter().map(candidate_from_value).collect())
}

fn candidate_from_value(item: &Value) -> PosterCandidate {
    let full_url = string_field(item, "url");
    let thumbnail_url = match string_field(item, "thumbnail_url") {
        thumb if thumb.is_empty() => full_url.clone(),
        thumb => thumb,
    };

    let mut width = int_field(item, "width");
    let mut height = int_field(item, "height");
    // dimensions are all-or-nothing: a lone width says nothing about aspect
    if width == 0 || height == 0 {
        width = 0;
        height = 0;
    }

    let language = match string_field(item, "language") {
        lang if lang.is_empty() => "en".to_string(),
        lang => lang,
    };

    PosterCandidate {
        id: string_field(item, "id"),
        title: string_field(item, "title"),
        thumbnail_url,
        full_url,
        uploader: string_field(item, "uploader"),
        width,
        height,
        is_textless: flag_field(item, "textless"),
        language,
        upload_date: date_field(item, "upload_date"),
        likes: int_field(item, "likes"),
    }
}

fn string_field(item: &Value, name: &str) -> String {
    item.get(name)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn int_field(item: &Value, name: &str) -> u32 {
    item.get(name)
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(0)
}

/// The API is inconsistent about flags: `textless` arrives as boolean
/// `true` or as the integer `1`, both meaning set.
fn flag_field(item: &Value, name: &str) -> bool {
    match item.get(name) {
        Some(Value::Bool(flag)) => *flag,
        Some(value) => value.as_i64() == Some(1),
        None => false,
    }
}

fn date_field(item: &Value, name: &str) -> Option<DateTime<Utc>> {
    item.get(name)
        .and_then(Value::as_str)
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|date| date.with_timezone(&Utc))
}

/// Collects every distinct `/set/<digits>` fragment in the page,
/// preserving first-seen order. Runs over raw HTML because set links show
/// up in attributes and inline scripts alike.
pub fn extract_set_ids(html: &str) -> Vec<u64> {
    let mut ids = Vec::new();
    for caps in SET_ID_RE.captures_iter(html) {
        if let Ok(id) = caps[1].parse::<u64>() {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
    }
    ids
}

/// Parses a rendered set page into candidates.
///
/// The page carries three parallel sequences: poster ids in
/// `data-poster-id` attributes, display titles in a fixed text-node
/// pattern, and media-type labels in tooltip attributes. They are zipped
/// by position, bounded by the shorter of ids and titles; the type label
/// is auxiliary and defaults to `Movie` when its sequence runs short.
pub fn parse_set_page(html: &str, base_url: &str) -> Vec<PosterCandidate> {
    let document = scraper::Html::parse_document(html);
    let id_selector =
        scraper::Selector::parse("[data-poster-id]").expect("poster id selector is valid");
    let title_selector =
        scraper::Selector::parse("p.p-0.mb-1.text-break").expect("title selector is valid");
    let kind_selector = scraper::Selector::parse(r#"[data-toggle="tooltip"][title]"#)
        .expect("tooltip selector is valid");

    let ids: Vec<&str> = document
        .select(&id_selector)
        .filter_map(|el| el.attr("data-poster-id"))
        .filter(|v| !v.is_empty() && v.bytes().all(|b| b.is_ascii_digit()))
        .collect();

    let titles: Vec<&str> = document
        .select(&title_selector)
        .filter_map(|el| el.text().next())
        .map(str::trim)
        .collect();

    let kinds: Vec<&str> = document
        .select(&kind_selector)
        .filter_map(|el| el.attr("title"))
        .filter(|t| {
            ["Movie", "Show", "Collection"]
                .iter()
                .any(|kind| kind.eq_ignore_ascii_case(t))
        })
        .collect();

    let count = ids.len().min(titles.len());
    let mut results = Vec::with_capacity(count);

    for i in 0..count {
        let poster_id = ids[i];
        let kind = kinds.get(i).copied().unwrap_or("Movie");
        let (title, year) = split_title_year(titles[i]);
        log::debug!("poster {poster_id}: title={title:?} year={year:?} type={kind}");

        // high-res asset and thumbnail share the same by-id endpoint
        let asset_url = format!("{base_url}/api/assets/{poster_id}");

        results.push(PosterCandidate {
            id: poster_id.to_string(),
            title,
            thumbnail_url: asset_url.clone(),
            full_url: asset_url,
            uploader: SOURCE_DISPLAY_NAME.to_string(),
            width: SCRAPED_POSTER_WIDTH,
            height: SCRAPED_POSTER_HEIGHT,
            is_textless: false,
            language: "en".to_string(),
            upload_date: None,
            likes: 0,
        });
    }

    results
}

/// Splits a trailing `(YYYY)` parenthetical off a display title. The
/// parenthetical must be at the end; `"Se7en (1995) Extra"` stays whole.
pub fn split_title_year(input: &str) -> (String, Option<i32>) {
    if let Some(caps) = TRAILING_YEAR_RE.captures(input) {
        let year = caps[1].parse::<i32>().ok();
        if let Some(m) = caps.get(0) {
            let title = input[..m.start()].trim().to_string();
            return (title, year);
        }
    }

    (input.trim().to_string(), None)
}
