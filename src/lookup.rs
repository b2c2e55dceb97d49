use serde::{Deserialize, Serialize};

/// Cache identity for one lookup. Two keys are equal iff they are the
/// same variant with the same normalized payload. Title normalization is
/// trim-only: title keys are case-sensitive by design, matching the
/// backing source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LookupKey {
    TmdbId(String),
    TvdbId(String),
    ImdbId(String),
    Title(String),
}

impl LookupKey {
    pub fn title(raw: &str) -> Self {
        LookupKey::Title(raw.trim().to_string())
    }

    /// The lookup term carried by this key, echoed into
    /// `SearchResult::query` for diagnostics.
    pub fn payload(&self) -> &str {
        match self {
            LookupKey::TmdbId(id) | LookupKey::TvdbId(id) | LookupKey::ImdbId(id) => id,
            LookupKey::Title(title) => title,
        }
    }

    /// API route segment for external-id keys; `None` for title keys.
    pub fn id_route(&self) -> Option<&'static str> {
        match self {
            LookupKey::TmdbId(_) => Some("tmdb"),
            LookupKey::TvdbId(_) => Some("tvdb"),
            LookupKey::ImdbId(_) => Some("imdb"),
            LookupKey::Title(_) => None,
        }
    }
}

/// How a source locates candidates: by external ids when available, or by
/// free-text title only (the scrape site has no id endpoints).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupMode {
    IdFirst,
    TitleOnly,
}

/// Everything the host knows about a media item when it asks for artwork.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemIdentity {
    pub name: String,
    pub year: Option<i32>,
    /// Host item kind ("movie", "show", ...). Only the literal "show"
    /// routes to the shows section; anything else falls back to movies.
    #[serde(default)]
    pub media_type: String,
    pub tmdb_id: Option<String>,
    pub tvdb_id: Option<String>,
    pub imdb_id: Option<String>,
}

/// Picks the cache key (and therefore the fetch strategy) for an item.
/// Total: an identity with no ids and an empty name still yields a title
/// key; the downstream fetch will legitimately return zero results.
pub fn select(mode: LookupMode, item: &ItemIdentity) -> LookupKey {
    if mode == LookupMode::IdFirst {
        if let Some(id) = non_empty(&item.tmdb_id) {
            return LookupKey::TmdbId(id.to_string());
        }
        if let Some(id) = non_empty(&item.tvdb_id) {
            return LookupKey::TvdbId(id.to_string());
        }
        if let Some(id) = non_empty(&item.imdb_id) {
            return LookupKey::ImdbId(id.to_string());
        }
    }

    LookupKey::title(&display_title(item))
}

fn non_empty(id: &Option<String>) -> Option<&str> {
    id.as_deref().filter(|s| !s.is_empty())
}

fn display_title(item: &ItemIdentity) -> String {
    match item.year {
        Some(year) => format!("{} ({year})", item.name),
        None => item.name.clone(),
    }
}

/// Search section for the scrape path. The source site only distinguishes
/// "show"; typos and every other kind silently resolve to movies, which is
/// the documented default rather than a bug.
pub fn section_for(media_type: &str) -> &'static str {
    if media_type == "show" {
        "shows"
    } else {
        "movies"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str) -> ItemIdentity {
        ItemIdentity {
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_id_first_prefers_tmdb() {
        let mut id = item("Inception");
        id.tmdb_id = Some("27205".into());
        id.tvdb_id = Some("81189".into());
        id.imdb_id = Some("tt1375666".into());

        assert_eq!(
            select(LookupMode::IdFirst, &id),
            LookupKey::TmdbId("27205".into())
        );
    }

    #[test]
    fn test_id_first_falls_through_to_imdb() {
        let mut id = item("Inception");
        id.tmdb_id = Some(String::new()); // empty id counts as absent
        id.imdb_id = Some("tt1375666".into());

        assert_eq!(
            select(LookupMode::IdFirst, &id),
            LookupKey::ImdbId("tt1375666".into())
        );
    }

    #[test]
    fn test_id_first_title_fallback_includes_year() {
        let mut id = item("Inception");
        id.year = Some(2010);

        assert_eq!(
            select(LookupMode::IdFirst, &id),
            LookupKey::Title("Inception (2010)".into())
        );
    }

    #[test]
    fn test_title_only_ignores_ids() {
        let mut id = item("Arrival");
        id.tmdb_id = Some("329865".into());

        assert_eq!(
            select(LookupMode::TitleOnly, &id),
            LookupKey::Title("Arrival".into())
        );
    }

    #[test]
    fn test_empty_identity_yields_empty_title_key() {
        assert_eq!(
            select(LookupMode::IdFirst, &ItemIdentity::default()),
            LookupKey::Title(String::new())
        );
    }

    #[test]
    fn test_title_keys_trim_but_keep_case() {
        assert_eq!(LookupKey::title("  Se7en "), LookupKey::Title("Se7en".into()));
        assert_ne!(LookupKey::title("se7en"), LookupKey::title("Se7en"));
    }

    #[test]
    fn test_section_fallback_to_movies() {
        assert_eq!(section_for("show"), "shows");
        assert_eq!(section_for("movie"), "movies");
        assert_eq!(section_for("shows"), "movies"); // only the exact literal matches
        assert_eq!(section_for(""), "movies");
    }
}
