use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Display name of the backing poster database, used as the default
/// uploader for scraped results and as the provider name on host-facing
/// image records.
pub const SOURCE_DISPLAY_NAME: &str = "ThePosterDB";

/// Aspect ratio assumed when a candidate carries no dimensions (2:3 poster).
const UNKNOWN_ASPECT_RATIO: f64 = 0.67;

/// Width/height ratio above which an image counts as a backdrop.
const BACKDROP_RATIO_THRESHOLD: f64 = 1.5;

/// One discovered poster/backdrop image, normalized across the JSON API
/// and the scrape path.
///
/// `width`/`height` are either both zero (unknown aspect) or both
/// positive. `full_url` is always non-empty for well-formed responses;
/// `thumbnail_url` may equal `full_url`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PosterCandidate {
    pub id: String,
    pub title: String,
    pub thumbnail_url: String,
    pub full_url: String,
    pub uploader: String,
    pub width: u32,
    pub height: u32,
    pub is_textless: bool,
    pub language: String,
    /// Absent for scraped results; the set page does not expose it.
    pub upload_date: Option<DateTime<Utc>>,
    pub likes: u32,
}

impl PosterCandidate {
    pub fn image_kind(&self) -> ImageKind {
        classify_dimensions(self.width, self.height)
    }
}

/// Basic type classification the host uses to slot an image; anything
/// wider than 3:2 is a backdrop, everything else a primary poster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageKind {
    Primary,
    Backdrop,
}

pub fn classify_dimensions(width: u32, height: u32) -> ImageKind {
    let ratio = if width > 0 && height > 0 {
        width as f64 / height as f64
    } else {
        UNKNOWN_ASPECT_RATIO
    };

    if ratio > BACKDROP_RATIO_THRESHOLD {
        ImageKind::Backdrop
    } else {
        ImageKind::Primary
    }
}

/// Outcome of one resolution attempt. Constructed through [`ok`] or
/// [`failed`] so the success/results/error_message invariants always hold;
/// immutable once returned and cached by value.
///
/// [`ok`]: SearchResult::ok
/// [`failed`]: SearchResult::failed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Insertion order equals source order; no ranking implied.
    pub results: Vec<PosterCandidate>,
    pub total_results: usize,
    /// The resolved lookup term, echoed for diagnostics.
    pub query: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl SearchResult {
    pub fn ok(query: impl Into<String>, results: Vec<PosterCandidate>) -> Self {
        Self {
            total_results: results.len(),
            results,
            query: query.into(),
            success: true,
            error_message: None,
        }
    }

    pub fn failed(query: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            results: Vec::new(),
            total_results: 0,
            query: query.into(),
            success: false,
            error_message: Some(message.into()),
        }
    }
}

/// Host-facing projection of a candidate: what the image provider hands
/// back for ranking and download. The host never receives raw payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteImage {
    pub provider_name: String,
    pub url: String,
    pub thumbnail_url: String,
    pub kind: ImageKind,
    pub width: u32,
    pub height: u32,
    pub language: String,
    pub community_rating: u32,
}

impl RemoteImage {
    pub fn from_candidate(candidate: &PosterCandidate) -> Self {
        Self {
            provider_name: SOURCE_DISPLAY_NAME.to_string(),
            url: candidate.full_url.clone(),
            thumbnail_url: candidate.thumbnail_url.clone(),
            kind: candidate.image_kind(),
            width: candidate.width,
            height: candidate.height,
            language: candidate.language.clone(),
            community_rating: candidate.likes,
        }
    }
}
