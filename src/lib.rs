//! Poster/backdrop artwork resolution for media-server plugins, backed by
//! ThePosterDB.
//!
//! The host asks for images for a media item; this crate picks a lookup
//! strategy (external id, title search, or an HTML-scrape fallback),
//! fetches through the configured backend, normalizes heterogeneous
//! payloads into [`SearchResult`]s, and caches them with a fixed TTL. The
//! façade ([`PosterProvider`]) never panics and never leaks an error past
//! its boundary: the host always receives a structurally valid result.

pub mod cache;
pub mod cancel;
pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod lookup;
pub mod models;
pub mod provider;


pub use cancel::CancelToken;
pub use config::{ProviderConfig, SourceMode};
pub use error::FetchError;
pub use lookup::{ItemIdentity, LookupKey, LookupMode};
pub use models::{ImageKind, PosterCandidate, RemoteImage, SearchResult};
pub use provider::{IdKind, PosterProvider, ProviderStatus};
