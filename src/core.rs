use crate::error::Result;
use crate::utils::build_time_code;
use serde::{Deserialize, Serialize};
use serde_json::Value;
pub use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter};

/// Supported platforms
#[derive(
    EnumIter, Display, AsRefStr, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Copy,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    YandexMusic,
}

/// Whether a playlist is an album or a user/synthetic playlist
#[derive(Display, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Copy, Default)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PlaylistKind {
    Album,
    #[default]
    Playlist,
}

/// Request context handed over by the host together with a query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Context {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_by: Option<String>,
}

impl Context {
    pub fn requested_by(user: impl Into<String>) -> Self {
        Self {
            requested_by: Some(user.into()),
        }
    }
}

/// Canonical track representation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub title: String,
    pub author: String,
    pub url: String,
    pub duration: String,
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub description: String,
    pub source: Platform,
    pub raw: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_by: Option<String>,
}

impl Track {
    /// Create a new track instance
    pub fn new(title: String, url: String, source: Platform) -> Self {
        Self {
            title,
            author: String::new(),
            url,
            duration: build_time_code(0),
            duration_ms: 0,
            thumbnail: None,
            description: String::new(),
            source,
            raw: Value::Null,
            requested_by: None,
        }
    }

    pub fn with_author(mut self, author: String) -> Self {
        self.author = author;
        self
    }

    /// Set duration in milliseconds, the formatted time code follows
    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self.duration = build_time_code(duration_ms);
        self
    }

    pub fn with_thumbnail(mut self, thumbnail: Option<String>) -> Self {
        self.thumbnail = thumbnail;
        self
    }

    pub fn with_description(mut self, description: String) -> Self {
        self.description = description;
        self
    }

    pub fn with_raw(mut self, raw: Value) -> Self {
        self.raw = raw;
        self
    }

    pub fn with_requested_by(mut self, requested_by: Option<String>) -> Self {
        self.requested_by = requested_by;
        self
    }

    /// Query used to find the same track on another source
    pub fn bridge_query(&self) -> String {
        format!("{} by {}", self.title, self.author)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlaylistAuthor {
    pub name: String,
    pub url: String,
}

/// Canonical playlist representation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub title: String,
    pub author: PlaylistAuthor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub description: String,
    pub kind: PlaylistKind,
    pub url: String,
    pub tracks: Vec<Track>,
    pub source: Platform,
    pub raw: Value,
}

impl Playlist {
    /// Create a new, empty playlist
    pub fn new(id: String, title: String, author: PlaylistAuthor, source: Platform) -> Self {
        Self {
            id,
            title,
            author,
            thumbnail: None,
            description: String::new(),
            kind: PlaylistKind::default(),
            url: String::new(),
            tracks: Vec::new(),
            source,
            raw: Value::Null,
        }
    }

    pub fn with_kind(mut self, kind: PlaylistKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_thumbnail(mut self, thumbnail: Option<String>) -> Self {
        self.thumbnail = thumbnail;
        self
    }

    pub fn with_description(mut self, description: String) -> Self {
        self.description = description;
        self
    }

    pub fn with_url(mut self, url: String) -> Self {
        self.url = url;
        self
    }

    pub fn with_raw(mut self, raw: Value) -> Self {
        self.raw = raw;
        self
    }
}

/// Result of resolving a query: an optional playlist and the playable tracks
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractorInfo {
    pub playlist: Option<Playlist>,
    pub tracks: Vec<Track>,
}

impl ExtractorInfo {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn tracks(tracks: Vec<Track>) -> Self {
        Self {
            playlist: None,
            tracks,
        }
    }

    /// Wrap a playlist, exposing a copy of its tracks at the top level
    pub fn playlist(playlist: Playlist) -> Self {
        let tracks = playlist.tracks.clone();
        Self {
            playlist: Some(playlist),
            tracks,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.playlist.is_none() && self.tracks.is_empty()
    }
}

/// Source-resolution capability a playback host drives
#[async_trait::async_trait]
pub trait Extractor: Send + Sync {
    /// Check if the query is a URL this extractor understands
    fn validate(&self, query: &str) -> bool;

    /// Same as [`Extractor::validate`] for untyped host input; non-strings are never valid
    fn validate_value(&self, query: &Value) -> bool {
        query.as_str().is_some_and(|q| self.validate(q))
    }

    /// Resolve a URL or free-text query into tracks
    async fn handle(&self, query: &str, context: &Context) -> Result<ExtractorInfo>;

    /// Resolve a playable stream URL for a track produced by this extractor
    async fn stream(&self, track: &Track) -> Result<String>;

    /// Tracks related to the given one
    async fn related_tracks(&self, track: &Track) -> Result<ExtractorInfo>;

    /// Tracks of a radio station, optionally continuing after a queued track
    async fn radio_tracks(&self, station: &str, queue: Option<&str>) -> Result<ExtractorInfo>;

    /// Get platform identifier
    fn platform(&self) -> Platform;
}
