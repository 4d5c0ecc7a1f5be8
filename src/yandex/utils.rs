use crate::error::{Result, YandexError};
use regex::Regex;
use std::sync::LazyLock;
use strum_macros::Display;

pub const WEB_BASE_URL: &str = "https://music.yandex.ru";
const THUMBNAIL_SIZE: &str = "400x400";

/// What a query points at
#[derive(Display, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[strum(serialize_all = "lowercase")]
pub enum Category {
    Track,
    Album,
    Playlist,
    Artist,
    Search,
}

/// Ordered category table, the first match wins.
/// Track has to come before album since every track URL starts with an album URL.
static PATTERNS: LazyLock<Vec<(Category, Regex)>> = LazyLock::new(|| {
    [
        (
            Category::Track,
            r"^https://music\.yandex\.[A-Za-z]+/album/(?P<album>[0-9]+)/track/(?P<track>[0-9]+)",
        ),
        (
            Category::Album,
            r"^https://music\.yandex\.[A-Za-z]+/album/(?P<album>[0-9]+)",
        ),
        (
            Category::Playlist,
            r"^https://music\.yandex\.[A-Za-z]+/users/(?P<user>[A-Za-z0-9._-]+)/playlists/(?P<kind>[0-9]+)",
        ),
        (
            Category::Artist,
            r"^https://music\.yandex\.[A-Za-z]+/artist/(?P<artist>[0-9]+)",
        ),
    ]
    .into_iter()
    .map(|(category, pattern)| (category, Regex::new(pattern).expect("valid category pattern")))
    .collect()
});

static TRAILING_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+)/?$").expect("valid id pattern"));

/// A classified query together with the ids it carries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum YandexQuery {
    Track { album_id: String, track_id: String },
    Album { album_id: String },
    Playlist { user: String, kind: String },
    Artist { artist_id: String },
    Search(String),
}

impl YandexQuery {
    pub fn parse(query: &str) -> Self {
        for (category, pattern) in PATTERNS.iter() {
            let Some(caps) = pattern.captures(query) else {
                continue;
            };
            let get = |name: &str| caps[name].to_string();
            return match category {
                Category::Track => Self::Track {
                    album_id: get("album"),
                    track_id: get("track"),
                },
                Category::Album => Self::Album {
                    album_id: get("album"),
                },
                Category::Playlist => Self::Playlist {
                    user: get("user"),
                    kind: get("kind"),
                },
                Category::Artist => Self::Artist {
                    artist_id: get("artist"),
                },
                Category::Search => Self::Search(query.to_string()),
            };
        }
        Self::Search(query.to_string())
    }

    pub fn category(&self) -> Category {
        match self {
            Self::Track { .. } => Category::Track,
            Self::Album { .. } => Category::Album,
            Self::Playlist { .. } => Category::Playlist,
            Self::Artist { .. } => Category::Artist,
            Self::Search(_) => Category::Search,
        }
    }
}

/// Category of the first pattern matching the query, `Search` if none does
pub fn classify(query: &str) -> Category {
    PATTERNS
        .iter()
        .find(|(_, pattern)| pattern.is_match(query))
        .map(|(category, _)| *category)
        .unwrap_or(Category::Search)
}

/// Check if the query is a Yandex Music link of any known kind
pub fn is_yandex_url(query: &str) -> bool {
    PATTERNS.iter().any(|(_, pattern)| pattern.is_match(query))
}

/// Trailing numeric id of a URL, e.g. the track id of a track link
pub fn parse_trailing_id(url: &str) -> Result<String> {
    TRAILING_ID
        .captures(url)
        .map(|caps| caps[1].to_string())
        .ok_or_else(|| YandexError::InvalidUrl(format!("Cannot extract track id from: {}", url)))
}

/// Track id a canonical track URL points at.
///
/// Track links are read through the track pattern so a query string such as
/// `?utm_medium=copy_link` cannot leak into the id. Links of other known kinds
/// carry no track id; anything else falls back to its trailing number.
pub fn parse_track_id(url: &str) -> Result<String> {
    match YandexQuery::parse(url) {
        YandexQuery::Track { track_id, .. } => Ok(track_id),
        YandexQuery::Search(_) => parse_trailing_id(url),
        other => Err(YandexError::InvalidUrl(format!(
            "Not a track link ({}): {}",
            other.category(),
            url
        ))),
    }
}

pub fn build_track_url(album_id: &str, track_id: &str) -> String {
    format!("{}/album/{}/track/{}", WEB_BASE_URL, album_id, track_id)
}

pub fn build_artist_url(artist_id: &str) -> String {
    format!("{}/artist/{}", WEB_BASE_URL, artist_id)
}

pub fn build_user_url(login: &str) -> String {
    format!("{}/users/{}", WEB_BASE_URL, login)
}

/// Turn a cover reference like `avatars.yandex.net/get-music-content/x/%%` into a URL
pub fn build_thumbnail_url(cover_uri: &str) -> String {
    let uri = cover_uri.replace("%%", THUMBNAIL_SIZE);
    if uri.starts_with("http://") || uri.starts_with("https://") {
        uri
    } else {
        format!("https://{}", uri)
    }
}
