pub mod config;
pub mod core;
mod download;
pub mod error;
pub mod utils;
pub mod yandex;

pub use crate::config::YandexConfig;
pub use crate::core::{
    Context, Extractor, ExtractorInfo, Platform, Playlist, PlaylistAuthor, PlaylistKind, Track,
};
pub use crate::error::{Result, YandexError};
pub use crate::yandex::{
    Category, MusicApi, YandexApi, YandexMusicExtractor, YandexQuery, classify, parse_track_id,
};

