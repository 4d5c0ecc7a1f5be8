use crate::config::YandexConfig;
use crate::core::{
    Context, Extractor, ExtractorInfo, Platform, Playlist, PlaylistAuthor, PlaylistKind, Track,
};
use crate::error::Result;
use crate::utils::timestamp_millis;
use async_trait::async_trait;

pub mod api;
pub mod types;
pub mod utils;

// Re-export commonly used types and functions
pub use api::{MusicApi, YandexApi};
pub use utils::{
    Category, YandexQuery, classify, is_yandex_url, parse_track_id, parse_trailing_id,
};

use utils::{
    WEB_BASE_URL, build_artist_url, build_thumbnail_url, build_track_url, build_user_url,
};

/// Upper bound of tracks returned by [`Extractor::related_tracks`]
pub const RELATED_LIMIT: usize = 4;
const ARTIST_PAGE_SIZE: u32 = 100;
const EXTRACTOR_NAME: &str = "Yandex Music Extractor";

/// Author block of playlists the extractor makes up itself
fn extractor_author() -> PlaylistAuthor {
    PlaylistAuthor {
        name: EXTRACTOR_NAME.to_string(),
        url: env!("CARGO_PKG_REPOSITORY").to_string(),
    }
}

fn or_unknown<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "unknown".to_string(), |v| v.to_string())
}

/// Map a remote track into the canonical shape.
///
/// Returns `None` for tracks that cannot be played: unavailable ones and
/// ones without an album, whose deep link cannot be built.
fn build_track(
    track: &types::Track,
    album: Option<&types::Album>,
    url: Option<&str>,
    requested_by: Option<&str>,
) -> Result<Option<Track>> {
    if !track.available {
        log::debug!("Skipping unavailable track {}", track.id);
        return Ok(None);
    }

    let album = album.or_else(|| track.primary_album());
    let url = match (url, album) {
        (Some(url), _) => url.to_string(),
        (None, Some(album)) => build_track_url(&album.id, &track.id),
        (None, None) => {
            log::debug!("Skipping track {} without album", track.id);
            return Ok(None);
        }
    };

    let description = format!(
        "Genre: {}, Release year: {}, Explicit: {}",
        or_unknown(album.and_then(|a| a.genre.as_deref())),
        or_unknown(album.and_then(|a| a.release_year())),
        track.is_explicit()
    );
    let thumbnail = track
        .cover_uri
        .as_deref()
        .or(track.og_image.as_deref())
        .or_else(|| album.and_then(|a| a.cover_uri.as_deref()))
        .map(build_thumbnail_url);

    let canonical = Track::new(track.title.clone(), url, Platform::YandexMusic)
        .with_author(track.artist_names())
        .with_duration(track.duration_ms)
        .with_thumbnail(thumbnail)
        .with_description(description)
        .with_raw(serde_json::to_value(track)?)
        .with_requested_by(requested_by.map(str::to_string));
    Ok(Some(canonical))
}

fn build_tracks<'a>(
    tracks: impl IntoIterator<Item = &'a types::Track>,
    album: Option<&types::Album>,
    requested_by: Option<&str>,
) -> Result<Vec<Track>> {
    let mut v = vec![];
    for track in tracks {
        if let Some(track) = build_track(track, album, None, requested_by)? {
            v.push(track);
        }
    }
    Ok(v)
}

/// Yandex Music extractor implementing the Extractor trait
#[derive(Debug, Clone)]
pub struct YandexMusicExtractor<A = YandexApi> {
    api: A,
}

impl YandexMusicExtractor<YandexApi> {
    /// Extractor backed by an anonymous client, see [`Self::activate`]
    pub fn new() -> Result<Self> {
        Ok(Self::with_api(YandexApi::new()?))
    }

    /// Forward the host's options to the client; no options means nothing to do
    pub fn activate(&mut self, options: Option<&YandexConfig>) -> Result<()> {
        let Some(config) = options else {
            log::debug!("No options given, skipping activation");
            return Ok(());
        };
        self.api.init(config)?;
        log::info!("{} activated against {}", EXTRACTOR_NAME, config.base_url);
        Ok(())
    }
}

impl<A: MusicApi> YandexMusicExtractor<A> {
    pub fn with_api(api: A) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    async fn handle_track(
        &self,
        query: &str,
        track_id: &str,
        context: &Context,
    ) -> Result<ExtractorInfo> {
        let track = self.api.track(track_id).await?;
        let tracks = build_track(&track, None, Some(query), context.requested_by.as_deref())?
            .into_iter()
            .collect();
        Ok(ExtractorInfo::tracks(tracks))
    }

    async fn handle_album(
        &self,
        query: &str,
        album_id: &str,
        context: &Context,
    ) -> Result<ExtractorInfo> {
        let (album, with_tracks) = futures_util::try_join!(
            self.api.album(album_id),
            self.api.album_with_tracks(album_id)
        )?;

        let author = PlaylistAuthor {
            name: types::join_artist_names(&album.artists),
            url: album
                .artists
                .first()
                .map_or_else(|| WEB_BASE_URL.to_string(), |a| build_artist_url(&a.id)),
        };
        let mut playlist = Playlist::new(
            album.id.clone(),
            album.title.clone(),
            author,
            Platform::YandexMusic,
        )
        .with_kind(PlaylistKind::Album)
        .with_thumbnail(
            album
                .cover_uri
                .as_deref()
                .or(album.og_image.as_deref())
                .map(build_thumbnail_url),
        )
        .with_description(format!(
            "Genre: {}, Release year: {}",
            or_unknown(album.genre.as_deref()),
            or_unknown(album.release_year())
        ))
        .with_url(query.to_string())
        .with_raw(serde_json::to_value(&album)?);

        playlist.tracks = build_tracks(
            with_tracks.volumes.iter().flatten(),
            Some(&album),
            context.requested_by.as_deref(),
        )?;
        Ok(ExtractorInfo::playlist(playlist))
    }

    async fn handle_playlist(
        &self,
        query: &str,
        user: &str,
        kind: &str,
        context: &Context,
    ) -> Result<ExtractorInfo> {
        let data = self.api.playlist(user, kind).await?;
        if !data.available {
            log::debug!("Playlist {}/{} is unavailable", user, kind);
            return Ok(ExtractorInfo::empty());
        }

        let author = PlaylistAuthor {
            name: format!("{} ({})", data.owner.name, data.owner.login),
            url: build_user_url(&data.owner.login),
        };
        let id = data
            .playlist_uuid
            .clone()
            .unwrap_or_else(|| format!("{}:{}", data.owner.login, data.kind));
        let description = match (&data.created, &data.description) {
            (Some(created), _) => format!("Created: {}", created),
            (None, Some(description)) => description.clone(),
            (None, None) => String::new(),
        };
        let mut playlist = Playlist::new(id, data.title.clone(), author, Platform::YandexMusic)
            .with_thumbnail(data.cover_uri().map(build_thumbnail_url))
            .with_description(description)
            .with_url(query.to_string())
            .with_raw(serde_json::to_value(&data)?);

        playlist.tracks = build_tracks(
            data.tracks.iter().filter_map(|slot| slot.track.as_ref()),
            None,
            context.requested_by.as_deref(),
        )?;
        Ok(ExtractorInfo::playlist(playlist))
    }

    /// Every track of an artist, walking all pages
    async fn artist_all_tracks(&self, artist_id: &str) -> Result<Vec<types::Track>> {
        let mut tracks = vec![];
        let mut page = 0;
        loop {
            let batch = self
                .api
                .artist_tracks(artist_id, page, ARTIST_PAGE_SIZE)
                .await?;
            let exhausted = batch.tracks.is_empty();
            tracks.extend(batch.tracks);
            match batch.pager {
                Some(pager) if pager.has_page_after(page) && !exhausted => page += 1,
                _ => break,
            }
        }
        Ok(tracks)
    }

    async fn handle_artist(
        &self,
        query: &str,
        artist_id: &str,
        context: &Context,
    ) -> Result<ExtractorInfo> {
        let (artist, tracks) = futures_util::try_join!(
            self.api.artist(artist_id),
            self.artist_all_tracks(artist_id)
        )?;

        let author = PlaylistAuthor {
            name: artist.name.clone(),
            url: build_artist_url(&artist.id),
        };
        // the host caches playlists by id, a timestamp keeps repeated requests apart
        let id = format!("{}-{}", artist.id, timestamp_millis());
        let mut playlist = Playlist::new(
            id,
            format!("{} songs", artist.name),
            author,
            Platform::YandexMusic,
        )
        .with_thumbnail(artist.cover_uri().map(build_thumbnail_url))
        .with_description(format!("All songs by {}", artist.name))
        .with_url(query.to_string())
        .with_raw(serde_json::to_value(&artist)?);

        playlist.tracks = build_tracks(&tracks, None, context.requested_by.as_deref())?;
        Ok(ExtractorInfo::playlist(playlist))
    }

    async fn handle_search(&self, text: &str, context: &Context) -> Result<ExtractorInfo> {
        let results = self.api.search_tracks(text).await?;
        let Some(first) = results.first() else {
            log::debug!("Nothing found for {:?}", text);
            return Ok(ExtractorInfo::empty());
        };
        let tracks = build_track(first, None, None, context.requested_by.as_deref())?
            .into_iter()
            .collect();
        Ok(ExtractorInfo::tracks(tracks))
    }
}

#[async_trait]
impl<A: MusicApi> Extractor for YandexMusicExtractor<A> {
    fn validate(&self, query: &str) -> bool {
        is_yandex_url(query)
    }

    async fn handle(&self, query: &str, context: &Context) -> Result<ExtractorInfo> {
        let parsed = YandexQuery::parse(query);
        log::debug!("Resolving {} query: {}", parsed.category(), query);

        match parsed {
            YandexQuery::Track { track_id, .. } => {
                self.handle_track(query, &track_id, context).await
            }
            YandexQuery::Album { album_id } => self.handle_album(query, &album_id, context).await,
            YandexQuery::Playlist { user, kind } => {
                self.handle_playlist(query, &user, &kind, context).await
            }
            YandexQuery::Artist { artist_id } => {
                self.handle_artist(query, &artist_id, context).await
            }
            YandexQuery::Search(text) => self.handle_search(&text, context).await,
        }
    }

    async fn stream(&self, track: &Track) -> Result<String> {
        let track_id = parse_track_id(&track.url)?;
        self.api.download_url(&track_id).await
    }

    async fn related_tracks(&self, track: &Track) -> Result<ExtractorInfo> {
        let track_id = parse_track_id(&track.url)?;
        let similar = self.api.similar_tracks(&track_id).await?;

        // unplayable similar tracks count as no similar tracks at all
        let mut tracks = build_tracks(&similar.similar_tracks, None, None)?;
        if tracks.is_empty()
            && let Some(genre) = similar.track.primary_album().and_then(|a| a.genre.as_deref())
        {
            log::warn!(
                "No playable similar tracks for {}, falling back to genre:{} radio",
                track_id,
                genre
            );
            let station = format!("genre:{}", genre);
            let data = self.api.station_tracks(&station, None).await?;
            tracks = build_tracks(data.sequence.iter().map(|item| &item.track), None, None)?;
        }
        tracks.truncate(RELATED_LIMIT);

        let mut playlist = Playlist::new(
            format!("related-{}", track_id),
            "Related tracks".to_string(),
            extractor_author(),
            Platform::YandexMusic,
        )
        .with_description(format!("Tracks related to {}", track.bridge_query()))
        .with_url(track.url.clone());
        playlist.tracks = tracks;
        Ok(ExtractorInfo::playlist(playlist))
    }

    async fn radio_tracks(&self, station: &str, queue: Option<&str>) -> Result<ExtractorInfo> {
        let data = self.api.station_tracks(station, queue).await?;
        let id = data
            .batch_id
            .clone()
            .unwrap_or_else(|| format!("{}-{}", station, timestamp_millis()));

        let mut playlist = Playlist::new(
            id,
            format!("Radio: {}", station),
            extractor_author(),
            Platform::YandexMusic,
        )
        .with_description(format!("Tracks of the {} station", station));
        playlist.tracks = build_tracks(data.sequence.iter().map(|item| &item.track), None, None)?;
        Ok(ExtractorInfo::playlist(playlist))
    }

    fn platform(&self) -> Platform {
        Platform::YandexMusic
    }
}
