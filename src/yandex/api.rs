use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, YandexConfig};
use crate::download::{build_http_client, download_json_with_headers, download_text_with_headers};
use crate::error::{Result, YandexError};
use crate::utils::get_md5;
use crate::yandex::types::{
    Album, ApiResponse, Artist, ArtistBriefInfo, ArtistTracks, DownloadInfo, DownloadInfoXml,
    Playlist, SearchResult, SimilarTracks, StationTracks, Track,
};

/// Salt the service mixes into signed mp3 links
const SIGN_SALT: &str = "XGRlBW9FXlekgbPrRHuSiA";

/// Read-only operations of the Yandex Music API the extractor relies on
#[async_trait]
pub trait MusicApi: Send + Sync {
    async fn track(&self, track_id: &str) -> Result<Track>;

    async fn album(&self, album_id: &str) -> Result<Album>;

    /// Album metadata with `volumes` filled
    async fn album_with_tracks(&self, album_id: &str) -> Result<Album>;

    async fn playlist(&self, user: &str, kind: &str) -> Result<Playlist>;

    async fn artist(&self, artist_id: &str) -> Result<Artist>;

    async fn artist_tracks(&self, artist_id: &str, page: u32, page_size: u32)
    -> Result<ArtistTracks>;

    async fn search_tracks(&self, text: &str) -> Result<Vec<Track>>;

    async fn similar_tracks(&self, track_id: &str) -> Result<SimilarTracks>;

    async fn station_tracks(&self, station: &str, queue: Option<&str>) -> Result<StationTracks>;

    /// Signed direct mp3 link for a track
    async fn download_url(&self, track_id: &str) -> Result<String>;
}

/// HTTP client for `api.music.yandex.net`
#[derive(Debug, Clone)]
pub struct YandexApi {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl YandexApi {
    /// Anonymous client, only public endpoints will answer
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: build_http_client(DEFAULT_TIMEOUT)?,
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
        })
    }

    pub fn from_config(config: &YandexConfig) -> Result<Self> {
        let mut api = Self::new()?;
        api.init(config)?;
        Ok(api)
    }

    /// Apply credentials and transport options
    pub fn init(&mut self, config: &YandexConfig) -> Result<()> {
        config.validate()?;
        self.client = build_http_client(config.timeout())?;
        self.base_url = config.base_url.trim_end_matches('/').to_string();
        self.token = Some(config.access_token.clone());
        Ok(())
    }

    pub fn is_authorized(&self) -> bool {
        self.token.is_some()
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &self.token {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("OAuth {}", token))?,
            );
        }
        Ok(headers)
    }

    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> Result<String> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|e| YandexError::InvalidUrl(format!("{}{}: {}", self.base_url, path, e)))?;
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }
        Ok(url.to_string())
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, params: &[(&str, &str)]) -> Result<T> {
        let url = self.endpoint(path, params)?;
        let response: ApiResponse<T> =
            download_json_with_headers(&self.client, &url, self.headers()?).await?;
        Ok(response.result)
    }
}

/// Pick the best mp3 variant, higher bitrate first
fn select_mp3(infos: Vec<DownloadInfo>) -> Option<DownloadInfo> {
    infos
        .into_iter()
        .filter(|i| i.codec == "mp3")
        .max_by_key(|i| i.bitrate_in_kbps)
}

/// Build the signed direct link described by a download-info document
pub fn build_direct_link(info: &DownloadInfoXml) -> String {
    let path = info.path.strip_prefix('/').unwrap_or(&info.path);
    let sign = get_md5(&format!("{}{}{}", SIGN_SALT, path, info.s));
    format!("https://{}/get-mp3/{}/{}{}", info.host, sign, info.ts, info.path)
}

#[async_trait]
impl MusicApi for YandexApi {
    async fn track(&self, track_id: &str) -> Result<Track> {
        let tracks: Vec<Track> = self
            .get(&format!("/tracks/{}", urlencoding::encode(track_id)), &[])
            .await?;
        tracks
            .into_iter()
            .next()
            .ok_or_else(|| YandexError::TrackNotFound(track_id.to_string()))
    }

    async fn album(&self, album_id: &str) -> Result<Album> {
        self.get(&format!("/albums/{}", urlencoding::encode(album_id)), &[])
            .await
    }

    async fn album_with_tracks(&self, album_id: &str) -> Result<Album> {
        self.get(
            &format!("/albums/{}/with-tracks", urlencoding::encode(album_id)),
            &[],
        )
        .await
    }

    async fn playlist(&self, user: &str, kind: &str) -> Result<Playlist> {
        self.get(
            &format!(
                "/users/{}/playlists/{}",
                urlencoding::encode(user),
                urlencoding::encode(kind)
            ),
            &[],
        )
        .await
    }

    async fn artist(&self, artist_id: &str) -> Result<Artist> {
        let info: ArtistBriefInfo = self
            .get(
                &format!("/artists/{}/brief-info", urlencoding::encode(artist_id)),
                &[],
            )
            .await?;
        Ok(info.artist)
    }

    async fn artist_tracks(
        &self,
        artist_id: &str,
        page: u32,
        page_size: u32,
    ) -> Result<ArtistTracks> {
        let page = page.to_string();
        let page_size = page_size.to_string();
        self.get(
            &format!("/artists/{}/tracks", urlencoding::encode(artist_id)),
            &[("page", page.as_str()), ("page-size", page_size.as_str())],
        )
        .await
    }

    async fn search_tracks(&self, text: &str) -> Result<Vec<Track>> {
        let result: SearchResult = self
            .get(
                "/search",
                &[
                    ("text", text),
                    ("type", "track"),
                    ("page", "0"),
                    ("nocorrect", "false"),
                ],
            )
            .await?;
        Ok(result.tracks.map(|block| block.results).unwrap_or_default())
    }

    async fn similar_tracks(&self, track_id: &str) -> Result<SimilarTracks> {
        self.get(
            &format!("/tracks/{}/similar", urlencoding::encode(track_id)),
            &[],
        )
        .await
    }

    async fn station_tracks(&self, station: &str, queue: Option<&str>) -> Result<StationTracks> {
        // station ids look like `genre:rock`, keep the separator readable
        let station = station
            .split(':')
            .map(|part| urlencoding::encode(part).into_owned())
            .collect::<Vec<_>>()
            .join(":");
        let path = format!("/rotor/station/{}/tracks", station);
        match queue {
            Some(queue) => {
                self.get(&path, &[("settings2", "true"), ("queue", queue)])
                    .await
            }
            None => self.get(&path, &[("settings2", "true")]).await,
        }
    }

    async fn download_url(&self, track_id: &str) -> Result<String> {
        let infos: Vec<DownloadInfo> = self
            .get(
                &format!("/tracks/{}/download-info", urlencoding::encode(track_id)),
                &[],
            )
            .await?;
        let info =
            select_mp3(infos).ok_or_else(|| YandexError::StreamNotFound(track_id.to_string()))?;

        let xml =
            download_text_with_headers(&self.client, &info.download_info_url, self.headers()?)
                .await?;
        let descriptor: DownloadInfoXml = quick_xml::de::from_str(&xml)?;
        Ok(build_direct_link(&descriptor))
    }
}
