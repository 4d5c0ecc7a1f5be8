use serde::{Deserialize, Deserializer, Serialize};

fn default_true() -> bool {
    true
}

/// Ids arrive as numbers for catalogue entries and as strings for user uploads
fn de_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Num(u64),
        Str(String),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Num(n) => n.to_string(),
        Id::Str(s) => s,
    })
}

fn de_opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrapper(#[serde(deserialize_with = "de_id")] String);

    Ok(Option::<Wrapper>::deserialize(deserializer)?.map(|Wrapper(id)| id))
}

/// Every API answer is wrapped into `{"result": ...}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub result: T,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub albums: Vec<Album>,
    #[serde(default)]
    pub artists: Vec<Artist>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_image: Option<String>,
    #[serde(default)]
    pub duration_ms: u64,
    #[serde(default = "default_true")]
    pub available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_warning: Option<String>,
}

impl Track {
    pub fn is_explicit(&self) -> bool {
        self.content_warning.as_deref() == Some("explicit")
    }

    /// Album the track is released on, if any
    pub fn primary_album(&self) -> Option<&Album> {
        self.albums.first()
    }

    pub fn artist_names(&self) -> String {
        join_artist_names(&self.artists)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_release_year: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_image: Option<String>,
    #[serde(default)]
    pub artists: Vec<Artist>,
    #[serde(default = "default_true")]
    pub available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_count: Option<u32>,
    /// Only filled by the `with-tracks` endpoint
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volumes: Vec<Vec<Track>>,
}

impl Album {
    /// Release year, preferring the original release over a re-release
    pub fn release_year(&self) -> Option<u32> {
        self.original_release_year.or(self.year)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cover {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artist {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<Cover>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_image: Option<String>,
}

impl Artist {
    pub fn cover_uri(&self) -> Option<&str> {
        self.cover
            .as_ref()
            .and_then(|c| c.uri.as_deref())
            .or(self.og_image.as_deref())
    }
}

pub fn join_artist_names(artists: &[Artist]) -> String {
    artists
        .iter()
        .map(|a| a.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistBriefInfo {
    pub artist: Artist,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pager {
    pub page: u32,
    pub per_page: u32,
    pub total: u32,
}

impl Pager {
    /// Whether pages after `page` can still hold tracks, judged by the
    /// requested page number rather than the one the server echoes back
    pub fn has_page_after(&self, page: u32) -> bool {
        (page + 1).saturating_mul(self.per_page.max(1)) < self.total
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistTracks {
    #[serde(default)]
    pub tracks: Vec<Track>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pager: Option<Pager>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Owner {
    #[serde(default, deserialize_with = "de_opt_id", skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    pub login: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackShort {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track: Option<Track>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    #[serde(deserialize_with = "de_id")]
    pub kind: String,
    pub title: String,
    pub owner: Owner,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playlist_uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<Cover>,
    #[serde(default = "default_true")]
    pub available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_count: Option<u32>,
    #[serde(default)]
    pub tracks: Vec<TrackShort>,
}

impl Playlist {
    pub fn cover_uri(&self) -> Option<&str> {
        self.og_image
            .as_deref()
            .or_else(|| self.cover.as_ref().and_then(|c| c.uri.as_deref()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchBlock<T> {
    #[serde(default)]
    pub total: u32,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracks: Option<SearchBlock<Track>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarTracks {
    pub track: Track,
    #[serde(default)]
    pub similar_tracks: Vec<Track>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceItem {
    pub track: Track,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationTracks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_id: Option<String>,
    #[serde(default)]
    pub sequence: Vec<SequenceItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadInfo {
    pub codec: String,
    pub bitrate_in_kbps: u32,
    pub download_info_url: String,
}

/// XML descriptor behind `DownloadInfo::download_info_url`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename = "download-info")]
pub struct DownloadInfoXml {
    pub host: String,
    pub path: String,
    pub ts: String,
    pub s: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_track_defaults_and_ids() {
        let track: Track = serde_json::from_value(json!({
            "id": 456,
            "title": "Song",
            "albums": [{"id": "123", "title": "Album", "genre": "rock", "year": 2020}],
            "artists": [{"id": 1, "name": "A"}, {"id": 2, "name": "B"}],
            "durationMs": 1000,
            "contentWarning": "explicit"
        }))
        .unwrap();

        assert_eq!(track.id, "456");
        assert!(track.available);
        assert!(track.is_explicit());
        assert_eq!(track.artist_names(), "A, B");
        let album = track.primary_album().unwrap();
        assert_eq!(album.id, "123");
        assert_eq!(album.release_year(), Some(2020));
    }

    #[test]
    fn test_playlist_owner_uid_number() {
        let playlist: Playlist = serde_json::from_value(json!({
            "kind": 3,
            "title": "Mix",
            "owner": {"uid": 42, "login": "user", "name": "User"},
            "available": false,
            "cover": {"uri": "avatars.yandex.net/a/%%"}
        }))
        .unwrap();

        assert_eq!(playlist.kind, "3");
        assert_eq!(playlist.owner.uid.as_deref(), Some("42"));
        assert!(!playlist.available);
        assert!(playlist.tracks.is_empty());
        assert_eq!(playlist.cover_uri(), Some("avatars.yandex.net/a/%%"));
    }

    #[test]
    fn test_pager() {
        let pager = Pager {
            page: 0,
            per_page: 20,
            total: 21,
        };
        assert!(pager.has_page_after(0));
        assert!(!pager.has_page_after(1));

        let empty_pages = Pager {
            page: 0,
            per_page: 0,
            total: 2,
        };
        assert!(empty_pages.has_page_after(0));
        assert!(!empty_pages.has_page_after(1));
    }

    #[test]
    fn test_download_info_xml() {
        let xml = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\
            <download-info><host>s1.storage.yandex.net</host>\
            <path>/rmusic/abc/def</path><ts>0005d</ts>\
            <region>-1</region><s>secret</s></download-info>";
        let info: DownloadInfoXml = quick_xml::de::from_str(xml).unwrap();
        assert_eq!(info.host, "s1.storage.yandex.net");
        assert_eq!(info.path, "/rmusic/abc/def");
        assert_eq!(info.ts, "0005d");
        assert_eq!(info.s, "secret");
    }
}
