//! Scrobble-service entities (user, tracks, artists, albums)
//!
//! The proxy passes upstream payloads through verbatim; consumers turn them
//! into these types with the `parse_*` functions, which filter out entries
//! missing a name (or, for tracks and albums, an artist).

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::lenient::{self, non_empty};

/// Image shown when an entity has no usable artwork
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";

/// One artwork rendition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    /// Size label as reported upstream (`small`, `medium`, `large`, `extralarge`, ...)
    pub size: String,
    pub url: String,
}

/// Artwork renditions in upstream order (smallest first)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSet(pub Vec<Image>);

impl ImageSet {
    /// URL for `size`, falling back to the last (largest) rendition
    pub fn pick(&self, size: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|image| image.size == size)
            .or_else(|| self.0.last())
            .map(|image| image.url.as_str())
            .filter(|url| !url.is_empty())
    }

    /// Like [`ImageSet::pick`] but never empty
    pub fn url_or_placeholder(&self, size: &str) -> &str {
        self.pick(size).unwrap_or(PLACEHOLDER_IMAGE)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Scrobble-service account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub handle: String,
    pub real_name: Option<String>,
    pub scrobble_count: u64,
    pub country: Option<String>,
    pub registered_at: Option<DateTime<Utc>>,
    pub images: ImageSet,
    pub url: Option<String>,
}

impl UserInfo {
    /// Real name when set, handle otherwise
    pub fn display_name(&self) -> &str {
        self.real_name.as_deref().unwrap_or(&self.handle)
    }
}

/// A played (or top) track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub name: String,
    pub artist: String,
    pub album: Option<String>,
    pub images: ImageSet,
    pub played_at: Option<DateTime<Utc>>,
    pub now_playing: bool,
    pub play_count: Option<u64>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    pub name: String,
    pub play_count: u64,
    pub images: ImageSet,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
    pub name: String,
    pub artist: String,
    pub play_count: u64,
    pub images: ImageSet,
    pub url: Option<String>,
}

// ============================================================================
// Wire schemas
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireImage {
    #[serde(rename = "#text", deserialize_with = "lenient::opt_string")]
    text: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    size: Option<String>,
}

/// Artist/album reference: `{"#text": ..}` in recent tracks, `{"name": ..}` elsewhere
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireRef {
    #[serde(rename = "#text", deserialize_with = "lenient::opt_string")]
    text: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireDate {
    #[serde(deserialize_with = "lenient::opt_u64")]
    uts: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireRegistered {
    #[serde(deserialize_with = "lenient::opt_u64")]
    unixtime: Option<u64>,
    #[serde(rename = "#text", deserialize_with = "lenient::opt_u64")]
    text: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireTrackAttr {
    #[serde(deserialize_with = "lenient::opt_string")]
    nowplaying: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireUser {
    #[serde(deserialize_with = "lenient::opt_string")]
    name: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    realname: Option<String>,
    #[serde(deserialize_with = "lenient::opt_u64")]
    playcount: Option<u64>,
    #[serde(deserialize_with = "lenient::opt_string")]
    country: Option<String>,
    registered: Option<WireRegistered>,
    #[serde(deserialize_with = "lenient::vec_of")]
    image: Vec<WireImage>,
    #[serde(deserialize_with = "lenient::opt_string")]
    url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireTrack {
    #[serde(deserialize_with = "lenient::opt_string")]
    name: Option<String>,
    artist: Option<WireRef>,
    album: Option<WireRef>,
    #[serde(deserialize_with = "lenient::vec_of")]
    image: Vec<WireImage>,
    #[serde(deserialize_with = "lenient::opt_u64")]
    playcount: Option<u64>,
    date: Option<WireDate>,
    #[serde(deserialize_with = "lenient::opt_string")]
    url: Option<String>,
    #[serde(rename = "@attr")]
    attr: Option<WireTrackAttr>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireArtist {
    #[serde(deserialize_with = "lenient::opt_string")]
    name: Option<String>,
    #[serde(deserialize_with = "lenient::opt_u64")]
    playcount: Option<u64>,
    #[serde(deserialize_with = "lenient::vec_of")]
    image: Vec<WireImage>,
    #[serde(deserialize_with = "lenient::opt_string")]
    url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireAlbum {
    #[serde(deserialize_with = "lenient::opt_string")]
    name: Option<String>,
    artist: Option<WireRef>,
    #[serde(deserialize_with = "lenient::opt_u64")]
    playcount: Option<u64>,
    #[serde(deserialize_with = "lenient::vec_of")]
    image: Vec<WireImage>,
    #[serde(deserialize_with = "lenient::opt_string")]
    url: Option<String>,
}

impl WireRef {
    fn into_value(self) -> Option<String> {
        non_empty(self.text).or_else(|| non_empty(self.name))
    }
}

fn image_set(images: Vec<WireImage>) -> ImageSet {
    ImageSet(
        images
            .into_iter()
            .map(|image| Image {
                size: image.size.unwrap_or_default(),
                url: image.text.unwrap_or_default(),
            })
            .collect(),
    )
}

fn timestamp(secs: u64) -> Option<DateTime<Utc>> {
    i64::try_from(secs)
        .ok()
        .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
}

impl WireTrack {
    fn into_track(self) -> Option<Track> {
        let name = non_empty(self.name)?;
        let artist = self.artist.and_then(WireRef::into_value)?;
        Some(Track {
            name,
            artist,
            album: self.album.and_then(WireRef::into_value),
            images: image_set(self.image),
            played_at: self.date.and_then(|d| d.uts).and_then(timestamp),
            now_playing: self
                .attr
                .and_then(|attr| attr.nowplaying)
                .is_some_and(|flag| flag.eq_ignore_ascii_case("true")),
            play_count: self.playcount,
            url: non_empty(self.url),
        })
    }
}

/// Nested list at `payload[container][key]`
fn nested_list(payload: &Value, container: &str, key: &str) -> Value {
    payload
        .get(container)
        .and_then(|inner| inner.get(key))
        .cloned()
        .unwrap_or(Value::Null)
}

// ============================================================================
// Parsers
// ============================================================================

/// `user.getinfo` payload → account, if it carries a handle
pub fn parse_user_info(payload: &Value) -> Option<UserInfo> {
    let user = payload.get("user")?;
    let wire: WireUser = serde_json::from_value(user.clone()).ok()?;
    let handle = non_empty(wire.name)?;
    let registered = wire
        .registered
        .and_then(|r| r.unixtime.or(r.text))
        .and_then(timestamp);

    Some(UserInfo {
        handle,
        real_name: non_empty(wire.realname),
        scrobble_count: wire.playcount.unwrap_or(0),
        country: non_empty(wire.country).filter(|c| c != "None"),
        registered_at: registered,
        images: image_set(wire.image),
        url: non_empty(wire.url),
    })
}

/// `user.getrecenttracks` payload → tracks (a lone object counts as one track)
pub fn parse_recent_tracks(payload: &Value) -> Vec<Track> {
    parse_tracks(&nested_list(payload, "recenttracks", "track"))
}

/// `user.gettoptracks` payload → tracks
pub fn parse_top_tracks(payload: &Value) -> Vec<Track> {
    parse_tracks(&nested_list(payload, "toptracks", "track"))
}

fn parse_tracks(list: &Value) -> Vec<Track> {
    lenient::elements::<WireTrack>(list)
        .into_iter()
        .filter_map(WireTrack::into_track)
        .collect()
}

/// `user.gettopartists` payload → artists
pub fn parse_top_artists(payload: &Value) -> Vec<Artist> {
    lenient::elements::<WireArtist>(&nested_list(payload, "topartists", "artist"))
        .into_iter()
        .filter_map(|wire| {
            Some(Artist {
                name: non_empty(wire.name)?,
                play_count: wire.playcount.unwrap_or(0),
                images: image_set(wire.image),
                url: non_empty(wire.url),
            })
        })
        .collect()
}

/// `user.gettopalbums` payload → albums
pub fn parse_top_albums(payload: &Value) -> Vec<Album> {
    lenient::elements::<WireAlbum>(&nested_list(payload, "topalbums", "album"))
        .into_iter()
        .filter_map(|wire| {
            Some(Album {
                name: non_empty(wire.name)?,
                artist: wire.artist.and_then(WireRef::into_value)?,
                play_count: wire.playcount.unwrap_or(0),
                images: image_set(wire.image),
                url: non_empty(wire.url),
            })
        })
        .collect()
}

/// Compact count: `999`, `1.2K`, `3.4M`, `1.0B`
///
/// The value is rounded to one decimal before the unit is picked, so
/// `999_950` reads `1.0M` rather than `1000.0K`.
pub fn compact_count(count: u64) -> String {
    if count < 1_000 {
        return count.to_string();
    }

    let count = u128::from(count);
    let tenths = |scale: u128| (count * 10 + scale / 2) / scale;
    let shown = |tenths: u128, suffix: &str| format!("{}.{}{}", tenths / 10, tenths % 10, suffix);

    let mut scale = 1_000;
    for suffix in ["K", "M"] {
        let rounded = tenths(scale);
        if rounded < 10_000 {
            return shown(rounded, suffix);
        }
        scale *= 1_000;
    }
    shown(tenths(scale), "B")
}
