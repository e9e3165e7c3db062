//! Music page: Last.fm profile, charts and curated playlists

use axum::{extract::State, response::Html};
use chrono::Datelike;
use folio_common::content::documents::{Playlist, MUSIC_INTRO, PLAYLISTS};
use folio_common::content::load_or_fallback;
use folio_common::human_time::played_label;
use folio_common::models::scrobble::compact_count;
use folio_common::models::{Album, Artist, Track, UserInfo};

use super::shell::{escape, layout, Chrome};
use crate::feeds::{FeedPhase, ScrobbleFeedView, ScrobbleSnapshot};
use crate::AppState;

/// Registration year shown when Last.fm does not report one
const DEFAULT_SINCE_YEAR: &str = "2023";
const RECENT_TRACKS_SHOWN: usize = 10;

fn user_card(user: Option<&UserInfo>) -> String {
    let (name, handle, count, since, avatar) = match user {
        Some(user) => (
            user.display_name().to_string(),
            user.handle.clone(),
            compact_count(user.scrobble_count),
            user.registered_at
                .map(|at| at.year().to_string())
                .unwrap_or_else(|| DEFAULT_SINCE_YEAR.to_string()),
            user.images.url_or_placeholder("large").to_string(),
        ),
        None => (
            "Music Lover".to_string(),
            "user".to_string(),
            "0".to_string(),
            DEFAULT_SINCE_YEAR.to_string(),
            folio_common::models::scrobble::PLACEHOLDER_IMAGE.to_string(),
        ),
    };

    format!(
        "<section class=\"user-card\"><img src=\"{avatar}\" alt=\"{name}\" class=\"avatar\">\
         <h2>{name}</h2><p class=\"handle\">@{handle}</p>\
         <p class=\"stats\"><span>{count} scrobbles</span> <span>Since {since}</span></p></section>",
        avatar = escape(&avatar),
        name = escape(&name),
        handle = escape(&handle),
        count = escape(&count),
        since = escape(&since),
    )
}

fn track_display(heading: &str, class: &str, track: &Track) -> String {
    format!(
        "<section class=\"{class}\"><h2>{heading}</h2>\
         <img src=\"{image}\" alt=\"{name}\"><h3>{name}</h3><p class=\"artist\">{artist}</p><p class=\"album\">{album}</p></section>",
        class = class,
        heading = heading,
        image = escape(track.images.url_or_placeholder("extralarge")),
        name = escape(&track.name),
        artist = escape(&track.artist),
        album = escape(track.album.as_deref().unwrap_or("")),
    )
}

fn now_playing(tracks: &[Track]) -> String {
    if let Some(track) = tracks.iter().find(|t| t.now_playing) {
        track_display("Now Playing", "now-playing", track)
    } else if let Some(track) = tracks.first() {
        track_display("Last Played", "recent-track", track)
    } else {
        "<section class=\"no-track\"><h2>Music Discovery</h2><p>Explore the charts below</p></section>"
            .to_string()
    }
}

fn albums_section(albums: &[Album]) -> String {
    if albums.is_empty() {
        return String::new();
    }
    let mut html = String::from("<section class=\"top-albums\"><h2>Top Albums This Month</h2><ol>");
    for album in albums {
        html.push_str(&format!(
            "<li><img src=\"{}\" alt=\"{}\"><h3>{}</h3><p>{}</p><p class=\"plays\">{} plays</p></li>",
            escape(album.images.url_or_placeholder("extralarge")),
            escape(&album.name),
            escape(&album.name),
            escape(&album.artist),
            album.play_count
        ));
    }
    html.push_str("</ol></section>");
    html
}

/// Entries after the first (which is shown as now playing / last played)
fn recent_section(tracks: &[Track]) -> String {
    let mut html = String::from("<section class=\"recent-tracks\"><h2>Recent Tracks</h2>");
    let rest: Vec<&Track> = tracks.iter().skip(1).take(RECENT_TRACKS_SHOWN).collect();
    if rest.is_empty() {
        html.push_str("<p class=\"empty\">No recent tracks found</p></section>");
        return html;
    }
    html.push_str("<ol>");
    for track in rest {
        html.push_str(&format!(
            "<li><img src=\"{}\" alt=\"{}\"><span class=\"name\">{}</span> \
             <span class=\"artist\">{}</span> <time>{}</time></li>",
            escape(track.images.url_or_placeholder("medium")),
            escape(&track.name),
            escape(&track.name),
            escape(&track.artist),
            escape(&played_label(track.played_at, track.now_playing))
        ));
    }
    html.push_str("</ol></section>");
    html
}

fn artists_section(artists: &[Artist]) -> String {
    if artists.is_empty() {
        return String::new();
    }
    let mut html = String::from("<section class=\"top-artists\"><h2>Top Artists</h2><ol>");
    for artist in artists {
        let name = escape(&artist.name);
        html.push_str(&format!(
            "<li data-artist=\"{name}\"><h3>{name}</h3><p class=\"plays\">{plays} plays</p></li>",
            name = name,
            plays = artist.play_count
        ));
    }
    html.push_str("</ol></section>");
    html
}

fn playlists_section(playlists: &[Playlist]) -> String {
    if playlists.is_empty() {
        return String::new();
    }
    let mut html = String::from("<section class=\"playlists\"><h2>Playlists</h2><div class=\"playlist-grid\">");
    for playlist in playlists {
        html.push_str(&format!(
            "<article class=\"playlist\" id=\"playlist-{id}\" style=\"--accent: {color}\">\
             <img src=\"{image}\" alt=\"{name}\"><h3>{name}</h3><p>{description}</p>\
             <p class=\"meta\">{tracks} tracks &middot; {duration}</p>\
             <a href=\"https://open.spotify.com/playlist/{spotify}\" rel=\"noopener\">Open in Spotify</a></article>",
            id = escape(&playlist.id),
            color = escape(&playlist.color),
            image = escape(&playlist.image),
            name = escape(&playlist.name),
            description = escape(&playlist.description),
            tracks = playlist.tracks,
            duration = escape(&playlist.duration),
            spotify = escape(&playlist.spotify_id),
        ));
    }
    html.push_str("</div></section>");
    html
}

fn has_data(snapshot: &ScrobbleSnapshot) -> bool {
    snapshot.user.is_some()
        || !snapshot.recent_tracks.is_empty()
        || !snapshot.top_artists.is_empty()
        || !snapshot.top_albums.is_empty()
        || !snapshot.top_tracks.is_empty()
}

/// Scrobble section for the current feed state
pub fn feed_section(view: &ScrobbleFeedView) -> String {
    match view.phase {
        FeedPhase::Loading => {
            return "<section class=\"lastfm-loading\"><p class=\"loading\">Loading music data...</p></section>"
                .to_string()
        }
        FeedPhase::Failed => {
            let error = view.error.as_deref().unwrap_or("Failed to load music data");
            return format!(
                "<section class=\"lastfm-error\"><h2>Unable to load music data</h2><p class=\"error\">{}</p>\
                 <a class=\"retry\" href=\"/music\">Try Again</a></section>",
                escape(error)
            );
        }
        FeedPhase::Idle | FeedPhase::Ready => {}
    }

    let snapshot = &view.snapshot;
    if !has_data(snapshot) {
        return "<section class=\"lastfm-empty\"><p>No music data yet.</p></section>".to_string();
    }

    let mut html = String::from("<div class=\"lastfm\">");
    html.push_str(&user_card(snapshot.user.as_ref()));
    html.push_str(&now_playing(&snapshot.recent_tracks));
    for warning in &snapshot.warnings {
        html.push_str(&format!("<p class=\"warning\">{}</p>", escape(warning)));
    }
    html.push_str(&albums_section(&snapshot.top_albums));
    html.push_str(&recent_section(&snapshot.recent_tracks));
    html.push_str(&artists_section(&snapshot.top_artists));
    html.push_str("</div>");
    html
}

/// GET /music
///
/// Each request mounts its own feed, so every page view reads current data.
pub async fn music_page(State(state): State<AppState>) -> Html<String> {
    let feed = state.scrobble_feed();
    let source = state.content.as_ref();

    let (chrome, intro, playlists, _) = tokio::join!(
        Chrome::load(&state),
        load_or_fallback(source, &MUSIC_INTRO),
        load_or_fallback(source, &PLAYLISTS),
        feed.load(),
    );
    let view = feed.view().await;
    feed.close();

    let mut body = format!(
        "<section class=\"music-hero\"><h1>{}</h1><p class=\"subtitle\">{}</p></section>",
        escape(&intro.title),
        escape(&intro.subtitle)
    );
    body.push_str(&feed_section(&view));
    body.push_str(&playlists_section(&playlists));

    layout(&chrome, &intro.title, "/music", &body)
}
