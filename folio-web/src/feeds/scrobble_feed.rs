//! Scrobble feed: user info, recent tracks and monthly charts
//!
//! State machine: `Idle → Loading → Ready | Failed`. [`ScrobbleFeed::load`]
//! only starts from `Idle`; [`ScrobbleFeed::refetch`] resets and starts a new
//! run from any state. Each run holds a child of the feed's lifetime token
//! and a generation number; results of cancelled or superseded runs are
//! dropped.

use folio_common::models::scrobble::{
    parse_recent_tracks, parse_top_albums, parse_top_artists, parse_top_tracks, parse_user_info,
};
use folio_common::models::{Album, Artist, Track, UserInfo};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use super::{FeedError, ScrobbleSource};
use crate::services::{ScrobbleMethod, ScrobbleQuery};

/// Chart window used for the top lists
pub const CHART_PERIOD: &str = "1month";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedPhase {
    Idle,
    Loading,
    Ready,
    Failed,
}

/// Everything the music page shows, already parsed and defaulted
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScrobbleSnapshot {
    pub user: Option<UserInfo>,
    pub recent_tracks: Vec<Track>,
    pub top_artists: Vec<Artist>,
    pub top_albums: Vec<Album>,
    pub top_tracks: Vec<Track>,
    /// Optional sections that failed to load
    pub warnings: Vec<String>,
}

/// Consistent copy of the feed state
#[derive(Debug, Clone, Serialize)]
pub struct ScrobbleFeedView {
    pub phase: FeedPhase,
    pub error: Option<String>,
    pub snapshot: ScrobbleSnapshot,
}

impl ScrobbleFeedView {
    pub fn is_loading(&self) -> bool {
        self.phase == FeedPhase::Loading
    }
}

struct FeedState {
    phase: FeedPhase,
    error: Option<String>,
    snapshot: ScrobbleSnapshot,
    generation: u64,
    run: Option<CancellationToken>,
}

struct Run {
    generation: u64,
    token: CancellationToken,
}

pub struct ScrobbleFeed<S: ?Sized> {
    source: Arc<S>,
    username: Arc<str>,
    state: Arc<RwLock<FeedState>>,
    lifetime: CancellationToken,
}

impl<S: ?Sized> Clone for ScrobbleFeed<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            username: Arc::clone(&self.username),
            state: Arc::clone(&self.state),
            lifetime: self.lifetime.clone(),
        }
    }
}

impl<S: ScrobbleSource + ?Sized> ScrobbleFeed<S> {
    pub fn new(source: Arc<S>, username: &str) -> Self {
        Self::with_lifetime(source, username, &CancellationToken::new())
    }

    /// Feed that is closed when `parent` is cancelled
    pub fn with_lifetime(source: Arc<S>, username: &str, parent: &CancellationToken) -> Self {
        Self {
            source,
            username: Arc::from(username.trim()),
            state: Arc::new(RwLock::new(FeedState {
                phase: FeedPhase::Idle,
                error: None,
                snapshot: ScrobbleSnapshot::default(),
                generation: 0,
                run: None,
            })),
            lifetime: parent.child_token(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub async fn phase(&self) -> FeedPhase {
        self.state.read().await.phase
    }

    pub async fn is_loading(&self) -> bool {
        self.phase().await == FeedPhase::Loading
    }

    pub async fn error(&self) -> Option<String> {
        self.state.read().await.error.clone()
    }

    pub async fn snapshot(&self) -> ScrobbleSnapshot {
        self.state.read().await.snapshot.clone()
    }

    pub async fn view(&self) -> ScrobbleFeedView {
        let state = self.state.read().await;
        ScrobbleFeedView {
            phase: state.phase,
            error: state.error.clone(),
            snapshot: state.snapshot.clone(),
        }
    }

    /// Start the first load; a no-op unless the feed is `Idle`
    ///
    /// Returns the phase once this call is done with the feed. A call that
    /// finds a run in progress returns `Loading` without waiting.
    pub async fn load(&self) -> FeedPhase {
        let run = {
            let mut state = self.state.write().await;
            if state.phase != FeedPhase::Idle || !self.can_run() {
                return state.phase;
            }
            self.begin(&mut state)
        };
        self.execute(run).await
    }

    /// Discard current data and load again
    pub async fn refetch(&self) -> FeedPhase {
        let run = {
            let mut state = self.state.write().await;
            if !self.can_run() {
                return state.phase;
            }
            if let Some(previous) = state.run.take() {
                previous.cancel();
            }
            state.error = None;
            state.snapshot = ScrobbleSnapshot::default();
            self.begin(&mut state)
        };
        self.execute(run).await
    }

    /// Cancel any run in progress and refuse further loads
    pub fn close(&self) {
        self.lifetime.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.lifetime.is_cancelled()
    }

    fn can_run(&self) -> bool {
        !self.username.is_empty() && !self.lifetime.is_cancelled()
    }

    fn begin(&self, state: &mut FeedState) -> Run {
        state.generation += 1;
        state.phase = FeedPhase::Loading;
        let token = self.lifetime.child_token();
        state.run = Some(token.clone());
        tracing::debug!(username = %self.username, generation = state.generation, "Scrobble feed run started");
        Run {
            generation: state.generation,
            token,
        }
    }

    async fn execute(&self, run: Run) -> FeedPhase {
        let outcome = tokio::select! {
            biased;
            _ = run.token.cancelled() => None,
            result = fetch_all(self.source.as_ref(), &self.username) => Some(result),
        };

        let mut state = self.state.write().await;
        let result = match outcome {
            Some(result) if state.generation == run.generation && !run.token.is_cancelled() => result,
            _ if state.generation == run.generation => {
                // Closed mid-run: nothing will finish this load
                tracing::debug!(generation = run.generation, "Scrobble feed closed during a run");
                state.run = None;
                state.phase = FeedPhase::Idle;
                return state.phase;
            }
            _ => {
                tracing::debug!(generation = run.generation, "Discarding superseded scrobble feed run");
                return state.phase;
            }
        };

        state.run = None;
        match result {
            Ok(snapshot) => {
                state.snapshot = snapshot;
                state.phase = FeedPhase::Ready;
            }
            Err(message) => {
                state.error = Some(message);
                state.snapshot = ScrobbleSnapshot::default();
                state.phase = FeedPhase::Failed;
            }
        }
        state.phase
    }
}

/// User info first (required), then the four lists in parallel (optional)
async fn fetch_all<S: ScrobbleSource + ?Sized>(
    source: &S,
    username: &str,
) -> Result<ScrobbleSnapshot, String> {
    let info = source
        .scrobbles(username, &ScrobbleQuery::new(ScrobbleMethod::UserInfo))
        .await
        .map_err(|e| {
            tracing::error!(username = %username, error = %e, "Failed to fetch scrobble user info");
            e.to_string()
        })?;

    let recent_query = ScrobbleQuery::new(ScrobbleMethod::RecentTracks).limit(10);
    let artists_query = ScrobbleQuery::new(ScrobbleMethod::TopArtists)
        .period(CHART_PERIOD)
        .limit(8);
    let albums_query = ScrobbleQuery::new(ScrobbleMethod::TopAlbums)
        .period(CHART_PERIOD)
        .limit(6);
    let tracks_query = ScrobbleQuery::new(ScrobbleMethod::TopTracks)
        .period(CHART_PERIOD)
        .limit(10);

    let (recent, artists, albums, tracks) = tokio::join!(
        source.scrobbles(username, &recent_query),
        source.scrobbles(username, &artists_query),
        source.scrobbles(username, &albums_query),
        source.scrobbles(username, &tracks_query),
    );

    let mut warnings = Vec::new();
    let snapshot = ScrobbleSnapshot {
        user: parse_user_info(&info),
        recent_tracks: optional("recent tracks", recent, parse_recent_tracks, &mut warnings),
        top_artists: optional("top artists", artists, parse_top_artists, &mut warnings),
        top_albums: optional("top albums", albums, parse_top_albums, &mut warnings),
        top_tracks: optional("top tracks", tracks, parse_top_tracks, &mut warnings),
        warnings,
    };
    Ok(snapshot)
}

fn optional<T>(
    label: &str,
    result: Result<Value, FeedError>,
    parse: fn(&Value) -> Vec<T>,
    warnings: &mut Vec<String>,
) -> Vec<T> {
    match result {
        Ok(payload) => parse(&payload),
        Err(e) => {
            tracing::warn!(section = label, error = %e, "Optional scrobble section failed");
            warnings.push(format!("Failed to load {}: {}", label, e));
            Vec::new()
        }
    }
}
