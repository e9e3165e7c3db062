//! Repository feed over several usernames
//!
//! One call per username runs concurrently. Successful users land in the
//! data map; failures are summarized in a single message without dropping
//! the users that did load. Unlike [`super::ScrobbleFeed`], every `load`
//! after a finished run fetches the whole batch again. A `load` that
//! overlaps a run in flight waits for that run instead of starting another.

use folio_common::models::Repository;
use futures::future::join_all;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::{watch, RwLock};
use tokio_util::sync::CancellationToken;

use super::{FeedError, RepositorySource};

/// Repository tagged with the account it was fetched for
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRepo {
    pub username: String,
    pub repo: Repository,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RepoFeedView {
    pub loading: bool,
    pub error: Option<String>,
    pub data: BTreeMap<String, Vec<Repository>>,
}

impl RepoFeedView {
    pub fn ranked(&self) -> Vec<RankedRepo> {
        rank(&self.data)
    }
}

#[derive(Default)]
struct RepoState {
    loading: bool,
    error: Option<String>,
    data: BTreeMap<String, Vec<Repository>>,
}

pub struct RepoFeed<S: ?Sized> {
    source: Arc<S>,
    usernames: Arc<[String]>,
    state: Arc<RwLock<RepoState>>,
    /// `true` while a run is in flight
    running: Arc<watch::Sender<bool>>,
    lifetime: CancellationToken,
}

impl<S: ?Sized> Clone for RepoFeed<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            usernames: Arc::clone(&self.usernames),
            state: Arc::clone(&self.state),
            running: Arc::clone(&self.running),
            lifetime: self.lifetime.clone(),
        }
    }
}

/// Per-user failure text shown to visitors
fn failure_message(username: &str, error: &FeedError) -> String {
    match error {
        FeedError::NotFound(_) => format!("User {} not found", username),
        _ => format!("Failed to fetch data for {}", username),
    }
}

/// All repositories across users, highest [`Repository::score`] first
pub fn rank(data: &BTreeMap<String, Vec<Repository>>) -> Vec<RankedRepo> {
    let mut ranked: Vec<RankedRepo> = data
        .iter()
        .flat_map(|(username, repos)| {
            repos.iter().map(move |repo| RankedRepo {
                username: username.clone(),
                repo: repo.clone(),
            })
        })
        .collect();
    ranked.sort_by(|a, b| b.repo.score().total_cmp(&a.repo.score()));
    ranked
}

impl<S: RepositorySource + ?Sized> RepoFeed<S> {
    pub fn new(source: Arc<S>, usernames: Vec<String>) -> Self {
        Self::with_lifetime(source, usernames, &CancellationToken::new())
    }

    pub fn with_lifetime(source: Arc<S>, usernames: Vec<String>, parent: &CancellationToken) -> Self {
        let usernames: Vec<String> = usernames
            .into_iter()
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .collect();
        Self {
            source,
            usernames: Arc::from(usernames),
            state: Arc::new(RwLock::new(RepoState::default())),
            running: Arc::new(watch::Sender::new(false)),
            lifetime: parent.child_token(),
        }
    }

    pub fn usernames(&self) -> &[String] {
        &self.usernames
    }

    pub async fn view(&self) -> RepoFeedView {
        let state = self.state.read().await;
        RepoFeedView {
            loading: state.loading,
            error: state.error.clone(),
            data: state.data.clone(),
        }
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.loading
    }

    pub async fn error(&self) -> Option<String> {
        self.state.read().await.error.clone()
    }

    pub async fn data(&self) -> BTreeMap<String, Vec<Repository>> {
        self.state.read().await.data.clone()
    }

    pub async fn ranked(&self) -> Vec<RankedRepo> {
        rank(&self.state.read().await.data)
    }

    /// Fetch every username again, or wait for the run already in flight
    pub async fn load(&self) {
        if self.usernames.is_empty() || self.lifetime.is_cancelled() {
            return;
        }

        let joined = {
            let mut state = self.state.write().await;
            if state.loading {
                Some(self.running.subscribe())
            } else {
                state.loading = true;
                state.error = None;
                self.running.send_replace(true);
                None
            }
        };
        if let Some(running) = joined {
            self.wait_for_run(running).await;
            return;
        }

        let calls = self.usernames.iter().map(|username| {
            let source = Arc::clone(&self.source);
            async move {
                let result = source.pinned(username).await;
                (username.clone(), result)
            }
        });

        let results = tokio::select! {
            biased;
            _ = self.lifetime.cancelled() => None,
            results = join_all(calls) => Some(results),
        };

        let mut state = self.state.write().await;
        state.loading = false;
        self.running.send_replace(false);

        let Some(results) = results else {
            tracing::debug!("Repository feed closed during a run");
            return;
        };

        let mut data = BTreeMap::new();
        let mut failures = Vec::new();
        for (username, result) in results {
            match result {
                Ok(pinned) => {
                    data.insert(username, pinned.repos);
                }
                Err(e) => {
                    tracing::error!(username = %username, error = %e, "Failed to load repositories");
                    failures.push(format!("{}: {}", username, failure_message(&username, &e)));
                }
            }
        }

        state.data = data;
        state.error = if failures.is_empty() {
            None
        } else {
            Some(format!("Some users failed to load: {}", failures.join(", ")))
        };
    }

    /// Same as [`RepoFeed::load`]
    pub async fn refetch(&self) {
        self.load().await
    }

    /// Cancel any run in progress and refuse further loads
    pub fn close(&self) {
        self.lifetime.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.lifetime.is_cancelled()
    }

    async fn wait_for_run(&self, mut running: watch::Receiver<bool>) {
        loop {
            let in_flight = *running.borrow_and_update();
            if !in_flight {
                return;
            }
            tokio::select! {
                biased;
                _ = self.lifetime.cancelled() => return,
                changed = running.changed() => {
                    if changed.is_err() {
                        return;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo(name: &str, stars: u64, updated: &str) -> Repository {
        Repository {
            id: name.to_string(),
            name: name.to_string(),
            description: String::new(),
            url: format!("https://github.com/x/{}", name),
            homepage: None,
            language: None,
            stars,
            forks: 0,
            topics: Vec::new(),
            last_updated: updated.to_string(),
        }
    }

    #[test]
    fn test_rank_merges_users() {
        let mut data = BTreeMap::new();
        data.insert("a".to_string(), vec![repo("small", 1, "2024-01-01T00:00:00Z")]);
        data.insert(
            "b".to_string(),
            vec![
                repo("big", 10, "2024-01-01T00:00:00Z"),
                repo("mid", 1, "2024-06-01T00:00:00Z"),
            ],
        );

        let ranked = rank(&data);
        let names: Vec<_> = ranked.iter().map(|r| r.repo.name.as_str()).collect();
        assert_eq!(names, vec!["big", "mid", "small"]);
        assert_eq!(ranked[0].username, "b");
    }

    #[test]
    fn test_failure_messages() {
        assert_eq!(
            failure_message("ghost", &FeedError::NotFound("ghost".into())),
            "User ghost not found"
        );
        assert_eq!(
            failure_message("x", &FeedError::Status(500)),
            "Failed to fetch data for x"
        );
    }
}
