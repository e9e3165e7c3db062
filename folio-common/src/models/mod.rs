//! Domain models
//!
//! Entities are plain value records rebuilt wholesale on every fetch. Wire
//! payloads from third-party services are parsed through lenient schemas
//! here so consumers always receive fully-defaulted shapes.

pub mod lenient;
pub mod repository;
pub mod scrobble;

pub use repository::{PinnedRepos, RepoSource, Repository};
pub use scrobble::{Album, Artist, Image, ImageSet, Track, UserInfo};
