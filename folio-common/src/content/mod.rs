//! Static content store
//!
//! Page copy lives in JSON documents under `<content_dir>/data/`. Every
//! consumer goes through [`load_or_fallback`]: fetch a named document,
//! extract one nested field, and on any failure log it and return the
//! hardcoded fallback baked into the [`Resource`]. Loading never fails.

pub mod documents;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

use crate::{Error, Result};

/// Where content documents come from
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Raw bytes of the document named `file` (e.g. `"contact.json"`)
    async fn fetch(&self, file: &str) -> Result<Vec<u8>>;
}

/// Content documents read from a directory on disk
#[derive(Debug, Clone)]
pub struct DirContentSource {
    root: PathBuf,
}

impl DirContentSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Only plain relative names are accepted; no `..`, no absolute paths
fn validate_file_name(file: &str) -> Result<()> {
    let path = Path::new(file);
    let plain = !file.is_empty()
        && path
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
    if plain {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!("Invalid content file name: {:?}", file)))
    }
}

#[async_trait]
impl ContentSource for DirContentSource {
    async fn fetch(&self, file: &str) -> Result<Vec<u8>> {
        validate_file_name(file)?;
        let path = self.root.join(file);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Error::NotFound(path.display().to_string()))
            }
            Err(e) => Err(Error::Io(e)),
        }
    }
}

/// A typed piece of content: document, nested field, and fallback literal
pub struct Resource<T> {
    /// Short name used in logs
    pub label: &'static str,
    /// Document file name relative to the data directory
    pub file: &'static str,
    /// JSON pointer to the field to extract (`""` for the whole document)
    pub pointer: &'static str,
    fallback: fn() -> T,
}

impl<T: DeserializeOwned> Resource<T> {
    pub const fn new(
        label: &'static str,
        file: &'static str,
        pointer: &'static str,
        fallback: fn() -> T,
    ) -> Self {
        Self {
            label,
            file,
            pointer,
            fallback,
        }
    }

    /// The hardcoded fallback value
    pub fn fallback(&self) -> T {
        (self.fallback)()
    }

    /// Decode document bytes and extract this resource's field
    pub fn decode(&self, bytes: &[u8]) -> Result<T> {
        let document: Value = serde_json::from_slice(bytes)?;
        let field = document.pointer(self.pointer).ok_or_else(|| {
            Error::NotFound(format!("{}#{}", self.file, self.pointer))
        })?;
        Ok(T::deserialize(field)?)
    }
}

/// Load `resource` from `source`, substituting its fallback on any failure
pub async fn load_or_fallback<T, S>(source: &S, resource: &Resource<T>) -> T
where
    T: DeserializeOwned,
    S: ContentSource + ?Sized,
{
    let loaded = match source.fetch(resource.file).await {
        Ok(bytes) => resource.decode(&bytes),
        Err(e) => Err(e),
    };

    match loaded {
        Ok(value) => {
            debug!(resource = resource.label, file = resource.file, "Loaded content");
            value
        }
        Err(e) => {
            warn!(
                resource = resource.label,
                file = resource.file,
                error = %e,
                "Failed to load content, using fallback"
            );
            resource.fallback()
        }
    }
}
