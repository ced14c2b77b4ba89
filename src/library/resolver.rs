// Maps playback keys to bundled clips
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::scanner::ClipScanner;
use crate::error::{Error, Result};

/// A bundled clip located by key. Immutable once resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioResource {
    name: String,
    path: PathBuf,
}

impl AudioResource {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Index of the bundled clip store. A clip for key `K` is the file whose
/// stem is exactly `K`.
#[derive(Debug, Clone, Default)]
pub struct ClipResolver {
    clips: HashMap<String, PathBuf>,
}

impl ClipResolver {
    /// Build the index by scanning `asset_dir`. When one stem exists with
    /// several extensions, the earliest in `extensions` wins.
    pub fn scan(asset_dir: &Path, extensions: &[String]) -> Self {
        if !asset_dir.is_dir() {
            warn!("Clip directory {:?} not found, all keys will be synthesized", asset_dir);
            return Self::default();
        }

        let rank = |path: &Path| {
            let ext = path
                .extension()
                .map(|e| e.to_string_lossy().to_lowercase())
                .unwrap_or_default();
            extensions
                .iter()
                .position(|e| e.eq_ignore_ascii_case(&ext))
                .unwrap_or(usize::MAX)
        };

        let mut clips: HashMap<String, PathBuf> = HashMap::new();
        for path in ClipScanner::scan(asset_dir, extensions) {
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                debug!("Skipping clip with non UTF-8 name: {:?}", path);
                continue;
            };
            match clips.get(stem) {
                Some(existing) if rank(existing) <= rank(&path) => {
                    debug!("Duplicate clip {:?} shadowed by {:?}", path, existing);
                }
                _ => {
                    clips.insert(stem.to_string(), path);
                }
            }
        }

        info!("Indexed {} bundled clips from {:?}", clips.len(), asset_dir);
        Self { clips }
    }

    pub fn from_entries<I, K, P>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, P)>,
        K: Into<String>,
        P: Into<PathBuf>,
    {
        Self {
            clips: entries
                .into_iter()
                .map(|(k, p)| (k.into(), p.into()))
                .collect(),
        }
    }

    /// Pure lookup of `key` in the index
    pub fn resolve(&self, key: &str) -> Result<AudioResource> {
        self.clips
            .get(key)
            .map(|path| AudioResource::new(key, path.clone()))
            .ok_or_else(|| Error::ResourceNotFound(key.to_string()))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.clips.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}
