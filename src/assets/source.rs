use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::error::{ReelError, ReelResult};

/// Retrieval backend for encoded frame bytes.
///
/// Implementations are called concurrently from preloader workers.
pub trait FrameSource: Send + Sync {
    /// Fetch the encoded bytes behind `uri`.
    fn fetch(&self, uri: &str) -> ReelResult<Vec<u8>>;
}

/// Resolves frame URIs against a directory on disk, the way a static web server maps
/// `/images/...` onto its public folder.
#[derive(Clone, Debug)]
pub struct FsFrameSource {
    root: PathBuf,
}

impl FsFrameSource {
    /// Serve frames from `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory URIs are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem path for `uri`.
    pub fn resolve(&self, uri: &str) -> ReelResult<PathBuf> {
        Ok(self.root.join(normalize_uri_path(uri)?))
    }
}

impl FrameSource for FsFrameSource {
    fn fetch(&self, uri: &str) -> ReelResult<Vec<u8>> {
        let path = self.resolve(uri)?;
        std::fs::read(&path)
            .with_context(|| format!("read frame bytes from '{}'", path.display()))
            .map_err(ReelError::from)
    }
}

/// Frame bytes held in memory, keyed by URI.
#[derive(Clone, Debug, Default)]
pub struct MemoryFrameSource {
    frames: HashMap<String, Vec<u8>>,
}

impl MemoryFrameSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `bytes` under `uri`, replacing any previous entry.
    pub fn insert(&mut self, uri: impl Into<String>, bytes: Vec<u8>) {
        self.frames.insert(uri.into(), bytes);
    }

    /// Number of registered URIs.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether no URIs are registered.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl FrameSource for MemoryFrameSource {
    fn fetch(&self, uri: &str) -> ReelResult<Vec<u8>> {
        self.frames
            .get(uri)
            .cloned()
            .ok_or_else(|| ReelError::asset(format!("no frame registered for '{uri}'")))
    }
}

/// Normalize a frame URI into a relative path.
///
/// A leading `/` is treated as the source root. `.` segments and duplicate separators are dropped;
/// parent traversals (`..`) are rejected.
pub fn normalize_uri_path(uri: &str) -> ReelResult<String> {
    let s = uri.replace('\\', "/");
    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(ReelError::validation("frame uris must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(ReelError::validation("frame uri must contain a file name"));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
