//! Snapshot persistence
//!
//! The whole complex is written as one JSON document. [`JsonFileStore`]
//! writes to a temporary sibling file and renames it over the slot, so an
//! interrupted write leaves the previous snapshot intact. A slot holding a
//! document that cannot be used is moved aside, never overwritten in place.

use crate::allocation::error::{AllocationError, AllocationResult};
use crate::housing::Complex;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Version written into every snapshot document
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// Persisted document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// Layout version of the document
    pub format_version: u32,
    /// When the snapshot was taken
    pub saved_at: DateTime<Utc>,
    /// The housing graph
    pub complex: Complex,
}

#[derive(Serialize)]
struct SnapshotView<'a> {
    format_version: u32,
    saved_at: DateTime<Utc>,
    complex: &'a Complex,
}

/// Encode a complex as a snapshot document
pub fn encode(complex: &Complex) -> AllocationResult<String> {
    let view = SnapshotView {
        format_version: SNAPSHOT_FORMAT_VERSION,
        saved_at: Utc::now(),
        complex,
    };
    Ok(serde_json::to_string_pretty(&view)?)
}

/// Decode and check a snapshot document
///
/// Anything that cannot be trusted as a complex is `SnapshotUnavailable`.
pub fn decode(content: &str) -> AllocationResult<Snapshot> {
    let snapshot: Snapshot = serde_json::from_str(content)
        .map_err(|e| AllocationError::snapshot_unavailable(format!("undecodable snapshot: {}", e)))?;

    if snapshot.format_version != SNAPSHOT_FORMAT_VERSION {
        return Err(AllocationError::snapshot_unavailable(format!(
            "unsupported snapshot format version {}",
            snapshot.format_version
        )));
    }

    snapshot
        .complex
        .validate()
        .map_err(|e| AllocationError::snapshot_unavailable(format!("inconsistent snapshot: {}", e)))?;

    Ok(snapshot)
}

/// Storage slot for the complex
pub trait SnapshotStore {
    /// Load the stored complex
    ///
    /// `Ok(None)` when the slot is empty, `SnapshotUnavailable` when it holds
    /// something that cannot be read or trusted.
    fn load(&self) -> AllocationResult<Option<Complex>>;

    /// Replace the stored complex
    fn save(&mut self, complex: &Complex) -> AllocationResult<()>;

    /// Move the current content of the slot out of the way
    fn set_aside(&mut self) -> AllocationResult<()>;
}

/// Snapshot kept in a JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store for a file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the snapshot slot
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where an unusable snapshot is moved before the slot is rewritten
    pub fn corrupt_path(&self) -> PathBuf {
        self.sibling(".corrupt")
    }

    fn temp_path(&self) -> PathBuf {
        self.sibling(".tmp")
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(suffix);
        PathBuf::from(name)
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self) -> AllocationResult<Option<Complex>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No snapshot yet");
                return Ok(None);
            }
            Err(e) => {
                return Err(AllocationError::snapshot_unavailable(format!(
                    "cannot read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        let snapshot = decode(&content)?;
        debug!(path = %self.path.display(), saved_at = %snapshot.saved_at, "Snapshot loaded");
        Ok(Some(snapshot.complex))
    }

    fn save(&mut self, complex: &Complex) -> AllocationResult<()> {
        let content = encode(complex)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let temp_path = self.temp_path();
        let mut file = File::create(&temp_path)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
        fs::rename(&temp_path, &self.path)?;

        debug!(path = %self.path.display(), bytes = content.len(), "Snapshot written");
        Ok(())
    }

    fn set_aside(&mut self) -> AllocationResult<()> {
        let target = self.corrupt_path();
        match fs::rename(&self.path, &target) {
            Ok(()) => {
                debug!(from = %self.path.display(), to = %target.display(), "Snapshot set aside");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Snapshot kept in memory, encoded exactly as on disk
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    content: Option<String>,
    set_aside: Option<String>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding an already encoded document
    pub fn with_content(content: impl Into<String>) -> Self {
        Self { content: Some(content.into()), set_aside: None }
    }

    /// Encoded document, if anything was saved
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// Document moved out of the slot by the last `set_aside`
    pub fn set_aside_content(&self) -> Option<&str> {
        self.set_aside.as_deref()
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> AllocationResult<Option<Complex>> {
        match self.content.as_deref() {
            Some(content) => Ok(Some(decode(content)?.complex)),
            None => Ok(None),
        }
    }

    fn save(&mut self, complex: &Complex) -> AllocationResult<()> {
        self.content = Some(encode(complex)?);
        Ok(())
    }

    fn set_aside(&mut self) -> AllocationResult<()> {
        if let Some(content) = self.content.take() {
            self.set_aside = Some(content);
        }
        Ok(())
    }
}
