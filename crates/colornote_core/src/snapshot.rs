//! Versioned JSON snapshot of the note collection.
//!
//! # Responsibility
//! - Export every note as `{ "version": N, "notes": [...] }`.
//! - Import a snapshot into any repository, keeping ids and order.
//!
//! # Invariants
//! - Snapshots newer than `SNAPSHOT_VERSION` are refused on read.
//! - Import is all-or-nothing: a duplicate id anywhere leaves the target
//!   repository untouched.

use crate::model::note::Note;
use crate::repo::{NoteRepository, RepoError};
use log::info;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Snapshot layout version written by this build.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug)]
pub enum SnapshotError {
    Json(serde_json::Error),
    UnsupportedVersion { version: u32, latest_supported: u32 },
    Repo(RepoError),
}

impl Display for SnapshotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "malformed note snapshot: {err}"),
            Self::UnsupportedVersion {
                version,
                latest_supported,
            } => write!(
                f,
                "note snapshot v{version} is newer than supported v{latest_supported}"
            ),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SnapshotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::UnsupportedVersion { .. } => None,
        }
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<RepoError> for SnapshotError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Serialized form of the whole note collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteSnapshot {
    pub version: u32,
    pub notes: Vec<Note>,
}

impl NoteSnapshot {
    pub fn new(notes: Vec<Note>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            notes,
        }
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses a snapshot, rejecting layouts newer than this build.
    pub fn from_json(input: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_str(input)?;
        if snapshot.version > SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                version: snapshot.version,
                latest_supported: SNAPSHOT_VERSION,
            });
        }
        Ok(snapshot)
    }
}

/// Captures every note currently stored in `repo`.
pub fn export_snapshot<R: NoteRepository + ?Sized>(
    repo: &R,
) -> Result<NoteSnapshot, SnapshotError> {
    let notes = repo.list_notes()?;
    info!(
        "event=snapshot_export module=snapshot status=ok count={}",
        notes.len()
    );
    Ok(NoteSnapshot::new(notes))
}

/// Inserts every snapshot note into `repo` and returns how many were added.
pub fn import_snapshot<R: NoteRepository + ?Sized>(
    repo: &R,
    snapshot: &NoteSnapshot,
) -> Result<usize, SnapshotError> {
    let count = repo.insert_notes(&snapshot.notes)?;
    info!("event=snapshot_import module=snapshot status=ok count={count}");
    Ok(count)
}
