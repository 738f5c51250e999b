//! Note repository contract, errors and storage backends.
//!
//! # Responsibility
//! - Define the create/list/update/delete contract the UI layer depends on.
//! - Keep backend details (SQL, locking) behind one trait.
//!
//! # Invariants
//! - Every successful mutation is committed before the call returns.
//! - A failed mutation leaves the collection unchanged, batches included.
//! - `list_notes` returns insertion order.
//! - Deleting or updating a missing id reports `RepoError::NotFound`.

use crate::db::DbError;
use crate::model::note::{Note, NoteId, NoteUpdate, NoteValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory_repo;
pub mod note_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for note persistence and queries.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying storage failed (I/O, constraint, quota).
    Db(DbError),
    NotFound(NoteId),
    DuplicateId(NoteId),
    Validation(NoteValidationError),
    /// Persisted state could not be decoded.
    InvalidData(String),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// A writer panicked while holding the in-memory store lock.
    LockPoisoned,
}

impl RepoError {
    /// True for failures of the storage layer itself rather than of the request.
    pub fn is_storage(&self) -> bool {
        !matches!(
            self,
            Self::NotFound(_) | Self::DuplicateId(_) | Self::Validation(_)
        )
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "note not found: {id}"),
            Self::DuplicateId(id) => write!(f, "note already exists: {id}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted note data: {message}"),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
            Self::LockPoisoned => write!(f, "note store lock poisoned"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<NoteValidationError> for RepoError {
    fn from(value: NoteValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Persistence contract for the note collection.
pub trait NoteRepository {
    /// Persists a fully formed note and returns its id.
    fn insert_note(&self, note: &Note) -> RepoResult<NoteId>;
    /// Persists all notes in order, or none of them.
    ///
    /// Fails with `DuplicateId` when an id is already stored or repeats
    /// inside `notes`.
    fn insert_notes(&self, notes: &[Note]) -> RepoResult<usize>;
    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>>;
    /// Point-in-time snapshot of all notes in insertion order.
    fn list_notes(&self) -> RepoResult<Vec<Note>>;
    /// Changes only the fields supplied in `update`.
    fn update_note(&self, id: NoteId, update: &NoteUpdate) -> RepoResult<()>;
    /// Removes the note permanently.
    fn delete_note(&self, id: NoteId) -> RepoResult<()>;
    fn count_notes(&self) -> RepoResult<u64>;

    /// Allocates a fresh id and persists a new note.
    fn create_note(&self, title: &str, body: &str, color: &str) -> RepoResult<Note> {
        let note = Note::new(title, body, color);
        self.insert_note(&note)?;
        Ok(note)
    }
}

impl<R: NoteRepository + ?Sized> NoteRepository for &R {
    fn insert_note(&self, note: &Note) -> RepoResult<NoteId> {
        (**self).insert_note(note)
    }

    fn insert_notes(&self, notes: &[Note]) -> RepoResult<usize> {
        (**self).insert_notes(notes)
    }

    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>> {
        (**self).get_note(id)
    }

    fn list_notes(&self) -> RepoResult<Vec<Note>> {
        (**self).list_notes()
    }

    fn update_note(&self, id: NoteId, update: &NoteUpdate) -> RepoResult<()> {
        (**self).update_note(id, update)
    }

    fn delete_note(&self, id: NoteId) -> RepoResult<()> {
        (**self).delete_note(id)
    }

    fn count_notes(&self) -> RepoResult<u64> {
        (**self).count_notes()
    }
}
