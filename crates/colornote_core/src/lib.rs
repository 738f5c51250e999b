//! Core of the color-tagged note store.
//! Owns the note collection, its persistence and the color catalog.

pub mod color;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod snapshot;

pub use color::{display_color, resolve, reverse_lookup, Color, ColorTag, UnknownColorTag};
pub use config::{ConfigError, CoreConfig, DatabaseLocation, LogConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::note::{Note, NoteId, NoteUpdate, NoteValidationError};
pub use repo::memory_repo::InMemoryNoteRepository;
pub use repo::note_repo::SqliteNoteRepository;
pub use repo::{NoteRepository, RepoError, RepoResult};
pub use service::note_service::{NoteEntry, NoteEvent, NoteService, NoteServiceError};
pub use snapshot::{export_snapshot, import_snapshot, NoteSnapshot, SnapshotError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
