//! Note use-case service.
//!
//! # Responsibility
//! - Provide the create/list/update/delete calls the UI issues.
//! - Read back committed state and pair notes with their display color.
//! - Publish change events to subscribers after every committed mutation.
//!
//! # Invariants
//! - Events are sent only after the repository call succeeded.
//! - Unknown color tags are stored as given and rendered with the fallback.
//! - Logs carry ids and status only, never note text.

use crate::color::{self, Color};
use crate::model::note::{Note, NoteId, NoteUpdate};
use crate::repo::{NoteRepository, RepoError};
use log::{debug, error, info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Mutex, PoisonError};

/// Service error for note use-cases.
#[derive(Debug)]
pub enum NoteServiceError {
    /// Target note does not exist.
    NoteNotFound(NoteId),
    /// Persistence-layer failure.
    Storage(RepoError),
    /// A committed write could not be read back.
    InconsistentState(&'static str),
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoteNotFound(id) => write!(f, "note not found: {id}"),
            Self::Storage(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent note state: {details}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for NoteServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NoteNotFound(id),
            other => Self::Storage(other),
        }
    }
}

/// Committed change to the note collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteEvent {
    Created(Note),
    Updated(Note),
    Deleted(NoteId),
}

/// List row: a note with its resolved display color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteEntry {
    pub note: Note,
    pub color: Color,
    /// False when `note.color` is not a catalog tag and `color` is the fallback.
    pub color_known: bool,
}

impl From<Note> for NoteEntry {
    fn from(note: Note) -> Self {
        let (color, color_known) = match color::resolve(&note.color) {
            Ok(color) => (color, true),
            Err(_) => (color::FALLBACK_COLOR, false),
        };
        Self {
            note,
            color,
            color_known,
        }
    }
}

/// Note service facade over a repository implementation.
pub struct NoteService<R: NoteRepository> {
    repo: R,
    subscribers: Mutex<Vec<Sender<NoteEvent>>>,
}

impl<R: NoteRepository> NoteService<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Borrows the underlying repository.
    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Registers a change feed. Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> Receiver<NoteEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        rx
    }

    /// Creates one note with a fresh id.
    pub fn create_note(
        &self,
        title: &str,
        body: &str,
        color: &str,
    ) -> Result<Note, NoteServiceError> {
        let color_known = color::is_known_tag(color);
        if !color_known {
            warn!("event=note_create module=service status=warn reason=unknown_color_tag");
        }

        let created = self
            .repo
            .create_note(title, body, color)
            .inspect_err(|err| log_failure("note_create", None, err))?;
        let note = self
            .repo
            .get_note(created.id)?
            .ok_or(NoteServiceError::InconsistentState(
                "created note not found in read-back",
            ))?;

        info!(
            "event=note_create module=service status=ok note_id={} color_known={color_known}",
            note.id
        );
        self.publish(NoteEvent::Created(note.clone()));
        Ok(note)
    }

    /// Gets one note by id.
    pub fn get_note(&self, id: NoteId) -> Result<Option<Note>, NoteServiceError> {
        Ok(self.repo.get_note(id)?)
    }

    /// Lists all notes in insertion order.
    pub fn list_notes(&self) -> Result<Vec<Note>, NoteServiceError> {
        let notes = self.repo.list_notes()?;
        debug!("event=note_list module=service status=ok count={}", notes.len());
        Ok(notes)
    }

    /// Lists all notes paired with the color they render with.
    pub fn list_entries(&self) -> Result<Vec<NoteEntry>, NoteServiceError> {
        Ok(self.list_notes()?.into_iter().map(NoteEntry::from).collect())
    }

    /// Changes the supplied fields of one note and returns the stored result.
    pub fn update_note(
        &self,
        id: NoteId,
        update: NoteUpdate,
    ) -> Result<Note, NoteServiceError> {
        if let Some(tag) = update.color.as_deref() {
            if !color::is_known_tag(tag) {
                warn!(
                    "event=note_update module=service status=warn note_id={id} reason=unknown_color_tag"
                );
            }
        }

        self.repo
            .update_note(id, &update)
            .inspect_err(|err| log_failure("note_update", Some(id), err))?;
        let note = self
            .repo
            .get_note(id)?
            .ok_or(NoteServiceError::InconsistentState(
                "updated note not found in read-back",
            ))?;

        info!("event=note_update module=service status=ok note_id={id}");
        self.publish(NoteEvent::Updated(note.clone()));
        Ok(note)
    }

    /// Deletes one note permanently.
    pub fn delete_note(&self, id: NoteId) -> Result<(), NoteServiceError> {
        self.repo
            .delete_note(id)
            .inspect_err(|err| log_failure("note_delete", Some(id), err))?;

        info!("event=note_delete module=service status=ok note_id={id}");
        self.publish(NoteEvent::Deleted(id));
        Ok(())
    }

    /// Deletes several notes in order, stopping at the first failure.
    ///
    /// Repeated ids are deleted once. Notes deleted before a failure stay
    /// deleted.
    pub fn delete_notes(&self, ids: &[NoteId]) -> Result<(), NoteServiceError> {
        let mut seen = HashSet::with_capacity(ids.len());
        for id in ids.iter().filter(|id| seen.insert(**id)) {
            self.delete_note(*id)?;
        }
        Ok(())
    }

    fn publish(&self, event: NoteEvent) {
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

fn log_failure(event: &str, id: Option<NoteId>, err: &RepoError) {
    let note_id = id.map_or_else(|| "none".to_string(), |id| id.to_string());
    match err {
        RepoError::NotFound(_) => warn!(
            "event={event} module=service status=error note_id={note_id} error_code=not_found"
        ),
        other => error!(
            "event={event} module=service status=error note_id={note_id} error_code=storage error={other}"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::{NoteEntry, NoteEvent, NoteService, NoteServiceError};
    use crate::color::{ColorTag, FALLBACK_COLOR};
    use crate::model::note::{Note, NoteUpdate};
    use crate::repo::memory_repo::InMemoryNoteRepository;

    #[test]
    fn entry_uses_fallback_for_unknown_tag() {
        let entry = NoteEntry::from(Note::new("t", "b", "teal"));
        assert_eq!(entry.color, FALLBACK_COLOR);
        assert!(!entry.color_known);

        let entry = NoteEntry::from(Note::new("t", "b", "purple"));
        assert_eq!(entry.color, ColorTag::Purple.color());
        assert!(entry.color_known);
    }

    #[test]
    fn subscribers_receive_committed_changes_only() {
        let service = NoteService::new(InMemoryNoteRepository::new());
        let events = service.subscribe();

        let note = service.create_note("a", "b", "red").unwrap();
        let updated = service
            .update_note(note.id, NoteUpdate::default().title("c"))
            .unwrap();
        service.delete_note(note.id).unwrap();
        assert!(matches!(
            service.delete_note(note.id),
            Err(NoteServiceError::NoteNotFound(_))
        ));

        let received: Vec<NoteEvent> = events.try_iter().collect();
        assert_eq!(
            received,
            vec![
                NoteEvent::Created(note.clone()),
                NoteEvent::Updated(updated),
                NoteEvent::Deleted(note.id),
            ]
        );
    }

    #[test]
    fn dropped_receiver_does_not_break_publishing() {
        let service = NoteService::new(InMemoryNoteRepository::new());
        drop(service.subscribe());
        service.create_note("a", "b", "red").unwrap();
    }
}
