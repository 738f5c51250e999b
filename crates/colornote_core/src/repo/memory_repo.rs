//! In-memory note repository.
//!
//! Writers hold the write lock for the whole mutation, so readers observe
//! either the state before or after it.

use crate::model::note::{Note, NoteId, NoteUpdate};
use crate::repo::{NoteRepository, RepoError, RepoResult};
use std::collections::HashSet;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Volatile note store, kept in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryNoteRepository {
    notes: RwLock<Vec<Note>>,
}

impl InMemoryNoteRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RepoResult<RwLockReadGuard<'_, Vec<Note>>> {
        self.notes.read().map_err(|_| RepoError::LockPoisoned)
    }

    fn write(&self) -> RepoResult<RwLockWriteGuard<'_, Vec<Note>>> {
        self.notes.write().map_err(|_| RepoError::LockPoisoned)
    }
}

impl NoteRepository for InMemoryNoteRepository {
    fn insert_note(&self, note: &Note) -> RepoResult<NoteId> {
        note.validate()?;
        let mut notes = self.write()?;
        if notes.iter().any(|existing| existing.id == note.id) {
            return Err(RepoError::DuplicateId(note.id));
        }
        notes.push(note.clone());
        Ok(note.id)
    }

    fn insert_notes(&self, batch: &[Note]) -> RepoResult<usize> {
        let mut notes = self.write()?;
        let mut seen: HashSet<NoteId> = notes.iter().map(|note| note.id).collect();
        for note in batch {
            note.validate()?;
            if !seen.insert(note.id) {
                return Err(RepoError::DuplicateId(note.id));
            }
        }
        notes.extend_from_slice(batch);
        Ok(batch.len())
    }

    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>> {
        Ok(self.read()?.iter().find(|note| note.id == id).cloned())
    }

    fn list_notes(&self) -> RepoResult<Vec<Note>> {
        Ok(self.read()?.clone())
    }

    fn update_note(&self, id: NoteId, update: &NoteUpdate) -> RepoResult<()> {
        let mut notes = self.write()?;
        let note = notes
            .iter_mut()
            .find(|note| note.id == id)
            .ok_or(RepoError::NotFound(id))?;
        note.apply(update);
        Ok(())
    }

    fn delete_note(&self, id: NoteId) -> RepoResult<()> {
        let mut notes = self.write()?;
        let index = notes
            .iter()
            .position(|note| note.id == id)
            .ok_or(RepoError::NotFound(id))?;
        notes.remove(index);
        Ok(())
    }

    fn count_notes(&self) -> RepoResult<u64> {
        Ok(self.read()?.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::InMemoryNoteRepository;
    use crate::model::note::NoteUpdate;
    use crate::repo::{NoteRepository, RepoError};
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn panicked_writer_surfaces_lock_poisoned() {
        let repo = Arc::new(InMemoryNoteRepository::new());
        let note = repo.create_note("t", "b", "red").unwrap();

        let writer = Arc::clone(&repo);
        let outcome = thread::spawn(move || {
            let _guard = writer.notes.write().unwrap();
            panic!("writer died mid-mutation");
        })
        .join();
        assert!(outcome.is_err());

        assert!(matches!(repo.list_notes(), Err(RepoError::LockPoisoned)));
        assert!(matches!(
            repo.update_note(note.id, &NoteUpdate::default().title("x")),
            Err(RepoError::LockPoisoned)
        ));
        let err = repo.count_notes().unwrap_err();
        assert!(err.is_storage());
    }
}
