//! SQLite-backed note repository.
//!
//! # Responsibility
//! - Persist notes in the `notes` table with immediate-commit semantics.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Each single-note mutation is one autocommitted statement; batch
//!   inserts run in one transaction.
//! - `seq` is `AUTOINCREMENT`, so insertion order survives deletes and is
//!   never reused.
//! - Read paths reject malformed ids instead of masking them.

use crate::model::note::{Note, NoteId, NoteUpdate};
use crate::repo::{NoteRepository, RepoError, RepoResult};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use uuid::Uuid;

const NOTE_SELECT_SQL: &str = "SELECT id, title, body, color FROM notes";

const NOTE_COLUMNS: [&str; 5] = ["seq", "id", "title", "body", "color"];

/// Note repository over a migrated SQLite connection.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Wraps a connection, checking that the note schema is present.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn)?;
        Ok(Self { conn })
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn insert_note(&self, note: &Note) -> RepoResult<NoteId> {
        insert_row(self.conn, note)
    }

    fn insert_notes(&self, notes: &[Note]) -> RepoResult<usize> {
        // Dropping the transaction on error rolls back earlier inserts.
        let tx = self.conn.unchecked_transaction()?;
        for note in notes {
            insert_row(&tx, note)?;
        }
        tx.commit()?;
        Ok(notes.len())
    }

    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} WHERE id = ?1;"))?;
        let row = stmt
            .query_row([id.to_string()], read_raw_note)
            .optional()?;

        row.map(RawNote::into_note).transpose()
    }

    fn list_notes(&self) -> RepoResult<Vec<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} ORDER BY seq ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(read_raw_note(row)?.into_note()?);
        }
        Ok(notes)
    }

    fn update_note(&self, id: NoteId, update: &NoteUpdate) -> RepoResult<()> {
        // COALESCE keeps the stored value for every field left as NULL.
        let changed = self.conn.execute(
            "UPDATE notes
             SET
                title = COALESCE(?2, title),
                body = COALESCE(?3, body),
                color = COALESCE(?4, color)
             WHERE id = ?1;",
            params![
                id.to_string(),
                update.title.as_deref(),
                update.body.as_deref(),
                update.color.as_deref(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn delete_note(&self, id: NoteId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM notes WHERE id = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn count_notes(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM notes;", [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative note count `{count}`")))
    }
}

fn insert_row(conn: &Connection, note: &Note) -> RepoResult<NoteId> {
    note.validate()?;

    let inserted = conn.execute(
        "INSERT INTO notes (id, title, body, color) VALUES (?1, ?2, ?3, ?4);",
        params![
            note.id.to_string(),
            note.title.as_str(),
            note.body.as_str(),
            note.color.as_str(),
        ],
    );

    match inserted {
        Ok(_) => Ok(note.id),
        Err(rusqlite::Error::SqliteFailure(err, _))
            if err.code == ErrorCode::ConstraintViolation =>
        {
            Err(RepoError::DuplicateId(note.id))
        }
        Err(err) => Err(err.into()),
    }
}

struct RawNote {
    id: String,
    title: String,
    body: String,
    color: String,
}

impl RawNote {
    fn into_note(self) -> RepoResult<Note> {
        let id = Uuid::parse_str(&self.id).map_err(|_| {
            RepoError::InvalidData(format!("invalid uuid value `{}` in notes.id", self.id))
        })?;
        Ok(Note::with_id(id, self.title, self.body, self.color)?)
    }
}

fn read_raw_note(row: &Row<'_>) -> rusqlite::Result<RawNote> {
    Ok(RawNote {
        id: row.get("id")?,
        title: row.get("title")?,
        body: row.get("body")?,
        color: row.get("color")?,
    })
}

fn ensure_schema_ready(conn: &Connection) -> RepoResult<()> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'notes'
        );",
        [],
        |row| row.get(0),
    )?;
    if exists != 1 {
        return Err(RepoError::MissingRequiredTable("notes"));
    }

    let mut stmt = conn.prepare("PRAGMA table_info(notes);")?;
    let present = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<Result<Vec<_>, _>>()?;
    for column in NOTE_COLUMNS {
        if !present.iter().any(|name| name == column) {
            return Err(RepoError::MissingRequiredColumn {
                table: "notes",
                column,
            });
        }
    }
    Ok(())
}
