use colornote_core::color::FALLBACK_COLOR;
use colornote_core::db::open_db_in_memory;
use colornote_core::{
    ColorTag, NoteEvent, NoteService, NoteServiceError, NoteUpdate, SqliteNoteRepository,
};
use uuid::Uuid;

#[test]
fn create_returns_read_back_note() {
    let conn = open_db_in_memory().unwrap();
    let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());

    let created = service.create_note("Buy milk", "2 cartons", "blue").unwrap();

    assert_eq!(service.get_note(created.id).unwrap(), Some(created.clone()));
    assert_eq!(service.list_notes().unwrap(), vec![created]);
}

#[test]
fn update_returns_stored_result() {
    let conn = open_db_in_memory().unwrap();
    let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());
    let created = service.create_note("title", "body", "red").unwrap();

    let updated = service
        .update_note(created.id, NoteUpdate::default().color("green"))
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.title, "title");
    assert_eq!(updated.body, "body");
    assert_eq!(updated.color, "green");
}

#[test]
fn missing_ids_map_to_note_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());
    let missing = Uuid::new_v4();

    let err = service
        .update_note(missing, NoteUpdate::default().title("x"))
        .unwrap_err();
    assert!(matches!(err, NoteServiceError::NoteNotFound(id) if id == missing));

    let err = service.delete_note(missing).unwrap_err();
    assert!(matches!(err, NoteServiceError::NoteNotFound(id) if id == missing));
}

#[test]
fn list_entries_resolve_display_colors_with_fallback() {
    let conn = open_db_in_memory().unwrap();
    let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());
    service.create_note("known", "", "orange").unwrap();
    service.create_note("unknown", "", "black").unwrap();

    let entries = service.list_entries().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].color, ColorTag::Orange.color());
    assert!(entries[0].color_known);
    assert_eq!(entries[1].note.color, "black");
    assert_eq!(entries[1].color, FALLBACK_COLOR);
    assert!(!entries[1].color_known);
}

#[test]
fn delete_notes_removes_a_batch_and_stops_at_first_failure() {
    let conn = open_db_in_memory().unwrap();
    let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());
    let a = service.create_note("a", "", "red").unwrap();
    let b = service.create_note("b", "", "red").unwrap();
    let c = service.create_note("c", "", "red").unwrap();
    let d = service.create_note("d", "", "red").unwrap();

    service.delete_notes(&[a.id, c.id]).unwrap();
    assert_eq!(service.list_notes().unwrap(), vec![b.clone(), d.clone()]);

    let missing = Uuid::new_v4();
    let err = service.delete_notes(&[b.id, missing, d.id]).unwrap_err();
    assert!(matches!(err, NoteServiceError::NoteNotFound(id) if id == missing));
    assert_eq!(service.list_notes().unwrap(), vec![d]);
}

#[test]
fn failed_mutations_publish_nothing() {
    let conn = open_db_in_memory().unwrap();
    let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());
    let events = service.subscribe();

    let missing = Uuid::new_v4();
    let _ = service.update_note(missing, NoteUpdate::default().body("x"));
    let _ = service.delete_note(missing);
    assert_eq!(events.try_iter().count(), 0);

    let created = service.create_note("t", "b", "blue").unwrap();
    assert_eq!(
        events.try_iter().collect::<Vec<_>>(),
        vec![NoteEvent::Created(created)]
    );
}

#[test]
fn delete_notes_with_repeated_ids_deletes_each_once() {
    let conn = open_db_in_memory().unwrap();
    let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());
    let a = service.create_note("a", "", "red").unwrap();
    let b = service.create_note("b", "", "red").unwrap();
    let c = service.create_note("c", "", "red").unwrap();
    let events = service.subscribe();

    service.delete_notes(&[a.id, b.id, a.id, b.id]).unwrap();

    assert_eq!(service.list_notes().unwrap(), vec![c]);
    assert_eq!(
        events.try_iter().collect::<Vec<_>>(),
        vec![NoteEvent::Deleted(a.id), NoteEvent::Deleted(b.id)]
    );
}
