use colornote_core::db::open_db_in_memory;
use colornote_core::{
    InMemoryNoteRepository, Note, NoteRepository, NoteUpdate, RepoError, SqliteNoteRepository,
};
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;
use uuid::Uuid;

fn with_each_backend(check: impl Fn(&dyn NoteRepository)) {
    let memory = InMemoryNoteRepository::new();
    check(&memory);

    let conn = open_db_in_memory().unwrap();
    let sqlite = SqliteNoteRepository::try_new(&conn).unwrap();
    check(&sqlite);
}

#[test]
fn create_then_list_returns_the_new_note() {
    with_each_backend(|repo| {
        let created = repo.create_note("Buy milk", "2 cartons", "blue").unwrap();

        let listed = repo.list_notes().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, created.id);
        assert_eq!(listed[0].title, "Buy milk");
        assert_eq!(listed[0].body, "2 cartons");
        assert_eq!(listed[0].color, "blue");
    });
}

#[test]
fn create_grows_collection_by_one_with_fresh_ids() {
    with_each_backend(|repo| {
        let mut ids = HashSet::new();
        for idx in 0..20 {
            let before = repo.count_notes().unwrap();
            let created = repo.create_note(&format!("note {idx}"), "", "red").unwrap();
            assert!(ids.insert(created.id), "id reused: {}", created.id);
            assert_eq!(repo.count_notes().unwrap(), before + 1);
        }
    });
}

#[test]
fn empty_fields_and_unknown_color_are_stored_verbatim() {
    with_each_backend(|repo| {
        let created = repo.create_note("", "", "teal").unwrap();

        let loaded = repo.get_note(created.id).unwrap().unwrap();
        assert_eq!(loaded, created);
        assert_eq!(loaded.color, "teal");
    });
}

#[test]
fn list_keeps_insertion_order_after_updates_and_deletes() {
    with_each_backend(|repo| {
        let first = repo.create_note("first", "", "red").unwrap();
        let second = repo.create_note("second", "", "blue").unwrap();
        let third = repo.create_note("third", "", "green").unwrap();

        repo.update_note(first.id, &NoteUpdate::default().body("edited"))
            .unwrap();
        repo.delete_note(second.id).unwrap();
        let fourth = repo.create_note("fourth", "", "brown").unwrap();

        let ids: Vec<Uuid> = repo.list_notes().unwrap().iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![first.id, third.id, fourth.id]);
    });
}

#[test]
fn delete_first_of_two_leaves_only_second() {
    with_each_backend(|repo| {
        let first = repo.create_note("first", "a", "red").unwrap();
        let second = repo.create_note("second", "b", "yellow").unwrap();

        repo.delete_note(first.id).unwrap();

        assert_eq!(repo.list_notes().unwrap(), vec![second]);
    });
}

#[test]
fn delete_missing_id_reports_not_found_and_keeps_collection() {
    with_each_backend(|repo| {
        let kept = repo.create_note("kept", "", "red").unwrap();
        let missing = Uuid::new_v4();

        let err = repo.delete_note(missing).unwrap_err();
        assert!(matches!(err, RepoError::NotFound(id) if id == missing));
        assert_eq!(repo.list_notes().unwrap(), vec![kept]);
    });
}

#[test]
fn deleting_twice_matches_deleting_once() {
    with_each_backend(|repo| {
        let target = repo.create_note("target", "", "red").unwrap();
        let other = repo.create_note("other", "", "blue").unwrap();

        repo.delete_note(target.id).unwrap();
        let err = repo.delete_note(target.id).unwrap_err();

        assert!(matches!(err, RepoError::NotFound(_)));
        assert!(!err.is_storage());
        assert_eq!(repo.list_notes().unwrap(), vec![other]);
        assert_eq!(repo.get_note(target.id).unwrap(), None);
    });
}

#[test]
fn update_color_keeps_title_and_body() {
    with_each_backend(|repo| {
        let created = repo.create_note("Groceries", "eggs", "red").unwrap();

        repo.update_note(created.id, &NoteUpdate::default().color("green"))
            .unwrap();

        let listed = repo.list_notes().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, created.id);
        assert_eq!(listed[0].title, "Groceries");
        assert_eq!(listed[0].body, "eggs");
        assert_eq!(listed[0].color, "green");
    });
}

#[test]
fn update_changes_only_supplied_fields() {
    with_each_backend(|repo| {
        let created = repo.create_note("t", "b", "red").unwrap();
        let updates = [
            NoteUpdate::default().title("t2"),
            NoteUpdate::default().body("b2"),
            NoteUpdate::default().title("t3").color("purple"),
            NoteUpdate::default(),
        ];

        let mut expected = created.clone();
        for update in &updates {
            repo.update_note(created.id, update).unwrap();
            expected.apply(update);
            assert_eq!(repo.get_note(created.id).unwrap().unwrap(), expected);
        }
        assert_eq!(expected.title, "t3");
        assert_eq!(expected.body, "b2");
        assert_eq!(expected.color, "purple");
    });
}

#[test]
fn update_can_set_fields_to_empty_strings() {
    with_each_backend(|repo| {
        let created = repo.create_note("title", "body", "red").unwrap();

        repo.update_note(created.id, &NoteUpdate::default().title("").body(""))
            .unwrap();

        let loaded = repo.get_note(created.id).unwrap().unwrap();
        assert_eq!(loaded.title, "");
        assert_eq!(loaded.body, "");
        assert_eq!(loaded.color, "red");
    });
}

#[test]
fn update_missing_id_reports_not_found() {
    with_each_backend(|repo| {
        let other = repo.create_note("other", "", "red").unwrap();
        let missing = Uuid::new_v4();

        let err = repo
            .update_note(missing, &NoteUpdate::default().title("x"))
            .unwrap_err();
        assert!(matches!(err, RepoError::NotFound(id) if id == missing));

        let err = repo.update_note(missing, &NoteUpdate::default()).unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
        assert_eq!(repo.list_notes().unwrap(), vec![other]);
    });
}

#[test]
fn insert_with_existing_id_is_rejected() {
    with_each_backend(|repo| {
        let created = repo.create_note("original", "", "red").unwrap();
        let clash = Note::with_id(created.id, "clash", "", "blue").unwrap();

        let err = repo.insert_note(&clash).unwrap_err();
        assert!(matches!(err, RepoError::DuplicateId(id) if id == created.id));
        assert_eq!(repo.list_notes().unwrap(), vec![created]);
    });
}

#[test]
fn corrupt_persisted_id_is_reported_as_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO notes (id, title, body, color) VALUES ('not-a-uuid', 't', 'b', 'red');",
        [],
    )
    .unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    let err = repo.list_notes().unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
    assert!(err.is_storage());
}

#[test]
fn batch_insert_is_all_or_nothing() {
    with_each_backend(|repo| {
        let existing = repo.create_note("existing", "", "red").unwrap();
        let batch = vec![
            Note::new("a", "", "blue"),
            Note::new("b", "", "green"),
            Note::with_id(existing.id, "clash", "", "brown").unwrap(),
        ];

        let err = repo.insert_notes(&batch).unwrap_err();
        assert!(matches!(err, RepoError::DuplicateId(id) if id == existing.id));
        assert_eq!(repo.list_notes().unwrap(), vec![existing.clone()]);

        assert_eq!(repo.insert_notes(&batch[..2]).unwrap(), 2);
        let ids: Vec<Uuid> = repo.list_notes().unwrap().iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![existing.id, batch[0].id, batch[1].id]);
    });
}

#[test]
fn concurrent_writers_never_lose_or_tear_notes() {
    const WRITERS: usize = 8;
    const NOTES_PER_WRITER: usize = 50;

    let repo = Arc::new(InMemoryNoteRepository::new());

    thread::scope(|scope| {
        for writer in 0..WRITERS {
            let repo = Arc::clone(&repo);
            scope.spawn(move || {
                for idx in 0..NOTES_PER_WRITER {
                    let created = repo
                        .create_note(&format!("w{writer}-{idx}"), "draft", "red")
                        .unwrap();
                    let stamp = created.id.to_string();
                    repo.update_note(
                        created.id,
                        &NoteUpdate::default().body(stamp.as_str()).color("green"),
                    )
                    .unwrap();
                }
            });
        }

        let reader = Arc::clone(&repo);
        scope.spawn(move || {
            for _ in 0..100 {
                for note in reader.list_notes().unwrap() {
                    let untouched = note.body == "draft" && note.color == "red";
                    let finished = note.body == note.id.to_string() && note.color == "green";
                    assert!(untouched || finished, "torn note observed: {note:?}");
                }
            }
        });
    });

    let notes = repo.list_notes().unwrap();
    assert_eq!(repo.count_notes().unwrap(), (WRITERS * NOTES_PER_WRITER) as u64);
    assert_eq!(notes.len(), WRITERS * NOTES_PER_WRITER);
    let ids: HashSet<Uuid> = notes.iter().map(|n| n.id).collect();
    assert_eq!(ids.len(), notes.len());
    for note in &notes {
        assert_eq!(note.body, note.id.to_string());
        assert_eq!(note.color, "green");
    }
}
