use pressroom_core::db::open_db_in_memory;
use pressroom_core::{
    AuthorListQuery, AuthorPatch, AuthorRepository, AuthorService, InMemoryAuthorRepository,
    NewAuthor, RepoError, SqliteAuthorRepository, ValidationError,
};
use rusqlite::Connection;
use uuid::Uuid;

fn reason(err: &RepoError) -> &'static str {
    err.as_validation()
        .map(ValidationError::reason)
        .unwrap_or("not a validation error")
}

#[test]
fn create_assigns_id_and_timestamps() {
    let conn = open_db_in_memory().unwrap();
    let service = AuthorService::new(SqliteAuthorRepository::new(&conn));

    let author = service
        .register("Ada Lovelace", Some("1234567890".to_string()))
        .unwrap();

    assert!(!author.id.is_nil());
    assert_eq!(author.name, "Ada Lovelace");
    assert_eq!(author.phone_number.as_deref(), Some("1234567890"));
    assert!(author.created_at > 0);
    assert!(author.updated_at >= author.created_at);

    let loaded = service.get_author(author.id).unwrap().unwrap();
    assert_eq!(loaded, author);
}

#[test]
fn empty_name_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let service = AuthorService::new(SqliteAuthorRepository::new(&conn));

    let err = service.register("", None).unwrap_err();
    assert!(matches!(err, RepoError::Validation(ValidationError::EmptyName)));
    assert_eq!(reason(&err), "empty name");
    assert!(service
        .list_authors(&AuthorListQuery::default())
        .unwrap()
        .is_empty());
}

#[test]
fn phone_number_must_be_ten_digits() {
    let conn = open_db_in_memory().unwrap();
    let service = AuthorService::new(SqliteAuthorRepository::new(&conn));

    for (index, bad) in ["123", "12345678901", "abcdefghij"].iter().enumerate() {
        let err = service
            .register(format!("author {index}"), Some(bad.to_string()))
            .unwrap_err();
        assert_eq!(reason(&err), "invalid phone format", "phone `{bad}`");
    }

    assert!(service
        .register("Phoned", Some("1234567890".to_string()))
        .is_ok());
    assert!(service.register("Unphoned", None).is_ok());
}

#[test]
fn second_author_with_same_name_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let service = AuthorService::new(SqliteAuthorRepository::new(&conn));

    service.register("Grace Hopper", None).unwrap();
    let err = service.register("Grace Hopper", None).unwrap_err();
    assert_eq!(reason(&err), "duplicate name");

    // Names are compared exactly.
    assert!(service.register("grace hopper", None).is_ok());
}

#[test]
fn store_constraint_backs_up_the_lookup() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAuthorRepository::new(&conn);

    // Bypass the service lookup, as a racing creator would.
    repo.create_author(&NewAuthor::new("Racer", None)).unwrap();
    let err = repo
        .create_author(&NewAuthor::new("Racer", None))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::DuplicateName(ref name)) if name == "Racer"
    ));
}

#[test]
fn update_revalidates_touched_fields_only() {
    let conn = open_db_in_memory().unwrap();
    let service = AuthorService::new(SqliteAuthorRepository::new(&conn));
    let author = service
        .register("Linus", Some("1234567890".to_string()))
        .unwrap();

    let bad_phone = AuthorPatch {
        name: Some("Linus T".to_string()),
        phone_number: Some(Some("12-34".to_string())),
    };
    let err = service.update_author(author.id, &bad_phone).unwrap_err();
    assert_eq!(reason(&err), "invalid phone format");
    let unchanged = service.get_author(author.id).unwrap().unwrap();
    assert_eq!(unchanged.name, "Linus");

    let clear_phone = AuthorPatch {
        phone_number: Some(None),
        ..AuthorPatch::default()
    };
    let updated = service.update_author(author.id, &clear_phone).unwrap();
    assert_eq!(updated.name, "Linus");
    assert_eq!(updated.phone_number, None);
    assert_eq!(updated.created_at, author.created_at);
    assert!(updated.updated_at >= author.updated_at);
}

#[test]
fn rename_onto_existing_name_is_rejected_by_store() {
    let conn = open_db_in_memory().unwrap();
    let service = AuthorService::new(SqliteAuthorRepository::new(&conn));
    service.register("Ada", None).unwrap();
    let grace = service.register("Grace", None).unwrap();

    let patch = AuthorPatch {
        name: Some("Ada".to_string()),
        ..AuthorPatch::default()
    };
    let err = service.update_author(grace.id, &patch).unwrap_err();
    assert_eq!(reason(&err), "duplicate name");
}

#[test]
fn update_and_delete_unknown_id_return_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = AuthorService::new(SqliteAuthorRepository::new(&conn));
    let missing = Uuid::new_v4();

    let patch = AuthorPatch {
        name: Some("Nobody".to_string()),
        ..AuthorPatch::default()
    };
    let err = service.update_author(missing, &patch).unwrap_err();
    assert!(matches!(err, RepoError::NotFound { record: "author", id } if id == missing));

    let err = service.delete_author(missing).unwrap_err();
    assert!(matches!(err, RepoError::NotFound { .. }));
}

#[test]
fn list_is_ordered_by_name_and_paginates() {
    let conn = open_db_in_memory().unwrap();
    let service = AuthorService::new(SqliteAuthorRepository::new(&conn));
    for name in ["Charlie", "Alice", "Bob"] {
        service.register(name, None).unwrap();
    }

    let names = |query: AuthorListQuery| -> Vec<String> {
        service
            .list_authors(&query)
            .unwrap()
            .into_iter()
            .map(|author| author.name)
            .collect()
    };

    assert_eq!(names(AuthorListQuery::default()), ["Alice", "Bob", "Charlie"]);
    assert_eq!(
        names(AuthorListQuery {
            limit: Some(1),
            offset: 1
        }),
        ["Bob"]
    );
    assert_eq!(
        names(AuthorListQuery {
            limit: None,
            offset: 2
        }),
        ["Charlie"]
    );
}

#[test]
fn delete_frees_the_name() {
    let conn = open_db_in_memory().unwrap();
    let service = AuthorService::new(SqliteAuthorRepository::new(&conn));
    let author = service.register("Temp", None).unwrap();

    service.delete_author(author.id).unwrap();
    assert!(service.find_author_by_name("Temp").unwrap().is_none());
    assert!(service.register("Temp", None).is_ok());
}

#[test]
fn read_path_rejects_rows_that_bypassed_validation() {
    let mut conn = Connection::open_in_memory().unwrap();
    pressroom_core::db::migrations::apply_migrations(&mut conn).unwrap();
    conn.execute(
        "INSERT INTO authors (id, name, phone_number)
         VALUES ('11111111-2222-4333-8444-555555555555', 'Broken', '12');",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO authors (id, name) VALUES ('not-a-uuid', 'Odd');",
        [],
    )
    .unwrap();

    let repo = SqliteAuthorRepository::new(&conn);
    let err = repo.find_author_by_name("Broken").unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::InvalidPhoneFormat(_))
    ));
    let err = repo.find_author_by_name("Odd").unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn in_memory_store_behaves_like_sqlite() {
    let service = AuthorService::new(InMemoryAuthorRepository::new());

    let author = service.register("Ada", None).unwrap();
    assert_eq!(
        reason(&service.register("Ada", None).unwrap_err()),
        "duplicate name"
    );
    assert_eq!(reason(&service.register("", None).unwrap_err()), "empty name");
    assert_eq!(
        service.find_author_by_name("Ada").unwrap().map(|a| a.id),
        Some(author.id)
    );
    assert_eq!(service.repository().len().unwrap(), 1);
}
