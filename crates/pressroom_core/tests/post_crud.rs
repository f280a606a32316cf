use pressroom_core::db::open_db_in_memory;
use pressroom_core::{
    InMemoryPostRepository, NewPost, PostCategory, PostListQuery, PostPatch, PostService,
    RepoError, SqlitePostRepository, ValidationError,
};
use uuid::Uuid;

fn draft() -> NewPost {
    NewPost {
        title: "Top 10 Tips".to_string(),
        content: "x".repeat(250),
        summary: "y".repeat(250),
        category: "Fiction".to_string(),
    }
}

fn reason(err: &RepoError) -> &'static str {
    err.as_validation()
        .map(ValidationError::reason)
        .unwrap_or("not a validation error")
}

#[test]
fn valid_post_roundtrips_through_sqlite() {
    let conn = open_db_in_memory().unwrap();
    let service = PostService::new(SqlitePostRepository::new(&conn));

    let post = service.create_post(&draft()).unwrap();
    assert!(!post.id.is_nil());
    assert_eq!(post.category, PostCategory::Fiction);
    assert!(post.created_at > 0);

    let loaded = service.get_post(post.id).unwrap().unwrap();
    assert_eq!(loaded, post);
}

#[test]
fn title_needs_a_marker_phrase() {
    let conn = open_db_in_memory().unwrap();
    let service = PostService::new(SqlitePostRepository::new(&conn));

    let err = service
        .create_post(&NewPost {
            title: "A Nice Day".to_string(),
            ..draft()
        })
        .unwrap_err();
    assert_eq!(reason(&err), "missing required phrase");

    for title in ["You Won't Believe It", "The Secret", "Guess What", "Top Picks"] {
        let post = NewPost {
            title: title.to_string(),
            ..draft()
        };
        assert!(service.create_post(&post).is_ok(), "title `{title}`");
    }
}

#[test]
fn content_and_summary_length_bounds() {
    let conn = open_db_in_memory().unwrap();
    let service = PostService::new(SqlitePostRepository::new(&conn));

    let short = NewPost {
        content: "x".repeat(249),
        ..draft()
    };
    assert_eq!(
        reason(&service.create_post(&short).unwrap_err()),
        "content too short"
    );

    let long_summary = NewPost {
        summary: "y".repeat(251),
        ..draft()
    };
    assert_eq!(
        reason(&service.create_post(&long_summary).unwrap_err()),
        "summary too long"
    );

    assert!(service.create_post(&draft()).is_ok());
}

#[test]
fn multibyte_text_is_measured_in_characters() {
    let conn = open_db_in_memory().unwrap();
    let service = PostService::new(SqlitePostRepository::new(&conn));

    let post = service
        .create_post(&NewPost {
            content: "ü".repeat(250),
            summary: "日".repeat(250),
            ..draft()
        })
        .unwrap();

    let (content_len, summary_len): (i64, i64) = conn
        .query_row(
            "SELECT length(content), length(summary) FROM posts WHERE id = ?1;",
            [post.id.to_string()],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!((content_len, summary_len), (250, 250));
}

#[test]
fn category_must_be_fiction_or_non_fiction() {
    let conn = open_db_in_memory().unwrap();
    let service = PostService::new(SqlitePostRepository::new(&conn));

    let err = service
        .create_post(&NewPost {
            category: "Fantasy".to_string(),
            ..draft()
        })
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::InvalidCategory(ref value)) if value == "Fantasy"
    ));

    let post = service
        .create_post(&NewPost {
            category: "Non-Fiction".to_string(),
            ..draft()
        })
        .unwrap();
    assert_eq!(post.category, PostCategory::NonFiction);
}

#[test]
fn failing_patch_is_rejected_in_full() {
    let conn = open_db_in_memory().unwrap();
    let service = PostService::new(SqlitePostRepository::new(&conn));
    let post = service.create_post(&draft()).unwrap();

    let patch = PostPatch {
        title: Some("Secret Update".to_string()),
        category: Some("Poetry".to_string()),
        ..PostPatch::default()
    };
    let err = service.update_post(post.id, &patch).unwrap_err();
    assert_eq!(reason(&err), "invalid category");
    assert_eq!(service.get_post(post.id).unwrap().unwrap(), post);

    let patch = PostPatch {
        title: Some("Secret Update".to_string()),
        category: Some("Non-Fiction".to_string()),
        ..PostPatch::default()
    };
    let updated = service.update_post(post.id, &patch).unwrap();
    assert_eq!(updated.title, "Secret Update");
    assert_eq!(updated.category, PostCategory::NonFiction);
    assert_eq!(updated.content, post.content);
    assert!(updated.updated_at >= post.updated_at);
}

#[test]
fn list_filters_by_category_and_paginates() {
    let conn = open_db_in_memory().unwrap();
    let service = PostService::new(SqlitePostRepository::new(&conn));
    for category in ["Fiction", "Non-Fiction", "Fiction"] {
        service
            .create_post(&NewPost {
                category: category.to_string(),
                ..draft()
            })
            .unwrap();
    }

    let fiction = service
        .list_posts(&PostListQuery {
            category: Some(PostCategory::Fiction),
            ..PostListQuery::default()
        })
        .unwrap();
    assert_eq!(fiction.len(), 2);
    assert!(fiction
        .iter()
        .all(|post| post.category == PostCategory::Fiction));

    let page = service
        .list_posts(&PostListQuery {
            limit: Some(2),
            offset: 2,
            ..PostListQuery::default()
        })
        .unwrap();
    assert_eq!(page.len(), 1);
}

#[test]
fn delete_removes_post_and_unknown_ids_are_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = PostService::new(SqlitePostRepository::new(&conn));
    let post = service.create_post(&draft()).unwrap();

    service.delete_post(post.id).unwrap();
    assert!(service.get_post(post.id).unwrap().is_none());

    let missing = Uuid::new_v4();
    assert!(matches!(
        service.delete_post(missing),
        Err(RepoError::NotFound { record: "post", .. })
    ));
    assert!(matches!(
        service.update_post(missing, &PostPatch::default()),
        Err(RepoError::NotFound { .. })
    ));
}

#[test]
fn in_memory_store_applies_the_same_rules() {
    let service = PostService::new(InMemoryPostRepository::new());

    assert!(service.create_post(&draft()).is_ok());
    let err = service
        .create_post(&NewPost {
            title: "Plain".to_string(),
            ..draft()
        })
        .unwrap_err();
    assert_eq!(reason(&err), "missing required phrase");
    assert_eq!(service.repository().len().unwrap(), 1);
}
