use bookshelf_core::db::migrations::latest_version;
use bookshelf_core::db::{open_store, open_store_in_memory};
use bookshelf_core::{
    Book, BookPatch, CatalogError, CatalogRepository, Review, ReviewPatch,
    SqliteCatalogRepository, User,
};
use rusqlite::Connection;
use uuid::Uuid;

fn sample_user(email: &str) -> User {
    User::new(email, "hunter2", "Reader")
}

fn sample_book(owner: &User, title: &str) -> Book {
    Book::new(
        title,
        "Some Author",
        "Fantasy",
        "A long enough description of the plot and characters.",
        None,
        owner.id,
    )
}

#[test]
fn add_and_find_user_roundtrip() {
    let conn = open_store_in_memory().unwrap();
    let repo = SqliteCatalogRepository::try_new(&conn).unwrap();

    let user = sample_user("reader@example.com");
    repo.add_user(&user).unwrap();

    let by_email = repo
        .find_user_by_email("reader@example.com")
        .unwrap()
        .unwrap();
    assert_eq!(by_email, user);

    let by_id = repo.find_user_by_id(user.id).unwrap().unwrap();
    assert_eq!(by_id, user);
}

#[test]
fn find_user_by_email_is_case_sensitive() {
    let conn = open_store_in_memory().unwrap();
    let repo = SqliteCatalogRepository::try_new(&conn).unwrap();

    let user = sample_user("reader@example.com");
    repo.add_user(&user).unwrap();

    assert!(repo
        .find_user_by_email("Reader@example.com")
        .unwrap()
        .is_none());
}

#[test]
fn add_user_rejects_duplicate_email_and_keeps_existing_record() {
    let conn = open_store_in_memory().unwrap();
    let repo = SqliteCatalogRepository::try_new(&conn).unwrap();

    let original = sample_user("reader@example.com");
    repo.add_user(&original).unwrap();

    let intruder = User::new("reader@example.com", "other-pass", "Impostor");
    let err = repo.add_user(&intruder).unwrap_err();
    assert!(matches!(err, CatalogError::DuplicateEmail(email) if email == "reader@example.com"));

    let stored = repo
        .find_user_by_email("reader@example.com")
        .unwrap()
        .unwrap();
    assert_eq!(stored, original);
}

#[test]
fn add_and_get_book_roundtrip() {
    let conn = open_store_in_memory().unwrap();
    let repo = SqliteCatalogRepository::try_new(&conn).unwrap();

    let user = sample_user("reader@example.com");
    repo.add_user(&user).unwrap();

    let book = sample_book(&user, "The Left Hand of Darkness");
    repo.add_book(&book).unwrap();

    let loaded = repo.get_book_by_id(book.id).unwrap().unwrap();
    assert_eq!(loaded, book);
}

#[test]
fn add_book_rejects_unknown_owner() {
    let conn = open_store_in_memory().unwrap();
    let repo = SqliteCatalogRepository::try_new(&conn).unwrap();

    let ghost = sample_user("ghost@example.com");
    let book = sample_book(&ghost, "Orphaned Book");

    let err = repo.add_book(&book).unwrap_err();
    assert!(matches!(err, CatalogError::UnknownUser(id) if id == ghost.id));
}

#[test]
fn add_review_rejects_unknown_references() {
    let conn = open_store_in_memory().unwrap();
    let repo = SqliteCatalogRepository::try_new(&conn).unwrap();

    let user = sample_user("reader@example.com");
    repo.add_user(&user).unwrap();

    let missing_book = Uuid::new_v4();
    let review = Review::new(missing_book, user.id, "Reader", 4, "a perfectly fine review");
    let err = repo.add_review(&review).unwrap_err();
    assert!(matches!(err, CatalogError::UnknownBook(id) if id == missing_book));

    let book = sample_book(&user, "Reviewed Book");
    repo.add_book(&book).unwrap();

    let ghost_id = Uuid::new_v4();
    let review = Review::new(book.id, ghost_id, "Ghost", 4, "a perfectly fine review");
    let err = repo.add_review(&review).unwrap_err();
    assert!(matches!(err, CatalogError::UnknownUser(id) if id == ghost_id));
}

#[test]
fn add_review_rejects_second_review_for_same_pair() {
    let conn = open_store_in_memory().unwrap();
    let repo = SqliteCatalogRepository::try_new(&conn).unwrap();

    let user = sample_user("reader@example.com");
    repo.add_user(&user).unwrap();
    let book = sample_book(&user, "Reviewed Twice");
    repo.add_book(&book).unwrap();

    let first = Review::new(book.id, user.id, "Reader", 5, "first impressions were great");
    repo.add_review(&first).unwrap();

    let second = Review::new(book.id, user.id, "Reader", 2, "changed my mind on a re-read");
    let err = repo.add_review(&second).unwrap_err();
    assert!(matches!(
        err,
        CatalogError::DuplicateReview { user_id, book_id }
            if user_id == user.id && book_id == book.id
    ));

    let reviews = repo.reviews_for_book(book.id).unwrap();
    assert_eq!(reviews, vec![first]);
}

#[test]
fn review_roundtrip_preserves_all_fields() {
    let conn = open_store_in_memory().unwrap();
    let repo = SqliteCatalogRepository::try_new(&conn).unwrap();

    let user = sample_user("reader@example.com");
    repo.add_user(&user).unwrap();
    let book = sample_book(&user, "Round Trip");
    repo.add_book(&book).unwrap();

    let review = Review::new(book.id, user.id, "Reader", 3, "solid but not spectacular");
    repo.add_review(&review).unwrap();

    let loaded = repo
        .list_reviews()
        .unwrap()
        .into_iter()
        .find(|stored| stored.id == review.id)
        .unwrap();
    assert_eq!(loaded, review);
}

#[test]
fn update_book_merges_patch_fields_only() {
    let conn = open_store_in_memory().unwrap();
    let repo = SqliteCatalogRepository::try_new(&conn).unwrap();

    let user = sample_user("reader@example.com");
    repo.add_user(&user).unwrap();
    let book = sample_book(&user, "Working Title");
    repo.add_book(&book).unwrap();

    let patch = BookPatch {
        title: Some("Final Title".to_string()),
        genre: Some("Science Fiction".to_string()),
        ..BookPatch::default()
    };
    repo.update_book(book.id, &patch).unwrap();

    let updated = repo.get_book_by_id(book.id).unwrap().unwrap();
    assert_eq!(updated.title, "Final Title");
    assert_eq!(updated.genre, "Science Fiction");
    assert_eq!(updated.author, book.author);
    assert_eq!(updated.description, book.description);
    assert_eq!(updated.cover_image, book.cover_image);
    assert_eq!(updated.added_by, book.added_by);
    assert_eq!(updated.date_added, book.date_added);
}

#[test]
fn update_review_on_missing_id_is_a_silent_noop() {
    let conn = open_store_in_memory().unwrap();
    let repo = SqliteCatalogRepository::try_new(&conn).unwrap();

    let before = repo.list_reviews().unwrap();
    let patch = ReviewPatch {
        rating: Some(2),
        ..ReviewPatch::default()
    };
    repo.update_review(Uuid::new_v4(), &patch).unwrap();

    assert_eq!(repo.list_reviews().unwrap(), before);
}

#[test]
fn update_review_rejects_invalid_merged_record() {
    let conn = open_store_in_memory().unwrap();
    let repo = SqliteCatalogRepository::try_new(&conn).unwrap();

    let user = sample_user("reader@example.com");
    repo.add_user(&user).unwrap();
    let book = sample_book(&user, "Patched Book");
    repo.add_book(&book).unwrap();
    let review = Review::new(book.id, user.id, "Reader", 4, "the original review body");
    repo.add_review(&review).unwrap();

    let patch = ReviewPatch {
        rating: Some(0),
        ..ReviewPatch::default()
    };
    let err = repo.update_review(review.id, &patch).unwrap_err();
    assert!(matches!(err, CatalogError::Validation(_)));

    let stored = repo
        .reviews_for_book(book.id)
        .unwrap()
        .into_iter()
        .next()
        .unwrap();
    assert_eq!(stored.rating, 4);
}

#[test]
fn delete_book_cascades_to_its_reviews_only() {
    let conn = open_store_in_memory().unwrap();
    let repo = SqliteCatalogRepository::try_new(&conn).unwrap();

    let user = sample_user("reader@example.com");
    repo.add_user(&user).unwrap();
    let book_one = sample_book(&user, "Doomed Book");
    let book_two = sample_book(&user, "Surviving Book");
    repo.add_book(&book_one).unwrap();
    repo.add_book(&book_two).unwrap();

    let review_one = Review::new(book_one.id, user.id, "Reader", 5, "will be removed by cascade");
    let review_two = Review::new(book_two.id, user.id, "Reader", 4, "will survive the cascade");
    repo.add_review(&review_one).unwrap();
    repo.add_review(&review_two).unwrap();

    repo.delete_book(book_one.id).unwrap();

    assert!(repo.get_book_by_id(book_one.id).unwrap().is_none());
    assert!(repo.get_book_by_id(book_two.id).unwrap().is_some());
    assert!(repo.reviews_for_book(book_one.id).unwrap().is_empty());
    assert_eq!(
        repo.reviews_for_book(book_two.id).unwrap(),
        vec![review_two]
    );
}

#[test]
fn delete_review_removes_only_the_target() {
    let conn = open_store_in_memory().unwrap();
    let repo = SqliteCatalogRepository::try_new(&conn).unwrap();

    let user = sample_user("reader@example.com");
    repo.add_user(&user).unwrap();
    let book_one = sample_book(&user, "First Book");
    let book_two = sample_book(&user, "Second Book");
    repo.add_book(&book_one).unwrap();
    repo.add_book(&book_two).unwrap();

    let review_one = Review::new(book_one.id, user.id, "Reader", 5, "kept around for contrast");
    let review_two = Review::new(book_two.id, user.id, "Reader", 2, "this one gets deleted");
    repo.add_review(&review_one).unwrap();
    repo.add_review(&review_two).unwrap();

    let before = repo.list_reviews().unwrap().len();
    repo.delete_review(review_two.id).unwrap();

    let remaining = repo.list_reviews().unwrap();
    assert_eq!(remaining.len(), before - 1);
    assert!(remaining.iter().any(|review| review.id == review_one.id));
    assert!(remaining.iter().all(|review| review.id != review_two.id));
}

#[test]
fn list_books_preserves_insertion_order() {
    let conn = open_store_in_memory().unwrap();
    let repo = SqliteCatalogRepository::try_new(&conn).unwrap();

    let user = sample_user("reader@example.com");
    repo.add_user(&user).unwrap();
    let first = sample_book(&user, "Added First");
    let second = sample_book(&user, "Added Second");
    let third = sample_book(&user, "Added Third");
    repo.add_book(&first).unwrap();
    repo.add_book(&second).unwrap();
    repo.add_book(&third).unwrap();

    let books = repo.list_books().unwrap();
    let appended: Vec<_> = books[books.len() - 3..]
        .iter()
        .map(|book| book.id)
        .collect();
    assert_eq!(appended, vec![first.id, second.id, third.id]);
}

#[test]
fn records_persist_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bookshelf.db");

    let book_id = {
        let conn = open_store(&path).unwrap();
        let repo = SqliteCatalogRepository::try_new(&conn).unwrap();
        let user = sample_user("reader@example.com");
        repo.add_user(&user).unwrap();
        let book = sample_book(&user, "Durable Book");
        repo.add_book(&book).unwrap();
        book.id
    };

    let conn = open_store(&path).unwrap();
    let repo = SqliteCatalogRepository::try_new(&conn).unwrap();
    let loaded = repo.get_book_by_id(book_id).unwrap().unwrap();
    assert_eq!(loaded.title, "Durable Book");
}

#[test]
fn try_new_rejects_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let result = SqliteCatalogRepository::try_new(&conn);
    match result {
        Err(CatalogError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn try_new_rejects_connection_without_kv_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteCatalogRepository::try_new(&conn);
    assert!(matches!(result, Err(CatalogError::MissingRequiredTable("kv"))));
}

#[test]
fn corrupt_collection_value_is_a_fatal_read_error() {
    let conn = open_store_in_memory().unwrap();
    conn.execute(
        "INSERT INTO kv (key, value) VALUES ('books', 'not json');",
        [],
    )
    .unwrap();

    let repo = SqliteCatalogRepository::try_new(&conn).unwrap();
    let err = repo.list_books().unwrap_err();
    assert!(matches!(err, CatalogError::Corrupt { key: "books", .. }));
}
