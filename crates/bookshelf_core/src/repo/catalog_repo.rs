//! Catalogue accessor contract and SQLite key-value implementation.
//!
//! # Responsibility
//! - Provide synchronous CRUD over the `users`/`books`/`reviews`
//!   collections and the session slot.
//! - Keep key-value encoding details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths validate records and weak references before persisting.
//! - Collections are read and written whole; storage order is insertion
//!   order.
//! - Seeding writes a collection key only when that key is entirely absent.
//! - Deleting a book removes its reviews in the same transaction.
//! - No cross-process coordination: two processes sharing one store file
//!   can interleave read-modify-write cycles and the last write wins.

use crate::db::StoreError;
use crate::model::book::{Book, BookId, BookPatch};
use crate::model::review::{Review, ReviewId, ReviewPatch};
use crate::model::user::{User, UserId};
use crate::model::ValidationError;
use crate::repo::seed;
use log::info;
use rusqlite::{params, Connection};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

const USERS_KEY: &str = "users";
const BOOKS_KEY: &str = "books";
const REVIEWS_KEY: &str = "reviews";
const SESSION_KEY: &str = "currentUser";

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Accessor error for catalogue persistence and consistency checks.
#[derive(Debug)]
pub enum CatalogError {
    Store(StoreError),
    /// Persisted value under `key` failed to decode. Fatal: the store is
    /// corrupt and this layer does not attempt repair.
    Corrupt { key: &'static str, detail: String },
    Validation(ValidationError),
    DuplicateEmail(String),
    DuplicateReview { user_id: UserId, book_id: BookId },
    UnknownUser(UserId),
    UnknownBook(BookId),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Corrupt { key, detail } => {
                write!(f, "corrupt store value under `{key}`: {detail}")
            }
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicateEmail(email) => write!(f, "email already registered: `{email}`"),
            Self::DuplicateReview { user_id, book_id } => {
                write!(f, "user {user_id} already reviewed book {book_id}")
            }
            Self::UnknownUser(id) => write!(f, "unknown user reference: {id}"),
            Self::UnknownBook(id) => write!(f, "unknown book reference: {id}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection not migrated: store version {actual_version}, expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "missing required table `{table}`")
            }
        }
    }
}

impl Error for CatalogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for CatalogError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<rusqlite::Error> for CatalogError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Store(StoreError::Sqlite(value))
    }
}

impl From<ValidationError> for CatalogError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Accessor interface for the three catalogue collections and the session
/// slot.
///
/// All operations are synchronous and operate on whole collections; lookup
/// misses are `Ok(None)`/empty results, never errors.
pub trait CatalogRepository {
    /// Returns all users in storage order, seeding a fresh store first.
    fn list_users(&self) -> CatalogResult<Vec<User>>;
    /// Returns all books in storage order, seeding a fresh store first.
    fn list_books(&self) -> CatalogResult<Vec<Book>>;
    /// Returns all reviews in storage order, seeding a fresh store first.
    fn list_reviews(&self) -> CatalogResult<Vec<Review>>;
    /// Appends one user. Rejects a duplicate email with `DuplicateEmail`.
    fn add_user(&self, user: &User) -> CatalogResult<UserId>;
    /// Appends one book. Rejects an unknown `added_by` with `UnknownUser`.
    fn add_book(&self, book: &Book) -> CatalogResult<BookId>;
    /// Appends one review. Rejects unknown references and a second review
    /// for the same `(user, book)` pair.
    fn add_review(&self, review: &Review) -> CatalogResult<ReviewId>;
    /// First user whose email matches exactly (case-sensitive).
    fn find_user_by_email(&self, email: &str) -> CatalogResult<Option<User>>;
    /// User by stable ID.
    fn find_user_by_id(&self, id: UserId) -> CatalogResult<Option<User>>;
    /// Book by stable ID.
    fn get_book_by_id(&self, id: BookId) -> CatalogResult<Option<Book>>;
    /// Reviews for one book, original relative order preserved.
    fn reviews_for_book(&self, book_id: BookId) -> CatalogResult<Vec<Review>>;
    /// Reviews written by one user, original relative order preserved.
    fn reviews_by_user(&self, user_id: UserId) -> CatalogResult<Vec<Review>>;
    /// Merges the present patch fields into the stored book. A missing id
    /// is a silent no-op.
    fn update_book(&self, id: BookId, patch: &BookPatch) -> CatalogResult<()>;
    /// Merges the present patch fields into the stored review. A missing id
    /// is a silent no-op.
    fn update_review(&self, id: ReviewId, patch: &ReviewPatch) -> CatalogResult<()>;
    /// Removes the book and every review referencing it, atomically.
    fn delete_book(&self, id: BookId) -> CatalogResult<()>;
    /// Removes one review. No cascade.
    fn delete_review(&self, id: ReviewId) -> CatalogResult<()>;
    /// Persists the session pointer; `None` removes the underlying key
    /// entirely.
    fn set_session(&self, user: Option<&User>) -> CatalogResult<()>;
    /// Returns the persisted session user, if any.
    fn session(&self) -> CatalogResult<Option<User>>;
}

/// SQLite-backed catalogue accessor over the `kv` table.
pub struct SqliteCatalogRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCatalogRepository<'conn> {
    /// Constructs an accessor from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> CatalogResult<Self> {
        ensure_store_ready(conn)?;
        Ok(Self { conn })
    }

    fn ensure_seeded(&self) -> CatalogResult<()> {
        if kv_read(self.conn, USERS_KEY)?.is_none() {
            let users = vec![seed::demo_user()];
            kv_write(self.conn, USERS_KEY, &encode(USERS_KEY, &users)?)?;
            info!(
                "event=seed_collection module=repo status=ok key={USERS_KEY} count={}",
                users.len()
            );
        }
        if kv_read(self.conn, BOOKS_KEY)?.is_none() {
            let books = seed::sample_books();
            kv_write(self.conn, BOOKS_KEY, &encode(BOOKS_KEY, &books)?)?;
            info!(
                "event=seed_collection module=repo status=ok key={BOOKS_KEY} count={}",
                books.len()
            );
        }
        if kv_read(self.conn, REVIEWS_KEY)?.is_none() {
            let reviews = seed::sample_reviews();
            kv_write(self.conn, REVIEWS_KEY, &encode(REVIEWS_KEY, &reviews)?)?;
            info!(
                "event=seed_collection module=repo status=ok key={REVIEWS_KEY} count={}",
                reviews.len()
            );
        }
        Ok(())
    }

    fn load_users(&self) -> CatalogResult<Vec<User>> {
        self.ensure_seeded()?;
        match kv_read(self.conn, USERS_KEY)? {
            Some(raw) => decode(USERS_KEY, &raw),
            None => Ok(Vec::new()),
        }
    }

    fn load_books(&self) -> CatalogResult<Vec<Book>> {
        self.ensure_seeded()?;
        match kv_read(self.conn, BOOKS_KEY)? {
            Some(raw) => decode(BOOKS_KEY, &raw),
            None => Ok(Vec::new()),
        }
    }

    fn load_reviews(&self) -> CatalogResult<Vec<Review>> {
        self.ensure_seeded()?;
        match kv_read(self.conn, REVIEWS_KEY)? {
            Some(raw) => decode(REVIEWS_KEY, &raw),
            None => Ok(Vec::new()),
        }
    }

    fn store_books(&self, books: &[Book]) -> CatalogResult<()> {
        kv_write(self.conn, BOOKS_KEY, &encode(BOOKS_KEY, &books)?)
    }

    fn store_reviews(&self, reviews: &[Review]) -> CatalogResult<()> {
        kv_write(self.conn, REVIEWS_KEY, &encode(REVIEWS_KEY, &reviews)?)
    }
}

impl CatalogRepository for SqliteCatalogRepository<'_> {
    fn list_users(&self) -> CatalogResult<Vec<User>> {
        self.load_users()
    }

    fn list_books(&self) -> CatalogResult<Vec<Book>> {
        self.load_books()
    }

    fn list_reviews(&self) -> CatalogResult<Vec<Review>> {
        self.load_reviews()
    }

    fn add_user(&self, user: &User) -> CatalogResult<UserId> {
        user.validate()?;

        let mut users = self.load_users()?;
        if users.iter().any(|existing| existing.email == user.email) {
            return Err(CatalogError::DuplicateEmail(user.email.clone()));
        }

        users.push(user.clone());
        kv_write(self.conn, USERS_KEY, &encode(USERS_KEY, &users)?)?;
        Ok(user.id)
    }

    fn add_book(&self, book: &Book) -> CatalogResult<BookId> {
        book.validate()?;

        if self.find_user_by_id(book.added_by)?.is_none() {
            return Err(CatalogError::UnknownUser(book.added_by));
        }

        let mut books = self.load_books()?;
        books.push(book.clone());
        self.store_books(&books)?;
        Ok(book.id)
    }

    fn add_review(&self, review: &Review) -> CatalogResult<ReviewId> {
        review.validate()?;

        if self.find_user_by_id(review.user_id)?.is_none() {
            return Err(CatalogError::UnknownUser(review.user_id));
        }
        if self.get_book_by_id(review.book_id)?.is_none() {
            return Err(CatalogError::UnknownBook(review.book_id));
        }

        let mut reviews = self.load_reviews()?;
        if reviews
            .iter()
            .any(|existing| existing.user_id == review.user_id && existing.book_id == review.book_id)
        {
            return Err(CatalogError::DuplicateReview {
                user_id: review.user_id,
                book_id: review.book_id,
            });
        }

        reviews.push(review.clone());
        self.store_reviews(&reviews)?;
        Ok(review.id)
    }

    fn find_user_by_email(&self, email: &str) -> CatalogResult<Option<User>> {
        let users = self.load_users()?;
        Ok(users.into_iter().find(|user| user.email == email))
    }

    fn find_user_by_id(&self, id: UserId) -> CatalogResult<Option<User>> {
        let users = self.load_users()?;
        Ok(users.into_iter().find(|user| user.id == id))
    }

    fn get_book_by_id(&self, id: BookId) -> CatalogResult<Option<Book>> {
        let books = self.load_books()?;
        Ok(books.into_iter().find(|book| book.id == id))
    }

    fn reviews_for_book(&self, book_id: BookId) -> CatalogResult<Vec<Review>> {
        let reviews = self.load_reviews()?;
        Ok(reviews
            .into_iter()
            .filter(|review| review.book_id == book_id)
            .collect())
    }

    fn reviews_by_user(&self, user_id: UserId) -> CatalogResult<Vec<Review>> {
        let reviews = self.load_reviews()?;
        Ok(reviews
            .into_iter()
            .filter(|review| review.user_id == user_id)
            .collect())
    }

    fn update_book(&self, id: BookId, patch: &BookPatch) -> CatalogResult<()> {
        let mut books = self.load_books()?;
        let Some(book) = books.iter_mut().find(|book| book.id == id) else {
            return Ok(());
        };

        patch.apply(book);
        book.validate()?;
        self.store_books(&books)
    }

    fn update_review(&self, id: ReviewId, patch: &ReviewPatch) -> CatalogResult<()> {
        let mut reviews = self.load_reviews()?;
        let Some(review) = reviews.iter_mut().find(|review| review.id == id) else {
            return Ok(());
        };

        patch.apply(review);
        review.validate()?;
        self.store_reviews(&reviews)
    }

    fn delete_book(&self, id: BookId) -> CatalogResult<()> {
        let books = self.load_books()?;
        let reviews = self.load_reviews()?;

        let removed_reviews = reviews
            .iter()
            .filter(|review| review.book_id == id)
            .count();
        let remaining_books: Vec<Book> =
            books.into_iter().filter(|book| book.id != id).collect();
        let remaining_reviews: Vec<Review> = reviews
            .into_iter()
            .filter(|review| review.book_id != id)
            .collect();

        let tx = self.conn.unchecked_transaction()?;
        kv_write(&tx, BOOKS_KEY, &encode(BOOKS_KEY, &remaining_books)?)?;
        kv_write(&tx, REVIEWS_KEY, &encode(REVIEWS_KEY, &remaining_reviews)?)?;
        tx.commit()?;

        info!(
            "event=book_delete module=repo status=ok book_id={id} removed_reviews={removed_reviews}"
        );
        Ok(())
    }

    fn delete_review(&self, id: ReviewId) -> CatalogResult<()> {
        let reviews = self.load_reviews()?;
        let remaining: Vec<Review> = reviews
            .into_iter()
            .filter(|review| review.id != id)
            .collect();
        self.store_reviews(&remaining)
    }

    fn set_session(&self, user: Option<&User>) -> CatalogResult<()> {
        match user {
            Some(user) => kv_write(self.conn, SESSION_KEY, &encode(SESSION_KEY, user)?),
            None => kv_delete(self.conn, SESSION_KEY),
        }
    }

    fn session(&self) -> CatalogResult<Option<User>> {
        match kv_read(self.conn, SESSION_KEY)? {
            Some(raw) => Ok(Some(decode(SESSION_KEY, &raw)?)),
            None => Ok(None),
        }
    }
}

fn ensure_store_ready(conn: &Connection) -> CatalogResult<()> {
    let expected_version = crate::db::migrations::latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(CatalogError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "kv")? {
        return Err(CatalogError::MissingRequiredTable("kv"));
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> CatalogResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn kv_read(conn: &Connection, key: &str) -> CatalogResult<Option<String>> {
    let mut stmt = conn.prepare("SELECT value FROM kv WHERE key = ?1;")?;
    let mut rows = stmt.query([key])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(row.get(0)?));
    }
    Ok(None)
}

fn kv_write(conn: &Connection, key: &str, value: &str) -> CatalogResult<()> {
    conn.execute(
        "INSERT INTO kv (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value;",
        params![key, value],
    )?;
    Ok(())
}

fn kv_delete(conn: &Connection, key: &str) -> CatalogResult<()> {
    conn.execute("DELETE FROM kv WHERE key = ?1;", [key])?;
    Ok(())
}

fn encode<T: Serialize>(key: &'static str, value: &T) -> CatalogResult<String> {
    serde_json::to_string(value).map_err(|err| CatalogError::Corrupt {
        key,
        detail: err.to_string(),
    })
}

fn decode<T: DeserializeOwned>(key: &'static str, raw: &str) -> CatalogResult<T> {
    serde_json::from_str(raw).map_err(|err| CatalogError::Corrupt {
        key,
        detail: err.to_string(),
    })
}
