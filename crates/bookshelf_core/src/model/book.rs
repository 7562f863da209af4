//! Book catalogue record.
//!
//! # Responsibility
//! - Define the book shape persisted under the `books` collection.
//! - Provide the partial-update type used by `update_book`.
//!
//! # Invariants
//! - `added_by` must reference an existing user at write time; the record
//!   may outlive that user reference afterwards.
//! - `genre` is free-form; `GENRE_SUGGESTIONS` is advisory only.

use crate::model::user::UserId;
use crate::model::{now_epoch_ms, require_non_empty, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a catalogued book.
pub type BookId = Uuid;

/// Genre choices offered by the add-book form. Not enforced on writes.
pub const GENRE_SUGGESTIONS: &[&str] = &[
    "Classic Fiction",
    "Mystery Thriller",
    "Science Fiction",
    "Fantasy",
    "Romance",
    "Historical Fiction",
    "Horror",
    "Dystopian Fiction",
    "Literary Fiction",
    "Contemporary Fiction",
    "Biography",
    "Self-Help",
    "Non-Fiction",
    "Poetry",
    "Young Adult",
];

/// Cover used when a book is added without one.
pub const DEFAULT_COVER_IMAGE: &str = "https://images.unsplash.com/photo-1652305489491-789257d2e95c?crop=entropy&cs=tinysrgb&fit=max&fm=jpg&ixid=M3w3Nzg4Nzd8MHwxfHNlYXJjaHwxfHxib29rJTIwbGlicmFyeSUyMHJlYWRpbmd8ZW58MXx8fHwxNzU5NTgzOTEwfDA&ixlib=rb-4.1.0&q=80&w=1080";

/// Catalogue record persisted in the `books` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub description: String,
    pub cover_image: String,
    /// Weak reference to the adding user.
    pub added_by: UserId,
    /// Unix epoch milliseconds.
    pub date_added: i64,
}

impl Book {
    /// Creates a new book with a generated stable ID and current timestamp.
    ///
    /// # Contract
    /// - An empty or absent `cover_image` falls back to
    ///   [`DEFAULT_COVER_IMAGE`].
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        genre: impl Into<String>,
        description: impl Into<String>,
        cover_image: Option<String>,
        added_by: UserId,
    ) -> Self {
        let cover_image = match cover_image {
            Some(url) if !url.trim().is_empty() => url,
            _ => DEFAULT_COVER_IMAGE.to_string(),
        };
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            author: author.into(),
            genre: genre.into(),
            description: description.into(),
            cover_image,
            added_by,
            date_added: now_epoch_ms(),
        }
    }

    /// Validates the record before it is persisted.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty(&self.title, "title")?;
        require_non_empty(&self.author, "author")?;
        require_non_empty(&self.genre, "genre")?;
        require_non_empty(&self.description, "description")?;
        Ok(())
    }
}

/// Field subset merged into an existing book by `update_book`.
///
/// `None` fields keep their stored values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
    pub description: Option<String>,
    pub cover_image: Option<String>,
}

impl BookPatch {
    /// Shallow-merges the present fields into `book`.
    pub fn apply(&self, book: &mut Book) {
        if let Some(title) = &self.title {
            book.title = title.clone();
        }
        if let Some(author) = &self.author {
            book.author = author.clone();
        }
        if let Some(genre) = &self.genre {
            book.genre = genre.clone();
        }
        if let Some(description) = &self.description {
            book.description = description.clone();
        }
        if let Some(cover_image) = &self.cover_image {
            book.cover_image = cover_image.clone();
        }
    }
}
