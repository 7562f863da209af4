//! Book catalogue use-case service.
//!
//! # Responsibility
//! - Provide add/list/search/delete entry points for catalogue callers.
//! - Enforce that only the user who added a book may delete it.
//!
//! # Invariants
//! - Search text matches title or author, case-insensitively; genre
//!   filtering is an exact match.
//! - Deletion goes through the accessor's cascading `delete_book`.

use crate::model::book::{Book, BookId, BookPatch};
use crate::model::user::{User, UserId};
use crate::model::ValidationError;
use crate::repo::catalog_repo::{CatalogError, CatalogRepository, CatalogResult};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for book use-cases.
#[derive(Debug)]
pub enum BookServiceError {
    /// Target book does not exist.
    BookNotFound(BookId),
    /// Acting user did not add the target book.
    NotOwner { book_id: BookId, user_id: UserId },
    /// Candidate record failed validation.
    Validation(ValidationError),
    /// Persistence-layer failure.
    Catalog(CatalogError),
}

impl Display for BookServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BookNotFound(id) => write!(f, "book not found: {id}"),
            Self::NotOwner { book_id, user_id } => {
                write!(f, "user {user_id} does not own book {book_id}")
            }
            Self::Validation(err) => write!(f, "{err}"),
            Self::Catalog(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BookServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Catalog(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CatalogError> for BookServiceError {
    fn from(value: CatalogError) -> Self {
        match value {
            CatalogError::Validation(err) => Self::Validation(err),
            other => Self::Catalog(other),
        }
    }
}

/// Request model for adding a book to the catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub description: String,
    /// Empty or absent falls back to the default cover.
    pub cover_image: Option<String>,
}

/// Filter options for listing books.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookSearchQuery {
    /// Case-insensitive substring over title and author.
    pub text: Option<String>,
    /// Exact genre match.
    pub genre: Option<String>,
}

/// Use-case service for catalogue books.
pub struct BookService<R: CatalogRepository> {
    repo: R,
}

impl<R: CatalogRepository> BookService<R> {
    /// Creates a service using the provided accessor implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Adds a book on behalf of `user`.
    ///
    /// # Contract
    /// - `added_by` is the acting user; a fresh stable ID and current
    ///   timestamp are assigned.
    /// - An empty cover image falls back to the default cover.
    pub fn add_book(&self, user: &User, request: NewBook) -> Result<Book, BookServiceError> {
        let book = Book::new(
            request.title,
            request.author,
            request.genre,
            request.description,
            request.cover_image,
            user.id,
        );
        self.repo.add_book(&book)?;
        Ok(book)
    }

    /// Lists all books in storage order.
    pub fn list_books(&self) -> CatalogResult<Vec<Book>> {
        self.repo.list_books()
    }

    /// Gets one book by stable ID.
    pub fn get_book(&self, id: BookId) -> CatalogResult<Option<Book>> {
        self.repo.get_book_by_id(id)
    }

    /// Merges patch fields into an existing book; missing id is a no-op.
    pub fn update_book(&self, id: BookId, patch: &BookPatch) -> CatalogResult<()> {
        self.repo.update_book(id, patch)
    }

    /// Lists books matching the query, storage order preserved.
    pub fn search(&self, query: &BookSearchQuery) -> CatalogResult<Vec<Book>> {
        let needle = query
            .text
            .as_deref()
            .map(|text| text.trim().to_lowercase())
            .filter(|text| !text.is_empty());

        let books = self.repo.list_books()?;
        Ok(books
            .into_iter()
            .filter(|book| {
                let text_matches = needle.as_deref().map_or(true, |needle| {
                    book.title.to_lowercase().contains(needle)
                        || book.author.to_lowercase().contains(needle)
                });
                let genre_matches = query
                    .genre
                    .as_deref()
                    .map_or(true, |genre| book.genre == genre);
                text_matches && genre_matches
            })
            .collect())
    }

    /// Distinct genres currently in the catalogue, sorted by name.
    pub fn genres(&self) -> CatalogResult<Vec<String>> {
        let books = self.repo.list_books()?;
        let genres: BTreeSet<String> = books.into_iter().map(|book| book.genre).collect();
        Ok(genres.into_iter().collect())
    }

    /// Deletes a book and its reviews.
    ///
    /// # Contract
    /// - Only the user who added the book may delete it (`NotOwner`).
    /// - `BookNotFound` when the id does not resolve.
    pub fn delete_book(&self, user: &User, id: BookId) -> Result<(), BookServiceError> {
        let Some(book) = self.repo.get_book_by_id(id)? else {
            return Err(BookServiceError::BookNotFound(id));
        };
        if book.added_by != user.id {
            return Err(BookServiceError::NotOwner {
                book_id: id,
                user_id: user.id,
            });
        }

        self.repo.delete_book(id)?;
        Ok(())
    }
}
