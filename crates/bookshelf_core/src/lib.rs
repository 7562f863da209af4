//! Core domain logic for Bookshelf.
//! This crate is the single source of truth for catalogue invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::book::{Book, BookId, BookPatch, DEFAULT_COVER_IMAGE, GENRE_SUGGESTIONS};
pub use model::review::{
    Review, ReviewId, ReviewPatch, MIN_REVIEW_TEXT_CHARS, RATING_MAX, RATING_MIN,
};
pub use model::user::{User, UserId};
pub use model::ValidationError;
pub use repo::catalog_repo::{
    CatalogError, CatalogRepository, CatalogResult, SqliteCatalogRepository,
};
pub use service::auth_service::{AuthError, AuthService};
pub use service::book_service::{
    BookSearchQuery, BookService, BookServiceError, NewBook,
};
pub use service::review_service::{
    average_rating, RatingSummary, ReviewService, ReviewServiceError,
};
