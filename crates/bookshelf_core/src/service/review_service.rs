//! Review use-case service and on-demand rating aggregation.
//!
//! # Responsibility
//! - Provide submit/delete/list entry points for reviews.
//! - Derive average ratings from fresh collection reads; nothing is cached
//!   or stored.
//!
//! # Invariants
//! - An empty review set has no average ("no value", never zero).
//! - `user_name` is denormalized from the acting user at submit time.
//! - Only the review author may delete a review.

use crate::model::book::BookId;
use crate::model::review::{Review, ReviewId};
use crate::model::user::{User, UserId};
use crate::model::ValidationError;
use crate::repo::catalog_repo::{CatalogError, CatalogRepository, CatalogResult};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for review use-cases.
#[derive(Debug)]
pub enum ReviewServiceError {
    /// Target review does not exist.
    ReviewNotFound(ReviewId),
    /// The acting user already reviewed this book.
    AlreadyReviewed { user_id: UserId, book_id: BookId },
    /// Acting user is not the review author.
    NotOwner { review_id: ReviewId, user_id: UserId },
    /// Candidate record failed validation.
    Validation(ValidationError),
    /// Persistence-layer failure.
    Catalog(CatalogError),
}

impl Display for ReviewServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReviewNotFound(id) => write!(f, "review not found: {id}"),
            Self::AlreadyReviewed { user_id, book_id } => {
                write!(f, "user {user_id} already reviewed book {book_id}")
            }
            Self::NotOwner { review_id, user_id } => {
                write!(f, "user {user_id} does not own review {review_id}")
            }
            Self::Validation(err) => write!(f, "{err}"),
            Self::Catalog(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ReviewServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Catalog(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CatalogError> for ReviewServiceError {
    fn from(value: CatalogError) -> Self {
        match value {
            CatalogError::DuplicateReview { user_id, book_id } => {
                Self::AlreadyReviewed { user_id, book_id }
            }
            CatalogError::Validation(err) => Self::Validation(err),
            other => Self::Catalog(other),
        }
    }
}

/// Derived rating aggregate for a book or a user.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingSummary {
    pub review_count: usize,
    /// Arithmetic mean of ratings; `None` when there are no reviews.
    pub average: Option<f64>,
}

/// Arithmetic mean of the ratings in `reviews`.
///
/// Returns `None` for an empty set. A computed zero cannot occur since
/// ratings are 1..=5, so `None` is unambiguous.
pub fn average_rating(reviews: &[Review]) -> Option<f64> {
    if reviews.is_empty() {
        return None;
    }
    let total: u32 = reviews.iter().map(|review| u32::from(review.rating)).sum();
    Some(f64::from(total) / reviews.len() as f64)
}

/// Use-case service for reviews.
pub struct ReviewService<R: CatalogRepository> {
    repo: R,
}

impl<R: CatalogRepository> ReviewService<R> {
    /// Creates a service using the provided accessor implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Submits a review on behalf of `user`.
    ///
    /// # Contract
    /// - The body is trimmed; `user_name` is copied from the acting user.
    /// - `AlreadyReviewed` when the user has reviewed this book before.
    pub fn submit_review(
        &self,
        user: &User,
        book_id: BookId,
        rating: u8,
        review_text: &str,
    ) -> Result<Review, ReviewServiceError> {
        let review = Review::new(book_id, user.id, user.name.clone(), rating, review_text);
        self.repo.add_review(&review)?;
        Ok(review)
    }

    /// Deletes a review authored by `user`.
    ///
    /// # Contract
    /// - `ReviewNotFound` when the id does not resolve.
    /// - `NotOwner` when the review belongs to another user.
    pub fn delete_review(&self, user: &User, id: ReviewId) -> Result<(), ReviewServiceError> {
        let reviews = self.repo.list_reviews()?;
        let Some(review) = reviews.iter().find(|review| review.id == id) else {
            return Err(ReviewServiceError::ReviewNotFound(id));
        };
        if review.user_id != user.id {
            return Err(ReviewServiceError::NotOwner {
                review_id: id,
                user_id: user.id,
            });
        }

        self.repo.delete_review(id)?;
        Ok(())
    }

    /// Reviews for one book, original order preserved.
    pub fn reviews_for_book(&self, book_id: BookId) -> CatalogResult<Vec<Review>> {
        self.repo.reviews_for_book(book_id)
    }

    /// Reviews written by one user, original order preserved.
    pub fn reviews_by_user(&self, user_id: UserId) -> CatalogResult<Vec<Review>> {
        self.repo.reviews_by_user(user_id)
    }

    /// Rating aggregate for one book, derived on demand.
    pub fn book_rating(&self, book_id: BookId) -> CatalogResult<RatingSummary> {
        let reviews = self.repo.reviews_for_book(book_id)?;
        Ok(RatingSummary {
            review_count: reviews.len(),
            average: average_rating(&reviews),
        })
    }

    /// Rating aggregate across one user's reviews, derived on demand.
    pub fn user_rating(&self, user_id: UserId) -> CatalogResult<RatingSummary> {
        let reviews = self.repo.reviews_by_user(user_id)?;
        Ok(RatingSummary {
            review_count: reviews.len(),
            average: average_rating(&reviews),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::average_rating;
    use crate::model::review::Review;
    use uuid::Uuid;

    fn review(rating: u8) -> Review {
        Review::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "Reader",
            rating,
            "long enough review body",
        )
    }

    #[test]
    fn average_of_empty_set_is_none() {
        assert_eq!(average_rating(&[]), None);
    }

    #[test]
    fn average_is_arithmetic_mean() {
        let reviews = [review(5), review(5), review(4)];
        let average = average_rating(&reviews).expect("non-empty set has an average");
        assert!((average - 4.67).abs() < 0.005);
    }

    #[test]
    fn average_of_single_review_is_its_rating() {
        let reviews = [review(3)];
        assert_eq!(average_rating(&reviews), Some(3.0));
    }
}
