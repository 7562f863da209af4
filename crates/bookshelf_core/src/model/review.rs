//! Review record with star rating and body text.
//!
//! # Responsibility
//! - Define the review shape persisted under the `reviews` collection.
//! - Provide the partial-update type used by `update_review`.
//!
//! # Invariants
//! - `rating` is an integer in `RATING_MIN..=RATING_MAX`.
//! - At most one review exists per `(user_id, book_id)` pair; enforced by
//!   the accessor write path.
//! - `user_name` is a copy of the author's name at write time and is not
//!   kept in sync with later name changes.

use crate::model::book::BookId;
use crate::model::user::UserId;
use crate::model::{now_epoch_ms, require_non_empty, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a review.
pub type ReviewId = Uuid;

pub const RATING_MIN: u8 = 1;
pub const RATING_MAX: u8 = 5;

/// Minimum review body length in characters, after trimming.
pub const MIN_REVIEW_TEXT_CHARS: usize = 10;

/// Review record persisted in the `reviews` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    /// Weak reference to the reviewed book.
    pub book_id: BookId,
    /// Weak reference to the review author.
    pub user_id: UserId,
    /// Denormalized author display name.
    pub user_name: String,
    pub rating: u8,
    pub review_text: String,
    /// Unix epoch milliseconds.
    pub date: i64,
}

impl Review {
    /// Creates a new review with a generated stable ID and current
    /// timestamp. The body is trimmed before storage.
    pub fn new(
        book_id: BookId,
        user_id: UserId,
        user_name: impl Into<String>,
        rating: u8,
        review_text: &str,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            book_id,
            user_id,
            user_name: user_name.into(),
            rating,
            review_text: review_text.trim().to_string(),
            date: now_epoch_ms(),
        }
    }

    /// Validates the record before it is persisted.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty(&self.user_name, "userName")?;
        if !(RATING_MIN..=RATING_MAX).contains(&self.rating) {
            return Err(ValidationError::RatingOutOfRange(self.rating));
        }
        let length = self.review_text.trim().chars().count();
        if length < MIN_REVIEW_TEXT_CHARS {
            return Err(ValidationError::ReviewTooShort {
                length,
                minimum: MIN_REVIEW_TEXT_CHARS,
            });
        }
        Ok(())
    }
}

/// Field subset merged into an existing review by `update_review`.
///
/// `None` fields keep their stored values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewPatch {
    pub rating: Option<u8>,
    pub review_text: Option<String>,
}

impl ReviewPatch {
    /// Shallow-merges the present fields into `review`.
    pub fn apply(&self, review: &mut Review) {
        if let Some(rating) = self.rating {
            review.rating = rating;
        }
        if let Some(review_text) = &self.review_text {
            review.review_text = review_text.clone();
        }
    }
}
