use std::borrow::Cow;

use chrono::NaiveDateTime;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{wire::lenient_datetime, Client, CourseId, Result, ReviewId, UserId};

/// How many characters of a comment are shown before it's cut off
pub const COMMENT_PREVIEW_CHARS: usize = 120;

/// A student's review of a course
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(default)]
    pub id: Option<ReviewId>,
    pub course_id: CourseId,

    /// Assigned by the server
    #[serde(default)]
    pub user_id: Option<UserId>,

    /// From 1 to 5
    pub rating: u8,
    #[serde(default)]
    pub title: Option<String>,
    pub comment: String,

    #[serde(default, deserialize_with = "lenient_datetime")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub updated_at: Option<NaiveDateTime>,
}

/// A review the user is writing
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDraft {
    pub course_id: CourseId,
    pub rating: u8,
    pub title: String,
    pub comment: String,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ReviewError {
    #[error("a comment is required")]
    EmptyComment,

    #[error("rating must be between 1 and 5, not {}", .0)]
    RatingOutOfRange(u8),
}

impl ReviewDraft {
    /// A blank draft, with the default rating of 5
    pub fn new(course_id: CourseId) -> Self {
        Self {
            course_id,
            rating: 5,
            title: String::new(),
            comment: String::new(),
        }
    }

    pub fn validate(&self) -> Result<(), ReviewError> {
        if !(1..=5).contains(&self.rating) {
            return Err(ReviewError::RatingOutOfRange(self.rating));
        }
        if self.comment.trim().is_empty() {
            return Err(ReviewError::EmptyComment);
        }

        Ok(())
    }
}

/// Mean rating of the given reviews, or 0 if there aren't any
pub fn average_rating(reviews: &[Review]) -> f32 {
    if reviews.is_empty() {
        return 0.0;
    }

    let sum: u32 = reviews.iter().map(|r| r.rating as u32).sum();
    sum as f32 / reviews.len() as f32
}

/// Cut a comment down to `max` characters, marking that it continues
pub fn truncate_comment(comment: &str, max: usize) -> Cow<'_, str> {
    match comment.char_indices().nth(max) {
        Some((end, _)) => Cow::Owned(format!("{}...", &comment[..end])),
        None => Cow::Borrowed(comment),
    }
}

impl Client {
    pub fn course_reviews(&self, course_id: CourseId) -> Result<Vec<Review>> {
        self.get_with_query("reviews", &[("courseId", course_id.to_string())])
    }

    /// Submit a review. Invalid drafts are rejected before anything is sent.
    pub fn create_review(&self, review: &ReviewDraft) -> Result<Review> {
        review.validate()?;
        self.send(Method::POST, "reviews", review)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_comments_are_not_truncated() {
        assert_eq!(truncate_comment("fine", 120), "fine");
        assert_eq!(truncate_comment("abc", 3), "abc");
    }

    #[test]
    fn long_comments_are_truncated_on_char_boundaries() {
        assert_eq!(truncate_comment("abcdef", 3), "abc...");
        assert_eq!(truncate_comment("ñañaña", 2), "ña...");
    }
}
