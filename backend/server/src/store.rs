use std::time::Duration;

use async_trait::async_trait;
use redis::RedisError;
use reviews::{NewReview, Review};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Review {0} does not exist")]
    NotFound(String),

    #[error("Redis error: {0}")]
    Redis(#[from] RedisError),

    #[error("Store did not answer within {0:?}")]
    Timeout(Duration),

    #[error("Corrupt review record {id}: {reason}")]
    Corrupt { id: String, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteCounts {
    pub helpful_votes: u32,
    pub total_votes: u32,
}

/// Persistence boundary for reviews.
///
/// Implementations assign ids and timestamps themselves and perform every counter update
/// as one atomic operation, so concurrent votes on the same review are never lost.
#[async_trait]
pub trait ReviewStore: Send + Sync {
    fn backend_tag(&self) -> &'static str;

    /// All reviews with exactly this course code, most helpful first.
    async fn reviews_for_course(&self, course_code: &str) -> Result<Vec<Review>, StoreError>;

    /// Persists the review and returns its generated id.
    async fn insert(&self, review: NewReview) -> Result<String, StoreError>;

    async fn mark_helpful(&self, id: &str) -> Result<VoteCounts, StoreError>;

    /// Returns the new report count.
    async fn report(&self, id: &str) -> Result<u32, StoreError>;
}
