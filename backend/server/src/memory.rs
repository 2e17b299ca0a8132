use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use reviews::{NewReview, Review};
use tokio::sync::Mutex;

use crate::store::{ReviewStore, StoreError, VoteCounts};

/// Process-local store for development and tests. Every write holds the lock for its whole
/// read-modify-write.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    next_id: u64,
    reviews: BTreeMap<u64, Review>,
}

impl Inner {
    fn get_mut(&mut self, id: &str) -> Result<&mut Review, StoreError> {
        id.parse::<u64>()
            .ok()
            .and_then(|key| self.reviews.get_mut(&key))
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}

impl MemoryStore {
    pub async fn get(&self, id: &str) -> Option<Review> {
        let key = id.parse::<u64>().ok()?;
        self.inner.lock().await.reviews.get(&key).cloned()
    }

    pub async fn count(&self) -> usize {
        self.inner.lock().await.reviews.len()
    }
}

#[async_trait]
impl ReviewStore for MemoryStore {
    fn backend_tag(&self) -> &'static str {
        "memory"
    }

    async fn reviews_for_course(&self, course_code: &str) -> Result<Vec<Review>, StoreError> {
        let inner = self.inner.lock().await;

        // newest first, so ties in helpful votes keep that order after the stable sort
        let mut reviews: Vec<Review> = inner
            .reviews
            .values()
            .rev()
            .filter(|review| review.course_code == course_code)
            .cloned()
            .collect();

        reviews.sort_by(|a, b| b.helpful_votes.cmp(&a.helpful_votes));
        Ok(reviews)
    }

    async fn insert(&self, review: NewReview) -> Result<String, StoreError> {
        let mut inner = self.inner.lock().await;

        inner.next_id += 1;
        let key = inner.next_id;
        let id = key.to_string();

        inner
            .reviews
            .insert(key, review.persisted(id.clone(), Utc::now()));

        Ok(id)
    }

    async fn mark_helpful(&self, id: &str) -> Result<VoteCounts, StoreError> {
        let mut inner = self.inner.lock().await;
        let review = inner.get_mut(id)?;

        review.helpful_votes += 1;
        review.total_votes += 1;
        review.updated_at = Utc::now();

        Ok(VoteCounts {
            helpful_votes: review.helpful_votes,
            total_votes: review.total_votes,
        })
    }

    async fn report(&self, id: &str) -> Result<u32, StoreError> {
        let mut inner = self.inner.lock().await;
        let review = inner.get_mut(id)?;

        review.reported_count += 1;
        review.updated_at = Utc::now();

        Ok(review.reported_count)
    }
}
