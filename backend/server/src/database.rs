//! # Redis Layout
//!
//! - `{prefix}:review:next_id` (**int**): counter, `INCR` hands out review ids.
//!
//! - `{prefix}:review:{id}` (**hash**): every review field as a string. Optional ratings and
//!   the author email are simply missing when absent. Timestamps are epoch milliseconds.
//!
//! - `{prefix}:course:{courseCode}` (**sorted set**): review ids scored by helpful votes.
//!   `ZREVRANGE` gives the display order without sorting in the server.
//!
//! ## Notes
//! - Inserts and counter updates run as Lua scripts. The existence check, the increments,
//!   the sorted set score and the `updatedAt` refresh happen in one step on the Redis side,
//!   so two votes racing on the same review both land.
//!
//! - Timestamps come from Redis `TIME`, never from the web server clock.
use std::{collections::HashMap, future::Future, sync::LazyLock, time::Duration};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::{
    Client, RedisResult, Script,
    aio::{ConnectionManager, ConnectionManagerConfig},
};
use reviews::{NewReview, Review};
use tokio::time::timeout;
use tracing::info;

use crate::store::{ReviewStore, StoreError, VoteCounts};

static INSERT: LazyLock<Script> = LazyLock::new(|| {
    Script::new(
        r"
        local id = redis.call('INCR', KEYS[1])
        local t = redis.call('TIME')
        local now = tonumber(t[1]) * 1000 + math.floor(tonumber(t[2]) / 1000)
        redis.call('HSET', ARGV[1] .. id, 'id', id, 'createdAt', now, 'updatedAt', now, unpack(ARGV, 2))
        redis.call('ZADD', KEYS[2], 0, id)
        return id
        ",
    )
});

static MARK_HELPFUL: LazyLock<Script> = LazyLock::new(|| {
    Script::new(
        r"
        if redis.call('EXISTS', KEYS[1]) == 0 then
            return false
        end
        local t = redis.call('TIME')
        local now = tonumber(t[1]) * 1000 + math.floor(tonumber(t[2]) / 1000)
        local helpful = redis.call('HINCRBY', KEYS[1], 'helpfulVotes', 1)
        local total = redis.call('HINCRBY', KEYS[1], 'totalVotes', 1)
        redis.call('HSET', KEYS[1], 'updatedAt', now)
        local course = redis.call('HGET', KEYS[1], 'courseCode')
        redis.call('ZADD', ARGV[1] .. course, helpful, ARGV[2])
        return {helpful, total}
        ",
    )
});

static REPORT: LazyLock<Script> = LazyLock::new(|| {
    Script::new(
        r"
        if redis.call('EXISTS', KEYS[1]) == 0 then
            return false
        end
        local t = redis.call('TIME')
        local now = tonumber(t[1]) * 1000 + math.floor(tonumber(t[2]) / 1000)
        local reported = redis.call('HINCRBY', KEYS[1], 'reportedCount', 1)
        redis.call('HSET', KEYS[1], 'updatedAt', now)
        return reported
        ",
    )
});

pub async fn init_redis(redis_url: &str, retries: usize) -> RedisResult<ConnectionManager> {
    let config = ConnectionManagerConfig::new().set_number_of_retries(retries);

    let client = Client::open(redis_url)?;
    client.get_connection_manager_with_config(config).await
}

pub struct RedisStore {
    connection: ConnectionManager,
    prefix: String,
    timeout: Duration,
}

impl RedisStore {
    pub async fn connect(
        redis_url: &str,
        prefix: &str,
        retries: usize,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let connection = init_redis(redis_url, retries).await?;
        info!("Connected to Redis with key prefix {prefix}");

        Ok(Self {
            connection,
            prefix: prefix.to_string(),
            timeout,
        })
    }

    fn review_prefix(&self) -> String {
        format!("{}:review:", self.prefix)
    }

    fn review_key(&self, id: &str) -> String {
        format!("{}:review:{id}", self.prefix)
    }

    // Ids are INCR values, anything else would address a foreign key such as the counter.
    fn existing_review_key(&self, id: &str) -> Result<String, StoreError> {
        if is_review_id(id) {
            Ok(self.review_key(id))
        } else {
            Err(StoreError::NotFound(id.to_string()))
        }
    }

    fn course_prefix(&self) -> String {
        format!("{}:course:", self.prefix)
    }

    fn course_key(&self, course_code: &str) -> String {
        format!("{}:course:{course_code}", self.prefix)
    }

    async fn bounded<T>(&self, op: impl Future<Output = RedisResult<T>>) -> Result<T, StoreError> {
        timeout(self.timeout, op)
            .await
            .map_err(|_| StoreError::Timeout(self.timeout))?
            .map_err(StoreError::from)
    }
}

#[async_trait]
impl ReviewStore for RedisStore {
    fn backend_tag(&self) -> &'static str {
        "redis"
    }

    async fn reviews_for_course(&self, course_code: &str) -> Result<Vec<Review>, StoreError> {
        let mut connection = self.connection.clone();

        let ids: Vec<String> = self
            .bounded(
                redis::cmd("ZREVRANGE")
                    .arg(self.course_key(course_code))
                    .arg(0)
                    .arg(-1)
                    .query_async(&mut connection),
            )
            .await?;

        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut pipe = redis::pipe();
        for id in &ids {
            pipe.hgetall(self.review_key(id));
        }

        let rows: Vec<HashMap<String, String>> =
            self.bounded(pipe.query_async(&mut connection)).await?;

        rows.into_iter()
            .zip(&ids)
            .filter(|(fields, _)| !fields.is_empty())
            .map(|(fields, id)| decode_review(id, &fields))
            .collect()
    }

    async fn insert(&self, review: NewReview) -> Result<String, StoreError> {
        let mut connection = self.connection.clone();

        let mut invocation = INSERT.key(format!("{}:review:next_id", self.prefix));
        invocation
            .key(self.course_key(&review.course_code))
            .arg(self.review_prefix());

        for (field, value) in encode_review(&review) {
            invocation.arg(field).arg(value);
        }

        let id: i64 = self
            .bounded(invocation.invoke_async(&mut connection))
            .await?;

        Ok(id.to_string())
    }

    async fn mark_helpful(&self, id: &str) -> Result<VoteCounts, StoreError> {
        let key = self.existing_review_key(id)?;
        let mut connection = self.connection.clone();

        let counts: Option<(u32, u32)> = self
            .bounded(
                MARK_HELPFUL
                    .key(key)
                    .arg(self.course_prefix())
                    .arg(id)
                    .invoke_async(&mut connection),
            )
            .await?;

        let (helpful_votes, total_votes) =
            counts.ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        Ok(VoteCounts {
            helpful_votes,
            total_votes,
        })
    }

    async fn report(&self, id: &str) -> Result<u32, StoreError> {
        let key = self.existing_review_key(id)?;
        let mut connection = self.connection.clone();

        let reported: Option<u32> = self
            .bounded(
                REPORT
                    .key(key)
                    .invoke_async(&mut connection),
            )
            .await?;

        reported.ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}

fn is_review_id(id: &str) -> bool {
    !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit())
}

fn encode_review(review: &NewReview) -> Vec<(&'static str, String)> {
    let mut fields = vec![
        ("courseCode", review.course_code.clone()),
        ("courseName", review.course_name.clone()),
        ("collegeCode", review.college_code.clone()),
        ("subjectCode", review.subject_code.clone()),
        ("courseNumber", review.course_number.clone()),
        ("rating", review.rating.to_string()),
        ("reviewText", review.review_text.clone()),
        ("semesterTaken", review.semester_taken.clone()),
        ("isAnonymous", review.is_anonymous.to_string()),
        ("authorName", review.author_name.clone()),
        ("verified", review.verified.to_string()),
        ("helpfulVotes", review.helpful_votes.to_string()),
        ("totalVotes", review.total_votes.to_string()),
        ("reportedCount", review.reported_count.to_string()),
    ];

    for (field, value) in [
        ("difficultyRating", review.difficulty_rating),
        ("workloadRating", review.workload_rating),
        ("profHelpfulnessRating", review.prof_helpfulness_rating),
    ] {
        if let Some(value) = value {
            fields.push((field, value.to_string()));
        }
    }

    if let Some(email) = &review.author_email {
        fields.push(("authorEmail", email.clone()));
    }

    fields
}

struct Fields<'a> {
    id: &'a str,
    fields: &'a HashMap<String, String>,
}

impl Fields<'_> {
    fn text(&self, name: &str) -> String {
        self.fields.get(name).cloned().unwrap_or_default()
    }

    fn parse<T: std::str::FromStr>(&self, name: &str) -> Result<T, StoreError> {
        let raw = self.fields.get(name).ok_or_else(|| self.corrupt(name, "missing"))?;
        raw.parse().map_err(|_| self.corrupt(name, raw))
    }

    fn optional<T: std::str::FromStr>(&self, name: &str) -> Result<Option<T>, StoreError> {
        match self.fields.get(name) {
            None => Ok(None),
            Some(_) => self.parse(name).map(Some),
        }
    }

    fn timestamp(&self, name: &str) -> Result<DateTime<Utc>, StoreError> {
        let millis: i64 = self.parse(name)?;
        DateTime::from_timestamp_millis(millis).ok_or_else(|| self.corrupt(name, "out of range"))
    }

    fn corrupt(&self, name: &str, value: &str) -> StoreError {
        StoreError::Corrupt {
            id: self.id.to_string(),
            reason: format!("{name} = {value}"),
        }
    }
}

fn decode_review(id: &str, fields: &HashMap<String, String>) -> Result<Review, StoreError> {
    let fields = Fields { id, fields };

    Ok(Review {
        id: id.to_string(),
        course_code: fields.text("courseCode"),
        course_name: fields.text("courseName"),
        college_code: fields.text("collegeCode"),
        subject_code: fields.text("subjectCode"),
        course_number: fields.text("courseNumber"),
        rating: fields.parse("rating")?,
        review_text: fields.text("reviewText"),
        difficulty_rating: fields.optional("difficultyRating")?,
        workload_rating: fields.optional("workloadRating")?,
        prof_helpfulness_rating: fields.optional("profHelpfulnessRating")?,
        semester_taken: fields.text("semesterTaken"),
        is_anonymous: fields.parse("isAnonymous")?,
        author_name: fields.text("authorName"),
        author_email: fields.fields.get("authorEmail").cloned(),
        verified: fields.parse("verified")?,
        helpful_votes: fields.parse("helpfulVotes")?,
        total_votes: fields.parse("totalVotes")?,
        reported_count: fields.parse("reportedCount")?,
        created_at: fields.timestamp("createdAt")?,
        updated_at: fields.timestamp("updatedAt")?,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use reviews::prepare;
    use serde_json::json;

    use super::{decode_review, encode_review, is_review_id};
    use crate::store::StoreError;

    fn stored_fields(input: serde_json::Value) -> HashMap<String, String> {
        let review = prepare(input.as_object().expect("object")).expect("valid submission");

        let mut fields: HashMap<String, String> = encode_review(&review)
            .into_iter()
            .map(|(field, value)| (field.to_string(), value))
            .collect();
        fields.insert("createdAt".to_string(), "1735689600000".to_string());
        fields.insert("updatedAt".to_string(), "1735689600000".to_string());
        fields
    }

    #[test]
    fn test_absent_fields_stay_absent() {
        let fields = stored_fields(json!({
            "courseCode": "CS 2110",
            "rating": 4,
            "reviewText": "Lectures were recorded and well organised.",
            "workloadRating": 2,
            "authorEmail": "hidden@example.edu"
        }));

        assert!(!fields.contains_key("difficultyRating"));
        assert!(!fields.contains_key("authorEmail"));

        let review = decode_review("12", &fields).expect("decodes");
        assert_eq!(review.id, "12");
        assert_eq!(review.difficulty_rating, None);
        assert_eq!(review.workload_rating, Some(2));
        assert_eq!(review.author_email, None);
        assert_eq!(review.created_at, review.updated_at);
        assert_eq!(review.created_at.timestamp(), 1_735_689_600);
    }

    #[test]
    fn test_named_review_keeps_email() {
        let fields = stored_fields(json!({
            "courseCode": "CS 2110",
            "rating": 5,
            "reviewText": "Lectures were recorded and well organised.",
            "isAnonymous": false,
            "authorName": "Grace",
            "authorEmail": "grace@example.edu"
        }));

        let review = decode_review("3", &fields).expect("decodes");
        assert!(!review.is_anonymous);
        assert_eq!(review.author_name, "Grace");
        assert_eq!(review.author_email.as_deref(), Some("grace@example.edu"));
    }

    #[test]
    fn test_review_ids() {
        assert!(is_review_id("1"));
        assert!(is_review_id("20481"));

        for id in ["", "next_id", "12:x", "-1", "1 ", "abc"] {
            assert!(!is_review_id(id), "{id:?}");
        }
    }

    #[test]
    fn test_corrupt_rating() {
        let mut fields = stored_fields(json!({
            "courseCode": "CS 2110",
            "rating": 5,
            "reviewText": "Lectures were recorded and well organised."
        }));
        fields.insert("rating".to_string(), "five".to_string());

        let error = decode_review("3", &fields).unwrap_err();
        assert!(matches!(error, StoreError::Corrupt { ref id, .. } if id == "3"));
    }
}
