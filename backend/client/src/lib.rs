//! # Review Client
//!
//! Talks to the course review API for anything that is not the server itself: the
//! `process` CLI, scripts, and tests.
//!
//! Submissions go through the same [`reviews::prepare`] the server runs, so an invalid
//! review is rejected before a request is made and an anonymous review never sends its
//! author's email over the wire.
use reqwest::{Client, Response, StatusCode, Url};
use reviews::{
    CourseDescriptor, CourseReviews, CourseStats, StudentProfile, ValidationError, prepare,
    responses::{ErrorBody, HelpfulMarked, Recommendations, Reported, Submitted},
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid server url: {0}")]
    BaseUrl(String),

    #[error("{status}: {message}")]
    Api {
        status: StatusCode,
        message: String,
        details: Option<String>,
    },
}

#[derive(Debug, Clone)]
pub struct ReviewClient {
    http: Client,
    base_url: Url,
}

impl ReviewClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url).map_err(|e| ClientError::BaseUrl(e.to_string()))?;

        if base_url.cannot_be_a_base() {
            return Err(ClientError::BaseUrl(base_url.to_string()));
        }

        Ok(Self {
            http: Client::new(),
            base_url,
        })
    }

    pub async fn fetch_reviews(&self, course_code: &str) -> Result<CourseReviews, ClientError> {
        let response = self
            .http
            .get(self.endpoint(&["api", "reviews"])?)
            .query(&[("courseCode", course_code)])
            .send()
            .await?;

        decode(response).await
    }

    /// Validates and normalizes locally, then submits. Returns the new review id.
    pub async fn submit_review(&self, submission: &Map<String, Value>) -> Result<String, ClientError> {
        let review = prepare(submission)?;
        debug!("Submitting review for {}", review.course_code);

        let response = self
            .http
            .post(self.endpoint(&["api", "reviews"])?)
            .json(&review)
            .send()
            .await?;

        let submitted: Submitted = decode(response).await?;
        Ok(submitted.review_id)
    }

    pub async fn mark_helpful(&self, review_id: &str) -> Result<HelpfulMarked, ClientError> {
        let response = self
            .http
            .put(self.endpoint(&["api", "reviews", review_id, "helpful"])?)
            .send()
            .await?;

        decode(response).await
    }

    pub async fn report_review(&self, review_id: &str) -> Result<Reported, ClientError> {
        let response = self
            .http
            .put(self.endpoint(&["api", "reviews", review_id, "report"])?)
            .send()
            .await?;

        decode(response).await
    }

    pub async fn course_stats(&self, course_code: &str) -> Result<CourseStats, ClientError> {
        let response = self
            .http
            .get(self.endpoint(&["api", "courses", course_code, "stats"])?)
            .send()
            .await?;

        decode(response).await
    }

    pub async fn recommendations(
        &self,
        profile: &StudentProfile,
    ) -> Result<Vec<CourseDescriptor>, ClientError> {
        let response = self
            .http
            .post(self.endpoint(&["api", "recommendations"])?)
            .json(profile)
            .send()
            .await?;

        let recommendations: Recommendations = decode(response).await?;
        Ok(recommendations.recommendations)
    }

    // Segments are percent-encoded, so course codes with spaces or slashes stay one segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();

        url.path_segments_mut()
            .map_err(|_| ClientError::BaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();

    if status.is_success() {
        return Ok(response.json().await?);
    }

    let text = response.text().await?;
    let (message, details) = match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => (body.error, body.details),
        Err(_) => (text, None),
    };

    Err(ClientError::Api {
        status,
        message,
        details,
    })
}
