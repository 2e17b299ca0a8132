use axum::body::Bytes;
use serde_json::{Map, Value};

use crate::error::AppError;

pub const COURSE_CODE_REQUIRED: &str = "Course code is required";
pub const REVIEW_ID_REQUIRED: &str = "Review ID is required";

/// Submissions must be a JSON object, anything else is a malformed payload.
pub fn get_submission_from_body(body: &Bytes) -> Result<Map<String, Value>, AppError> {
    match serde_json::from_slice(body) {
        Ok(Value::Object(submission)) => Ok(submission),
        _ => Err(AppError::MalformedPayload),
    }
}

pub fn required(value: Option<String>, message: &'static str) -> Result<String, AppError> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or(AppError::MissingParameter(message))
}
