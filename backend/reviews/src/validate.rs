use serde_json::{Map, Value};
use thiserror::Error;

use crate::types::{
    COURSE_CODE, MAX_RATING, MIN_RATING, MIN_REVIEW_TEXT_LEN, RATING, REVIEW_TEXT, Submetric,
};

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Course code is required")]
    MissingField,

    /// `None` is the overall rating.
    #[error("{}", rating_message(.0))]
    InvalidRating(Option<Submetric>),

    #[error("Review text must be at least 20 characters long")]
    InvalidReviewText,
}

fn rating_message(metric: &Option<Submetric>) -> String {
    match metric {
        None => format!("Rating must be between {MIN_RATING} and {MAX_RATING}"),
        Some(metric) => format!(
            "{} rating must be between {MIN_RATING} and {MAX_RATING}",
            metric.label()
        ),
    }
}

/// A submission that passed [`validate`], with its ratings already parsed.
#[derive(Debug, Clone, Copy)]
pub struct Accepted<'a> {
    pub input: &'a Map<String, Value>,
    pub course_code: &'a str,
    pub rating: u8,
    pub review_text: &'a str,
    pub difficulty_rating: Option<u8>,
    pub workload_rating: Option<u8>,
    pub prof_helpfulness_rating: Option<u8>,
}

/// Checks a raw submission. The first failing rule wins, in the order course code, rating,
/// review text, then each optional submetric.
pub fn validate(input: &Map<String, Value>) -> Result<Accepted<'_>, ValidationError> {
    let course_code = match input.get(COURSE_CODE) {
        Some(Value::String(code)) if !code.trim().is_empty() => code.trim(),
        _ => return Err(ValidationError::MissingField),
    };

    let rating = input
        .get(RATING)
        .and_then(parse_rating)
        .ok_or(ValidationError::InvalidRating(None))?;

    let review_text = match input.get(REVIEW_TEXT) {
        Some(Value::String(text)) if text.trim().chars().count() >= MIN_REVIEW_TEXT_LEN => {
            text.trim()
        }
        _ => return Err(ValidationError::InvalidReviewText),
    };

    Ok(Accepted {
        input,
        course_code,
        rating,
        review_text,
        difficulty_rating: optional_rating(input, Submetric::Difficulty)?,
        workload_rating: optional_rating(input, Submetric::Workload)?,
        prof_helpfulness_rating: optional_rating(input, Submetric::ProfHelpfulness)?,
    })
}

/// Accepts numbers and numeric strings within the rating range, truncated toward zero.
pub fn parse_rating(value: &Value) -> Option<u8> {
    let number = match value {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };

    (f64::from(MIN_RATING)..=f64::from(MAX_RATING))
        .contains(&number)
        .then_some(number.trunc() as u8)
}

fn optional_rating(
    input: &Map<String, Value>,
    metric: Submetric,
) -> Result<Option<u8>, ValidationError> {
    match input.get(metric.field()) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) if text.trim().is_empty() => Ok(None),
        Some(value) => parse_rating(value)
            .map(Some)
            .ok_or(ValidationError::InvalidRating(Some(metric))),
    }
}
