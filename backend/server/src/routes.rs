use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State, rejection::PathRejection},
    http::StatusCode,
};
use reviews::{
    CourseReviews, CourseStats, StudentProfile, course_stats, prepare,
    responses::{HelpfulMarked, Recommendations, Reported, Submitted},
    summarize,
};
use serde::Deserialize;
use tracing::info;

use crate::{
    error::AppError,
    state::AppState,
    utils::{COURSE_CODE_REQUIRED, REVIEW_ID_REQUIRED, get_submission_from_body, required},
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewsQuery {
    course_code: Option<String>,
}

pub async fn reviews_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReviewsQuery>,
) -> Result<Json<CourseReviews>, AppError> {
    let course_code = required(query.course_code, COURSE_CODE_REQUIRED)?;

    let reviews = state
        .store
        .reviews_for_course(&course_code)
        .await
        .map_err(AppError::store("Failed to fetch reviews"))?;

    #[cfg(feature = "verbose")]
    info!("Fetched {} reviews for {course_code}", reviews.len());

    Ok(Json(summarize(reviews)))
}

pub async fn submit_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<Submitted>), AppError> {
    let submission = get_submission_from_body(&body)?;
    let review = prepare(&submission)?;
    let course_code = review.course_code.clone();

    let review_id = state
        .store
        .insert(review)
        .await
        .map_err(AppError::store("Failed to submit review"))?;

    info!("Stored review {review_id} for {course_code}");

    Ok((
        StatusCode::CREATED,
        Json(Submitted {
            success: true,
            review_id,
        }),
    ))
}

pub async fn helpful_handler(
    State(state): State<Arc<AppState>>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<HelpfulMarked>, AppError> {
    let id = required(param(id), REVIEW_ID_REQUIRED)?;

    let votes = state
        .store
        .mark_helpful(&id)
        .await
        .map_err(AppError::store("Failed to mark review as helpful"))?;

    #[cfg(feature = "verbose")]
    info!("Review {id} now has {} helpful votes", votes.helpful_votes);

    Ok(Json(HelpfulMarked {
        success: true,
        helpful_votes: votes.helpful_votes,
        total_votes: votes.total_votes,
    }))
}

pub async fn report_handler(
    State(state): State<Arc<AppState>>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<Reported>, AppError> {
    let id = required(param(id), REVIEW_ID_REQUIRED)?;

    let reported_count = state
        .store
        .report(&id)
        .await
        .map_err(AppError::store("Failed to report review"))?;

    info!("Review {id} reported ({reported_count} total)");

    Ok(Json(Reported {
        success: true,
        message: "Review reported successfully".to_string(),
    }))
}

pub async fn stats_handler(
    State(state): State<Arc<AppState>>,
    course_code: Result<Path<String>, PathRejection>,
) -> Result<Json<CourseStats>, AppError> {
    let course_code = required(param(course_code), COURSE_CODE_REQUIRED)?;

    let reviews = state
        .store
        .reviews_for_course(&course_code)
        .await
        .map_err(AppError::store("Failed to fetch course stats"))?;

    Ok(Json(course_stats(&course_code, &reviews)))
}

pub async fn recommendations_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<Recommendations>, AppError> {
    let profile: StudentProfile = if body.is_empty() {
        StudentProfile::default()
    } else {
        serde_json::from_slice(&body).map_err(|_| AppError::MalformedPayload)?
    };

    let recommendations = state.recommender.recommend(&profile).await;

    Ok(Json(Recommendations { recommendations }))
}

// An undecodable segment is reported like a missing one.
fn param(path: Result<Path<String>, PathRejection>) -> Option<String> {
    path.ok().map(|Path(value)| value)
}

pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
