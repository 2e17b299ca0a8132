use serde_json::{Map, Value};

use crate::{
    types::{ANONYMOUS, NewReview},
    validate::{Accepted, ValidationError, validate},
};

/// Builds the canonical record for an accepted submission. Counters start at zero and the
/// store is left to assign the id and timestamps.
pub fn normalize(accepted: Accepted<'_>) -> NewReview {
    let input = accepted.input;

    let is_anonymous = !matches!(input.get("isAnonymous"), Some(Value::Bool(false)));

    let (author_name, author_email) = if is_anonymous {
        (ANONYMOUS.to_string(), None)
    } else {
        let name = text(input, "authorName");
        let name = if name.trim().is_empty() {
            ANONYMOUS.to_string()
        } else {
            name.trim().to_string()
        };

        (name, optional_text(input, "authorEmail"))
    };

    NewReview {
        course_code: accepted.course_code.to_string(),
        course_name: text(input, "courseName"),
        college_code: text(input, "collegeCode"),
        subject_code: text(input, "subjectCode"),
        course_number: text(input, "courseNumber"),
        rating: accepted.rating,
        review_text: accepted.review_text.to_string(),
        difficulty_rating: accepted.difficulty_rating,
        workload_rating: accepted.workload_rating,
        prof_helpfulness_rating: accepted.prof_helpfulness_rating,
        semester_taken: text(input, "semesterTaken"),
        is_anonymous,
        author_name,
        author_email,
        verified: false,
        helpful_votes: 0,
        total_votes: 0,
        reported_count: 0,
    }
}

/// Validates and normalizes in one step.
pub fn prepare(input: &Map<String, Value>) -> Result<NewReview, ValidationError> {
    validate(input).map(normalize)
}

fn text(input: &Map<String, Value>, key: &str) -> String {
    optional_text(input, key).unwrap_or_default()
}

// Numbers are kept as text so a course number sent as 2110 still lands in the record.
fn optional_text(input: &Map<String, Value>, key: &str) -> Option<String> {
    match input.get(key)? {
        Value::String(value) => Some(value.clone()),
        Value::Number(value) => Some(value.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Map, Value, json};

    use super::prepare;
    use crate::types::ANONYMOUS;

    const TEXT: &str = "Project heavy but the TAs were always around.";

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().expect("test input must be an object")
    }

    #[test]
    fn test_defaults() {
        let review = prepare(&object(json!({
            "courseCode": "  CS 3110 ",
            "rating": 4,
            "reviewText": format!("  {TEXT}  ")
        })))
        .expect("valid submission");

        assert_eq!(review.course_code, "CS 3110");
        assert_eq!(review.review_text, TEXT);
        assert_eq!(review.course_name, "");
        assert_eq!(review.college_code, "");
        assert_eq!(review.subject_code, "");
        assert_eq!(review.course_number, "");
        assert_eq!(review.semester_taken, "");
        assert!(review.is_anonymous);
        assert_eq!(review.author_name, ANONYMOUS);
        assert_eq!(review.author_email, None);
        assert!(!review.verified);
        assert_eq!(
            (review.helpful_votes, review.total_votes, review.reported_count),
            (0, 0, 0)
        );
        assert_eq!(review.difficulty_rating, None);
    }

    #[test]
    fn test_anonymous_submissions_are_redacted() {
        for flag in [json!(true), json!(null), json!("false"), json!(0)] {
            let review = prepare(&object(json!({
                "courseCode": "CS 3110",
                "rating": 5,
                "reviewText": TEXT,
                "isAnonymous": flag,
                "authorName": "Ada Lovelace",
                "authorEmail": "ada@example.edu"
            })))
            .expect("valid submission");

            assert!(review.is_anonymous);
            assert_eq!(review.author_name, ANONYMOUS);
            assert_eq!(review.author_email, None);
        }
    }

    #[test]
    fn test_named_submissions_keep_author() {
        let review = prepare(&object(json!({
            "courseCode": "CS 3110",
            "rating": 5,
            "reviewText": TEXT,
            "isAnonymous": false,
            "authorName": " Ada Lovelace ",
            "authorEmail": "ada@example.edu"
        })))
        .expect("valid submission");

        assert!(!review.is_anonymous);
        assert_eq!(review.author_name, "Ada Lovelace");
        assert_eq!(review.author_email.as_deref(), Some("ada@example.edu"));
    }

    #[test]
    fn test_named_submission_without_name_falls_back() {
        let review = prepare(&object(json!({
            "courseCode": "CS 3110",
            "rating": 5,
            "reviewText": TEXT,
            "isAnonymous": false,
            "authorName": ""
        })))
        .expect("valid submission");

        assert!(!review.is_anonymous);
        assert_eq!(review.author_name, ANONYMOUS);
        assert_eq!(review.author_email, None);
    }

    #[test]
    fn test_ratings_are_truncated() {
        let review = prepare(&object(json!({
            "courseCode": "CS 3110",
            "rating": 4.8,
            "reviewText": TEXT,
            "difficultyRating": "3.9",
            "profHelpfulnessRating": 1
        })))
        .expect("valid submission");

        assert_eq!(review.rating, 4);
        assert_eq!(review.difficulty_rating, Some(3));
        assert_eq!(review.workload_rating, None);
        assert_eq!(review.prof_helpfulness_rating, Some(1));
    }

    #[test]
    fn test_caller_counters_are_ignored() {
        let review = prepare(&object(json!({
            "courseCode": "CS 3110",
            "courseNumber": 3110,
            "rating": 3,
            "reviewText": TEXT,
            "helpfulVotes": 99,
            "reportedCount": 4,
            "verified": true
        })))
        .expect("valid submission");

        assert_eq!(review.course_number, "3110");
        assert_eq!(review.helpful_votes, 0);
        assert_eq!(review.reported_count, 0);
        assert!(!review.verified);
    }

    #[test]
    fn test_normalizing_twice_is_stable() {
        let first = prepare(&object(json!({
            "courseCode": "CS 3110",
            "rating": 2,
            "reviewText": TEXT,
            "isAnonymous": false,
            "authorName": "Grace",
            "workloadRating": 5
        })))
        .expect("valid submission");

        let again = serde_json::to_value(&first).expect("serialize review");
        let second = prepare(again.as_object().expect("object")).expect("still valid");

        assert_eq!(first, second);
    }
}
