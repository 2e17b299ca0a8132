use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const ANONYMOUS: &str = "Anonymous";

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;
pub const MIN_REVIEW_TEXT_LEN: usize = 20;

pub const COURSE_CODE: &str = "courseCode";
pub const RATING: &str = "rating";
pub const REVIEW_TEXT: &str = "reviewText";

/// Secondary ratings a reviewer may leave out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Submetric {
    Difficulty,
    Workload,
    ProfHelpfulness,
}

impl Submetric {
    pub const ALL: [Submetric; 3] = [
        Submetric::Difficulty,
        Submetric::Workload,
        Submetric::ProfHelpfulness,
    ];

    /// Submission and storage key.
    pub fn field(self) -> &'static str {
        match self {
            Submetric::Difficulty => "difficultyRating",
            Submetric::Workload => "workloadRating",
            Submetric::ProfHelpfulness => "profHelpfulnessRating",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Submetric::Difficulty => "Difficulty",
            Submetric::Workload => "Workload",
            Submetric::ProfHelpfulness => "Professor helpfulness",
        }
    }
}

/// A normalized review that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub course_code: String,
    pub course_name: String,
    pub college_code: String,
    pub subject_code: String,
    pub course_number: String,
    pub rating: u8,
    pub review_text: String,
    pub difficulty_rating: Option<u8>,
    pub workload_rating: Option<u8>,
    pub prof_helpfulness_rating: Option<u8>,
    pub semester_taken: String,
    pub is_anonymous: bool,
    pub author_name: String,
    pub author_email: Option<String>,
    pub verified: bool,
    pub helpful_votes: u32,
    pub total_votes: u32,
    pub reported_count: u32,
}

impl NewReview {
    pub fn submetric(&self, metric: Submetric) -> Option<u8> {
        match metric {
            Submetric::Difficulty => self.difficulty_rating,
            Submetric::Workload => self.workload_rating,
            Submetric::ProfHelpfulness => self.prof_helpfulness_rating,
        }
    }

    /// Completes the record with the identity and time handed out by the store.
    pub fn persisted(self, id: impl Into<String>, at: DateTime<Utc>) -> Review {
        Review {
            id: id.into(),
            course_code: self.course_code,
            course_name: self.course_name,
            college_code: self.college_code,
            subject_code: self.subject_code,
            course_number: self.course_number,
            rating: self.rating,
            review_text: self.review_text,
            difficulty_rating: self.difficulty_rating,
            workload_rating: self.workload_rating,
            prof_helpfulness_rating: self.prof_helpfulness_rating,
            semester_taken: self.semester_taken,
            is_anonymous: self.is_anonymous,
            author_name: self.author_name,
            author_email: self.author_email,
            verified: self.verified,
            helpful_votes: self.helpful_votes,
            total_votes: self.total_votes,
            reported_count: self.reported_count,
            created_at: at,
            updated_at: at,
        }
    }
}

/// A stored review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub course_code: String,
    pub course_name: String,
    pub college_code: String,
    pub subject_code: String,
    pub course_number: String,
    pub rating: u8,
    pub review_text: String,
    pub difficulty_rating: Option<u8>,
    pub workload_rating: Option<u8>,
    pub prof_helpfulness_rating: Option<u8>,
    pub semester_taken: String,
    pub is_anonymous: bool,
    pub author_name: String,
    pub author_email: Option<String>,
    pub verified: bool,
    pub helpful_votes: u32,
    pub total_votes: u32,
    pub reported_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Review {
    pub fn submetric(&self, metric: Submetric) -> Option<u8> {
        match metric {
            Submetric::Difficulty => self.difficulty_rating,
            Submetric::Workload => self.workload_rating,
            Submetric::ProfHelpfulness => self.prof_helpfulness_rating,
        }
    }
}

/// Reviews of one course, most helpful first, with the overall average.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseReviews {
    pub reviews: Vec<Review>,
    pub average_rating: f64,
    pub total_reviews: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseStats {
    pub course_code: String,
    pub total_reviews: usize,
    pub average_rating: f64,
    pub average_difficulty: f64,
    pub average_workload: f64,
    pub average_prof_helpfulness: f64,
}
