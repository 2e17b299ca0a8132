//! # Review Processing
//!
//! Offline tooling around the review API.
//!
//! ## Import
//! Import files are JSON arrays of submissions exported from old survey spreadsheets.
//! 1. Course codes are sanitized first (`cs_2110` becomes `CS 2110`) so reviews land on the
//!    same course as the ones submitted through the site.
//!
//! 2. Every record is validated locally with the same rules the server runs. A rejected
//!    record is reported with its index and reason and never sent.
//!
//! 3. Accepted records are submitted one at a time. A failed request rejects only that
//!    record, the import keeps going.
//!
//! ## Queries
//! `reviews`, `stats` and `recommend` print what the API returns, nothing is cached.
use std::path::Path;

use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use client::ReviewClient;
use reviews::{StudentProfile, types::COURSE_CODE};

pub mod models;
pub mod utils;

use models::{ImportSummary, Record, Rejection};
use utils::sanitize_submission;

pub fn read_records(contents: &str) -> anyhow::Result<Vec<Record>> {
    serde_json::from_str(contents).context("Import file must be a JSON array of objects")
}

pub async fn import_reviews(client: &ReviewClient, path: &Path) -> anyhow::Result<ImportSummary> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let records = read_records(&contents)?;

    println!("Loaded Records: {}\n", records.len());

    let summary = submit_records(client, records).await?;
    print_summary(&summary);

    Ok(summary)
}

pub async fn submit_records(
    client: &ReviewClient,
    records: Vec<Record>,
) -> anyhow::Result<ImportSummary> {
    let pb = ProgressBar::new(records.len() as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        )?
        .progress_chars("=> "),
    );

    let mut summary = ImportSummary::default();

    for (index, mut record) in records.into_iter().enumerate() {
        sanitize_submission(&mut record);

        let course_code = record
            .get(COURSE_CODE)
            .and_then(|code| code.as_str())
            .unwrap_or_default()
            .to_string();
        pb.set_message(format!("Submitting {course_code}"));

        match client.submit_review(&record).await {
            Ok(id) => {
                debug!("Submitted review {id} for {course_code}");
                summary.submitted.push(id);
            }
            Err(e) => {
                warn!("Rejected record {index}: {e}");
                summary.rejected.push(Rejection {
                    index,
                    course_code,
                    reason: e.to_string(),
                });
            }
        }

        pb.inc(1);
    }

    pb.finish_with_message("Done");
    Ok(summary)
}

fn print_summary(summary: &ImportSummary) {
    println!("\nTotal Records: {}", summary.total());
    println!("Submitted: {}", summary.submitted.len());
    println!("Rejected: {}", summary.rejected.len());

    for rejection in &summary.rejected {
        println!(
            "  #{} [{}] {}",
            rejection.index, rejection.course_code, rejection.reason
        );
    }
}

pub async fn show_reviews(client: &ReviewClient, course_code: &str) -> anyhow::Result<()> {
    let listing = client.fetch_reviews(course_code).await?;

    println!(
        "{course_code}: {} reviews, average {:.1}\n",
        listing.total_reviews, listing.average_rating
    );

    for review in &listing.reviews {
        println!(
            "[{}] {}/5 by {} ({} helpful, {} reports)",
            review.id, review.rating, review.author_name, review.helpful_votes, review.reported_count
        );
        if !review.semester_taken.is_empty() {
            println!("    Taken: {}", review.semester_taken);
        }
        println!("    {}\n", review.review_text);
    }

    Ok(())
}

pub async fn show_stats(client: &ReviewClient, course_code: &str) -> anyhow::Result<()> {
    let stats = client.course_stats(course_code).await?;

    println!("Course: {}", stats.course_code);
    println!("Total Reviews: {}", stats.total_reviews);
    println!("Average Rating: {:.1}", stats.average_rating);
    println!("Average Difficulty: {:.1}", stats.average_difficulty);
    println!("Average Workload: {:.1}", stats.average_workload);
    println!(
        "Average Professor Helpfulness: {:.1}",
        stats.average_prof_helpfulness
    );

    Ok(())
}

pub async fn show_recommendations(
    client: &ReviewClient,
    profile: &StudentProfile,
) -> anyhow::Result<()> {
    let courses = client.recommendations(profile).await?;

    if courses.is_empty() {
        println!("No recommendations found.");
        return Ok(());
    }

    for course in &courses {
        println!("{} {} ({} units)", course.code, course.name, course.units);
        println!("    {}", course.description);
        if !course.tags.is_empty() {
            println!("    Tags: {}", course.tags.join(", "));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{ReviewClient, read_records, submit_records};

    #[test]
    fn test_read_records() {
        let records = read_records(r#"[{"courseCode": "cs_2110"}, {}]"#).expect("records");
        assert_eq!(records.len(), 2);

        assert!(read_records(r#"{"courseCode": "CS 2110"}"#).is_err());
        assert!(read_records("[1, 2]").is_err());
    }

    #[tokio::test]
    async fn test_invalid_records_are_rejected_locally() {
        // Nothing listens here, so any request would surface as an http error.
        let client = ReviewClient::new("http://127.0.0.1:9").expect("client");

        let records = read_records(
            &json!([
                { "rating": 4, "reviewText": "Long enough to pass the length rule." },
                { "courseCode": "cs_2110", "rating": 9, "reviewText": "Long enough to pass the length rule." },
                { "courseCode": "cs_2110", "rating": 3, "reviewText": "short" }
            ])
            .to_string(),
        )
        .expect("records");

        let summary = submit_records(&client, records).await.expect("summary");

        assert!(summary.submitted.is_empty());
        assert_eq!(summary.total(), 3);

        let reasons: Vec<_> = summary.rejected.iter().map(|r| r.reason.as_str()).collect();
        assert_eq!(
            reasons,
            [
                "Course code is required",
                "Rating must be between 1 and 5",
                "Review text must be at least 20 characters long"
            ]
        );
        assert_eq!(summary.rejected[1].course_code, "CS 2110");
    }
}
