use crate::types::{CourseReviews, CourseStats, Review, Submetric};

#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    sum: u64,
    count: u64,
}

impl Tally {
    fn add(&mut self, value: u8) {
        self.sum += u64::from(value);
        self.count += 1;
    }

    fn average(self) -> f64 {
        round_tenths(self.sum, self.count)
    }
}

#[derive(Debug, Default)]
struct Totals {
    rating: Tally,
    submetrics: [Tally; 3],
}

impl Totals {
    fn push(mut self, review: &Review) -> Self {
        self.rating.add(review.rating);

        for (tally, metric) in self.submetrics.iter_mut().zip(Submetric::ALL) {
            if let Some(value) = review.submetric(metric) {
                tally.add(value);
            }
        }

        self
    }
}

fn fold(reviews: &[Review]) -> Totals {
    reviews.iter().fold(Totals::default(), Totals::push)
}

/// Mean of `sum / count` rounded half-up to one decimal, `0` when nothing was counted.
///
/// Works on integers so that `4.25` always shows as `4.3`, which binary floats cannot
/// promise.
pub fn round_tenths(sum: u64, count: u64) -> f64 {
    if count == 0 {
        return 0.0;
    }

    let tenths = (sum * 20 + count) / (count * 2);
    tenths as f64 / 10.0
}

pub fn course_stats(course_code: &str, reviews: &[Review]) -> CourseStats {
    let totals = fold(reviews);
    let [difficulty, workload, prof_helpfulness] = totals.submetrics;

    CourseStats {
        course_code: course_code.to_string(),
        total_reviews: reviews.len(),
        average_rating: totals.rating.average(),
        average_difficulty: difficulty.average(),
        average_workload: workload.average(),
        average_prof_helpfulness: prof_helpfulness.average(),
    }
}

/// Keeps the store's ordering of `reviews` untouched.
pub fn summarize(reviews: Vec<Review>) -> CourseReviews {
    let average_rating = fold(&reviews).rating.average();

    CourseReviews {
        total_reviews: reviews.len(),
        average_rating,
        reviews,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::{course_stats, round_tenths, summarize};
    use crate::types::{NewReview, Review};

    fn review(id: u32, rating: u8, difficulty: Option<u8>) -> Review {
        NewReview {
            course_code: "CS 2110".to_string(),
            course_name: String::new(),
            college_code: String::new(),
            subject_code: String::new(),
            course_number: String::new(),
            rating,
            review_text: "Enough words to pass validation.".to_string(),
            difficulty_rating: difficulty,
            workload_rating: None,
            prof_helpfulness_rating: None,
            semester_taken: String::new(),
            is_anonymous: true,
            author_name: "Anonymous".to_string(),
            author_email: None,
            verified: false,
            helpful_votes: id,
            total_votes: id,
            reported_count: 0,
        }
        .persisted(
            id.to_string(),
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_empty() {
        let stats = course_stats("CS 2110", &[]);

        assert_eq!(stats.total_reviews, 0);
        assert_eq!(stats.average_rating, 0.0);
        assert_eq!(stats.average_difficulty, 0.0);
        assert_eq!(stats.average_workload, 0.0);
        assert_eq!(stats.average_prof_helpfulness, 0.0);

        let summary = summarize(Vec::new());
        assert_eq!(summary.total_reviews, 0);
        assert_eq!(summary.average_rating, 0.0);
    }

    #[test]
    fn test_submetric_divisor_counts_present_values_only() {
        let reviews = [
            review(1, 5, Some(4)),
            review(2, 4, None),
            review(3, 3, Some(2)),
        ];
        let stats = course_stats("CS 2110", &reviews);

        assert_eq!(stats.total_reviews, 3);
        assert_eq!(stats.average_rating, 4.0);
        assert_eq!(stats.average_difficulty, 3.0);
        assert_eq!(stats.average_workload, 0.0);
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_tenths(17, 4), 4.3);
        assert_eq!(round_tenths(83, 20), 4.2);
        assert_eq!(round_tenths(10, 3), 3.3);
        assert_eq!(round_tenths(11, 3), 3.7);
        assert_eq!(round_tenths(5, 1), 5.0);
        assert_eq!(round_tenths(0, 0), 0.0);
    }

    #[test]
    fn test_order_does_not_change_stats() {
        let forward = [review(1, 5, Some(1)), review(2, 2, None), review(3, 4, Some(5))];
        let mut backward = forward.clone();
        backward.reverse();

        assert_eq!(course_stats("CS 2110", &forward), course_stats("CS 2110", &backward));
    }

    #[test]
    fn test_summarize_keeps_order() {
        let reviews = vec![review(9, 1, None), review(3, 5, None), review(5, 3, None)];
        let summary = summarize(reviews);

        let ids: Vec<&str> = summary.reviews.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["9", "3", "5"]);
        assert_eq!(summary.average_rating, 3.0);
        assert_eq!(summary.total_reviews, 3);
    }
}
