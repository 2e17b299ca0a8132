//! # Review Rules
//!
//! Business rules for course reviews, shared by the HTTP server and every client.
//!
//! ## Flow
//!
//! 1. A raw submission arrives as an untyped JSON object.
//!
//! 2. [`validate`] checks it in a fixed order (course code, rating, review text, then the
//!    optional submetric ratings) and returns the first failure.
//!
//! 3. [`normalize`] turns the accepted submission into a [`NewReview`]: string defaults,
//!    truncated integer ratings, anonymity redaction and zeroed counters.
//!
//! 4. The store assigns the id and both timestamps, producing a [`Review`].
//!
//! 5. [`course_stats`] and [`summarize`] fold every review of a course into averages.
//!    Nothing is cached, stats are recomputed on each read.
//!
//! ## Notes
//! - Optional ratings are `Option<u8>` from parsing to persistence. Zero is never used as
//!   a stand-in for "not provided".
//!
//! - A submission is anonymous unless it carries `"isAnonymous": false`. Anonymous reviews
//!   never keep an author email, whatever the caller sent.
//!
//! - Averages are rounded half-up to one decimal with integer arithmetic so the same
//!   reviews always display the same number.
pub mod aggregate;
pub mod normalize;
pub mod recommend;
pub mod responses;
pub mod types;
pub mod validate;

pub use aggregate::{course_stats, round_tenths, summarize};
pub use normalize::{normalize, prepare};
pub use recommend::{CourseDescriptor, StudentProfile};
pub use types::{ANONYMOUS, CourseReviews, CourseStats, NewReview, Review, Submetric};
pub use validate::{Accepted, ValidationError, validate};
