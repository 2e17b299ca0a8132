use async_trait::async_trait;
use reviews::{CourseDescriptor, StudentProfile};

/// Source of course suggestions for a student.
#[async_trait]
pub trait Recommender: Send + Sync {
    async fn recommend(&self, profile: &StudentProfile) -> Vec<CourseDescriptor>;
}

/// Static catalog standing in for the AI service. Courses are ranked by how many of the
/// profile's keywords appear in their tags, ties keep catalog order.
pub struct MockRecommender {
    catalog: Vec<CourseDescriptor>,
}

impl Default for MockRecommender {
    fn default() -> Self {
        Self {
            catalog: mock_catalog(),
        }
    }
}

#[async_trait]
impl Recommender for MockRecommender {
    async fn recommend(&self, profile: &StudentProfile) -> Vec<CourseDescriptor> {
        let keywords = profile.keywords();

        let mut ranked: Vec<(usize, &CourseDescriptor)> = self
            .catalog
            .iter()
            .map(|course| {
                let score = course
                    .tags
                    .iter()
                    .filter(|tag| keywords.binary_search(&tag.to_lowercase()).is_ok())
                    .count();
                (score, course)
            })
            .collect();

        ranked.sort_by(|a, b| b.0.cmp(&a.0));

        ranked
            .into_iter()
            .take(profile.limit())
            .map(|(_, course)| course.clone())
            .collect()
    }
}

#[allow(clippy::too_many_arguments)]
fn course(
    code: &str,
    name: &str,
    units: u8,
    description: &str,
    prerequisites: &[&str],
    tags: &[&str],
    instructors: &[&str],
    schedule: &str,
) -> CourseDescriptor {
    CourseDescriptor {
        code: code.to_string(),
        name: name.to_string(),
        units,
        description: description.to_string(),
        prerequisites: owned(prerequisites),
        tags: owned(tags),
        instructors: owned(instructors),
        schedule: schedule.to_string(),
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

fn mock_catalog() -> Vec<CourseDescriptor> {
    vec![
        course(
            "CS 2110",
            "Object-Oriented Programming and Data Structures",
            4,
            "Program design and data structures in Java: lists, trees, graphs and hashing.",
            &["CS 1110"],
            &["programming", "computer", "data-structures", "java"],
            &["D. Gries", "M. Clarkson"],
            "MWF 10:10-11:00",
        ),
        course(
            "CS 3110",
            "Data Structures and Functional Programming",
            4,
            "Functional programming in OCaml, specifications, testing and reasoning about code.",
            &["CS 2110"],
            &["programming", "functional", "theory", "computer"],
            &["M. Clarkson"],
            "TR 10:10-11:25",
        ),
        course(
            "CS 4410",
            "Operating Systems",
            4,
            "Processes, concurrency, memory management, file systems and networking.",
            &["CS 3410"],
            &["systems", "concurrency", "computer"],
            &["R. van Renesse"],
            "MW 14:55-16:10",
        ),
        course(
            "CS 4780",
            "Introduction to Machine Learning",
            4,
            "Supervised learning, kernels, neural networks and model evaluation.",
            &["CS 2110", "MATH 2940"],
            &["machine-learning", "statistics", "ai", "computer"],
            &["K. Weinberger"],
            "TR 13:25-14:40",
        ),
        course(
            "CS 4120",
            "Introduction to Compilers",
            3,
            "Lexing, parsing, type checking, intermediate representations and code generation.",
            &["CS 3110", "CS 3410"],
            &["compilers", "systems", "theory", "programming"],
            &["A. Myers"],
            "MWF 11:15-12:05",
        ),
        course(
            "MATH 2940",
            "Linear Algebra for Engineers",
            4,
            "Vectors, matrices, eigenvalues and linear transformations with applications.",
            &["MATH 1920"],
            &["math", "linear-algebra", "engineering"],
            &["Staff"],
            "MWF 09:05-09:55",
        ),
        course(
            "STSCI 2150",
            "Introductory Statistics for Biology",
            4,
            "Probability, estimation and hypothesis testing with biological data.",
            &[],
            &["statistics", "biology", "math"],
            &["Staff"],
            "TR 08:40-09:55",
        ),
        course(
            "ECON 1110",
            "Introductory Microeconomics",
            3,
            "Supply and demand, consumer choice, markets and welfare.",
            &[],
            &["economics", "social-science"],
            &["Staff"],
            "MWF 12:20-13:10",
        ),
    ]
}
