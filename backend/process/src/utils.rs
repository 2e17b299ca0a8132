use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use reviews::types::COURSE_CODE;

static UNDERSCORES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[_]").unwrap());
static UNWANTED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9- ]").unwrap());
static SPACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" +").unwrap());

/// Canonical spelling for course codes coming from spreadsheets: `cs_2110` becomes `CS 2110`.
pub fn sanitize(input: &str) -> String {
    let s = UNDERSCORES.replace_all(input, " ");
    let s = UNWANTED.replace_all(&s, "");

    SPACES.replace_all(s.trim(), " ").to_uppercase()
}

/// Rewrites the course code in place when it is a string. Anything else is left for
/// validation to reject.
pub fn sanitize_submission(submission: &mut Map<String, Value>) {
    if let Some(Value::String(code)) = submission.get_mut(COURSE_CODE) {
        *code = sanitize(code);
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{sanitize, sanitize_submission};

    #[test]
    fn test_basic() {
        assert_eq!(sanitize("cs_2110"), "CS 2110");
        assert_eq!(sanitize("Math-1920"), "MATH-1920");
        assert_eq!(sanitize("econ 1110!"), "ECON 1110");
    }

    #[test]
    fn test_leading_trailing_spaces() {
        assert_eq!(sanitize("   cs 3110   "), "CS 3110");
        assert_eq!(sanitize("  stsci   2150  "), "STSCI 2150");
    }

    #[test]
    fn test_special_characters() {
        assert_eq!(sanitize("!@#$%^&*()"), "");
        assert_eq!(sanitize("CS4410!@#"), "CS4410");
    }

    #[test]
    fn test_underscores_and_dashes() {
        assert_eq!(sanitize("_cs_4780_"), "CS 4780");
        assert_eq!(sanitize("cs_4120-a"), "CS 4120-A");
    }

    #[test]
    fn test_empty_string() {
        assert_eq!(sanitize(""), "");
        assert_eq!(sanitize("     "), "");
    }

    #[test]
    fn test_sanitize_submission() {
        let mut submission = json!({ "courseCode": " cs_2110 ", "rating": 4 })
            .as_object()
            .cloned()
            .expect("object");
        sanitize_submission(&mut submission);
        assert_eq!(submission["courseCode"], "CS 2110");

        let mut submission = json!({ "courseCode": 2110 }).as_object().cloned().expect("object");
        sanitize_submission(&mut submission);
        assert_eq!(submission["courseCode"], 2110);
    }
}
