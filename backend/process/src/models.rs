use serde_json::{Map, Value};

/// One line of an import file. Files are JSON arrays of review submissions.
pub type Record = Map<String, Value>;

#[derive(Debug, Default)]
pub struct ImportSummary {
    pub submitted: Vec<String>,
    pub rejected: Vec<Rejection>,
}

#[derive(Debug)]
pub struct Rejection {
    pub index: usize,
    pub course_code: String,
    pub reason: String,
}

impl ImportSummary {
    pub fn total(&self) -> usize {
        self.submitted.len() + self.rejected.len()
    }
}
