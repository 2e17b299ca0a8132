use serde::{Deserialize, Serialize};

pub const DEFAULT_LIMIT: usize = 5;
pub const MAX_LIMIT: usize = 20;

/// What a student tells the recommender about themselves. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudentProfile {
    pub major: String,
    pub semester: String,
    pub preferences: Vec<String>,
    pub interests: String,
    pub limit: Option<usize>,
}

impl StudentProfile {
    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    /// Lowercased words from the major, preferences and interests.
    pub fn keywords(&self) -> Vec<String> {
        let mut keywords: Vec<String> = std::iter::once(self.major.as_str())
            .chain(self.preferences.iter().map(String::as_str))
            .chain(std::iter::once(self.interests.as_str()))
            .flat_map(|text| text.split(|c: char| !c.is_alphanumeric() && c != '-'))
            .filter(|word| !word.is_empty())
            .map(str::to_lowercase)
            .collect();

        keywords.sort();
        keywords.dedup();
        keywords
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDescriptor {
    pub code: String,
    pub name: String,
    pub units: u8,
    pub description: String,
    pub prerequisites: Vec<String>,
    pub tags: Vec<String>,
    pub instructors: Vec<String>,
    pub schedule: String,
}
