use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Output of the schema validator: every field checked, identifier not yet resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionDraft {
    pub name: String,
    pub email: String,
    pub age: u32,
    pub consent: bool,
    pub rating: u8,
    pub comments: Option<String>,
    pub user_agent: Option<String>,
    pub submission_id: Option<String>,
    pub source: String,
}

impl SubmissionDraft {
    pub fn with_id(self, submission_id: String) -> ValidatedSubmission {
        ValidatedSubmission {
            name: self.name,
            email: self.email,
            age: self.age,
            consent: self.consent,
            rating: self.rating,
            comments: self.comments,
            user_agent: self.user_agent,
            submission_id,
            source: self.source,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedSubmission {
    pub name: String,
    pub email: String,
    pub age: u32,
    pub consent: bool,
    pub rating: u8,
    pub comments: Option<String>,
    pub user_agent: Option<String>,
    pub submission_id: String,
    pub source: String,
}

/// The persisted shape of a submission. `email` and `age` hold hex SHA-256 digests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub name: String,
    pub email: String,
    pub age: String,
    pub consent: bool,
    pub rating: u8,
    pub comments: Option<String>,
    pub user_agent: Option<String>,
    pub submission_id: String,
    pub source: String,
    pub received_at: DateTime<Utc>,
    pub ip: String,
}
