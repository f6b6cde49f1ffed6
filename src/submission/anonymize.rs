use chrono::{DateTime, Utc};

use crate::crypto::sha256_hex;
use crate::models::{StoredRecord, ValidatedSubmission};

/// Replaces identifying fields with one-way digests.
#[derive(Debug, Clone, Copy, Default)]
pub struct Anonymizer;

impl Anonymizer {
    pub fn digest_email(&self, email: &str) -> String {
        sha256_hex(email)
    }

    /// Ages are hashed through their decimal text form.
    pub fn digest_age(&self, age: u32) -> String {
        sha256_hex(&age.to_string())
    }

    /// Consume the submission and build the only form that may be persisted.
    pub fn anonymize(
        &self,
        submission: ValidatedSubmission,
        received_at: DateTime<Utc>,
        ip: String,
    ) -> StoredRecord {
        StoredRecord {
            email: self.digest_email(&submission.email),
            age: self.digest_age(submission.age),
            name: submission.name,
            consent: submission.consent,
            rating: submission.rating,
            comments: submission.comments,
            user_agent: submission.user_agent,
            submission_id: submission.submission_id,
            source: submission.source,
            received_at,
            ip,
        }
    }
}
