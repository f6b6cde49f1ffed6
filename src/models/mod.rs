pub mod submission;

pub use submission::{StoredRecord, SubmissionDraft, ValidatedSubmission};
