use std::sync::Arc;

use chrono::{DateTime, SubsecRound, Utc};
use serde_json::Value;

use crate::storage::{PersistenceError, RecordLog};

use super::anonymize::Anonymizer;
use super::identifier;
use super::metadata::CallerMeta;
use super::schema::{FieldError, SchemaValidator, ValidationErrors};

/// A submission that has been written to the log.
#[derive(Debug, Clone)]
pub struct Accepted {
    pub submission_id: String,
    pub received_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum Rejection {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Validate, identify, anonymize and append one submission.
///
/// Built once at startup and shared by every request.
pub struct Intake {
    validator: SchemaValidator,
    anonymizer: Anonymizer,
    log: Arc<dyn RecordLog>,
    require_consent: bool,
}

impl Intake {
    pub fn new(validator: SchemaValidator, log: Arc<dyn RecordLog>, require_consent: bool) -> Self {
        Self {
            validator,
            anonymizer: Anonymizer,
            log,
            require_consent,
        }
    }

    pub async fn submit(&self, raw: &Value, caller: CallerMeta) -> Result<Accepted, Rejection> {
        let mut draft = self.validator.validate(raw).inspect_err(|e| {
            tracing::debug!(
                "Validation failed for fields: {:?}",
                e.fields().collect::<Vec<_>>()
            );
        })?;

        if self.require_consent && !draft.consent {
            return Err(ValidationErrors(vec![FieldError::value(
                "consent",
                "consent must be given",
            )])
            .into());
        }

        let now = Utc::now();
        let submission_id = identifier::assign(draft.submission_id.as_deref(), &draft.email, now);

        if draft.user_agent.is_none() {
            draft.user_agent = caller.user_agent;
        }

        let source = draft.source.clone();
        let received_at = now.trunc_subsecs(6);
        let record = self
            .anonymizer
            .anonymize(draft.with_id(submission_id), received_at, caller.ip);
        let submission_id = record.submission_id.clone();

        // The write runs on its own task so a dropped request cannot stop a frame midway.
        let log = Arc::clone(&self.log);
        let write = tokio::spawn(async move { log.append(&record).await });

        write
            .await
            .map_err(|e| PersistenceError::Aborted(e.to_string()))??;

        tracing::info!("Accepted submission from source {source} at {received_at}");

        Ok(Accepted {
            submission_id,
            received_at,
        })
    }
}
