use std::ops::RangeInclusive;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::models::SubmissionDraft;

pub const NAME_MAX_LEN: usize = 100;
pub const EMAIL_MAX_LEN: usize = 254;
pub const COMMENTS_MAX_LEN: usize = 1000;
pub const USER_AGENT_MAX_LEN: usize = 512;
pub const SOURCE_MAX_LEN: usize = 50;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*\.[A-Za-z]{2,63}$",
    )
    .unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Missing,
    Type,
    Value,
}

/// One rejected field and the reason it was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
    pub kind: ErrorKind,
}

impl FieldError {
    pub fn missing(field: &str) -> Self {
        Self::new(field, ErrorKind::Missing, "field required")
    }

    pub fn wrong_type(field: &str, expected: &str) -> Self {
        Self::new(field, ErrorKind::Type, format!("expected {expected}"))
    }

    pub fn value(field: &str, message: impl Into<String>) -> Self {
        Self::new(field, ErrorKind::Value, message)
    }

    fn new(field: &str, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
            kind,
        }
    }
}

/// Every field that failed validation, in declaration order, one entry per field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{} field(s) failed validation", .0.len())]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|e| e.field.as_str())
    }
}

/// Structural and range checks for an incoming survey body.
#[derive(Debug, Clone)]
pub struct SchemaValidator {
    pub age: RangeInclusive<u32>,
    pub rating: RangeInclusive<u8>,
}

impl Default for SchemaValidator {
    fn default() -> Self {
        Self {
            age: 13..=120,
            rating: 1..=5,
        }
    }
}

impl SchemaValidator {
    /// Check every field and either build a draft or report all failures at once.
    /// `consent=false` is accepted here; acceptance policy belongs to the pipeline.
    pub fn validate(&self, raw: &Value) -> Result<SubmissionDraft, ValidationErrors> {
        let Some(obj) = raw.as_object() else {
            return Err(ValidationErrors(vec![FieldError::wrong_type(
                "body",
                "a JSON object",
            )]));
        };

        let mut errors = Vec::new();

        let name = keep(&mut errors, required_text(obj, "name", NAME_MAX_LEN));
        let email = keep(&mut errors, email_address(obj));
        let age = keep(
            &mut errors,
            integer_in(obj, "age", u64::from(*self.age.start()), u64::from(*self.age.end()))
                .and_then(|v| u32::try_from(v).map_err(|_| FieldError::value("age", "out of range"))),
        );
        let consent = keep(&mut errors, boolean(obj, "consent"));
        let rating = keep(
            &mut errors,
            integer_in(
                obj,
                "rating",
                u64::from(*self.rating.start()),
                u64::from(*self.rating.end()),
            )
            .and_then(|v| u8::try_from(v).map_err(|_| FieldError::value("rating", "out of range"))),
        );
        let comments = keep(&mut errors, optional_text(obj, "comments", COMMENTS_MAX_LEN));
        let user_agent = keep(&mut errors, optional_text(obj, "user_agent", USER_AGENT_MAX_LEN));
        let submission_id = keep(
            &mut errors,
            optional_string(obj, "submission_id").map(|id| id.filter(|s| !s.is_empty())),
        );
        let source = keep(&mut errors, required_text(obj, "source", SOURCE_MAX_LEN));

        let (
            Some(name),
            Some(email),
            Some(age),
            Some(consent),
            Some(rating),
            Some(comments),
            Some(user_agent),
            Some(submission_id),
            Some(source),
        ) = (
            name,
            email,
            age,
            consent,
            rating,
            comments,
            user_agent,
            submission_id,
            source,
        )
        else {
            return Err(ValidationErrors(errors));
        };

        Ok(SubmissionDraft {
            name,
            email,
            age,
            consent,
            rating,
            comments,
            user_agent,
            submission_id,
            source,
        })
    }
}

fn keep<T>(errors: &mut Vec<FieldError>, result: Result<T, FieldError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            errors.push(e);
            None
        }
    }
}

/// Absent and explicit `null` are both treated as missing.
fn present<'a>(obj: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    obj.get(field).filter(|v| !v.is_null())
}

fn required_text(obj: &Map<String, Value>, field: &str, max_len: usize) -> Result<String, FieldError> {
    let value = present(obj, field).ok_or_else(|| FieldError::missing(field))?;
    let Value::String(s) = value else {
        return Err(FieldError::wrong_type(field, "a string"));
    };

    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(FieldError::value(field, "must not be empty"));
    }
    check_len(field, trimmed, max_len)?;
    Ok(trimmed.to_string())
}

fn optional_text(
    obj: &Map<String, Value>,
    field: &str,
    max_len: usize,
) -> Result<Option<String>, FieldError> {
    let value = optional_string(obj, field)?;
    if let Some(s) = &value {
        check_len(field, s, max_len)?;
    }
    Ok(value)
}

/// Caller identifiers are taken as-is, with no length limit beyond the body cap.
fn optional_string(obj: &Map<String, Value>, field: &str) -> Result<Option<String>, FieldError> {
    match present(obj, field) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(FieldError::wrong_type(field, "a string")),
    }
}

fn check_len(field: &str, s: &str, max_len: usize) -> Result<(), FieldError> {
    if s.chars().count() > max_len {
        return Err(FieldError::value(
            field,
            format!("must be at most {max_len} characters"),
        ));
    }
    Ok(())
}

fn email_address(obj: &Map<String, Value>) -> Result<String, FieldError> {
    let value = present(obj, "email").ok_or_else(|| FieldError::missing("email"))?;
    let Value::String(s) = value else {
        return Err(FieldError::wrong_type("email", "a string"));
    };

    if s.len() > EMAIL_MAX_LEN || !EMAIL_RE.is_match(s) {
        return Err(FieldError::value("email", "not a valid email address"));
    }
    Ok(s.clone())
}

fn integer_in(obj: &Map<String, Value>, field: &str, min: u64, max: u64) -> Result<u64, FieldError> {
    let value = present(obj, field).ok_or_else(|| FieldError::missing(field))?;
    let Value::Number(n) = value else {
        return Err(FieldError::wrong_type(field, "an integer"));
    };

    let out_of_range = || FieldError::value(field, format!("must be between {min} and {max}"));

    if let Some(v) = n.as_u64() {
        if (min..=max).contains(&v) {
            return Ok(v);
        }
        return Err(out_of_range());
    }

    // Negative integers are in-type but out of range; floats are the wrong type.
    if n.is_i64() {
        Err(out_of_range())
    } else {
        Err(FieldError::wrong_type(field, "an integer"))
    }
}

fn boolean(obj: &Map<String, Value>, field: &str) -> Result<bool, FieldError> {
    match present(obj, field) {
        None => Err(FieldError::missing(field)),
        Some(Value::Bool(b)) => Ok(*b),
        Some(_) => Err(FieldError::wrong_type(field, "a boolean")),
    }
}
