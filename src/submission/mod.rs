pub mod anonymize;
pub mod identifier;
pub mod metadata;
pub mod parser;
pub mod pipeline;
pub mod schema;

pub use pipeline::{Accepted, Intake, Rejection};
