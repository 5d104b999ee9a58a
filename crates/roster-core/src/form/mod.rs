//! Generic create/update forms.
//!
//! A form is a schema (field list with rules) plus per-field state. The
//! engine validates fields as they are edited, checks the whole form on
//! submit, sends the create or update, and reports the outcome as a notice
//! and a store update.

mod engine;
mod schema;

pub use engine::{FormEngine, FormMode, SubmitOutcome, VALIDATION_DEBOUNCE};
pub use schema::{FieldSchema, FormSchema, InputKind, Rule};
