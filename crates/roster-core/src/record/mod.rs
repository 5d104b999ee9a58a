//! Records, collections and references between them.
//!
//! Records are schema-agnostic JSON objects; interpretation of individual
//! fields is left to callers and form schemas.

mod collection;
mod reference;
mod value;

pub use collection::Collection;
pub use reference::EntityRef;
pub use value::{Record, field_text};
