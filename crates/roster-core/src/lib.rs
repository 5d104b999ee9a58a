//! roster-core - Core record-table types and traits.
//!
//! Every list screen of the admin dashboard follows one pattern: fetch a
//! collection, filter it with a free-text query, page through it, export it,
//! and mutate single records through row actions or forms. This crate holds
//! that pattern once, independent of the transport used to reach the API.

pub mod actions;
pub mod cancel;
pub mod credentials;
pub mod error;
pub mod export;
pub mod form;
pub mod notice;
pub mod record;
pub mod store;
pub mod table;
pub mod tokens;
pub mod traits;
pub mod types;

#[cfg(test)]
mod testing;

pub use actions::{ActionOutcome, Confirm, RefreshPolicy, RowAction, RowActionDispatcher};
pub use cancel::{CancelHandle, CancelToken};
pub use credentials::Credentials;
pub use error::Error;
pub use export::{Artifact, ExportFormat};
pub use form::{FieldSchema, FormEngine, FormMode, FormSchema, InputKind, Rule, SubmitOutcome};
pub use notice::{Notice, NoticeLevel, NoticeLog, Notifier};
pub use record::{Collection, EntityRef, Record};
pub use store::{LoadOutcome, RecordStore, StoreUpdate};
pub use table::{Pagination, TableController};
pub use tokens::{AccessToken, RefreshToken};
pub use traits::{Backend, Session};
pub use types::{ApiUrl, RecordId, Resource};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
