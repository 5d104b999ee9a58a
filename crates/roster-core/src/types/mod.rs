//! Validated identifier and address types.
//!
//! These types enforce their invariants at construction time so that an
//! invalid URL, id or resource name never reaches the transport layer.

mod api_url;
mod record_id;
mod resource;

pub use api_url::ApiUrl;
pub use record_id::RecordId;
pub use resource::Resource;
