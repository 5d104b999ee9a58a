//! Client-side filtering and pagination of a collection.

mod controller;
mod filter;
mod pagination;

pub use controller::TableController;
pub use filter::{filter, record_matches};
pub use pagination::Pagination;
