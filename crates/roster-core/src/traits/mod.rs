//! Core traits for API backends and authenticated sessions.

mod backend;
mod session;

pub use backend::Backend;
pub use session::Session;
