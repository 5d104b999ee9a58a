//! roster-http - REST-backed session implementation.
//!
//! [`HttpBackend`] logs in against `auth/login` and yields an
//! [`HttpSession`], which attaches the bearer token to every resource call.

mod backend;
mod client;
mod endpoints;
mod session;

pub use backend::HttpBackend;
pub use client::RestClient;
pub use session::HttpSession;
