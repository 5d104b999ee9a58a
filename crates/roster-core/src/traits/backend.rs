//! Backend trait.

use async_trait::async_trait;

use crate::types::ApiUrl;
use crate::{Credentials, Result};

use super::Session;

/// An API backend that can open authenticated sessions.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Session type for this backend.
    type Session: Session;

    /// Returns the API base URL for this instance.
    fn url(&self) -> &ApiUrl;

    /// Exchange credentials for a new session.
    async fn login(&self, credentials: Credentials) -> Result<Self::Session>;
}
