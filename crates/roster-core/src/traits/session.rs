//! Authenticated session trait.

use async_trait::async_trait;
use serde_json::Value;

use crate::record::Record;
use crate::types::{ApiUrl, RecordId, Resource};
use crate::{AccessToken, RefreshToken, Result};

/// An authenticated session for record operations.
///
/// Session state (tokens, signed-in user) lives in the implementing value and
/// is passed explicitly to whoever needs it.
#[async_trait]
pub trait Session: Send + Sync {
    /// Returns the API base URL associated with this session.
    fn api(&self) -> &ApiUrl;

    /// Returns the access token for this session.
    fn access_token(&self) -> AccessToken;

    /// Returns the refresh token for this session, if any.
    fn refresh_token(&self) -> Option<RefreshToken>;

    /// Returns the signed-in user as returned at login, if any.
    fn user(&self) -> Option<Value>;

    /// Fetch the collection of a resource.
    ///
    /// Returns the raw response body; shape checking is the caller's job.
    async fn list(&self, resource: Resource) -> Result<Value>;

    /// Fetch a single record.
    async fn get(&self, resource: Resource, id: &RecordId) -> Result<Record>;

    /// Create a record.
    ///
    /// Returns the created record when the response carries one.
    async fn create(&self, resource: Resource, payload: &Record) -> Result<Option<Record>>;

    /// Replace the fields of an existing record.
    ///
    /// Returns the updated record when the response carries one.
    async fn update(
        &self,
        resource: Resource,
        id: &RecordId,
        payload: &Record,
    ) -> Result<Option<Record>>;

    /// Delete a record.
    async fn delete(&self, resource: Resource, id: &RecordId) -> Result<()>;
}
