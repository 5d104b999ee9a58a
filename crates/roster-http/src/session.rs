//! REST-backed session implementation.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use roster_core::error::{AuthError, Error, TransportError};
use roster_core::traits::Session as SessionTrait;
use roster_core::{AccessToken, ApiUrl, Record, RecordId, RefreshToken, Resource, Result};

use crate::backend::HttpBackend;
use crate::endpoints::response_record;

/// Session for the REST API.
///
/// Cloning is cheap; clones share the same tokens.
#[derive(Clone)]
pub struct HttpSession {
    inner: Arc<SessionInner>,
}

#[derive(Debug)]
struct SessionInner {
    api: ApiUrl,
    backend: HttpBackend,
    user: Option<Value>,
    tokens: RwLock<SessionTokens>,
}

#[derive(Debug)]
struct SessionTokens {
    access_token: AccessToken,
    refresh_token: Option<RefreshToken>,
}

impl HttpSession {
    pub(crate) fn new(
        backend: HttpBackend,
        access_token: AccessToken,
        refresh_token: Option<RefreshToken>,
        user: Option<Value>,
    ) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                api: backend.client().api().clone(),
                backend,
                user,
                tokens: RwLock::new(SessionTokens {
                    access_token,
                    refresh_token,
                }),
            }),
        }
    }

    /// Restore a session from persisted tokens.
    pub fn from_persisted(
        api: ApiUrl,
        access_token: AccessToken,
        refresh_token: Option<RefreshToken>,
        user: Option<Value>,
    ) -> Result<Self> {
        Ok(Self::new(
            HttpBackend::new(api)?,
            access_token,
            refresh_token,
            user,
        ))
    }

    fn token(&self) -> String {
        let tokens = self
            .inner
            .tokens
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        tokens.access_token.as_str().to_string()
    }

    /// Turn a rejected token into an auth error so callers can ask the user
    /// to log in again.
    fn check_auth<T>(&self, result: Result<T>) -> Result<T> {
        match result {
            Err(Error::Api(e)) if e.status == 401 => {
                warn!("Access token rejected");
                Err(AuthError::SessionExpired.into())
            }
            other => other,
        }
    }
}

#[async_trait]
impl SessionTrait for HttpSession {
    fn api(&self) -> &ApiUrl {
        &self.inner.api
    }

    fn access_token(&self) -> AccessToken {
        AccessToken::new(self.token())
    }

    fn refresh_token(&self) -> Option<RefreshToken> {
        let tokens = self
            .inner
            .tokens
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        tokens.refresh_token.clone()
    }

    fn user(&self) -> Option<Value> {
        self.inner.user.clone()
    }

    #[instrument(skip(self), fields(api = %self.inner.api, %resource))]
    async fn list(&self, resource: Resource) -> Result<Value> {
        debug!("Listing records");
        let token = self.token();
        let url = self.inner.api.resource_url(resource);
        self.check_auth(self.inner.backend.client().get(&url, Some(&token)).await)
    }

    #[instrument(skip(self), fields(api = %self.inner.api, %resource, %id))]
    async fn get(&self, resource: Resource, id: &RecordId) -> Result<Record> {
        debug!("Getting record");
        let token = self.token();
        let url = self.inner.api.record_url(resource, id);
        let body = self.check_auth(self.inner.backend.client().get(&url, Some(&token)).await)?;

        response_record(body).ok_or_else(|| {
            TransportError::Decode {
                message: format!("response for {resource} {id} is not a record"),
            }
            .into()
        })
    }

    #[instrument(skip(self, payload), fields(api = %self.inner.api, %resource))]
    async fn create(&self, resource: Resource, payload: &Record) -> Result<Option<Record>> {
        debug!("Creating record");
        let token = self.token();
        let url = self.inner.api.resource_url(resource);
        let body = self.check_auth(
            self.inner
                .backend
                .client()
                .post_json(&url, payload, Some(&token))
                .await,
        )?;
        Ok(response_record(body))
    }

    #[instrument(skip(self, payload), fields(api = %self.inner.api, %resource, %id))]
    async fn update(
        &self,
        resource: Resource,
        id: &RecordId,
        payload: &Record,
    ) -> Result<Option<Record>> {
        debug!("Updating record");
        let token = self.token();
        let url = self.inner.api.record_url(resource, id);
        let body = self.check_auth(
            self.inner
                .backend
                .client()
                .put_json(&url, payload, Some(&token))
                .await,
        )?;
        Ok(response_record(body))
    }

    #[instrument(skip(self), fields(api = %self.inner.api, %resource, %id))]
    async fn delete(&self, resource: Resource, id: &RecordId) -> Result<()> {
        debug!("Deleting record");
        let token = self.token();
        let url = self.inner.api.record_url(resource, id);
        self.check_auth(self.inner.backend.client().delete(&url, Some(&token)).await)?;
        Ok(())
    }
}

impl std::fmt::Debug for HttpSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpSession")
            .field("api", &self.inner.api)
            .field("tokens", &"[REDACTED]")
            .finish()
    }
}
