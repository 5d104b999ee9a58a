//! In-memory session used by unit tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::error::ApiError;
use crate::record::{Collection, Record};
use crate::traits::Session;
use crate::types::{ApiUrl, RecordId, Resource};
use crate::{AccessToken, RefreshToken, Result};

/// A session answering from memory and counting calls.
pub(crate) struct MockSession {
    api: ApiUrl,
    pub payload: Mutex<Value>,
    pub fail_status: Mutex<Option<u16>>,
    pub delay: Option<Duration>,
    pub lists: AtomicUsize,
    pub gets: AtomicUsize,
    pub creates: AtomicUsize,
    pub updates: AtomicUsize,
    pub deletes: Mutex<Vec<RecordId>>,
    pub bodies: Mutex<Vec<Value>>,
}

impl MockSession {
    pub fn new(payload: Value) -> Self {
        Self {
            api: ApiUrl::new("https://hr.example.com/api").unwrap(),
            payload: Mutex::new(payload),
            fail_status: Mutex::new(None),
            delay: None,
            lists: AtomicUsize::new(0),
            gets: AtomicUsize::new(0),
            creates: AtomicUsize::new(0),
            updates: AtomicUsize::new(0),
            deletes: Mutex::new(Vec::new()),
            bodies: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn fail_with(&self, status: u16) {
        *self.fail_status.lock().unwrap() = Some(status);
    }

    pub fn delete_count(&self) -> usize {
        self.deletes.lock().unwrap().len()
    }

    async fn respond(&self) -> Result<()> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match *self.fail_status.lock().unwrap() {
            Some(status) => Err(ApiError::new(status, None).into()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Session for MockSession {
    fn api(&self) -> &ApiUrl {
        &self.api
    }

    fn access_token(&self) -> AccessToken {
        AccessToken::new("test-access")
    }

    fn refresh_token(&self) -> Option<RefreshToken> {
        None
    }

    fn user(&self) -> Option<Value> {
        Some(json!({"email": "hr@example.com"}))
    }

    async fn list(&self, _resource: Resource) -> Result<Value> {
        self.lists.fetch_add(1, Ordering::SeqCst);
        self.respond().await?;
        Ok(self.payload.lock().unwrap().clone())
    }

    async fn get(&self, _resource: Resource, id: &RecordId) -> Result<Record> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.respond().await?;
        let collection = Collection::from_payload(self.payload.lock().unwrap().clone());
        collection
            .get(id)
            .cloned()
            .ok_or_else(|| ApiError::new(404, Some("not found".into())).into())
    }

    async fn create(&self, _resource: Resource, payload: &Record) -> Result<Option<Record>> {
        let n = self.creates.fetch_add(1, Ordering::SeqCst);
        self.bodies.lock().unwrap().push(payload.clone().into_value());
        self.respond().await?;
        let mut created = payload.clone();
        created.insert("_id", Value::String(format!("new{n}")));
        Ok(Some(created))
    }

    async fn update(
        &self,
        _resource: Resource,
        id: &RecordId,
        payload: &Record,
    ) -> Result<Option<Record>> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.bodies.lock().unwrap().push(payload.clone().into_value());
        self.respond().await?;
        let mut updated = payload.clone();
        updated.insert("_id", Value::String(id.to_string()));
        Ok(Some(updated))
    }

    async fn delete(&self, _resource: Resource, id: &RecordId) -> Result<()> {
        self.deletes.lock().unwrap().push(id.clone());
        self.respond().await
    }
}
