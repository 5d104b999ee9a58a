//! Record store: one resource's collection, fetched through a session.

use tracing::{debug, info, instrument, warn};

use serde_json::Value;

use crate::cancel::CancelToken;
use crate::notice::Notice;
use crate::record::{Collection, Record};
use crate::table::{Pagination, TableController};
use crate::traits::Session;
use crate::types::{RecordId, Resource};
use crate::{Error, Result};

/// Result of [`RecordStore::load`].
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// The collection was replaced with `count` records.
    Loaded { count: usize },
    /// The fetch failed or the payload was not a list. The collection is
    /// now empty and `notice` explains why.
    Degraded { notice: Notice },
    /// Cancelled before the response arrived. The store is unchanged.
    Cancelled,
}

impl LoadOutcome {
    /// The notice to show the user, if any.
    pub fn notice(&self) -> Option<&Notice> {
        match self {
            LoadOutcome::Degraded { notice } => Some(notice),
            _ => None,
        }
    }
}

/// How the store should catch up with a write that succeeded remotely.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreUpdate {
    /// Append the created record.
    Inserted(Record),
    /// Replace the updated record in place.
    Patched(Record),
    /// Drop the deleted record.
    Removed(RecordId),
    /// Fetch the whole collection again.
    Reload,
}

/// The fetched collection of one resource, with its table state.
#[derive(Debug)]
pub struct RecordStore<S> {
    session: S,
    resource: Resource,
    table: TableController,
}

impl<S: Session> RecordStore<S> {
    /// Create an empty store. Call [`load`](Self::load) to populate it.
    pub fn new(session: S, resource: Resource) -> Self {
        Self::with_page_size(session, resource, Pagination::DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(session: S, resource: Resource, page_size: usize) -> Self {
        Self {
            session,
            resource,
            table: TableController::new(Collection::empty(), page_size),
        }
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn resource(&self) -> Resource {
        self.resource
    }

    pub fn collection(&self) -> &Collection {
        self.table.collection()
    }

    pub fn table(&self) -> &TableController {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut TableController {
        &mut self.table
    }

    /// Fetch the collection, replacing whatever the store held.
    ///
    /// Never fails: a transport error, an error status or a non-list payload
    /// leaves an empty collection and reports a notice instead.
    #[instrument(skip(self, cancel), fields(resource = %self.resource))]
    pub async fn load(&mut self, cancel: &CancelToken) -> LoadOutcome {
        debug!("Loading collection");

        let payload = match cancel.run(self.session.list(self.resource)).await {
            Err(Error::Cancelled) => {
                debug!("Load cancelled");
                return LoadOutcome::Cancelled;
            }
            Err(e) | Ok(Err(e)) => {
                warn!(error = %e, "Failed to load collection");
                self.table.set_collection(Collection::empty());
                return LoadOutcome::Degraded {
                    notice: Notice::from_error(self.resource.label(), &e),
                };
            }
            Ok(Ok(payload)) => payload,
        };

        if !payload.is_array() {
            self.table.set_collection(Collection::from_payload(payload));
            return LoadOutcome::Degraded {
                notice: Notice::error(format!(
                    "Unexpected response while loading {} records",
                    self.resource.label()
                )),
            };
        }

        let collection = Collection::from_payload(payload);
        let count = collection.len();
        self.table.set_collection(collection);

        info!(count, "Collection loaded");
        LoadOutcome::Loaded { count }
    }

    /// Fetch a single record from the server.
    #[instrument(skip(self, cancel), fields(resource = %self.resource, %id))]
    pub async fn fetch(&self, id: &RecordId, cancel: &CancelToken) -> Result<Record> {
        cancel.run(self.session.get(self.resource, id)).await?
    }

    /// Bring the collection up to date after a successful write.
    pub async fn apply(&mut self, update: StoreUpdate, cancel: &CancelToken) -> Option<LoadOutcome> {
        match update {
            StoreUpdate::Inserted(record) => {
                self.table.insert(record);
                None
            }
            StoreUpdate::Patched(record) => {
                self.table.patch(record);
                None
            }
            StoreUpdate::Removed(id) => {
                self.table.remove(&id);
                None
            }
            StoreUpdate::Reload => Some(self.load(cancel).await),
        }
    }

    /// Filtered rows, for export.
    pub fn filtered_rows(&self) -> Vec<&Record> {
        self.table.filtered_rows()
    }

    /// Raw field value of a record held in the store.
    pub fn field(&self, id: &RecordId, key: &str) -> Option<&Value> {
        self.collection().get(id).and_then(|r| r.get(key))
    }
}
