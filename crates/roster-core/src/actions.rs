//! Per-row actions on a table.
//!
//! Every row offers the same menu: view details, edit, download, preview
//! and delete. Delete asks for confirmation, issues exactly one remote
//! delete, and on success brings the store up to date according to the
//! configured [`RefreshPolicy`]. Failures end in an error notice; nothing
//! is retried.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::cancel::CancelToken;
use crate::error::{Error, InvalidInputError};
use crate::notice::{Notice, Notifier};
use crate::record::Record;
use crate::store::{LoadOutcome, RecordStore, StoreUpdate};
use crate::traits::Session;
use crate::types::RecordId;

/// Fields probed, in order, for a record's attached document.
const DOCUMENT_FIELDS: [&str; 4] = ["file", "document", "url", "path"];

/// An operation invoked from a table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowAction {
    ViewDetails,
    Edit,
    Download,
    Preview,
    Delete,
}

impl RowAction {
    pub const ALL: [RowAction; 5] = [
        RowAction::ViewDetails,
        RowAction::Edit,
        RowAction::Download,
        RowAction::Preview,
        RowAction::Delete,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            RowAction::ViewDetails => "view",
            RowAction::Edit => "edit",
            RowAction::Download => "download",
            RowAction::Preview => "preview",
            RowAction::Delete => "delete",
        }
    }
}

impl fmt::Display for RowAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RowAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RowAction::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                InvalidInputError::Other {
                    message: format!("unknown row action '{s}'"),
                }
                .into()
            })
    }
}

/// A blocking yes/no prompt.
pub trait Confirm: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// How the store catches up after a successful write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RefreshPolicy {
    /// Insert, patch or remove only the affected record.
    #[default]
    Targeted,
    /// Fetch the whole collection again.
    Reload,
}

impl RefreshPolicy {
    /// Pick the store update for a write, falling back to a reload when
    /// the targeted update is not possible.
    pub fn update(&self, targeted: Option<StoreUpdate>) -> StoreUpdate {
        match (self, targeted) {
            (RefreshPolicy::Targeted, Some(update)) => update,
            _ => StoreUpdate::Reload,
        }
    }
}

/// Result of a dispatched row action.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    /// The record to show (view) or to prefill a form with (edit).
    Record(Record),
    /// The record's attached document.
    Document { record: Record, url: String },
    /// The user declined the confirmation prompt; nothing was sent.
    Declined,
    /// The record was deleted remotely and the store refreshed.
    ///
    /// `reload` is set when the refresh was a full reload.
    Deleted { reload: Option<LoadOutcome> },
    /// The action failed; `notice` was shown.
    Failed { notice: Notice },
    /// Cancelled before the server answered.
    Cancelled,
}

/// Runs row actions against a [`RecordStore`].
pub struct RowActionDispatcher<'a> {
    notifier: &'a dyn Notifier,
    confirm: &'a dyn Confirm,
    policy: RefreshPolicy,
}

impl<'a> RowActionDispatcher<'a> {
    pub fn new(notifier: &'a dyn Notifier, confirm: &'a dyn Confirm) -> Self {
        Self {
            notifier,
            confirm,
            policy: RefreshPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: RefreshPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Run `action` on the record identified by `id`.
    #[instrument(skip(self, store, cancel), fields(resource = %store.resource(), %action, %id))]
    pub async fn dispatch<S: Session>(
        &self,
        store: &mut RecordStore<S>,
        action: RowAction,
        id: &RecordId,
        cancel: &CancelToken,
    ) -> ActionOutcome {
        match action {
            RowAction::ViewDetails | RowAction::Edit => match store.fetch(id, cancel).await {
                Ok(record) => ActionOutcome::Record(record),
                Err(e) => self.fail(store, &e),
            },
            RowAction::Download | RowAction::Preview => self.document(store, id, cancel).await,
            RowAction::Delete => self.delete(store, id, cancel).await,
        }
    }

    async fn document<S: Session>(
        &self,
        store: &RecordStore<S>,
        id: &RecordId,
        cancel: &CancelToken,
    ) -> ActionOutcome {
        let record = match store.fetch(id, cancel).await {
            Ok(record) => record,
            Err(e) => return self.fail(store, &e),
        };

        match document_link(&record) {
            Some(link) => {
                let url = if link.starts_with("http://") || link.starts_with("https://") {
                    link.to_string()
                } else {
                    store.session().api().endpoint_url(link)
                };
                ActionOutcome::Document { record, url }
            }
            None => {
                let notice = Notice::error(format!(
                    "This {} has no attached document",
                    store.resource().label()
                ));
                self.notifier.notify(notice.clone());
                ActionOutcome::Failed { notice }
            }
        }
    }

    async fn delete<S: Session>(
        &self,
        store: &mut RecordStore<S>,
        id: &RecordId,
        cancel: &CancelToken,
    ) -> ActionOutcome {
        let label = store.resource().label();
        if !self
            .confirm
            .confirm(&format!("Delete this {label}? This cannot be undone."))
        {
            debug!("Delete declined");
            return ActionOutcome::Declined;
        }

        let resource = store.resource();
        let result = cancel.run(store.session().delete(resource, id)).await;
        match result {
            Ok(Ok(())) => {
                info!("Record deleted");
                self.notifier
                    .notify(Notice::success(format!("The {label} was deleted")));
                let update = self.policy.update(Some(StoreUpdate::Removed(id.clone())));
                let reload = store.apply(update, cancel).await;
                ActionOutcome::Deleted { reload }
            }
            Err(Error::Cancelled) => ActionOutcome::Cancelled,
            Err(e) | Ok(Err(e)) => self.fail(store, &e),
        }
    }

    fn fail<S: Session>(&self, store: &RecordStore<S>, err: &Error) -> ActionOutcome {
        if matches!(err, Error::Cancelled) {
            return ActionOutcome::Cancelled;
        }
        warn!(error = %err, "Row action failed");
        let notice = Notice::from_error(store.resource().label(), err);
        self.notifier.notify(notice.clone());
        ActionOutcome::Failed { notice }
    }
}

/// The attached document link of a record, if it has one.
pub fn document_link(record: &Record) -> Option<&str> {
    DOCUMENT_FIELDS.iter().find_map(|key| match record.get(key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.as_str()),
        _ => None,
    })
}
