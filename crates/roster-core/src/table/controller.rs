//! Table controller: filtered view plus page state over one collection.

use crate::record::{Collection, Record};
use crate::types::RecordId;

use super::{Pagination, record_matches};

/// Filtered, paginated view of a [`Collection`].
///
/// The filtered view is recomputed synchronously whenever the query or the
/// collection changes. Navigation that would leave the valid page range is
/// a no-op.
///
/// # Example
///
/// ```
/// use roster_core::{Collection, TableController};
/// use serde_json::json;
///
/// let records = Collection::from_payload(json!([
///     {"_id": "1", "plate": "GR-1020-21"},
///     {"_id": "2", "plate": "AS-551-19"},
///     {"_id": "3", "plate": "GR-7781-22"}
/// ]));
///
/// let mut table = TableController::new(records, 1);
/// table.set_query("gr-");
/// assert_eq!(table.page_count(), 2);
/// table.next_page();
/// assert_eq!(table.current_page_rows()[0].id().unwrap().as_str(), "3");
/// ```
#[derive(Debug, Clone)]
pub struct TableController {
    collection: Collection,
    query: String,
    pagination: Pagination,
    /// Indices into `collection` of the records matching `query`.
    view: Vec<usize>,
}

impl TableController {
    /// Create a controller on the first page with an empty query.
    pub fn new(collection: Collection, page_size: usize) -> Self {
        let mut table = Self {
            collection,
            query: String::new(),
            pagination: Pagination::new(page_size),
            view: Vec::new(),
        };
        table.refilter();
        table
    }

    /// The underlying, unfiltered collection.
    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    /// Replace the whole collection and return to the first page.
    pub fn set_collection(&mut self, collection: Collection) {
        self.collection = collection;
        self.pagination.page_index = 0;
        self.refilter();
    }

    /// Append a record, keeping the current page.
    pub fn insert(&mut self, record: Record) {
        self.collection.insert(record);
        self.refresh_view();
    }

    /// Replace the record with the same id, or append it.
    pub fn patch(&mut self, record: Record) -> bool {
        let replaced = self.collection.patch(record);
        self.refresh_view();
        replaced
    }

    /// Remove a record by id.
    pub fn remove(&mut self, id: &RecordId) -> Option<Record> {
        let removed = self.collection.remove(id);
        self.refresh_view();
        removed
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Set the free-text query and return to the first page.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.pagination.page_index = 0;
        self.refilter();
    }

    pub fn page_size(&self) -> usize {
        self.pagination.page_size()
    }

    /// Set the page size and return to the first page.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.pagination.set_page_size(page_size);
    }

    pub fn page_index(&self) -> usize {
        self.pagination.page_index
    }

    /// Jump to a page without bounds checking.
    ///
    /// An index past the last page shows an empty page.
    pub fn set_page_index(&mut self, page_index: usize) {
        self.pagination.page_index = page_index;
    }

    /// Number of records in the filtered view.
    pub fn filtered_len(&self) -> usize {
        self.view.len()
    }

    /// All records of the filtered view, in collection order.
    pub fn filtered_rows(&self) -> Vec<&Record> {
        self.view
            .iter()
            .map(|&i| &self.collection.records()[i])
            .collect()
    }

    /// Number of pages of the filtered view; at least 1.
    pub fn page_count(&self) -> usize {
        self.pagination.page_count(self.view.len())
    }

    /// Rows of the current page.
    pub fn current_page_rows(&self) -> Vec<&Record> {
        let records = self.collection.records();
        self.view[self.pagination.range(self.view.len())]
            .iter()
            .map(|&i| &records[i])
            .collect()
    }

    pub fn can_previous_page(&self) -> bool {
        self.pagination.page_index > 0
    }

    pub fn can_next_page(&self) -> bool {
        self.pagination.page_index.saturating_add(1) < self.page_count()
    }

    pub fn first_page(&mut self) {
        self.pagination.page_index = 0;
    }

    pub fn previous_page(&mut self) {
        if self.can_previous_page() {
            self.pagination.page_index -= 1;
        }
    }

    pub fn next_page(&mut self) {
        if self.can_next_page() {
            self.pagination.page_index += 1;
        }
    }

    pub fn last_page(&mut self) {
        self.pagination.page_index = self.page_count() - 1;
    }

    fn refilter(&mut self) {
        let needle = self.query.to_lowercase();
        self.view = self
            .collection
            .iter()
            .enumerate()
            .filter(|(_, record)| needle.is_empty() || record_matches(record, &needle))
            .map(|(i, _)| i)
            .collect();
    }

    /// Refilter after a targeted change, pulling the page back into range.
    fn refresh_view(&mut self) {
        self.refilter();
        let last = self.page_count() - 1;
        if self.pagination.page_index > last {
            self.pagination.page_index = last;
        }
    }
}

impl Default for TableController {
    fn default() -> Self {
        Self::new(Collection::empty(), Pagination::DEFAULT_PAGE_SIZE)
    }
}
