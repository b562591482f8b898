//! Query engine implementation

use std::sync::{Arc, Weak};
use parking_lot::RwLock;
use tracing::debug;

use super::{filter, sort_records, FilterState, Pagination, SortDirection, SortSpec, ViewSubscriber};
use crate::dataset::{Dataset, Record};
use crate::QueryError;

/// What a presentation layer needs to draw the current page
#[derive(Debug, Clone)]
pub struct ViewSnapshot {
    /// Records on the current page
    pub records: Vec<Record>,
    pub current_page: usize,
    pub total_pages: usize,
    /// Number of records that passed the filter
    pub filtered_items: usize,
    /// Number of records in the unfiltered dataset
    pub dataset_items: usize,
    /// "Showing {start}-{end} of {total}"
    pub range_label: String,
    pub filters_active: bool,
    pub sort: Option<SortSpec>,
}

/// Query state stored internally
#[derive(Debug, Clone)]
struct QueryState {
    dataset: Dataset,
    filter: FilterState,
    sort: Option<SortSpec>,
    pagination: Pagination,
    /// Filtered and sorted records, in view order
    view: Vec<Record>,
}

impl QueryState {
    /// Re-derive the view from the original dataset: filter, then sort,
    /// then reset pagination to the first page.
    fn refresh(&mut self) {
        let filtered = filter(&self.dataset, &self.filter);
        let view = match &self.sort {
            Some(spec) => sort_records(filtered, &spec.column, spec.direction),
            None => filtered,
        };
        self.view = view.into_iter().cloned().collect();
        self.pagination.set_total_items(self.view.len());

        debug!(
            "Query view refreshed: {} of {} records, {} pages",
            self.view.len(),
            self.dataset.len(),
            self.pagination.total_pages()
        );
    }

    fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            records: self.pagination.page(&self.view).to_vec(),
            current_page: self.pagination.current_page(),
            total_pages: self.pagination.total_pages(),
            filtered_items: self.view.len(),
            dataset_items: self.dataset.len(),
            range_label: self.pagination.range_label(),
            filters_active: self.filter.is_active(),
            sort: self.sort.clone(),
        }
    }
}

/// Owns the original dataset and the filter/sort/page state over it
pub struct QueryEngine {
    state: Arc<RwLock<QueryState>>,
    subscribers: Arc<RwLock<Vec<Weak<dyn ViewSubscriber>>>>,
}

impl QueryEngine {
    /// Create a new query engine showing the first page of `dataset`
    pub fn new(dataset: Dataset, items_per_page: usize) -> Result<Self, QueryError> {
        let mut state = QueryState {
            pagination: Pagination::new(dataset.len(), items_per_page)?,
            dataset,
            filter: FilterState::default(),
            sort: None,
            view: Vec::new(),
        };
        state.refresh();

        Ok(Self {
            state: Arc::new(RwLock::new(state)),
            subscribers: Arc::new(RwLock::new(Vec::new())),
        })
    }

    /// Swap in a new dataset.
    ///
    /// A dataset with a different id clears filter and sort state.
    pub fn replace_dataset(&self, dataset: Dataset) {
        let mut state = self.state.write();
        if state.dataset.id() != dataset.id() {
            state.filter.reset();
            state.sort = None;
        }
        state.dataset = dataset;
        state.refresh();

        drop(state);
        self.notify_subscribers();
    }

    /// Drop the current dataset
    pub fn clear(&self) {
        self.replace_dataset(Dataset::empty());
    }

    /// Set the search term
    pub fn set_search(&self, term: impl Into<String>) {
        let mut state = self.state.write();
        state.filter.search_term = term.into();
        state.refresh();

        drop(state);
        self.notify_subscribers();
    }

    /// Restrict the search to one column, or search all columns with `None`
    pub fn set_target_column(&self, column: Option<String>) {
        let mut state = self.state.write();
        state.filter.target_column = column;
        state.refresh();

        drop(state);
        self.notify_subscribers();
    }

    /// Replace the whole filter state at once
    pub fn set_filter(&self, filter: FilterState) {
        let mut state = self.state.write();
        state.filter = filter;
        state.refresh();

        drop(state);
        self.notify_subscribers();
    }

    /// Clear search term and target column
    pub fn reset_filters(&self) {
        let mut state = self.state.write();
        state.filter.reset();
        state.refresh();

        drop(state);
        self.notify_subscribers();
    }

    /// Sort the filtered view by a column
    pub fn sort_by(&self, column: &str, direction: SortDirection) -> Result<(), QueryError> {
        let mut state = self.state.write();
        if !state.dataset.schema().contains(column) {
            return Err(QueryError::UnknownColumn(column.to_string()));
        }
        state.sort = Some(SortSpec::new(column, direction));
        state.refresh();

        drop(state);
        self.notify_subscribers();
        Ok(())
    }

    /// Drop the sort and return to dataset order
    pub fn clear_sort(&self) {
        let mut state = self.state.write();
        state.sort = None;
        state.refresh();

        drop(state);
        self.notify_subscribers();
    }

    /// Change the page size; returns to page 1
    pub fn set_items_per_page(&self, items_per_page: usize) -> Result<(), QueryError> {
        let mut state = self.state.write();
        state.pagination.set_items_per_page(items_per_page)?;

        drop(state);
        self.notify_subscribers();
        Ok(())
    }

    /// Navigate forward by one page
    pub fn next_page(&self) -> bool {
        let moved = self.state.write().pagination.next_page();
        if moved {
            self.notify_subscribers();
        }
        moved
    }

    /// Navigate backward by one page
    pub fn previous_page(&self) -> bool {
        let moved = self.state.write().pagination.previous_page();
        if moved {
            self.notify_subscribers();
        }
        moved
    }

    /// Jump to a 1-based page; out-of-range pages are ignored
    pub fn go_to_page(&self, page: usize) -> bool {
        let moved = self.state.write().pagination.go_to_page(page);
        if moved {
            self.notify_subscribers();
        }
        moved
    }

    /// Current view
    pub fn view(&self) -> ViewSnapshot {
        self.state.read().snapshot()
    }

    /// Records on the current page
    pub fn current_page_records(&self) -> Vec<Record> {
        let state = self.state.read();
        state.pagination.page(&state.view).to_vec()
    }

    /// Every record that passed the filter, in view order
    pub fn filtered_records(&self) -> Vec<Record> {
        self.state.read().view.clone()
    }

    /// The unfiltered dataset
    pub fn dataset(&self) -> Dataset {
        self.state.read().dataset.clone()
    }

    pub fn filter_state(&self) -> FilterState {
        self.state.read().filter.clone()
    }

    pub fn pagination(&self) -> Pagination {
        self.state.read().pagination
    }

    pub fn has_active_filters(&self) -> bool {
        self.state.read().filter.is_active()
    }

    /// Add a subscriber
    pub fn add_subscriber(&self, subscriber: Arc<dyn ViewSubscriber>) {
        let mut subscribers = self.subscribers.write();
        subscribers.push(Arc::downgrade(&subscriber));
    }

    /// Notify all subscribers of a view change
    ///
    /// No lock is held while subscribers run, so they may call back into
    /// the engine.
    fn notify_subscribers(&self) {
        let view = self.view();
        let live: Vec<Arc<dyn ViewSubscriber>> = {
            let mut subscribers = self.subscribers.write();
            // Remove any dead weak references
            subscribers.retain(|weak| weak.strong_count() > 0);
            subscribers.iter().filter_map(Weak::upgrade).collect()
        };

        for subscriber in live {
            subscriber.on_view_change(&view);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Recorder {
        views: Mutex<Vec<ViewSnapshot>>,
    }

    impl ViewSubscriber for Recorder {
        fn on_view_change(&self, view: &ViewSnapshot) {
            self.views.lock().push(view.clone());
        }
    }

    fn numbered(n: usize) -> Dataset {
        Dataset::from_rows(
            ["id", "parity"],
            (1..=n).map(|i| {
                let parity = if i % 2 == 0 { "even" } else { "odd" };
                vec![i.to_string(), parity.to_string()]
            }),
        )
    }

    fn ids(records: &[Record]) -> Vec<String> {
        records.iter().filter_map(|r| r.get("id")).map(String::from).collect()
    }

    #[test]
    fn test_initial_view() {
        let engine = QueryEngine::new(numbered(45), 20).unwrap();
        let view = engine.view();

        assert_eq!(view.total_pages, 3);
        assert_eq!(view.current_page, 1);
        assert_eq!(view.records.len(), 20);
        assert_eq!(view.range_label, "Showing 1-20 of 45");
        assert!(!view.filters_active);
    }

    #[test]
    fn test_filter_resets_page_and_recomputes_from_original() {
        let engine = QueryEngine::new(numbered(45), 20).unwrap();
        assert!(engine.go_to_page(3));

        engine.set_search("even");
        let view = engine.view();
        assert_eq!(view.current_page, 1);
        assert_eq!(view.filtered_items, 22);

        // A new term is applied to the full dataset, not to the previous result
        engine.set_search("odd");
        assert_eq!(engine.view().filtered_items, 23);

        engine.reset_filters();
        assert_eq!(engine.view().filtered_items, 45);
        assert!(!engine.has_active_filters());
    }

    #[test]
    fn test_target_column_restricts_search() {
        let engine = QueryEngine::new(numbered(12), 20).unwrap();
        engine.set_search("1");
        assert_eq!(engine.view().filtered_items, 4); // 1, 10, 11, 12

        engine.set_target_column(Some("parity".into()));
        assert_eq!(engine.view().filtered_items, 0);
        assert!(engine.has_active_filters());
    }

    #[test]
    fn test_sort_survives_filter_change() {
        let engine = QueryEngine::new(numbered(10), 3).unwrap();
        engine.sort_by("id", SortDirection::Descending).unwrap();
        assert_eq!(ids(&engine.current_page_records()), vec!["10", "9", "8"]);

        engine.set_search("odd");
        assert_eq!(ids(&engine.current_page_records()), vec!["9", "7", "5"]);

        engine.clear_sort();
        assert_eq!(ids(&engine.current_page_records()), vec!["1", "3", "5"]);
    }

    #[test]
    fn test_sort_unknown_column() {
        let engine = QueryEngine::new(numbered(3), 20).unwrap();
        assert_eq!(
            engine.sort_by("price", SortDirection::Ascending),
            Err(QueryError::UnknownColumn("price".into()))
        );
    }

    #[test]
    fn test_page_size_change() {
        let engine = QueryEngine::new(numbered(45), 20).unwrap();
        engine.go_to_page(2);
        engine.set_items_per_page(10).unwrap();

        let view = engine.view();
        assert_eq!(view.current_page, 1);
        assert_eq!(view.total_pages, 5);
        assert!(engine.set_items_per_page(0).is_err());
    }

    #[test]
    fn test_replace_dataset_clears_state() {
        let engine = QueryEngine::new(numbered(45), 20).unwrap();
        engine.set_search("odd");
        engine.sort_by("id", SortDirection::Descending).unwrap();

        engine.replace_dataset(numbered(5));
        let view = engine.view();
        assert!(!view.filters_active);
        assert!(view.sort.is_none());
        assert_eq!(view.filtered_items, 5);

        engine.clear();
        assert_eq!(engine.view().dataset_items, 0);
        assert_eq!(engine.view().range_label, "Showing 0-0 of 0");
    }

    #[test]
    fn test_subscribers_notified_and_pruned() {
        let engine = QueryEngine::new(numbered(45), 20).unwrap();
        let recorder = Arc::new(Recorder::default());
        engine.add_subscriber(recorder.clone());

        engine.next_page();
        engine.next_page();
        engine.next_page(); // already on the last page, no notification
        engine.set_search("odd");

        {
            let views = recorder.views.lock();
            assert_eq!(views.len(), 3);
            assert_eq!(views[1].current_page, 3);
            assert_eq!(views[1].records.len(), 5);
            assert_eq!(views[2].current_page, 1);
        }

        drop(recorder);
        engine.set_search("");
        assert!(engine.subscribers.read().is_empty());
    }

    /// Reads the engine and registers another subscriber from its callback
    struct Reentrant {
        engine: Weak<QueryEngine>,
        joined: Arc<Recorder>,
        pages: Mutex<Vec<usize>>,
    }

    impl ViewSubscriber for Reentrant {
        fn on_view_change(&self, _view: &ViewSnapshot) {
            if let Some(engine) = self.engine.upgrade() {
                self.pages.lock().push(engine.view().current_page);
                engine.add_subscriber(self.joined.clone());
            }
        }
    }

    #[test]
    fn test_subscriber_can_call_back_into_engine() {
        let engine = Arc::new(QueryEngine::new(numbered(45), 20).unwrap());
        let reentrant = Arc::new(Reentrant {
            engine: Arc::downgrade(&engine),
            joined: Arc::new(Recorder::default()),
            pages: Mutex::new(Vec::new()),
        });
        engine.add_subscriber(reentrant.clone());

        assert!(engine.next_page());
        // Added during the first notification, so only the second reaches it
        assert!(engine.next_page());

        assert_eq!(*reentrant.pages.lock(), vec![2, 3]);
        let joined = reentrant.joined.views.lock();
        assert_eq!(joined.len(), 1);
        assert_eq!(joined[0].current_page, 3);
    }
}
