//! Grid-side data store: active filter, paging, sorting and background loads.
//!
//! Loads run on a worker thread and report back over a channel. Every load
//! is tagged with a sequence number and only the newest response is applied,
//! so reopening the window on another day never shows a late answer for the
//! previous one.

use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::models::event::LoggedEvent;
use crate::models::filter::FilterSpec;
use crate::models::query::{Page, PageRequest, SortColumn, SortDirection, SortSpec};
use crate::services::event::{EventQuery, EventSource};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

struct LoadResponse {
    seq: u64,
    result: Result<Page<LoggedEvent>, String>,
}

/// Store options fixed at construction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StoreOptions {
    pub page_size: usize,
    pub paging: bool,
    pub remote_sort: bool,
}

pub struct EventStore {
    source: Arc<dyn EventSource>,
    options: StoreOptions,
    filter: Option<FilterSpec>,
    page: usize,
    sort: SortSpec,
    records: Vec<LoggedEvent>,
    total: usize,
    status: LoadStatus,
    request_seq: u64,
    sender: Sender<LoadResponse>,
    receiver: Receiver<LoadResponse>,
}

impl EventStore {
    pub fn new(source: Arc<dyn EventSource>, options: StoreOptions) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            source,
            options: StoreOptions {
                page_size: options.page_size.max(1),
                ..options
            },
            filter: None,
            page: 0,
            sort: SortSpec::default(),
            records: Vec::new(),
            total: 0,
            status: LoadStatus::Idle,
            request_seq: 0,
            sender,
            receiver,
        }
    }

    /// Replace the active filter and go back to the first page.
    pub fn set_filter(&mut self, filter: FilterSpec) {
        self.filter = Some(filter);
        self.page = 0;
    }

    pub fn filter(&self) -> Option<&FilterSpec> {
        self.filter.as_ref()
    }

    /// Start fetching the current page in the background.
    pub fn load(&mut self) {
        self.request_seq += 1;
        let seq = self.request_seq;
        let query = self.current_query();
        let source = Arc::clone(&self.source);
        let sender = self.sender.clone();

        log::debug!(
            "Store load #{}: filter={:?} offset={} limit={:?}",
            seq,
            query.filter,
            query.page.offset,
            query.page.limit
        );
        self.status = LoadStatus::Loading;

        thread::spawn(move || {
            let result = match panic::catch_unwind(AssertUnwindSafe(|| source.fetch(&query))) {
                Ok(fetched) => fetched.map_err(|err| format!("{:#}", err)),
                Err(_) => Err("event source panicked while loading".to_string()),
            };
            // The store may be gone by now; nothing to report to.
            let _ = sender.send(LoadResponse { seq, result });
        });
    }

    /// Reload with unchanged parameters.
    pub fn refresh(&mut self) {
        self.load();
    }

    /// Apply finished loads. Returns true when visible state changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok(response) = self.receiver.try_recv() {
            changed |= self.apply_response(response);
        }
        changed
    }

    /// Block until the newest load has been applied or `timeout` elapses.
    pub fn wait(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        self.poll();

        while self.is_loading() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return false;
            }

            match self.receiver.recv_timeout(remaining) {
                Ok(response) => {
                    self.apply_response(response);
                }
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                    return false;
                }
            }
        }

        true
    }

    fn apply_response(&mut self, response: LoadResponse) -> bool {
        if response.seq != self.request_seq {
            log::debug!(
                "Discarding stale store response #{} (latest #{})",
                response.seq,
                self.request_seq
            );
            return false;
        }

        match response.result {
            Ok(page) => {
                log::debug!(
                    "Store load #{} returned {} of {} events",
                    response.seq,
                    page.records.len(),
                    page.total
                );
                self.records = page.records;
                if !self.options.remote_sort {
                    self.sort.apply(&mut self.records);
                }
                self.total = page.total;
                self.status = LoadStatus::Loaded;
            }
            Err(message) => {
                log::error!("Store load #{} failed: {}", response.seq, message);
                self.records.clear();
                self.total = 0;
                self.status = LoadStatus::Failed(message);
            }
        }

        true
    }

    fn current_query(&self) -> EventQuery {
        // Without remote sorting the backend order is fixed; sorting happens on arrival.
        let sort = if self.options.remote_sort {
            self.sort
        } else {
            SortSpec::default()
        };

        let page = if self.options.paging {
            PageRequest::page(self.page, self.options.page_size, sort)
        } else {
            PageRequest::unpaged(sort)
        };

        EventQuery {
            filter: self.filter.clone(),
            page,
        }
    }

    /// Sort by `column`; a second click on the same column flips direction.
    pub fn sort_by(&mut self, column: SortColumn) {
        self.sort = if self.sort.column == column {
            SortSpec {
                column,
                direction: self.sort.direction.toggled(),
            }
        } else {
            SortSpec {
                column,
                direction: SortDirection::Ascending,
            }
        };

        if self.options.remote_sort {
            self.page = 0;
            self.load();
        } else {
            self.sort.apply(&mut self.records);
        }
    }

    pub fn sort(&self) -> SortSpec {
        self.sort
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_count(&self) -> usize {
        if !self.options.paging || self.total == 0 {
            return 1;
        }
        self.total.div_ceil(self.options.page_size)
    }

    pub fn has_next_page(&self) -> bool {
        self.page + 1 < self.page_count()
    }

    pub fn has_previous_page(&self) -> bool {
        self.page > 0
    }

    pub fn next_page(&mut self) -> bool {
        if !self.has_next_page() {
            return false;
        }
        self.page += 1;
        self.load();
        true
    }

    pub fn previous_page(&mut self) -> bool {
        if !self.has_previous_page() {
            return false;
        }
        self.page -= 1;
        self.load();
        true
    }

    pub fn records(&self) -> &[LoggedEvent] {
        &self.records
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == LoadStatus::Loading
    }

    pub fn options(&self) -> StoreOptions {
        self.options
    }
}
