use std::cell::{Cell, RefCell};

use super::search::SearchParams;

/// How a navigation affects history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigateMode {
    /// New history entry, reachable with the back button.
    Push,
    /// Overwrites the current entry.
    Replace,
}

/// Host router collaborator.
///
/// `navigate` is fire-and-forget. The resulting change must reach the
/// synchronization process through the same channel as back/forward.
pub trait Router {
    fn search_params(&self) -> SearchParams;
    fn navigate(&self, search: SearchParams, mode: NavigateMode);
}

/// Runs a task on a later tick, outside the current call stack.
pub trait Scheduler {
    fn defer(&self, task: Box<dyn FnOnce()>);
}

/// History-backed router kept in memory. Used off-browser and in tests.
#[derive(Debug)]
pub struct MemoryRouter {
    entries: RefCell<Vec<SearchParams>>,
    index: Cell<usize>,
    navigations: RefCell<Vec<(NavigateMode, SearchParams)>>,
    /// Bumped whenever the current entry changes, like a browser change event.
    version: Cell<u64>,
}

impl MemoryRouter {
    pub fn new(initial: SearchParams) -> Self {
        Self {
            entries: RefCell::new(vec![initial]),
            index: Cell::new(0),
            navigations: RefCell::new(Vec::new()),
            version: Cell::new(0),
        }
    }

    /// Browser back button. Returns false at the start of history.
    pub fn back(&self) -> bool {
        let idx = self.index.get();
        if idx == 0 {
            return false;
        }
        self.index.set(idx - 1);
        self.bump();
        true
    }

    /// Browser forward button. Returns false at the end of history.
    pub fn forward(&self) -> bool {
        let idx = self.index.get();
        if idx + 1 >= self.entries.borrow().len() {
            return false;
        }
        self.index.set(idx + 1);
        self.bump();
        true
    }

    /// User typed a URL: a new entry that no navigation requested.
    pub fn enter_url(&self, search: SearchParams) {
        self.push_entry(search);
    }

    /// Navigations requested through [`Router::navigate`], oldest first.
    pub fn navigations(&self) -> Vec<(NavigateMode, SearchParams)> {
        self.navigations.borrow().clone()
    }

    pub fn history_len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Number of URL changes observed so far: navigations, back, forward and typed URLs.
    pub fn version(&self) -> u64 {
        self.version.get()
    }

    fn bump(&self) {
        self.version.set(self.version.get() + 1);
    }

    fn push_entry(&self, search: SearchParams) {
        let mut entries = self.entries.borrow_mut();
        let idx = self.index.get();
        entries.truncate(idx + 1);
        entries.push(search);
        self.index.set(entries.len() - 1);
        drop(entries);
        self.bump();
    }
}

impl Default for MemoryRouter {
    fn default() -> Self {
        Self::new(SearchParams::new())
    }
}

impl Router for MemoryRouter {
    fn search_params(&self) -> SearchParams {
        self.entries
            .borrow()
            .get(self.index.get())
            .cloned()
            .unwrap_or_default()
    }

    fn navigate(&self, search: SearchParams, mode: NavigateMode) {
        self.navigations.borrow_mut().push((mode, search.clone()));
        match mode {
            NavigateMode::Push => self.push_entry(search),
            NavigateMode::Replace => {
                let idx = self.index.get();
                if let Some(entry) = self.entries.borrow_mut().get_mut(idx) {
                    *entry = search;
                }
                self.bump();
            }
        }
    }
}
