use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use super::config::DialogStackConfig;
use super::router::{MemoryRouter, Router, Scheduler};
use super::search::SearchParams;
use super::store::DialogStore;
use super::sync::{RouterSync, SyncAction};
use super::types::DialogId;
use super::utils::url_dialog;

/// Deferred tasks wait here until the test runs them.
#[derive(Default)]
pub(crate) struct ManualScheduler {
    queue: RefCell<VecDeque<Box<dyn FnOnce()>>>,
}

impl ManualScheduler {
    /// Runs queued tasks, including ones queued meanwhile. Returns how many ran.
    pub(crate) fn run_pending(&self) -> usize {
        let mut ran = 0;
        loop {
            let task = self.queue.borrow_mut().pop_front();
            match task {
                Some(task) => {
                    task();
                    ran += 1;
                }
                None => return ran,
            }
        }
    }
}

impl Scheduler for ManualScheduler {
    fn defer(&self, task: Box<dyn FnOnce()>) {
        self.queue.borrow_mut().push_back(task);
    }
}

/// Store + sync process wired to an in-memory router.
pub(crate) struct Harness {
    pub(crate) router: Rc<MemoryRouter>,
    pub(crate) scheduler: Rc<ManualScheduler>,
    pub(crate) store: DialogStore<&'static str>,
    pub(crate) sync: RouterSync<&'static str>,
    /// Set by the store observer, like the service's revision signal.
    stack_changed: Rc<Cell<bool>>,
    /// Router version seen by the last effect run.
    seen_url: Cell<u64>,
}

impl Harness {
    pub(crate) fn new() -> Self {
        Self::with_url("")
    }

    pub(crate) fn with_url(search: &str) -> Self {
        let router = Rc::new(MemoryRouter::new(SearchParams::parse(search)));
        let scheduler = Rc::new(ManualScheduler::default());
        let store = DialogStore::new(
            Rc::clone(&router) as Rc<dyn Router>,
            Rc::clone(&scheduler) as Rc<dyn Scheduler>,
            DialogStackConfig::default(),
        );
        let sync = RouterSync::new(store.clone());
        // The effect runs once on mount.
        let stack_changed = Rc::new(Cell::new(true));
        let flag = Rc::clone(&stack_changed);
        store.subscribe(move || flag.set(true));
        let seen_url = Cell::new(router.version());
        Self {
            router,
            scheduler,
            store,
            sync,
            stack_changed,
            seen_url,
        }
    }

    /// One effect run against the current URL.
    pub(crate) fn reconcile(&self) -> Option<SyncAction> {
        self.stack_changed.set(false);
        self.seen_url.set(self.router.version());
        self.sync.reconcile(&self.router.search_params())
    }

    /// Alternates deferred tasks and effect runs until neither does anything.
    ///
    /// The effect only re-runs after a URL change or a stack mutation.
    pub(crate) fn settle(&self) -> Vec<SyncAction> {
        let mut actions = Vec::new();
        for _ in 0..32 {
            let ran = self.scheduler.run_pending();
            let triggered =
                self.stack_changed.get() || self.router.version() != self.seen_url.get();
            if triggered {
                actions.extend(self.reconcile());
            } else if ran == 0 {
                return actions;
            }
        }
        panic!("dialog stack did not converge: {:?}", actions);
    }

    pub(crate) fn url(&self) -> SearchParams {
        self.router.search_params()
    }

    pub(crate) fn url_key(&self) -> Option<String> {
        self.url().get(&self.store.config().dialog_param)
    }

    pub(crate) fn url_id(&self) -> Option<DialogId> {
        url_dialog(&self.url(), self.store.config()).id()
    }
}
