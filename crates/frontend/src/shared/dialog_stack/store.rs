use std::any::type_name;
use std::cell::RefCell;
use std::collections::HashSet;
use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use futures::channel::oneshot;
use log::debug;

use super::config::DialogStackConfig;
use super::error::DialogError;
use super::router::{NavigateMode, Router, Scheduler};
use super::types::{
    DialogConfig, DialogId, DialogInstance, Outcome, Routable, Settler, StackEntry, TopDialog,
};
use super::utils::{generate_id, search_for_stack, with_dialog_params, without_dialog_params};

struct StoreState<C> {
    stack: Vec<DialogInstance<C>>,
    /// Navigation requested, not yet observed in the URL.
    pending: HashSet<DialogId>,
    /// Closed by the store, URL fix-up still scheduled.
    closing: HashSet<DialogId>,
    /// Set by `teardown`; the store no longer navigates.
    torn_down: bool,
}

/// Future returned by [`DialogStore::open`].
///
/// Resolves once: `Ok` from `close`, `Err` from `cancel`, `close_all` or teardown.
#[must_use = "a dialog's result is only observed by awaiting its future"]
pub struct PendingDialog<T> {
    id: DialogId,
    rx: oneshot::Receiver<Outcome>,
    _result: PhantomData<fn() -> T>,
}

impl<T> PendingDialog<T> {
    pub fn id(&self) -> DialogId {
        self.id
    }
}

impl<T: 'static> Future for PendingDialog<T> {
    type Output = Result<T, DialogError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let outcome = match Pin::new(&mut self.rx).poll(cx) {
            Poll::Pending => return Poll::Pending,
            Poll::Ready(outcome) => outcome,
        };
        Poll::Ready(match outcome {
            Ok(Ok(value)) => value
                .downcast::<T>()
                .map(|value| *value)
                .map_err(|_| DialogError::UnexpectedResult {
                    expected: type_name::<T>(),
                }),
            Ok(Err(err)) => Err(err),
            // Sender dropped with the store.
            Err(oneshot::Canceled) => Err(DialogError::AllClosed),
        })
    }
}

/// Ordered stack of open dialogs.
///
/// Owns the stack and the pending/closing id sets. Cloning gives another
/// handle to the same store. Single-threaded: all calls happen on the UI thread.
pub struct DialogStore<C> {
    state: Rc<RefCell<StoreState<C>>>,
    observers: Rc<RefCell<Vec<Rc<dyn Fn()>>>>,
    router: Rc<dyn Router>,
    scheduler: Rc<dyn Scheduler>,
    config: Rc<DialogStackConfig>,
}

impl<C> Clone for DialogStore<C> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
            observers: Rc::clone(&self.observers),
            router: Rc::clone(&self.router),
            scheduler: Rc::clone(&self.scheduler),
            config: Rc::clone(&self.config),
        }
    }
}

impl<C: 'static> DialogStore<C> {
    pub fn new(
        router: Rc<dyn Router>,
        scheduler: Rc<dyn Scheduler>,
        config: DialogStackConfig,
    ) -> Self {
        Self {
            state: Rc::new(RefCell::new(StoreState {
                stack: Vec::new(),
                pending: HashSet::new(),
                closing: HashSet::new(),
                torn_down: false,
            })),
            observers: Rc::new(RefCell::new(Vec::new())),
            router,
            scheduler,
            config: Rc::new(config),
        }
    }

    pub fn config(&self) -> &DialogStackConfig {
        &self.config
    }

    /// Called after every stack mutation, never while the store is borrowed.
    pub fn subscribe(&self, observer: impl Fn() + 'static) {
        self.observers.borrow_mut().push(Rc::new(observer));
    }

    /// Pushes a dialog and, for routed dialogs, points the URL at it.
    pub fn open<T: 'static>(&self, config: DialogConfig<C>) -> PendingDialog<T> {
        let id = generate_id();
        let (settler, rx) = Settler::channel();
        let route_key = config.route_key.clone();

        {
            let mut state = self.state.borrow_mut();
            state.stack.push(DialogInstance {
                id,
                config,
                settler,
            });
            if route_key.is_some() {
                state.pending.insert(id);
            }
            debug!(
                "dialog open: id={} route_key={:?} depth={}",
                id,
                route_key,
                state.stack.len()
            );
        }

        if let Some(route_key) = route_key {
            let search =
                with_dialog_params(&self.router.search_params(), &self.config, &route_key, id);
            self.router.navigate(search, NavigateMode::Push);
        }

        self.notify();
        PendingDialog {
            id,
            rx,
            _result: PhantomData,
        }
    }

    /// Resolves the dialog with `result` and removes it. Unknown ids are ignored.
    pub fn close<R: 'static>(&self, id: DialogId, result: R) {
        let Some(instance) = self.remove(id) else {
            debug!("dialog close ignored: id={} is not on the stack", id);
            return;
        };
        let routed = instance.is_routed();
        instance.settler.settle(Ok(Box::new(result)));
        debug!("dialog closed: id={} routed={}", id, routed);

        if routed {
            self.state.borrow_mut().closing.insert(id);
            let store = self.clone();
            // Router state must not be touched from inside the state update.
            self.scheduler.defer(Box::new(move || {
                store.restore_url();
                store.state.borrow_mut().closing.remove(&id);
            }));
        }

        self.notify();
    }

    /// Rejects the dialog with [`DialogError::Cancelled`] and removes it.
    ///
    /// Leaves the URL alone; [`RouterSync`](super::sync::RouterSync) repairs it.
    pub fn cancel(&self, id: DialogId) {
        let Some(instance) = self.remove(id) else {
            debug!("dialog cancel ignored: id={} is not on the stack", id);
            return;
        };
        instance.settler.settle(Err(DialogError::Cancelled));
        debug!("dialog cancelled: id={}", id);
        self.notify();
    }

    /// Rejects every dialog with [`DialogError::AllClosed`] and strips the URL.
    pub fn close_all(&self) {
        let removed = self.drain();
        let current = self.router.search_params();
        let stripped = without_dialog_params(&current, &self.config);
        if stripped != current {
            self.router.navigate(stripped, NavigateMode::Replace);
        }
        if removed > 0 {
            self.notify();
        }
    }

    /// Rejects every dialog without navigating and drops all observers.
    ///
    /// URL fix-ups already scheduled by `close` become no-ops.
    pub fn teardown(&self) {
        self.drain();
        {
            let mut state = self.state.borrow_mut();
            state.closing.clear();
            state.torn_down = true;
        }
        self.observers.borrow_mut().clear();
        debug!("dialog store torn down");
    }

    pub fn len(&self) -> usize {
        self.state.borrow().stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.borrow().stack.is_empty()
    }

    pub fn contains(&self, id: DialogId) -> bool {
        self.state.borrow().stack.iter().any(|d| d.id == id)
    }

    pub fn top_id(&self) -> Option<DialogId> {
        self.state.borrow().stack.last().map(|d| d.id)
    }

    /// Ids and route keys of the stack, bottom to top.
    pub fn entries(&self) -> Vec<StackEntry> {
        self.state
            .borrow()
            .stack
            .iter()
            .map(|d| StackEntry {
                id: d.id,
                route_key: d.config.route_key.clone(),
            })
            .collect()
    }

    pub(crate) fn with_top<R>(&self, f: impl FnOnce(&DialogInstance<C>, usize) -> R) -> Option<R> {
        let state = self.state.borrow();
        let depth = state.stack.len();
        state.stack.last().map(|top| f(top, depth))
    }

    pub(crate) fn is_pending(&self, id: DialogId) -> bool {
        self.state.borrow().pending.contains(&id)
    }

    pub(crate) fn is_closing(&self, id: DialogId) -> bool {
        self.state.borrow().closing.contains(&id)
    }

    pub(crate) fn has_closing(&self) -> bool {
        !self.state.borrow().closing.is_empty()
    }

    /// The URL now shows `id`. Clears its pending flag and those of dialogs
    /// below it, whose navigations were overwritten. False if `id` was not pending.
    pub(crate) fn pending_landed(&self, id: DialogId) -> bool {
        let mut state = self.state.borrow_mut();
        if !state.pending.remove(&id) {
            return false;
        }
        let below: Vec<DialogId> = state
            .stack
            .iter()
            .map(|d| d.id)
            .take_while(|other| *other != id)
            .collect();
        for other in below {
            state.pending.remove(&other);
        }
        true
    }

    /// Points the URL at the topmost routed dialog, or strips it when there is none.
    /// Returns false when the URL already matched.
    pub(crate) fn restore_url(&self) -> bool {
        let current = self.router.search_params();
        let target = {
            let state = self.state.borrow();
            if state.torn_down {
                return false;
            }
            search_for_stack(&current, &self.config, &state.stack)
        };
        if target == current {
            return false;
        }
        debug!("dialog url restore: {} -> {}", current, target);
        self.router.navigate(target, NavigateMode::Replace);
        true
    }

    fn remove(&self, id: DialogId) -> Option<DialogInstance<C>> {
        let mut state = self.state.borrow_mut();
        let idx = state.stack.iter().position(|d| d.id == id)?;
        state.pending.remove(&id);
        Some(state.stack.remove(idx))
    }

    fn drain(&self) -> usize {
        let removed = {
            let mut state = self.state.borrow_mut();
            state.pending.clear();
            std::mem::take(&mut state.stack)
        };
        let count = removed.len();
        for instance in removed {
            instance.settler.settle(Err(DialogError::AllClosed));
        }
        if count > 0 {
            debug!("dialog stack drained: {} dialogs rejected", count);
        }
        count
    }

    fn notify(&self) {
        let observers: Vec<Rc<dyn Fn()>> = self.observers.borrow().iter().cloned().collect();
        for observer in observers {
            observer();
        }
    }
}

impl<C: Clone + 'static> DialogStore<C> {
    /// Snapshot of the rendered dialog.
    pub fn top(&self) -> Option<TopDialog<C>> {
        self.with_top(|top, depth| TopDialog {
            id: top.id,
            component: top.config.component.clone(),
            size: top.config.size.unwrap_or_default(),
            close_on_esc: top.config.close_on_esc,
            close_on_overlay_click: top.config.close_on_overlay_click,
            depth,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::dialog_stack::testing::Harness;
    use futures::executor::block_on;
    use futures::FutureExt;
    use std::cell::Cell;

    #[derive(Debug, PartialEq)]
    struct Saved {
        name: String,
    }

    #[test]
    fn test_renders_most_recent_open_dialog() {
        let h = Harness::new();
        assert!(h.store.top().is_none());

        let a = h.store.open::<()>(DialogConfig::new("a"));
        let b = h.store.open::<()>(DialogConfig::new("b"));
        let c = h.store.open::<()>(DialogConfig::new("c"));
        let top = h.store.top().unwrap();
        assert_eq!(top.component, "c");
        assert_eq!(top.id, c.id());
        assert_eq!(top.depth, 3);

        h.store.close(c.id(), ());
        assert_eq!(h.store.top().unwrap().component, "b");
        h.store.cancel(a.id());
        assert_eq!(h.store.top().unwrap().id, b.id());
        assert_eq!(h.store.len(), 1);
    }

    #[test]
    fn test_close_resolves_with_result() {
        let h = Harness::new();
        let pending = h.store.open::<Saved>(DialogConfig::new("form"));
        h.store.close(
            pending.id(),
            Saved {
                name: "ingest".to_string(),
            },
        );
        assert!(h.store.is_empty());
        assert_eq!(
            block_on(pending),
            Ok(Saved {
                name: "ingest".to_string()
            })
        );
    }

    #[test]
    fn test_cancel_rejects_with_cancelled() {
        let h = Harness::new();
        let pending = h.store.open::<Saved>(DialogConfig::new("form"));
        h.store.cancel(pending.id());
        let err = block_on(pending).unwrap_err();
        assert!(err.is_cancelled());
    }

    #[test]
    fn test_future_stays_pending_until_settled() {
        let h = Harness::new();
        let mut pending = h.store.open::<u32>(DialogConfig::new("form"));
        assert!((&mut pending).now_or_never().is_none());
        h.store.close(pending.id(), 7u32);
        assert_eq!(pending.now_or_never(), Some(Ok(7)));
    }

    #[test]
    fn test_wrong_result_type() {
        let h = Harness::new();
        let pending = h.store.open::<u32>(DialogConfig::new("form"));
        h.store.close(pending.id(), "not a number");
        assert!(matches!(
            block_on(pending),
            Err(DialogError::UnexpectedResult { .. })
        ));
    }

    #[test]
    fn test_close_and_cancel_are_idempotent() {
        let h = Harness::new();
        let first = h.store.open::<u32>(DialogConfig::new("a"));
        let second = h.store.open::<u32>(DialogConfig::new("b"));
        let id = first.id();

        h.store.close(id, 1u32);
        h.store.close(id, 2u32);
        h.store.cancel(id);

        assert_eq!(block_on(first), Ok(1));
        assert_eq!(h.store.len(), 1);
        assert!(h.store.contains(second.id()));

        h.store.cancel(second.id());
        h.store.cancel(second.id());
        assert_eq!(block_on(second), Err(DialogError::Cancelled));
    }

    #[test]
    fn test_close_all_rejects_everything_and_strips_url() {
        let h = Harness::with_url("?active=pipelines");
        let futures: Vec<PendingDialog<()>> = vec![
            h.store.open(DialogConfig::new("a").routed("a")),
            h.store.open(DialogConfig::new("b")),
            h.store.open(DialogConfig::new("c").routed("c")),
        ];
        h.settle();
        assert_eq!(h.url_key().as_deref(), Some("c"));

        h.store.close_all();
        h.settle();
        assert!(h.store.is_empty());
        assert_eq!(h.url().to_search(), "?active=pipelines");
        for pending in futures {
            assert_eq!(block_on(pending), Err(DialogError::AllClosed));
        }
    }

    #[test]
    fn test_routed_open_marks_pending_before_navigation() {
        let h = Harness::with_url("?active=pipelines");
        let pending = h.store.open::<()>(DialogConfig::new("edit").routed("edit"));
        assert!(h.store.is_pending(pending.id()));

        let (mode, search) = h.router.navigations().pop().unwrap();
        assert_eq!(mode, NavigateMode::Push);
        assert_eq!(search.get("active").as_deref(), Some("pipelines"));
        assert_eq!(search.get("dialog").as_deref(), Some("edit"));
        assert_eq!(search.get("dialogId"), Some(pending.id().to_string()));
    }

    #[test]
    fn test_unrouted_open_does_not_navigate() {
        let h = Harness::new();
        let _pending = h.store.open::<()>(DialogConfig::new("confirm"));
        assert!(h.router.navigations().is_empty());
    }

    #[test]
    fn test_close_defers_url_fixup_and_marks_closing() {
        let h = Harness::new();
        let a = h.store.open::<()>(DialogConfig::new("a").routed("a"));
        let b = h.store.open::<()>(DialogConfig::new("b").routed("b"));
        h.settle();
        assert_eq!(h.url_id(), Some(b.id()));

        h.store.close(b.id(), ());
        assert!(h.store.is_closing(b.id()));
        assert_eq!(h.url_id(), Some(b.id()));

        h.scheduler.run_pending();
        assert!(!h.store.is_closing(b.id()));
        assert_eq!(h.url_key().as_deref(), Some("a"));
        assert_eq!(h.url_id(), Some(a.id()));
        assert_eq!(
            h.router.navigations().last().map(|(mode, _)| *mode),
            Some(NavigateMode::Replace)
        );
    }

    #[test]
    fn test_observers_run_after_each_mutation() {
        let h = Harness::new();
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&calls);
        let store = h.store.clone();
        // Observers may read the store freely.
        h.store.subscribe(move || {
            let _ = store.len();
            seen.set(seen.get() + 1);
        });

        let pending = h.store.open::<()>(DialogConfig::new("a"));
        h.store.cancel(pending.id());
        h.store.cancel(pending.id());
        h.store.close_all();
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_teardown_rejects_without_navigation() {
        let h = Harness::new();
        let pending = h.store.open::<()>(DialogConfig::new("a").routed("a"));
        let navigations = h.router.navigations().len();
        h.store.teardown();
        assert_eq!(block_on(pending), Err(DialogError::AllClosed));
        assert_eq!(h.router.navigations().len(), navigations);
    }

    #[test]
    fn test_teardown_cancels_scheduled_url_fixup() {
        let h = Harness::new();
        let a = h.store.open::<()>(DialogConfig::new("a").routed("a"));
        h.settle();
        let navigations = h.router.navigations().len();

        h.store.close(a.id(), ());
        h.store.teardown();
        assert_eq!(h.scheduler.run_pending(), 1);

        assert_eq!(h.router.navigations().len(), navigations);
        assert!(!h.store.is_closing(a.id()));
        assert_eq!(h.url_id(), Some(a.id()));
    }

    #[test]
    fn test_dropped_store_resolves_waiting_futures() {
        let h = Harness::new();
        let pending = h.store.open::<()>(DialogConfig::new("a"));
        drop(h);
        assert_eq!(block_on(pending), Err(DialogError::AllClosed));
    }
}
