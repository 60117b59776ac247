use std::rc::Rc;

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use super::browser::{BrowserRouter, TickScheduler};
use super::config::DialogStackConfig;
use super::presentation::Dismissal;
use super::router::{Router, Scheduler};
use super::search::SearchParams;
use super::store::{DialogStore, PendingDialog};
use super::sync::RouterSync;
use super::types::{DialogConfig, DialogId, TopDialog};

/// Dialog content: builds the view once the dialog becomes the top of the stack.
///
/// Props are captured by the closure.
#[derive(Clone)]
pub struct DialogView(Rc<dyn Fn(DialogHandle) -> AnyView>);

impl DialogView {
    pub fn new(render: impl Fn(DialogHandle) -> AnyView + 'static) -> Self {
        Self(Rc::new(render))
    }

    pub fn render(&self, handle: DialogHandle) -> AnyView {
        (self.0)(handle)
    }
}

/// Given to dialog content so it can settle itself.
///
/// Can be copied into event handlers.
#[derive(Clone, Copy)]
pub struct DialogHandle {
    id: DialogId,
    svc: DialogStackService,
}

impl DialogHandle {
    pub fn id(&self) -> DialogId {
        self.id
    }

    /// Resolves the dialog with `result` on the next tick.
    pub fn close<R: 'static>(&self, result: R) {
        let handle = *self;
        spawn_local(async move {
            // Defer so the dialog is not removed during its own click dispatch.
            TimeoutFuture::new(0).await;
            handle.svc.close(handle.id, result);
        });
    }

    /// Cancels the dialog on the next tick.
    pub fn cancel(&self) {
        let handle = *self;
        spawn_local(async move {
            TimeoutFuture::new(0).await;
            handle.svc.cancel(handle.id);
        });
    }
}

/// App-wide dialog stack bound to the browser URL.
///
/// - `open` returns a future settled by `close`/`cancel`/`close_all`
/// - the topmost routed dialog is mirrored into `?dialog=..&dialogId=..`
/// - back/forward cancel dialogs through the sync effect
#[derive(Clone, Copy)]
pub struct DialogStackService {
    store: StoredValue<DialogStore<DialogView>, LocalStorage>,
    sync: StoredValue<RouterSync<DialogView>, LocalStorage>,
    router: StoredValue<Rc<BrowserRouter>, LocalStorage>,
    /// Bumped after every stack mutation.
    revision: RwSignal<u64>,
    /// Search params as last reported by the router.
    search: RwSignal<SearchParams>,
    config: StoredValue<DialogStackConfig>,
}

impl DialogStackService {
    pub fn new() -> Self {
        Self::with_config(DialogStackConfig::default())
    }

    pub fn with_config(config: DialogStackConfig) -> Self {
        let router = Rc::new(BrowserRouter::new());
        let search = RwSignal::new(router.search_params());
        router.on_change(move |params| search.set(params));

        let store = DialogStore::new(
            Rc::clone(&router) as Rc<dyn Router>,
            Rc::new(TickScheduler) as Rc<dyn Scheduler>,
            config.clone(),
        );
        let revision = RwSignal::new(0u64);
        store.subscribe(move || {
            revision.try_update(|r| *r += 1);
        });
        let sync = RouterSync::new(store.clone());

        Self {
            store: StoredValue::new_local(store),
            sync: StoredValue::new_local(sync),
            router: StoredValue::new_local(router),
            revision,
            search,
            config: StoredValue::new(config),
        }
    }

    /// Installs the `popstate` listener and the reconciliation effect.
    ///
    /// Call once from the app root.
    pub fn init_router_integration(&self) {
        self.router.get_value().listen_popstate();

        let svc = *self;
        Effect::new(move |_| {
            let search = svc.search.get();
            svc.revision.track();
            // At most one level per run; the resulting change triggers the next.
            let _ = svc.sync.get_value().reconcile(&search);
        });
    }

    pub fn open<T: 'static>(&self, config: DialogConfig<DialogView>) -> PendingDialog<T> {
        self.store.get_value().open(config)
    }

    pub fn close<R: 'static>(&self, id: DialogId, result: R) {
        self.store.get_value().close(id, result);
    }

    pub fn cancel(&self, id: DialogId) {
        self.store.get_value().cancel(id);
    }

    pub fn close_all(&self) {
        self.store.get_value().close_all();
    }

    /// Rejects everything still open. Used when the app unmounts.
    pub fn teardown(&self) {
        self.store.get_value().teardown();
    }

    pub fn dismiss(&self, dismissal: Dismissal) -> Option<DialogId> {
        self.store.get_value().dismiss(dismissal)
    }

    /// Dismisses on the next tick, after the originating DOM event has been dispatched.
    pub fn dismiss_deferred(&self, dismissal: Dismissal) {
        let svc = *self;
        spawn_local(async move {
            TimeoutFuture::new(0).await;
            svc.dismiss(dismissal);
        });
    }

    /// Reactive stack depth.
    pub fn len(&self) -> usize {
        self.revision.track();
        self.store.get_value().len()
    }

    pub fn is_open(&self) -> bool {
        self.len() > 0
    }

    /// Reactive id of the rendered dialog.
    pub fn top_id(&self) -> Option<DialogId> {
        self.revision.track();
        self.store.get_value().top_id()
    }

    pub(crate) fn top_untracked(&self) -> Option<TopDialog<DialogView>> {
        self.store.get_value().top()
    }

    /// Whether the rendered dialog sits on top of another one.
    pub(crate) fn can_go_back_untracked(&self) -> bool {
        self.store.get_value().can_go_back()
    }

    pub(crate) fn handle(&self, id: DialogId) -> DialogHandle {
        DialogHandle { id, svc: *self }
    }

    pub fn config(&self) -> DialogStackConfig {
        self.config.get_value()
    }
}

impl Default for DialogStackService {
    fn default() -> Self {
        Self::new()
    }
}

/// The service provided at the app root.
pub fn use_dialog_stack() -> DialogStackService {
    use_context::<DialogStackService>()
        .expect("DialogStackService not provided in context (provide it in app root)")
}
