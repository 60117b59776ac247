use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::future::TimeoutFuture;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys::window;

use super::router::{NavigateMode, Router, Scheduler};
use super::search::SearchParams;

type ChangeListener = Rc<dyn Fn(SearchParams)>;

/// [`Router`] over `window.history` and `window.location`.
///
/// Programmatic navigations and `popstate` (back/forward) are reported through
/// the same listener, so the sync process cannot tell them apart.
#[derive(Default)]
pub struct BrowserRouter {
    listener: RefCell<Option<ChangeListener>>,
}

impl BrowserRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_change(&self, listener: impl Fn(SearchParams) + 'static) {
        *self.listener.borrow_mut() = Some(Rc::new(listener));
    }

    /// Reports back/forward navigation. Call once; the listener lives for the app lifetime.
    pub fn listen_popstate(self: &Rc<Self>) {
        let router = Rc::clone(self);
        let closure = Closure::wrap(Box::new(move |_: web_sys::Event| {
            router.emit();
        }) as Box<dyn FnMut(_)>);

        if let Some(w) = window() {
            if let Err(err) =
                w.add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref())
            {
                log::warn!("popstate listener not installed: {:?}", err);
            }
            closure.forget();
        }
    }

    fn emit(&self) {
        let listener = self.listener.borrow().clone();
        if let Some(listener) = listener {
            listener(self.search_params());
        }
    }
}

impl Router for BrowserRouter {
    fn search_params(&self) -> SearchParams {
        let search = window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default();
        SearchParams::parse(&search)
    }

    fn navigate(&self, search: SearchParams, mode: NavigateMode) {
        let Some(w) = window() else {
            log::warn!("navigation skipped: no window");
            return;
        };
        let location = w.location();
        let path = location.pathname().unwrap_or_default();
        let hash = location.hash().unwrap_or_default();
        let url = format!("{}{}{}", path, search.to_search(), hash);

        let result = w.history().and_then(|history| match mode {
            NavigateMode::Push => history.push_state_with_url(&JsValue::NULL, "", Some(&url)),
            NavigateMode::Replace => {
                history.replace_state_with_url(&JsValue::NULL, "", Some(&url))
            }
        });
        match result {
            Ok(()) => self.emit(),
            Err(err) => log::warn!("navigation to {} failed: {:?}", url, err),
        }
    }
}

/// Runs deferred work on the next macrotask.
#[derive(Debug, Default, Clone, Copy)]
pub struct TickScheduler;

impl Scheduler for TickScheduler {
    fn defer(&self, task: Box<dyn FnOnce()>) {
        spawn_local(async move {
            // Next tick: the current event dispatch and state update have finished.
            TimeoutFuture::new(0).await;
            task();
        });
    }
}
