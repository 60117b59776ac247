use std::cell::Cell;
use std::rc::Rc;

use log::debug;

use super::search::SearchParams;
use super::store::DialogStore;
use super::types::DialogId;
use super::utils::{routed_above, topmost_routed, url_dialog, UrlDialog};

/// What a reconciliation run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    /// The store's own navigation for this dialog became visible.
    PendingLanded(DialogId),
    /// The URL lost its dialog parameters; the topmost routed dialog was cancelled.
    CancelledOnBack(DialogId),
    /// The URL points at an ancestor; its topmost routed descendant was cancelled.
    CancelledDescendant(DialogId),
    /// The URL pointed at an unknown dialog and was rewritten.
    RepairedUrl,
    /// The stack shrank under a URL that still named a removed dialog.
    RepairedAfterShrink,
}

/// Keeps the dialog stack and the URL in agreement.
///
/// The host calls [`RouterSync::reconcile`] whenever the search params or the
/// stack change. Each run removes at most one dialog; the resulting stack change
/// triggers the next run until both sides agree.
pub struct RouterSync<C> {
    store: DialogStore<C>,
    last_len: Rc<Cell<usize>>,
}

impl<C> Clone for RouterSync<C> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            last_len: Rc::clone(&self.last_len),
        }
    }
}

impl<C: 'static> RouterSync<C> {
    pub fn new(store: DialogStore<C>) -> Self {
        let len = store.len();
        Self {
            store,
            last_len: Rc::new(Cell::new(len)),
        }
    }

    /// One reconciliation run against the observed `search`.
    ///
    /// When the stack shrank since the last run the URL is checked against the
    /// stack first; the URL-driven pass runs only if that left the URL alone.
    pub fn reconcile(&self, search: &SearchParams) -> Option<SyncAction> {
        let len = self.store.len();
        let shrank = len < self.last_len.get();
        self.last_len.set(len);

        let action = if shrank {
            self.reconcile_shrink(search)
                .or_else(|| self.reconcile_url(search))
        } else {
            self.reconcile_url(search)
        };
        if let Some(action) = action {
            debug!("dialog sync: {:?}", action);
        }
        action
    }

    fn reconcile_url(&self, search: &SearchParams) -> Option<SyncAction> {
        let url = url_dialog(search, self.store.config());

        if let Some(id) = url.id() {
            if self.store.pending_landed(id) {
                return Some(SyncAction::PendingLanded(id));
            }
        }

        let entries = self.store.entries();
        match url {
            UrlDialog::Absent => {
                let (_, top) = topmost_routed(&entries)?;
                if self.store.is_pending(top.id) || self.store.has_closing() {
                    return None;
                }
                self.store.cancel(top.id);
                Some(SyncAction::CancelledOnBack(top.id))
            }
            UrlDialog::Present { route_key, id } => {
                let position = id.and_then(|id| entries.iter().position(|e| e.id == id));
                match position {
                    Some(idx) => {
                        // Known id under a foreign key: the pair does not identify the dialog.
                        let entry = &entries[idx];
                        if entry.route_key.is_none() || entry.route_key != route_key {
                            return self.store.restore_url().then_some(SyncAction::RepairedUrl);
                        }
                        let descendant = *routed_above(&entries, idx).last()?;
                        if self.store.is_pending(descendant.id) {
                            return None;
                        }
                        self.store.cancel(descendant.id);
                        Some(SyncAction::CancelledDescendant(descendant.id))
                    }
                    None => {
                        if let Some(id) = id {
                            if self.store.is_pending(id) || self.store.is_closing(id) {
                                return None;
                            }
                        }
                        self.store.restore_url().then_some(SyncAction::RepairedUrl)
                    }
                }
            }
        }
    }

    fn reconcile_shrink(&self, search: &SearchParams) -> Option<SyncAction> {
        let id = url_dialog(search, self.store.config()).id()?;
        if self.store.contains(id) || self.store.is_closing(id) {
            return None;
        }
        self.store
            .restore_url()
            .then_some(SyncAction::RepairedAfterShrink)
    }
}
