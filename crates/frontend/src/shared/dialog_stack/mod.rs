//! Stack of modal dialogs mirrored into the URL.
//!
//! [`DialogStore`] owns the stack; [`RouterSync`] keeps the topmost routed
//! dialog and the `dialog`/`dialogId` query parameters in agreement, so the
//! back button closes dialogs and links reopen nothing stale.
//! [`DialogStackService`] and [`DialogHost`] bind both to Leptos and the browser.

pub mod browser;
pub mod config;
pub mod error;
pub mod host;
pub mod presentation;
pub mod router;
pub mod search;
pub mod service;
pub mod store;
pub mod sync;
pub mod types;
pub mod utils;

#[cfg(test)]
pub(crate) mod testing;

pub use config::DialogStackConfig;
pub use error::DialogError;
pub use host::DialogHost;
pub use presentation::{Dismissal, Transition};
pub use router::{MemoryRouter, NavigateMode, Router, Scheduler};
pub use search::SearchParams;
pub use service::{use_dialog_stack, DialogHandle, DialogStackService, DialogView};
pub use store::{DialogStore, PendingDialog};
pub use sync::{RouterSync, SyncAction};
pub use types::{DialogConfig, DialogId, DialogSize, StackEntry, TopDialog};
