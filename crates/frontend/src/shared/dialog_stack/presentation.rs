use log::debug;

use super::store::DialogStore;
use super::types::DialogId;

/// Direction of the animation between two rendered dialogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Forward,
    Backward,
    Stay,
}

impl Transition {
    pub fn between(previous_len: usize, len: usize) -> Self {
        if len > previous_len {
            Transition::Forward
        } else if len < previous_len {
            Transition::Backward
        } else {
            Transition::Stay
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Transition::Forward => "modal--enter-forward",
            Transition::Backward => "modal--enter-backward",
            Transition::Stay => "",
        }
    }
}

/// A user gesture asking to dismiss the rendered dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dismissal {
    Escape,
    OverlayClick,
    /// The "Back" affordance shown on stacked dialogs.
    Back,
}

impl<C: 'static> DialogStore<C> {
    /// Cancels the rendered dialog if its settings allow `dismissal`.
    /// Returns the cancelled id.
    pub fn dismiss(&self, dismissal: Dismissal) -> Option<DialogId> {
        let (id, allowed) = self.with_top(|top, depth| {
            let allowed = match dismissal {
                Dismissal::Escape => top.config.close_on_esc,
                Dismissal::OverlayClick => top.config.close_on_overlay_click,
                Dismissal::Back => depth > 1,
            };
            (top.id, allowed)
        })?;
        if !allowed {
            debug!("dialog dismissal {:?} ignored for id={}", dismissal, id);
            return None;
        }
        self.cancel(id);
        Some(id)
    }

    pub fn can_go_back(&self) -> bool {
        self.len() > 1
    }
}
