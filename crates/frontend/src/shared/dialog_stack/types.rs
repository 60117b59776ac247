use std::any::Any;
use std::fmt;
use std::str::FromStr;

use futures::channel::oneshot;
use uuid::Uuid;

use super::error::DialogError;

/// Globally unique id of an open dialog instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DialogId(Uuid);

impl DialogId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DialogId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DialogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl FromStr for DialogId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Width preset of the dialog surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogSize {
    Small,
    #[default]
    Medium,
    Large,
    Full,
}

impl DialogSize {
    pub fn css_class(self) -> &'static str {
        match self {
            DialogSize::Small => "modal--sm",
            DialogSize::Medium => "modal--md",
            DialogSize::Large => "modal--lg",
            DialogSize::Full => "modal--full",
        }
    }
}

/// Description of a dialog to open.
///
/// `C` is the render target; the UI layer uses a view builder that also
/// captures whatever props the dialog needs.
#[derive(Clone)]
pub struct DialogConfig<C> {
    pub component: C,
    /// Makes the dialog routed: its identity is mirrored into the URL.
    pub route_key: Option<String>,
    pub size: Option<DialogSize>,
    pub close_on_esc: bool,
    pub close_on_overlay_click: bool,
}

impl<C> DialogConfig<C> {
    pub fn new(component: C) -> Self {
        Self {
            component,
            route_key: None,
            size: None,
            close_on_esc: true,
            close_on_overlay_click: true,
        }
    }

    pub fn routed(mut self, route_key: impl Into<String>) -> Self {
        self.route_key = Some(route_key.into());
        self
    }

    pub fn size(mut self, size: DialogSize) -> Self {
        self.size = Some(size);
        self
    }

    pub fn close_on_esc(mut self, value: bool) -> Self {
        self.close_on_esc = value;
        self
    }

    pub fn close_on_overlay_click(mut self, value: bool) -> Self {
        self.close_on_overlay_click = value;
        self
    }
}

impl<C> fmt::Debug for DialogConfig<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialogConfig")
            .field("route_key", &self.route_key)
            .field("size", &self.size)
            .field("close_on_esc", &self.close_on_esc)
            .field("close_on_overlay_click", &self.close_on_overlay_click)
            .finish_non_exhaustive()
    }
}

pub(crate) type Outcome = Result<Box<dyn Any>, DialogError>;

/// Sender half of a dialog future. Settling consumes it.
pub(crate) struct Settler(oneshot::Sender<Outcome>);

impl Settler {
    pub(crate) fn channel() -> (Self, oneshot::Receiver<Outcome>) {
        let (tx, rx) = oneshot::channel();
        (Self(tx), rx)
    }

    pub(crate) fn settle(self, outcome: Outcome) {
        // The caller may have dropped the future; nobody is waiting then.
        let _ = self.0.send(outcome);
    }
}

/// A dialog living on the stack.
pub struct DialogInstance<C> {
    pub id: DialogId,
    pub config: DialogConfig<C>,
    pub(crate) settler: Settler,
}

/// Anything that knows its dialog id and optional route key.
pub trait Routable {
    fn dialog_id(&self) -> DialogId;
    fn route_key(&self) -> Option<&str>;

    fn is_routed(&self) -> bool {
        self.route_key().is_some()
    }
}

impl<C> Routable for DialogInstance<C> {
    fn dialog_id(&self) -> DialogId {
        self.id
    }

    fn route_key(&self) -> Option<&str> {
        self.config.route_key.as_deref()
    }
}

/// Id and route key of a stack entry, detached from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackEntry {
    pub id: DialogId,
    pub route_key: Option<String>,
}

impl Routable for StackEntry {
    fn dialog_id(&self) -> DialogId {
        self.id
    }

    fn route_key(&self) -> Option<&str> {
        self.route_key.as_deref()
    }
}

/// The rendered (topmost) dialog.
#[derive(Clone)]
pub struct TopDialog<C> {
    pub id: DialogId,
    pub component: C,
    pub size: DialogSize,
    pub close_on_esc: bool,
    pub close_on_overlay_click: bool,
    /// Number of dialogs on the stack, this one included.
    pub depth: usize,
}
