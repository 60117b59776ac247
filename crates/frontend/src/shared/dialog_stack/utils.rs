use super::config::DialogStackConfig;
use super::search::SearchParams;
use super::types::{DialogId, Routable};

pub fn generate_id() -> DialogId {
    DialogId::new()
}

/// Dialog reference carried by the URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlDialog {
    /// Neither dialog parameter is present.
    Absent,
    /// At least one parameter is present. `id` is `None` when missing or unparseable.
    Present {
        route_key: Option<String>,
        id: Option<DialogId>,
    },
}

impl UrlDialog {
    pub fn id(&self) -> Option<DialogId> {
        match self {
            UrlDialog::Absent => None,
            UrlDialog::Present { id, .. } => *id,
        }
    }
}

pub fn url_dialog(search: &SearchParams, config: &DialogStackConfig) -> UrlDialog {
    let route_key = search.get(&config.dialog_param);
    let raw_id = search.get(&config.dialog_id_param);
    if route_key.is_none() && raw_id.is_none() {
        return UrlDialog::Absent;
    }
    UrlDialog::Present {
        route_key,
        id: raw_id.and_then(|raw| raw.parse().ok()),
    }
}

/// `search` with the dialog parameters pointing at `id`. Other parameters are kept.
pub fn with_dialog_params(
    search: &SearchParams,
    config: &DialogStackConfig,
    route_key: &str,
    id: DialogId,
) -> SearchParams {
    let mut next = search.clone();
    next.set(&config.dialog_param, route_key);
    next.set(&config.dialog_id_param, &id.to_string());
    next
}

/// `search` without any dialog parameters.
pub fn without_dialog_params(search: &SearchParams, config: &DialogStackConfig) -> SearchParams {
    let mut next = search.clone();
    next.remove(&config.dialog_param);
    next.remove(&config.dialog_id_param);
    next
}

/// Last routed entry of the stack and its index.
pub fn topmost_routed<E: Routable>(stack: &[E]) -> Option<(usize, &E)> {
    stack.iter().enumerate().rev().find(|(_, e)| e.is_routed())
}

/// Routed entries strictly above `index`, bottom to top.
pub fn routed_above<E: Routable>(stack: &[E], index: usize) -> Vec<&E> {
    stack
        .iter()
        .skip(index + 1)
        .filter(|e| e.is_routed())
        .collect()
}

/// The search params that reflect `stack`: the topmost routed dialog, or none.
pub fn search_for_stack<E: Routable>(
    search: &SearchParams,
    config: &DialogStackConfig,
    stack: &[E],
) -> SearchParams {
    match topmost_routed(stack) {
        Some((_, entry)) => match entry.route_key() {
            Some(key) => with_dialog_params(search, config, key, entry.dialog_id()),
            None => without_dialog_params(search, config),
        },
        None => without_dialog_params(search, config),
    }
}
