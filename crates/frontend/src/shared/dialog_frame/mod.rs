use gloo_timers::future::TimeoutFuture;
use leptos::ev;
use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

/// Overlay plus positioned dialog surface.
///
/// Renders no header: dialog content brings its own, the frame only adds the
/// optional "Back" slot above it.
#[component]
pub fn DialogFrame(
    /// Called on a completed overlay click (press and release on the overlay).
    on_overlay_click: Callback<()>,
    /// Close when clicking on the overlay (default: true).
    #[prop(optional)]
    close_on_overlay: Option<bool>,
    /// z-index for overlay stacking (default: 1000).
    #[prop(optional)]
    z_index: Option<i32>,
    /// Extra classes for the surface (`div.modal`): size and transition.
    #[prop(optional)]
    modal_class: Option<String>,
    /// Rendered above the content, e.g. a back button.
    #[prop(optional)]
    toolbar: Option<AnyView>,
    children: Children,
) -> impl IntoView {
    let close_on_overlay = close_on_overlay.unwrap_or(true);
    let z_index = z_index.unwrap_or(1000);
    let overlay_mouse_down = RwSignal::new(false);

    let is_direct_overlay_event = |ev: &ev::MouseEvent| -> bool {
        match (ev.target(), ev.current_target()) {
            (Some(t), Some(ct)) => t == ct,
            _ => false,
        }
    };

    // Text selection that starts inside the dialog and ends on the overlay is not a click.
    let handle_overlay_mouse_down = move |ev: ev::MouseEvent| {
        overlay_mouse_down.set(is_direct_overlay_event(&ev));
    };

    let handle_overlay_click = move |ev: ev::MouseEvent| {
        let should_close =
            close_on_overlay && overlay_mouse_down.get() && is_direct_overlay_event(&ev);
        overlay_mouse_down.set(false);
        if should_close {
            // The overlay may be removed by the handler; leave the dispatch first.
            spawn_local(async move {
                TimeoutFuture::new(0).await;
                on_overlay_click.run(());
            });
        }
    };

    let surface_class = match modal_class {
        Some(cls) if !cls.trim().is_empty() => format!("modal {}", cls.trim()),
        _ => "modal".to_string(),
    };

    view! {
        <div
            class="modal-overlay"
            style=format!("z-index: {z_index};")
            on:mousedown=handle_overlay_mouse_down
            on:click=handle_overlay_click
        >
            <div
                class=surface_class
                role="dialog"
                aria-modal="true"
                style="position: relative;"
                on:click=move |ev: ev::MouseEvent| ev.stop_propagation()
            >
                {toolbar}
                {children()}
            </div>
        </div>
    }
}
