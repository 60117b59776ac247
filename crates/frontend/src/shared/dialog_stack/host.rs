use leptos::prelude::*;
use thaw::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::KeyboardEvent;

use super::presentation::{Dismissal, Transition};
use super::service::use_dialog_stack;
use crate::shared::dialog_frame::DialogFrame;
use crate::shared::icons::icon;

/// Renders the topmost dialog of the stack at the application root.
///
/// Must be mounted exactly once. Dialogs buried under the top are not rendered.
#[component]
pub fn DialogHost() -> impl IntoView {
    let svc = use_dialog_stack();

    let top_id = Memo::new(move |_| svc.top_id());
    let depth = Memo::new(move |_| svc.len());
    let transition = Memo::new(move |prev: Option<&(usize, Transition)>| {
        let len = depth.get();
        let previous = prev.map(|(len, _)| *len).unwrap_or(0);
        (len, Transition::between(previous, len))
    });

    // Global Escape handler: dismisses only the topmost dialog.
    Effect::new(move |_| {
        let closure = Closure::wrap(Box::new(move |event: web_sys::Event| {
            if let Some(keyboard_event) = event.dyn_ref::<KeyboardEvent>() {
                if keyboard_event.key() == "Escape" && svc.top_untracked().is_some() {
                    svc.dismiss_deferred(Dismissal::Escape);
                }
            }
        }) as Box<dyn FnMut(_)>);

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            // DialogHost lives as long as the app; keep the closure alive.
            closure.forget();
        }
    });

    let render_top = move || {
        top_id.get()?;
        let top = svc.top_untracked()?;
        let (_, transition) = transition.get_untracked();
        let z_index = svc.config().base_z_index + top.depth as i32 - 1;
        let modal_class = format!("{} {}", top.size.css_class(), transition.css_class());

        let toolbar = if svc.can_go_back_untracked() {
            view! {
                <div class="modal-toolbar">
                    <Button
                        size=ButtonSize::Small
                        appearance=ButtonAppearance::Subtle
                        on_click=move |_| svc.dismiss_deferred(Dismissal::Back)
                    >
                        {icon("arrow-left")}
                        " Back"
                    </Button>
                </div>
            }
            .into_any()
        } else {
            ().into_any()
        };

        let on_overlay_click = Callback::new(move |_| {
            svc.dismiss(Dismissal::OverlayClick);
        });
        let content = top.component.render(svc.handle(top.id));

        Some(view! {
            <DialogFrame
                on_overlay_click=on_overlay_click
                close_on_overlay=top.close_on_overlay_click
                z_index=z_index
                modal_class=modal_class
                toolbar=toolbar
            >
                {content}
            </DialogFrame>
        })
    };

    view! {
        <Show when=move || top_id.get().is_some()>
            {render_top}
        </Show>
    }
}
