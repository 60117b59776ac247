use super::source_picker::SourcePicker;
use crate::pipeline::model::{Pipeline, PipelineDraft};
use crate::shared::dialog_stack::{use_dialog_stack, DialogConfig, DialogSize, DialogView};
use leptos::prelude::*;
use thaw::*;
use wasm_bindgen_futures::spawn_local;

/// Form of the "new pipeline" dialog.
///
/// The draft is owned by the caller: only the topmost dialog is mounted, so the
/// form unmounts while the source picker is open.
#[component]
pub fn PipelineDetails(
    draft: RwSignal<PipelineDraft>,
    /// Pipelines already in the list, for name validation.
    existing: Vec<Pipeline>,
    on_saved: Callback<Pipeline>,
    on_cancel: Callback<()>,
) -> impl IntoView {
    let dialogs = use_dialog_stack();
    let error = RwSignal::new(None::<String>);

    let pick_source = move |_| {
        let pending = dialogs.open::<String>(
            DialogConfig::new(DialogView::new(|handle| {
                view! {
                    <SourcePicker
                        on_pick=Callback::new(move |source: String| handle.close(source))
                        on_cancel=Callback::new(move |_| handle.cancel())
                    />
                }
                .into_any()
            }))
            .routed("pick-source")
            .size(DialogSize::Small),
        );
        spawn_local(async move {
            // Cancelling the picker keeps the current choice.
            if let Ok(source) = pending.await {
                draft.try_update(|d| d.source = Some(source));
            }
        });
    };

    let save = move |_| match draft.with_untracked(|d| d.build(&existing)) {
        Ok(pipeline) => on_saved.run(pipeline),
        Err(message) => error.set(Some(message)),
    };

    view! {
        <div class="details-container">
            <div class="details-header">
                <h3>"New pipeline"</h3>
            </div>
            <div class="form__group">
                <label class="form__label">"Name"</label>
                <input
                    class="form__input"
                    type="text"
                    prop:value=move || draft.with(|d| d.name.clone())
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        draft.update(|d| d.name = value);
                    }
                />
            </div>
            <div class="form__group">
                <label class="form__label">"Source"</label>
                <Flex>
                    <span class="form__value">
                        {move || draft.with(|d| d.source.clone().unwrap_or_else(|| "-".to_string()))}
                    </span>
                    <Button size=ButtonSize::Small appearance=ButtonAppearance::Secondary on_click=pick_source>
                        "Pick..."
                    </Button>
                </Flex>
            </div>
            {move || error.get().map(|message| view! { <div class="error">{message}</div> })}
            <Flex justify=FlexJustify::End>
                <Button appearance=ButtonAppearance::Secondary on_click=move |_| on_cancel.run(())>
                    "Cancel"
                </Button>
                <Button appearance=ButtonAppearance::Primary on_click=save>
                    "Save"
                </Button>
            </Flex>
        </div>
    }
}
