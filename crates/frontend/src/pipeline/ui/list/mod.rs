use crate::pipeline::model::{Pipeline, PipelineDraft, SOURCES};
use crate::pipeline::ui::details::PipelineDetails;
use crate::shared::dialog_stack::{
    use_dialog_stack, DialogConfig, DialogError, DialogSize, DialogView,
};
use crate::shared::icons::icon;
use leptos::prelude::*;
use thaw::*;
use wasm_bindgen_futures::spawn_local;

#[component]
fn ConfirmDelete(name: String, on_answer: Callback<bool>) -> impl IntoView {
    view! {
        <div class="details-container">
            <p>{format!("Delete pipeline '{}'?", name)}</p>
            <Flex justify=FlexJustify::End>
                <Button appearance=ButtonAppearance::Secondary on_click=move |_| on_answer.run(false)>
                    "Keep"
                </Button>
                <Button appearance=ButtonAppearance::Primary on_click=move |_| on_answer.run(true)>
                    "Delete"
                </Button>
            </Flex>
        </div>
    }
}

#[component]
pub fn PipelineList() -> impl IntoView {
    let dialogs = use_dialog_stack();
    let pipelines = RwSignal::new(vec![
        Pipeline {
            name: "ingest-orders".to_string(),
            source: SOURCES[0].to_string(),
        },
        Pipeline {
            name: "nightly-report".to_string(),
            source: SOURCES[1].to_string(),
        },
    ]);
    let status = RwSignal::new(String::new());

    let handle_create_new = move |_| {
        let existing = pipelines.get_untracked();
        let draft = RwSignal::new(PipelineDraft::default());
        let pending = dialogs.open::<Pipeline>(
            DialogConfig::new(DialogView::new(move |handle| {
                view! {
                    <PipelineDetails
                        draft=draft
                        existing=existing.clone()
                        on_saved=Callback::new(move |pipeline: Pipeline| handle.close(pipeline))
                        on_cancel=Callback::new(move |_| handle.cancel())
                    />
                }
                .into_any()
            }))
            .routed("new-pipeline")
            .size(DialogSize::Large),
        );
        spawn_local(async move {
            match pending.await {
                Ok(pipeline) => {
                    status.set(format!("Created '{}'", pipeline.name));
                    pipelines.update(|list| list.push(pipeline));
                }
                Err(DialogError::Cancelled) => status.set("Creation cancelled".to_string()),
                Err(err) => log::warn!("new pipeline dialog: {}", err),
            }
        });
    };

    let handle_delete = move |name: String| {
        let label = name.clone();
        let pending = dialogs.open::<bool>(
            DialogConfig::new(DialogView::new(move |handle| {
                view! {
                    <ConfirmDelete
                        name=label.clone()
                        on_answer=Callback::new(move |answer: bool| handle.close(answer))
                    />
                }
                .into_any()
            }))
            .size(DialogSize::Small)
            .close_on_esc(false)
            .close_on_overlay_click(false),
        );
        spawn_local(async move {
            if let Ok(true) = pending.await {
                pipelines.update(|list| list.retain(|p| p.name != name));
                status.set(format!("Deleted '{}'", name));
            }
        });
    };

    view! {
        <div class="content">
            <div class="header">
                <h2>{icon("pipeline")} " Pipelines"</h2>
                <Button appearance=ButtonAppearance::Primary on_click=handle_create_new>
                    {icon("plus")}
                    " New pipeline"
                </Button>
            </div>
            <div class="status">{move || status.get()}</div>
            <table class="table__data">
                <thead>
                    <tr>
                        <th>"Name"</th>
                        <th>"Source"</th>
                        <th></th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=move || pipelines.get()
                        key=|p| p.name.clone()
                        children=move |p: Pipeline| {
                            let name = p.name.clone();
                            view! {
                                <tr>
                                    <td>{p.name}</td>
                                    <td>{p.source}</td>
                                    <td>
                                        <Button
                                            size=ButtonSize::Small
                                            appearance=ButtonAppearance::Subtle
                                            on_click=move |_| handle_delete(name.clone())
                                        >
                                            {icon("trash")}
                                        </Button>
                                    </td>
                                </tr>
                            }
                        }
                    />
                </tbody>
            </table>
        </div>
    }
}
