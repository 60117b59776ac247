use crate::pipeline::ui::list::PipelineList;
use crate::shared::dialog_stack::{DialogHost, DialogStackConfig, DialogStackService};
use leptos::prelude::*;

#[component]
pub fn App() -> impl IntoView {
    // Dialog stack for the whole app, mirrored into the URL.
    let dialogs = DialogStackService::with_config(DialogStackConfig::load());
    provide_context(dialogs);
    dialogs.init_router_integration();
    on_cleanup(move || dialogs.teardown());

    view! {
        <div class="app-layout">
            <div class="app-main">
                <PipelineList />
            </div>
        </div>
        <DialogHost />
    }
}
