use crate::pipeline::model::SOURCES;
use leptos::prelude::*;
use thaw::*;

#[component]
pub fn SourcePicker(
    on_pick: Callback<String>,
    on_cancel: Callback<()>,
) -> impl IntoView {
    view! {
        <div class="details-container">
            <div class="details-header">
                <h3>"Pick a source"</h3>
            </div>
            <ul class="source-list">
                {SOURCES
                    .iter()
                    .map(|source| {
                        let source = source.to_string();
                        let label = source.clone();
                        view! {
                            <li
                                class="source-list__item"
                                on:click=move |_| on_pick.run(source.clone())
                            >
                                {label}
                            </li>
                        }
                    })
                    .collect_view()}
            </ul>
            <Flex justify=FlexJustify::End>
                <Button appearance=ButtonAppearance::Secondary on_click=move |_| on_cancel.run(())>
                    "Cancel"
                </Button>
            </Flex>
        </div>
    }
}
