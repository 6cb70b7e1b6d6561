//! List of saved statistics. Clicking an entry shows its chart again.

use leptos::prelude::*;

use crate::storage::SavedStatistic;

/// One-line summary shown for a saved entry.
pub fn summary(record: &SavedStatistic) -> String {
    format!(
        "House types: {} Quarters {}",
        record.house_types.join(","),
        record.quarters.join(",")
    )
}

#[component]
pub fn SavedList(
    #[prop(into)] saved: Signal<Vec<SavedStatistic>>,
    /// Callback invoked with the entry the user clicked.
    on_pick: Callback<SavedStatistic>,
) -> impl IntoView {
    view! {
        <div class="saved-list">
            <style>{include_str!("saved_list.css")}</style>
            <h4 class="saved-title">"Saved statistics"</h4>

            {move || {
                let items = saved.get();
                if items.is_empty() {
                    view! { <p class="saved-empty">"Nothing saved yet."</p> }.into_any()
                } else {
                    view! {
                        <ul class="saved-items">
                            {items.into_iter().map(|record| {
                                let text = summary(&record);
                                let title = record.description.clone();
                                view! {
                                    <li
                                        class="saved-item"
                                        title=title
                                        on:click=move |_| on_pick.run(record.clone())
                                    >
                                        {text}
                                    </li>
                                }
                            }).collect::<Vec<_>>()}
                        </ul>
                    }.into_any()
                }
            }}
        </div>
    }
}
