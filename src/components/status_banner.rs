use leptos::prelude::*;

/// Dismissible error line shown above the chart.
#[component]
pub fn StatusBanner(
    #[prop(into)] message: Signal<Option<String>>,
    on_dismiss: Callback<()>,
) -> impl IntoView {
    view! {
        <style>{include_str!("status_banner.css")}</style>
        {move || {
            message.get().map(|text| {
                view! {
                    <div class="status-banner status-error" role="alert">
                        <span class="status-icon">"\u{2717}"</span>
                        <span class="status-text">{text}</span>
                        <button
                            class="btn btn-small btn-secondary"
                            on:click=move |_| on_dismiss.run(())
                            title="Dismiss"
                        >
                            "\u{2715}"
                        </button>
                    </div>
                }
            })
        }}
    }
}
