//! Query form, saved selections and the price chart.
//!
//! Every user action becomes an [`Event`] reduced into one [`ViewState`].
//! Fetches run in the background and report back with the token they were
//! issued under, so only the latest request can change the chart.

use leptos::prelude::*;
use leptos_router::hooks::use_location;
use tracing::{info, warn};
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::spawn_local;

use crate::components::multi_select::{house_type_options, quarter_options, MultiSelect};
use crate::components::price_chart::PriceChartView;
use crate::components::saved_list::SavedList;
use crate::components::status_banner::StatusBanner;
use crate::config::StatsConfig;
use crate::selection::{is_selection_path, Selection};
use crate::state::{reduce, save_active, submit, Event, Origin, ViewState};
use crate::stats::StatsClient;
use crate::storage::{SavedStatistic, SelectionStore, HOUSE_TYPES_KEY, QUARTERS_KEY};

fn load_choices(field: &str) -> Vec<String> {
    match SelectionStore::browser() {
        Ok(store) => store.load_choices(field),
        Err(e) => {
            warn!("No stored choices for {}: {}", field, e);
            Vec::new()
        }
    }
}

fn save_choices(field: &str, values: &[String]) {
    if let Err(e) = SelectionStore::browser().and_then(|store| store.save_choices(field, values)) {
        warn!("Failed to remember {}: {}", field, e);
    }
}

fn load_saved() -> Vec<SavedStatistic> {
    match SelectionStore::browser() {
        Ok(store) => store.load_all(),
        Err(e) => {
            warn!("Saved statistics unavailable: {}", e);
            Vec::new()
        }
    }
}

/// Rewrite the address bar without navigating.
fn push_address(path: &str) {
    let Some(history) = web_sys::window().and_then(|w| w.history().ok()) else {
        warn!("No history available, address not updated");
        return;
    };
    if let Err(e) = history.push_state_with_url(&JsValue::NULL, "", Some(path)) {
        warn!("Failed to update address: {:?}", e);
    }
}

#[component]
pub fn PricesPage() -> impl IntoView {
    let config = StoredValue::new(use_context::<StatsConfig>().unwrap_or_default());
    let state = RwSignal::new(ViewState::default());

    let house_types = RwSignal::new(load_choices(HOUSE_TYPES_KEY));
    let quarters = RwSignal::new(load_choices(QUARTERS_KEY));
    let description_input = RwSignal::new(String::new());

    let apply = move |event: Event| {
        state.update(|current| *current = reduce(current, event));
        if let Some(path) = state.with_untracked(|s| s.push_address.clone()) {
            push_address(&path);
        }
    };

    // Applies the event and, when it starts a fetch, runs it in the background.
    let run_query = move |event: Event| {
        let Event::FetchStarted { selection, .. } = &event else {
            apply(event);
            return;
        };
        let selection = selection.clone();
        apply(event);
        let token = state.with_untracked(|s| s.latest_token());
        let client = StatsClient::new(config.get_value());

        spawn_local(async move {
            let event = match client.fetch_average_prices(&selection).await {
                Ok(prices) => Event::FetchSucceeded { token, prices },
                Err(e) => Event::FetchFailed {
                    token,
                    message: e.to_string(),
                },
            };
            apply(event);
        });
    };

    // Load saved statistics on mount
    Effect::new(move |_| {
        apply(Event::SavedLoaded(load_saved()));
    });

    // Show the chart encoded in a shared address
    let location = use_location();
    Effect::new(move |_| {
        if !is_selection_path(&location.pathname.get_untracked()) {
            return;
        }
        match Selection::from_query(&location.search.get_untracked()) {
            Some(selection) if selection.is_complete() => {
                info!("Loading selection from address");
                run_query(Event::FetchStarted {
                    selection,
                    description: None,
                    origin: Origin::Address,
                });
            }
            _ => warn!("Address has no complete selection"),
        }
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let selection = Selection::new(house_types.get_untracked(), quarters.get_untracked());
        run_query(submit(selection));
    };

    let on_save = move |_| {
        let description = description_input.get_untracked();
        let event = match SelectionStore::browser() {
            Ok(store) => state.with_untracked(|s| save_active(s, &description, &store)),
            Err(e) => Event::Rejected(e.to_string()),
        };
        apply(event);
    };

    let on_pick = Callback::new(move |record: SavedStatistic| {
        run_query(Event::FetchStarted {
            selection: record.selection(),
            description: Some(record.description),
            origin: Origin::Saved,
        });
    });

    let on_house_types = Callback::new(move |values: Vec<String>| {
        save_choices(HOUSE_TYPES_KEY, &values);
        house_types.set(values);
    });

    let on_quarters = Callback::new(move |values: Vec<String>| {
        save_choices(QUARTERS_KEY, &values);
        quarters.set(values);
    });

    let loading = Memo::new(move |_| state.with(|s| s.is_loading()));
    let chart = Memo::new(move |_| state.with(|s| s.chart.clone()));
    let saved = Memo::new(move |_| state.with(|s| s.saved.clone()));

    view! {
        <div class="page prices-page">
            <h2>"Average prices"</h2>
            <p class="page-description">
                "Pick house types and quarters, then show the chart. Save a chart to find it again later."
            </p>

            <form class="query-form" on:submit=on_submit>
                <div class="form-row">
                    <MultiSelect
                        id=HOUSE_TYPES_KEY
                        label="House types"
                        options=house_type_options()
                        selected=house_types
                        on_change=on_house_types
                    />
                    <MultiSelect
                        id=QUARTERS_KEY
                        label="Quarters"
                        options=quarter_options()
                        selected=quarters
                        on_change=on_quarters
                    />
                </div>
                <button
                    type="submit"
                    class="btn btn-primary"
                    disabled=move || loading.get()
                >
                    {move || if loading.get() { "Loading..." } else { "Show chart" }}
                </button>
            </form>

            <StatusBanner
                message=Signal::derive(move || state.with(|s| s.error.clone()))
                on_dismiss=Callback::new(move |_| apply(Event::DismissError))
            />

            <div class="form-group save-row">
                <label for="description">"Description"</label>
                <div class="input-row">
                    <input
                        id="description"
                        type="text"
                        class="input"
                        placeholder="e.g. Oslo flats 2021"
                        prop:value=move || description_input.get()
                        on:input=move |ev| {
                            description_input.set(event_target_value(&ev));
                        }
                    />
                    <button
                        class="btn btn-save"
                        on:click=on_save
                        disabled=move || !state.with(|s| s.can_save())
                    >
                        "Save statistic"
                    </button>
                </div>
            </div>

            <div class="results">
                <SavedList saved=saved on_pick=on_pick />
                <PriceChartView
                    chart=chart
                    description=Signal::derive(move || state.with(|s| s.description.clone()))
                    loading=loading
                />
            </div>
        </div>
    }
}
