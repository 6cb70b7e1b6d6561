use leptos::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlOptionElement, HtmlSelectElement};

use crate::config::{HOUSE_TYPES, QUARTERS};

/// A single option in the select.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

pub fn house_type_options() -> Vec<SelectOption> {
    HOUSE_TYPES
        .iter()
        .map(|t| SelectOption {
            value: t.code.to_string(),
            label: t.name.to_string(),
        })
        .collect()
}

pub fn quarter_options() -> Vec<SelectOption> {
    QUARTERS
        .iter()
        .map(|q| SelectOption {
            value: q.to_string(),
            label: q.to_string(),
        })
        .collect()
}

/// Native `<select multiple>` bound to a list of chosen values.
///
/// Every change reports the full list of selected values in option order.
#[component]
pub fn MultiSelect(
    /// Element id and form field name, e.g. "houseTypes".
    id: &'static str,
    /// Label shown above the select.
    #[prop(into)]
    label: String,
    options: Vec<SelectOption>,
    /// Values currently chosen.
    #[prop(into)]
    selected: Signal<Vec<String>>,
    /// Called with the new list of chosen values.
    on_change: Callback<Vec<String>>,
) -> impl IntoView {
    let handle_change = move |ev: leptos::ev::Event| {
        let select = event_target::<HtmlSelectElement>(&ev);
        on_change.run(selected_values(&select));
    };

    let option_views = options
        .into_iter()
        .map(|opt| {
            let value = opt.value.clone();
            view! {
                <option
                    value=opt.value
                    prop:selected=move || selected.with(|chosen| chosen.contains(&value))
                >
                    {opt.label}
                </option>
            }
        })
        .collect::<Vec<_>>();

    view! {
        <div class="form-group multi-select">
            <style>{include_str!("multi_select.css")}</style>
            <label for=id>{label}</label>
            <select
                id=id
                name=id
                class="input ms-select"
                multiple=true
                required=true
                on:change=handle_change
            >
                {option_views}
            </select>
            <span class="ms-count">
                {move || format!("{} selected", selected.with(|chosen| chosen.len()))}
            </span>
        </div>
    }
}

fn selected_values(select: &HtmlSelectElement) -> Vec<String> {
    let options = select.selected_options();
    (0..options.length())
        .filter_map(|i| options.item(i))
        .filter_map(|el| el.dyn_into::<HtmlOptionElement>().ok())
        .map(|opt| opt.value())
        .collect()
}
