use leptos::prelude::*;
use tracing::warn;

use crate::chart::{render_svg, CHART_HEIGHT, CHART_WIDTH};
use crate::config::QUARTERS;
use crate::reshape::PriceChart;

/// Line chart of the fetched prices with the active description below it.
///
/// Before the first fetch an empty chart over all quarters is shown.
#[component]
pub fn PriceChartView(
    #[prop(into)] chart: Signal<Option<PriceChart>>,
    #[prop(into)] description: Signal<String>,
    #[prop(into)] loading: Signal<bool>,
) -> impl IntoView {
    let svg = move || {
        chart.with(|chart| {
            let rendered = match chart {
                Some(chart) => render_svg(chart, CHART_WIDTH, CHART_HEIGHT),
                None => render_svg(
                    &PriceChart {
                        quarters: QUARTERS.iter().map(|q| q.to_string()).collect(),
                        series: Vec::new(),
                    },
                    CHART_WIDTH,
                    CHART_HEIGHT,
                ),
            };
            rendered.unwrap_or_else(|e| {
                warn!("{}", e);
                String::new()
            })
        })
    };

    view! {
        <div class="price-chart">
            <style>{include_str!("price_chart.css")}</style>
            <div class="chart-canvas" class:loading=move || loading.get() inner_html=svg></div>
            <div class="chart-description">
                "Description: "
                {move || {
                    let text = description.get();
                    if text.is_empty() { "-".to_string() } else { text }
                }}
            </div>
        </div>
    }
}
