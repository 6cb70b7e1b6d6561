use plotters::prelude::*;

use crate::error::AppError;
use crate::reshape::{PriceChart, SeriesColor};

pub const CHART_WIDTH: u32 = 500;
pub const CHART_HEIGHT: u32 = 500;

fn short_price(value: f64) -> String {
    if value.abs() >= 1000.0 {
        format!("{:.0}K", value / 1000.0)
    } else {
        format!("{:.0}", value)
    }
}

fn rgb(color: SeriesColor) -> RGBColor {
    RGBColor(color.0, color.1, color.2)
}

/// Draw one line per series over the chart's quarters.
pub fn draw_price_lines<'a, DB>(
    backend: DB,
    chart: &PriceChart,
) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'a>>
where
    DB: DrawingBackend + 'a,
{
    let root = backend.into_drawing_area();
    root.fill(&WHITE)?;

    let last_index = chart.quarters.len().saturating_sub(1).max(1) as i32;
    let max_price = chart
        .series
        .iter()
        .flat_map(|s| s.values.iter().copied())
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);
    let y_max = if max_price > 0.0 { max_price * 1.1 } else { 1.0 };

    let quarters = &chart.quarters;
    let mut ctx = ChartBuilder::on(&root)
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0..last_index, 0.0..y_max)?;

    ctx.configure_mesh()
        .x_labels(quarters.len().max(2))
        .x_label_formatter(&|x| {
            usize::try_from(*x)
                .ok()
                .and_then(|i| quarters.get(i))
                .cloned()
                .unwrap_or_default()
        })
        .y_label_formatter(&|y| short_price(*y))
        .y_desc("Kr per m²")
        .draw()?;

    for series in &chart.series {
        let color = rgb(series.color);
        // NaN cells split the line into segments.
        let mut segment = Vec::new();
        let mut segments = Vec::new();
        for (i, value) in series.values.iter().enumerate() {
            if value.is_finite() {
                segment.push((i as i32, *value));
            } else if !segment.is_empty() {
                segments.push(std::mem::take(&mut segment));
            }
        }
        if !segment.is_empty() {
            segments.push(segment);
        }

        let mut labelled = false;
        for points in segments {
            let drawn = ctx.draw_series(LineSeries::new(points, color.stroke_width(2)))?;
            if !labelled {
                drawn
                    .label(series.label.as_str())
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
                labelled = true;
            }
        }
    }

    if !chart.series.is_empty() {
        ctx.configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }

    root.present()?;
    Ok(())
}

/// Render the chart as an SVG document.
pub fn render_svg(chart: &PriceChart, width: u32, height: u32) -> Result<String, AppError> {
    let mut svg = String::new();
    draw_price_lines(SVGBackend::with_string(&mut svg, (width, height)), chart)
        .map_err(|e| AppError::Render(e.to_string()))?;
    Ok(svg)
}
