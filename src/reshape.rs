//! Turns the provider's flat, block-ordered price array into chart series.

use plotters::style::{Color, Palette, Palette99};

use crate::config::house_type_name;
use crate::error::AppError;
use crate::stats::AveragePrices;

/// RGB color of one chart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesColor(pub u8, pub u8, pub u8);

impl SeriesColor {
    /// Distinct color for the series at `index`.
    pub fn for_index(index: usize) -> Self {
        let (r, g, b) = Palette99::pick(index).rgb();
        Self(r, g, b)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub label: String,
    pub values: Vec<f64>,
    pub color: SeriesColor,
}

/// Everything needed to draw one chart: x labels and the lines.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceChart {
    pub quarters: Vec<String>,
    pub series: Vec<ChartSeries>,
}

/// Split `values` into one series per house type.
///
/// Block `i` is `values[i * q..(i + 1) * q]` where `q = quarters.len()`.
/// The total length must be exactly `house_types.len() * q`.
pub fn reshape(
    values: &[f64],
    house_types: &[String],
    quarters: &[String],
) -> Result<Vec<ChartSeries>, AppError> {
    let per_series = quarters.len();
    let expected = house_types.len() * per_series;
    if values.len() != expected {
        return Err(AppError::ShapeMismatch {
            expected,
            actual: values.len(),
        });
    }

    let series = house_types
        .iter()
        .enumerate()
        .map(|(i, code)| ChartSeries {
            label: house_type_name(code).unwrap_or_default().to_string(),
            values: values[i * per_series..(i + 1) * per_series].to_vec(),
            color: SeriesColor::for_index(i),
        })
        .collect();

    Ok(series)
}

/// Build a full chart from a provider response.
pub fn build_chart(prices: &AveragePrices) -> Result<PriceChart, AppError> {
    let series = reshape(&prices.values, &prices.house_types, &prices.quarters)?;
    Ok(PriceChart {
        quarters: prices.quarters.clone(),
        series,
    })
}
