//! Fixed catalog of house types and quarters, and the statistics provider settings.

/// A housing-type classification offered in the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HouseType {
    pub code: &'static str,
    pub name: &'static str,
}

pub const HOUSE_TYPES: &[HouseType] = &[
    HouseType { code: "00", name: "Boliger i alt" },
    HouseType { code: "02", name: "Småhus" },
    HouseType { code: "03", name: "Blokkleiligheter" },
];

pub const QUARTERS: &[&str] = &[
    "2019K2", "2019K3", "2019K4", "2020K1", "2020K2", "2020K3", "2020K4", "2021K1", "2021K2",
    "2021K3", "2021K4", "2022K1", "2022K2", "2022K3",
];

/// Display name for a house type code, if the code is in the catalog.
pub fn house_type_name(code: &str) -> Option<&'static str> {
    HOUSE_TYPES.iter().find(|t| t.code == code).map(|t| t.name)
}

/// Where and how average prices are requested.
///
/// `Default` carries the production values for the SSB price index table.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsConfig {
    pub endpoint: String,
    /// Dimension holding the house type codes.
    pub house_type_dimension: String,
    /// Dimension holding the metric code.
    pub contents_dimension: String,
    pub metric: String,
    /// Dimension holding the quarter codes.
    pub time_dimension: String,
    pub response_format: String,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://data.ssb.no/api/v0/no/table/07241".to_string(),
            house_type_dimension: "Boligtype".to_string(),
            contents_dimension: "ContentsCode".to_string(),
            metric: "KvPris".to_string(),
            time_dimension: "Tid".to_string(),
            response_format: "json-stat2".to_string(),
        }
    }
}
