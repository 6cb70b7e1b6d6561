//! The user's chart selection and its address-bar encoding.

/// Path segment that marks a shareable selection URL.
pub const SELECTION_SEGMENT: &str = "selection";

const HOUSE_TYPES_PARAM: &str = "housetypes";
const QUARTERS_PARAM: &str = "quarters";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub house_types: Vec<String>,
    pub quarters: Vec<String>,
}

impl Selection {
    pub fn new(house_types: Vec<String>, quarters: Vec<String>) -> Self {
        Self {
            house_types,
            quarters,
        }
    }

    /// Both lists must be non-empty for a query to mean anything.
    pub fn is_complete(&self) -> bool {
        !self.house_types.is_empty() && !self.quarters.is_empty()
    }

    /// Query string without the leading `?`, e.g. `housetypes=00,02&quarters=2021K1`.
    pub fn to_query(&self) -> String {
        format!(
            "{}={}&{}={}",
            HOUSE_TYPES_PARAM,
            join_codes(&self.house_types),
            QUARTERS_PARAM,
            join_codes(&self.quarters)
        )
    }

    /// Relative URL pushed into the address bar after a chart is shown.
    pub fn to_path(&self) -> String {
        format!("{}?{}", SELECTION_SEGMENT, self.to_query())
    }

    /// Parse a query string (with or without `?`). Returns `None` unless
    /// both parameters are present.
    pub fn from_query(query: &str) -> Option<Self> {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut house_types = None;
        let mut quarters = None;

        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                HOUSE_TYPES_PARAM => house_types = Some(split_codes(&value)),
                QUARTERS_PARAM => quarters = Some(split_codes(&value)),
                _ => {}
            }
        }

        Some(Self::new(house_types?, quarters?))
    }
}

/// True when the path is the shareable selection view.
pub fn is_selection_path(path: &str) -> bool {
    path.contains(SELECTION_SEGMENT)
}

fn join_codes(codes: &[String]) -> String {
    codes
        .iter()
        .map(|c| urlencoding::encode(c).into_owned())
        .collect::<Vec<_>>()
        .join(",")
}

fn split_codes(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(String::from)
        .collect()
}
