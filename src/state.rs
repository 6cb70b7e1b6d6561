//! Page state as an immutable value driven by a pure reducer.
//!
//! Every user action and every fetch completion is an [`Event`]. The page
//! keeps one [`ViewState`] and replaces it with `reduce(&state, event)`.

use tracing::{debug, warn};

use crate::error::AppError;
use crate::reshape::{build_chart, PriceChart};
use crate::selection::Selection;
use crate::stats::AveragePrices;
use crate::storage::{SavedStatistic, SelectionStore, StoragePort};

/// Identifies one issued fetch. Only the latest token may update the chart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestToken(u64);

impl RequestToken {
    fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// What triggered a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Page loaded with a selection in its URL.
    Address,
    /// Form submitted.
    Form,
    /// Saved entry picked from the list.
    Saved,
}

#[derive(Debug, Clone, PartialEq)]
struct InFlight {
    token: RequestToken,
    selection: Selection,
    description: Option<String>,
    origin: Origin,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    SavedLoaded(Vec<SavedStatistic>),
    FetchStarted {
        selection: Selection,
        /// Replaces the shown description when the fetch succeeds.
        description: Option<String>,
        origin: Origin,
    },
    FetchSucceeded {
        token: RequestToken,
        prices: AveragePrices,
    },
    FetchFailed {
        token: RequestToken,
        message: String,
    },
    Saved(Vec<SavedStatistic>),
    Rejected(String),
    DismissError,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub chart: Option<PriceChart>,
    pub description: String,
    /// Selection behind the chart currently shown.
    pub active: Option<Selection>,
    pub saved: Vec<SavedStatistic>,
    pub error: Option<String>,
    /// Address to push after this transition, set only when a form or saved
    /// fetch was applied.
    pub push_address: Option<String>,
    latest: RequestToken,
    in_flight: Option<InFlight>,
}

impl ViewState {
    pub fn latest_token(&self) -> RequestToken {
        self.latest
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn can_save(&self) -> bool {
        self.active.is_some()
    }

    /// Record to persist for the active selection.
    pub fn record_to_save(&self, description: &str) -> Result<SavedStatistic, AppError> {
        self.active
            .as_ref()
            .map(|selection| SavedStatistic::new(selection, description))
            .ok_or(AppError::NothingToSave)
    }

    fn take_request(&mut self, token: RequestToken) -> Option<InFlight> {
        if self.in_flight.as_ref().map(|r| r.token) == Some(token) {
            self.in_flight.take()
        } else {
            debug!("Discarding stale response {:?}, latest is {:?}", token, self.latest);
            None
        }
    }
}

/// Event for a form submit: a fetch when both lists are chosen, a rejection
/// otherwise.
pub fn submit(selection: Selection) -> Event {
    if selection.is_complete() {
        Event::FetchStarted {
            selection,
            description: None,
            origin: Origin::Form,
        }
    } else {
        Event::Rejected(AppError::MissingSelection.to_string())
    }
}

/// Append the active selection to the store and report the outcome.
pub fn save_active<S: StoragePort>(
    state: &ViewState,
    description: &str,
    store: &SelectionStore<S>,
) -> Event {
    match state
        .record_to_save(description)
        .and_then(|record| store.append(record))
    {
        Ok(saved) => Event::Saved(saved),
        Err(e) => {
            warn!("Save rejected: {}", e);
            Event::Rejected(e.to_string())
        }
    }
}

pub fn reduce(state: &ViewState, event: Event) -> ViewState {
    let mut next = state.clone();
    next.push_address = None;

    match event {
        Event::SavedLoaded(saved) => {
            next.saved = saved;
        }
        Event::FetchStarted {
            selection,
            description,
            origin,
        } => {
            next.latest = state.latest.next();
            next.in_flight = Some(InFlight {
                token: next.latest,
                selection,
                description,
                origin,
            });
            next.error = None;
        }
        Event::FetchSucceeded { token, prices } => {
            let Some(request) = next.take_request(token) else {
                return next;
            };
            match build_chart(&prices) {
                Ok(chart) => {
                    next.chart = Some(chart);
                    if let Some(description) = request.description {
                        next.description = description;
                    }
                    if request.origin != Origin::Address {
                        next.push_address = Some(request.selection.to_path());
                    }
                    next.active = Some(request.selection);
                }
                Err(e) => {
                    warn!("Keeping previous chart: {}", e);
                    next.error = Some(e.to_string());
                }
            }
        }
        Event::FetchFailed { token, message } => {
            if next.take_request(token).is_some() {
                next.error = Some(message);
            }
        }
        Event::Saved(saved) => {
            next.saved = saved;
            next.error = None;
        }
        Event::Rejected(message) => {
            next.error = Some(message);
        }
        Event::DismissError => {
            next.error = None;
        }
    }

    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn selection(house_types: &[&str], quarters: &[&str]) -> Selection {
        Selection::new(
            house_types.iter().map(|s| s.to_string()).collect(),
            quarters.iter().map(|s| s.to_string()).collect(),
        )
    }

    fn prices_for(selection: &Selection, values: &[f64]) -> AveragePrices {
        AveragePrices {
            values: values.to_vec(),
            house_types: selection.house_types.clone(),
            quarters: selection.quarters.clone(),
        }
    }

    fn start(state: &ViewState, selection: &Selection, origin: Origin) -> (ViewState, RequestToken) {
        let next = reduce(
            state,
            Event::FetchStarted {
                selection: selection.clone(),
                description: None,
                origin,
            },
        );
        let token = next.latest_token();
        (next, token)
    }

    #[test]
    fn test_submit_shows_chart_and_pushes_address() {
        let sel = selection(&["00", "02"], &["2021K1", "2021K2"]);
        let (state, token) = start(&ViewState::default(), &sel, Origin::Form);
        assert!(state.is_loading());

        let state = reduce(
            &state,
            Event::FetchSucceeded {
                token,
                prices: prices_for(&sel, &[100.0, 110.0, 90.0, 95.0]),
            },
        );

        let chart = state.chart.as_ref().unwrap();
        assert_eq!(chart.series[0].label, "Boliger i alt");
        assert_eq!(chart.series[1].values, vec![90.0, 95.0]);
        assert_eq!(state.active, Some(sel));
        assert_eq!(
            state.push_address.as_deref(),
            Some("selection?housetypes=00,02&quarters=2021K1,2021K2")
        );
        assert!(!state.is_loading());
        assert!(state.can_save());
    }

    #[test]
    fn test_address_load_does_not_push_address() {
        let sel = selection(&["03"], &["2020K1"]);
        let (state, token) = start(&ViewState::default(), &sel, Origin::Address);
        let state = reduce(
            &state,
            Event::FetchSucceeded {
                token,
                prices: prices_for(&sel, &[42.0]),
            },
        );
        assert!(state.chart.is_some());
        assert!(state.push_address.is_none());
        assert_eq!(state.active, Some(sel));
    }

    #[test]
    fn test_picking_saved_entry_reproduces_chart() {
        let sel = selection(&["00", "03"], &["2022K1", "2022K2", "2022K3"]);
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];

        let (submitted, token) = start(&ViewState::default(), &sel, Origin::Form);
        let submitted = reduce(
            &submitted,
            Event::FetchSucceeded {
                token,
                prices: prices_for(&sel, &values),
            },
        );

        let record = SavedStatistic::new(&sel, "Oslo blokk");
        let picked = reduce(
            &ViewState::default(),
            Event::FetchStarted {
                selection: record.selection(),
                description: Some(record.description.clone()),
                origin: Origin::Saved,
            },
        );
        let token = picked.latest_token();
        let picked = reduce(
            &picked,
            Event::FetchSucceeded {
                token,
                prices: prices_for(&sel, &values),
            },
        );

        assert_eq!(picked.chart, submitted.chart);
        assert_eq!(picked.description, "Oslo blokk");
        assert_eq!(picked.push_address, submitted.push_address);
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let first = selection(&["00"], &["2021K1"]);
        let second = selection(&["02"], &["2021K1"]);

        let (state, first_token) = start(&ViewState::default(), &first, Origin::Form);
        let (state, second_token) = start(&state, &second, Origin::Form);
        assert!(second_token > first_token);

        let state = reduce(
            &state,
            Event::FetchSucceeded {
                token: second_token,
                prices: prices_for(&second, &[200.0]),
            },
        );
        let before = state.clone();

        // The older request resolves last and must not win.
        let state = reduce(
            &state,
            Event::FetchSucceeded {
                token: first_token,
                prices: prices_for(&first, &[100.0]),
            },
        );

        assert_eq!(
            state,
            ViewState {
                push_address: None,
                ..before
            }
        );
        assert_eq!(state.active, Some(second));
        assert_eq!(state.chart.unwrap().series[0].values, vec![200.0]);
    }

    #[test]
    fn test_stale_failure_is_ignored() {
        let sel = selection(&["00"], &["2021K1"]);
        let (state, old) = start(&ViewState::default(), &sel, Origin::Form);
        let (state, _new) = start(&state, &sel, Origin::Form);

        let state = reduce(
            &state,
            Event::FetchFailed {
                token: old,
                message: "timeout".to_string(),
            },
        );
        assert!(state.error.is_none());
        assert!(state.is_loading());
    }

    #[test]
    fn test_failure_shows_error_and_keeps_chart() {
        let sel = selection(&["00"], &["2021K1"]);
        let (state, token) = start(&ViewState::default(), &sel, Origin::Form);
        let state = reduce(
            &state,
            Event::FetchSucceeded {
                token,
                prices: prices_for(&sel, &[1.0]),
            },
        );
        let chart = state.chart.clone();

        let (state, token) = start(&state, &sel, Origin::Form);
        let state = reduce(
            &state,
            Event::FetchFailed {
                token,
                message: "Statistics provider returned HTTP 500".to_string(),
            },
        );

        assert_eq!(state.error.as_deref(), Some("Statistics provider returned HTTP 500"));
        assert_eq!(state.chart, chart);
        assert!(!state.is_loading());

        let state = reduce(&state, Event::DismissError);
        assert!(state.error.is_none());
    }

    #[test]
    fn test_malformed_response_becomes_visible_error() {
        let sel = selection(&["00", "02"], &["2021K1", "2021K2"]);
        let (state, token) = start(&ViewState::default(), &sel, Origin::Form);
        let state = reduce(
            &state,
            Event::FetchSucceeded {
                token,
                prices: prices_for(&sel, &[100.0, 110.0, 90.0]),
            },
        );

        assert!(state.chart.is_none());
        assert!(state.active.is_none());
        assert!(state.push_address.is_none());
        assert_eq!(
            state.error.as_deref(),
            Some("Provider returned 3 values, expected 4")
        );
    }

    #[test]
    fn test_new_fetch_clears_error() {
        let state = reduce(&ViewState::default(), Event::Rejected("nope".to_string()));
        assert_eq!(state.error.as_deref(), Some("nope"));

        let (state, _) = start(&state, &selection(&["00"], &["2021K1"]), Origin::Form);
        assert!(state.error.is_none());
    }

    #[test]
    fn test_save_requires_active_selection() {
        let state = ViewState::default();
        assert!(!state.can_save());
        assert_eq!(state.record_to_save("x"), Err(AppError::NothingToSave));
    }

    #[test]
    fn test_save_uses_active_selection_and_description() {
        let sel = selection(&["02"], &["2019K2", "2019K3"]);
        let (state, token) = start(&ViewState::default(), &sel, Origin::Form);
        let state = reduce(
            &state,
            Event::FetchSucceeded {
                token,
                prices: prices_for(&sel, &[1.0, 2.0]),
            },
        );

        let record = state.record_to_save("Småhus 2019").unwrap();
        assert_eq!(record.selection(), sel);
        assert_eq!(record.description, "Småhus 2019");

        let state = reduce(&state, Event::Saved(vec![record.clone()]));
        assert_eq!(state.saved, vec![record]);
    }

    #[test]
    fn test_saved_list_loaded() {
        let record = SavedStatistic::new(&selection(&["00"], &["2021K1"]), "a");
        let state = reduce(&ViewState::default(), Event::SavedLoaded(vec![record.clone()]));
        assert_eq!(state.saved, vec![record]);
        assert!(state.chart.is_none());
    }

    #[test]
    fn test_submit_without_quarters_is_rejected() {
        let event = submit(selection(&["00"], &[]));
        assert_eq!(
            event,
            Event::Rejected(AppError::MissingSelection.to_string())
        );

        let state = reduce(&ViewState::default(), event);
        assert!(state.error.is_some());
        assert!(!state.is_loading());
    }

    #[test]
    fn test_submit_complete_selection_starts_form_fetch() {
        let sel = selection(&["00"], &["2021K1"]);
        assert_eq!(
            submit(sel.clone()),
            Event::FetchStarted {
                selection: sel,
                description: None,
                origin: Origin::Form,
            }
        );
    }

    #[test]
    fn test_save_active_appends_to_store() {
        let store = SelectionStore::new(MemoryStorage::default());
        let sel = selection(&["00", "02"], &["2021K1"]);
        let (state, token) = start(&ViewState::default(), &sel, Origin::Form);
        let state = reduce(
            &state,
            Event::FetchSucceeded {
                token,
                prices: prices_for(&sel, &[1.0, 2.0]),
            },
        );

        let event = save_active(&state, "first", &store);
        let state = reduce(&state, event);
        let expected = vec![SavedStatistic::new(&sel, "first")];
        assert_eq!(state.saved, expected);
        assert_eq!(store.load_all(), expected);
        assert!(state.error.is_none());
    }

    #[test]
    fn test_save_active_without_chart_writes_nothing() {
        let store = SelectionStore::new(MemoryStorage::default());
        let event = save_active(&ViewState::default(), "x", &store);

        assert_eq!(event, Event::Rejected(AppError::NothingToSave.to_string()));
        assert!(store.load_all().is_empty());
    }
}
