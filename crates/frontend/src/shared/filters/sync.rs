//! Filter state ⟷ URL synchronization.
//!
//! State is the source of truth after mount; the URL is hydrated once and
//! then mirrored on every accepted change. `FilterEmitter` is the dedup
//! gate in front of data-fetching consumers: unrelated re-renders may
//! rebuild an identical `FilterState`, and those must not refetch.

use contracts::shared::filters::{FilterQuery, FilterState};

#[derive(Debug, Default)]
pub struct FilterEmitter {
    last: Option<FilterState>,
}

impl FilterEmitter {
    pub fn new() -> Self {
        Self { last: None }
    }

    /// True when `next` differs structurally from the last emission (always
    /// true for the first call). Only then should subscribers be notified.
    pub fn emit(&mut self, next: &FilterState) -> bool {
        if self.last.as_ref() == Some(next) {
            return false;
        }
        self.last = Some(next.clone());
        true
    }
}

/// One-time hydration: the filter encoded in the current query string, or
/// `None` when the URL carries no filter parameters.
pub fn read_url_filter() -> Option<FilterState> {
    let search = web_sys::window()?.location().search().ok()?;
    if search.trim_start_matches('?').is_empty() {
        return None;
    }
    Some(FilterQuery::parse(&search).into_state())
}

/// Mirror state → URL. Unset values disappear from the query string; the
/// URL is only rewritten when it actually changed.
pub fn write_url_filter(state: &FilterState) {
    let Some(window) = web_sys::window() else {
        return;
    };

    let query = FilterQuery::from_state(state).to_query_string();
    let next_search = if query.is_empty() {
        String::new()
    } else {
        format!("?{}", query)
    };

    let current_search = window.location().search().unwrap_or_default();
    if current_search == next_search {
        return;
    }

    let path = window
        .location()
        .pathname()
        .unwrap_or_else(|_| "/".to_string());
    let new_url = format!("{}{}", path, next_search);

    if let Ok(history) = window.history() {
        let _ = history.replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(&new_url));
    }
}
