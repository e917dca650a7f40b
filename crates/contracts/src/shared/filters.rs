//! Filter state for the satisfaction dashboard.
//!
//! Two small state machines live here: the cascading location selection
//! (region → district → facility) and the time-window selection (exactly one
//! mode active). Both are plain data so every transition invariant can be
//! tested off-browser, and `FilterQuery` gives them a lossless query-string
//! form for URL mirroring.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::system::auth::UserInfo;

/// Location filter. `None` at any level means "all" (no filter at that
/// level). Invariants: `district` requires `region`, `facility` requires
/// `district`; changing an ancestor unsets its descendants.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LocationSelection {
    pub region: Option<String>,
    pub district: Option<String>,
    pub facility: Option<String>,
}

impl LocationSelection {
    /// Initial scope for a user: region-scoped users start pinned to their
    /// assigned region, national users start fully open.
    pub fn default_for(user: &UserInfo) -> Self {
        Self {
            region: user.scoped_region().map(str::to_string),
            district: None,
            facility: None,
        }
    }

    pub fn set_region(&mut self, region: Option<String>) {
        if self.region != region {
            self.district = None;
            self.facility = None;
        }
        self.region = region;
    }

    /// No-op while no concrete region is selected; the district control is
    /// disabled in that case, this just keeps the invariant unconditional.
    pub fn set_district(&mut self, district: Option<String>) {
        if self.region.is_none() {
            return;
        }
        if self.district != district {
            self.facility = None;
        }
        self.district = district;
    }

    pub fn set_facility(&mut self, facility: Option<String>) {
        if self.district.is_none() {
            return;
        }
        self.facility = facility;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Quarter {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quarter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Quarter::Q1 => "Q1",
            Quarter::Q2 => "Q2",
            Quarter::Q3 => "Q3",
            Quarter::Q4 => "Q4",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "Q1" | "q1" => Some(Quarter::Q1),
            "Q2" | "q2" => Some(Quarter::Q2),
            "Q3" | "q3" => Some(Quarter::Q3),
            "Q4" | "q4" => Some(Quarter::Q4),
            _ => None,
        }
    }
}

impl std::fmt::Display for Quarter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Time window, one mode active at a time. The tagged representation makes
/// "switching modes clears the other modes' parameters" structural: a
/// variant can only carry its own parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum TimeWindow {
    Today,
    ByDate { date: NaiveDate },
    ByMonthYear { year: i32, month: u32 },
    ByQuarterYear { year: i32, quarter: Quarter },
    ByYear { year: i32 },
    #[default]
    Cumulative,
}

impl TimeWindow {
    /// The chosen year, if the active mode carries one.
    pub fn year(&self) -> Option<i32> {
        match *self {
            TimeWindow::ByYear { year }
            | TimeWindow::ByMonthYear { year, .. }
            | TimeWindow::ByQuarterYear { year, .. } => Some(year),
            _ => None,
        }
    }

    pub fn month(&self) -> Option<u32> {
        match *self {
            TimeWindow::ByMonthYear { month, .. } => Some(month),
            _ => None,
        }
    }

    pub fn quarter(&self) -> Option<Quarter> {
        match *self {
            TimeWindow::ByQuarterYear { quarter, .. } => Some(quarter),
            _ => None,
        }
    }

    pub fn set_today(&mut self) {
        *self = TimeWindow::Today;
    }

    pub fn set_cumulative(&mut self) {
        *self = TimeWindow::Cumulative;
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        *self = TimeWindow::ByDate { date };
    }

    /// Selecting a year keeps an active month/quarter sibling and only
    /// replaces the year; from any other mode it activates the plain
    /// year window.
    pub fn set_year(&mut self, year: i32) {
        *self = match *self {
            TimeWindow::ByMonthYear { month, .. } => TimeWindow::ByMonthYear { year, month },
            TimeWindow::ByQuarterYear { quarter, .. } => {
                TimeWindow::ByQuarterYear { year, quarter }
            }
            _ => TimeWindow::ByYear { year },
        };
    }

    /// Requires a year already chosen; otherwise a no-op (the month control
    /// is disabled until a year is picked). Replaces an active quarter.
    pub fn set_month(&mut self, month: u32) {
        if !(1..=12).contains(&month) {
            return;
        }
        if let Some(year) = self.year() {
            *self = TimeWindow::ByMonthYear { year, month };
        }
    }

    /// Same gating as [`set_month`](Self::set_month); replaces an active month.
    pub fn set_quarter(&mut self, quarter: Quarter) {
        if let Some(year) = self.year() {
            *self = TimeWindow::ByQuarterYear { year, quarter };
        }
    }
}

/// The canonical filter object handed to data-fetching consumers.
/// Equality is structural; the synchronizer relies on that to drop
/// redundant emissions.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterState {
    pub location: LocationSelection,
    pub time: TimeWindow,
}

impl FilterState {
    pub fn default_for(user: &UserInfo) -> Self {
        Self {
            location: LocationSelection::default_for(user),
            time: TimeWindow::Cumulative,
        }
    }

    /// "Clear filters": cumulative time plus the user's default location
    /// scope (re-pins the region for region-scoped users).
    pub fn clear_filters(&mut self, user: &UserInfo) {
        *self = Self::default_for(user);
    }
}

/// URL-facing filter record. Field names are the query-parameter contract;
/// unset values are omitted so bookmarkable URLs stay minimal.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facility: Option<String>,
    #[serde(rename = "timePeriod", skip_serializing_if = "Option::is_none")]
    pub time_period: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quarter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl FilterQuery {
    pub fn from_state(state: &FilterState) -> Self {
        let mut query = FilterQuery {
            region: state.location.region.clone(),
            district: state.location.district.clone(),
            facility: state.location.facility.clone(),
            ..Default::default()
        };
        match state.time {
            TimeWindow::Today => query.time_period = Some("today".to_string()),
            TimeWindow::ByDate { date } => {
                query.time_period = Some("date".to_string());
                query.date = Some(date.format("%Y-%m-%d").to_string());
            }
            TimeWindow::ByMonthYear { year, month } => {
                query.time_period = Some("month".to_string());
                query.year = Some(year);
                query.month = Some(month);
            }
            TimeWindow::ByQuarterYear { year, quarter } => {
                query.time_period = Some("quarter".to_string());
                query.year = Some(year);
                query.quarter = Some(quarter.to_string());
            }
            TimeWindow::ByYear { year } => {
                query.time_period = Some("year".to_string());
                query.year = Some(year);
            }
            // Absent timePeriod means the default window.
            TimeWindow::Cumulative => {}
        }
        query
    }

    /// Rebuild a `FilterState`. Goes through the location setters so a
    /// hand-edited URL (e.g. district without region) degrades to a valid
    /// selection instead of violating the hierarchy; unknown or incomplete
    /// time parameters degrade to cumulative.
    pub fn into_state(self) -> FilterState {
        let mut location = LocationSelection::default();
        location.set_region(self.region);
        location.set_district(self.district);
        location.set_facility(self.facility);

        let time = match self.time_period.as_deref() {
            Some("today") => TimeWindow::Today,
            Some("date") => match self
                .date
                .as_deref()
                .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            {
                Some(date) => TimeWindow::ByDate { date },
                None => TimeWindow::Cumulative,
            },
            Some("month") => match (self.year, self.month) {
                (Some(year), Some(month)) if (1..=12).contains(&month) => {
                    TimeWindow::ByMonthYear { year, month }
                }
                _ => TimeWindow::Cumulative,
            },
            Some("quarter") => {
                match (self.year, self.quarter.as_deref().and_then(Quarter::parse)) {
                    (Some(year), Some(quarter)) => TimeWindow::ByQuarterYear { year, quarter },
                    _ => TimeWindow::Cumulative,
                }
            }
            Some("year") => match self.year {
                Some(year) => TimeWindow::ByYear { year },
                None => TimeWindow::Cumulative,
            },
            _ => TimeWindow::Cumulative,
        };

        FilterState { location, time }
    }

    pub fn to_query_string(&self) -> String {
        serde_qs::to_string(self).unwrap_or_default()
    }

    /// Parse a raw query string (leading `?` tolerated). Unparseable input
    /// yields the default (empty) query.
    pub fn parse(raw: &str) -> Self {
        serde_qs::from_str(raw.trim_start_matches('?')).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::auth::{UserInfo, UserRole};
    use uuid::Uuid;

    fn region_user() -> UserInfo {
        UserInfo {
            id: Uuid::nil(),
            username: "amina".to_string(),
            role: UserRole::Region,
            region: Some("Central".to_string()),
            district: None,
            facility: None,
        }
    }

    fn national_user() -> UserInfo {
        UserInfo {
            id: Uuid::nil(),
            username: "root".to_string(),
            role: UserRole::National,
            region: None,
            district: None,
            facility: None,
        }
    }

    fn full_selection() -> LocationSelection {
        let mut loc = LocationSelection::default();
        loc.set_region(Some("Central".to_string()));
        loc.set_district(Some("Kabwe".to_string()));
        loc.set_facility(Some("Kabwe General".to_string()));
        loc
    }

    #[test]
    fn clearing_region_clears_descendants() {
        let mut loc = full_selection();
        loc.set_region(None);
        assert_eq!(loc, LocationSelection::default());
    }

    #[test]
    fn changing_region_clears_descendants() {
        let mut loc = full_selection();
        loc.set_region(Some("Copperbelt".to_string()));
        assert_eq!(loc.region.as_deref(), Some("Copperbelt"));
        assert_eq!(loc.district, None);
        assert_eq!(loc.facility, None);
    }

    #[test]
    fn reselecting_same_region_keeps_descendants() {
        let mut loc = full_selection();
        loc.set_region(Some("Central".to_string()));
        assert_eq!(loc, full_selection());
    }

    #[test]
    fn clearing_district_clears_facility() {
        let mut loc = full_selection();
        loc.set_district(None);
        assert_eq!(loc.district, None);
        assert_eq!(loc.facility, None);
        assert_eq!(loc.region.as_deref(), Some("Central"));
    }

    #[test]
    fn district_without_region_is_ignored() {
        let mut loc = LocationSelection::default();
        loc.set_district(Some("Kabwe".to_string()));
        assert_eq!(loc, LocationSelection::default());
    }

    #[test]
    fn facility_without_district_is_ignored() {
        let mut loc = LocationSelection::default();
        loc.set_region(Some("Central".to_string()));
        loc.set_facility(Some("Kabwe General".to_string()));
        assert_eq!(loc.facility, None);
    }

    #[test]
    fn region_user_default_is_pinned() {
        let state = FilterState::default_for(&region_user());
        assert_eq!(state.location.region.as_deref(), Some("Central"));
        assert_eq!(state.time, TimeWindow::Cumulative);
    }

    #[test]
    fn clear_filters_repins_region_user() {
        let user = region_user();
        let mut state = FilterState::default_for(&user);
        state.location.set_district(Some("Kabwe".to_string()));
        state.time.set_today();
        state.clear_filters(&user);
        assert_eq!(state, FilterState::default_for(&user));
        assert_eq!(state.location.region.as_deref(), Some("Central"));
    }

    #[test]
    fn clear_filters_opens_national_user() {
        let user = national_user();
        let mut state = FilterState::default_for(&user);
        state.location.set_region(Some("Central".to_string()));
        state.clear_filters(&user);
        assert_eq!(state.location, LocationSelection::default());
    }

    #[test]
    fn switching_mode_drops_other_parameters() {
        let mut time = TimeWindow::Cumulative;
        time.set_year(2024);
        time.set_month(6);
        time.set_today();
        assert_eq!(time, TimeWindow::Today);
        assert_eq!(time.year(), None);
        assert_eq!(time.month(), None);
    }

    #[test]
    fn month_requires_year() {
        let mut time = TimeWindow::Cumulative;
        time.set_month(6);
        assert_eq!(time, TimeWindow::Cumulative);
    }

    #[test]
    fn quarter_requires_year() {
        let mut time = TimeWindow::Today;
        time.set_quarter(Quarter::Q2);
        assert_eq!(time, TimeWindow::Today);
    }

    #[test]
    fn month_and_quarter_are_mutually_exclusive() {
        let mut time = TimeWindow::Cumulative;
        time.set_year(2024);
        time.set_month(6);
        time.set_quarter(Quarter::Q2);
        assert_eq!(
            time,
            TimeWindow::ByQuarterYear {
                year: 2024,
                quarter: Quarter::Q2
            }
        );
        time.set_month(3);
        assert_eq!(time, TimeWindow::ByMonthYear { year: 2024, month: 3 });
    }

    #[test]
    fn reselecting_year_keeps_quarter() {
        let mut time = TimeWindow::Cumulative;
        time.set_year(2024);
        time.set_quarter(Quarter::Q2);
        time.set_year(2023);
        assert_eq!(
            time,
            TimeWindow::ByQuarterYear {
                year: 2023,
                quarter: Quarter::Q2
            }
        );
    }

    #[test]
    fn reselecting_year_keeps_month() {
        let mut time = TimeWindow::ByMonthYear { year: 2024, month: 6 };
        time.set_year(2022);
        assert_eq!(time, TimeWindow::ByMonthYear { year: 2022, month: 6 });
    }

    #[test]
    fn invalid_month_is_rejected() {
        let mut time = TimeWindow::ByYear { year: 2024 };
        time.set_month(13);
        assert_eq!(time, TimeWindow::ByYear { year: 2024 });
    }

    #[test]
    fn setters_are_idempotent() {
        let mut once = TimeWindow::Cumulative;
        once.set_year(2024);
        once.set_quarter(Quarter::Q3);

        let mut twice = once;
        twice.set_quarter(Quarter::Q3);
        assert_eq!(once, twice);

        let mut loc_once = LocationSelection::default();
        loc_once.set_region(Some("Central".to_string()));
        let mut loc_twice = loc_once.clone();
        loc_twice.set_region(Some("Central".to_string()));
        assert_eq!(loc_once, loc_twice);
    }

    fn reachable_states() -> Vec<FilterState> {
        let mut states = Vec::new();
        let locations = vec![
            LocationSelection::default(),
            {
                let mut l = LocationSelection::default();
                l.set_region(Some("Central".to_string()));
                l
            },
            {
                let mut l = LocationSelection::default();
                l.set_region(Some("Central".to_string()));
                l.set_district(Some("Kabwe".to_string()));
                l
            },
            full_selection(),
        ];
        let windows = vec![
            TimeWindow::Cumulative,
            TimeWindow::Today,
            TimeWindow::ByDate {
                date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            },
            TimeWindow::ByYear { year: 2024 },
            TimeWindow::ByMonthYear { year: 2024, month: 6 },
            TimeWindow::ByQuarterYear {
                year: 2023,
                quarter: Quarter::Q4,
            },
        ];
        for location in &locations {
            for time in &windows {
                states.push(FilterState {
                    location: location.clone(),
                    time: *time,
                });
            }
        }
        states
    }

    #[test]
    fn url_round_trip_over_reachable_states() {
        for state in reachable_states() {
            let raw = FilterQuery::from_state(&state).to_query_string();
            let back = FilterQuery::parse(&raw).into_state();
            assert_eq!(back, state, "round trip failed for {raw:?}");
        }
    }

    #[test]
    fn default_state_serializes_to_empty_query() {
        let state = FilterState::default();
        assert_eq!(FilterQuery::from_state(&state).to_query_string(), "");
    }

    #[test]
    fn unset_levels_are_omitted_from_query() {
        let mut state = FilterState::default();
        state.location.set_region(Some("Central".to_string()));
        let raw = FilterQuery::from_state(&state).to_query_string();
        assert_eq!(raw, "region=Central");
    }

    #[test]
    fn orphan_district_in_url_is_dropped() {
        let state = FilterQuery::parse("district=Kabwe&facility=Kabwe%20General").into_state();
        assert_eq!(state.location, LocationSelection::default());
    }

    #[test]
    fn incomplete_time_parameters_degrade_to_cumulative() {
        let state = FilterQuery::parse("timePeriod=quarter&year=2024").into_state();
        assert_eq!(state.time, TimeWindow::Cumulative);
        let state = FilterQuery::parse("timePeriod=month&month=5").into_state();
        assert_eq!(state.time, TimeWindow::Cumulative);
        let state = FilterQuery::parse("timePeriod=nonsense").into_state();
        assert_eq!(state.time, TimeWindow::Cumulative);
    }
}
