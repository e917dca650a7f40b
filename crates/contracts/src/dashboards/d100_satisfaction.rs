use serde::{Deserialize, Serialize};

use crate::shared::filters::{FilterState, TimeWindow};
use crate::system::auth::UserInfo;

pub const ROLE_REGION: &str = "region";
pub const ROLE_NATIONAL: &str = "national";

/// One row of the filtered satisfaction slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SatisfactionRow {
    pub id: String,
    pub period: String,
    pub region: String,
    pub district: String,
    pub facility: String,
    pub total_responses: u64,
    pub satisfied: u64,
    pub satisfaction_rate: f64,
}

/// Request parameters for the paginated data endpoint. Built only through
/// [`DataQuery::build`]; field order fixes the serialized parameter order,
/// so identical inputs always produce the identical query string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facility: Option<String>,
    pub role: String,
    pub time_filter: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quarter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_to: Option<String>,
    pub page: u32,
}

impl DataQuery {
    /// Pure mapping (FilterState, user identity, page) → request parameters.
    ///
    /// Region precedence: an explicit selection wins, else the user's
    /// assigned region, else national scope. `role` reports which scope the
    /// request ends up in. The active time window maps to `time_filter` plus
    /// its mode parameters; `today` carries no extra parameters and is
    /// resolved by the server so this stays clock-free and deterministic.
    pub fn build(filter: &FilterState, user: &UserInfo, page: u32) -> Self {
        let region = filter
            .location
            .region
            .clone()
            .or_else(|| user.scoped_region().map(str::to_string));
        let role = if region.is_some() {
            ROLE_REGION.to_string()
        } else {
            ROLE_NATIONAL.to_string()
        };

        let mut query = DataQuery {
            region,
            district: filter.location.district.clone(),
            facility: filter.location.facility.clone(),
            role,
            time_filter: String::new(),
            year: None,
            month: None,
            quarter: None,
            date_from: None,
            date_to: None,
            page,
        };

        match filter.time {
            TimeWindow::Today => query.time_filter = "today".to_string(),
            TimeWindow::ByDate { date } => {
                let day = date.format("%Y-%m-%d").to_string();
                query.time_filter = "daily".to_string();
                query.date_from = Some(day.clone());
                query.date_to = Some(day);
            }
            TimeWindow::ByMonthYear { year, month } => {
                query.time_filter = "monthly".to_string();
                query.year = Some(year);
                query.month = Some(month);
            }
            TimeWindow::ByQuarterYear { year, quarter } => {
                query.time_filter = "quarterly".to_string();
                query.year = Some(year);
                query.quarter = Some(quarter.to_string());
            }
            TimeWindow::ByYear { year } => {
                query.time_filter = "yearly".to_string();
                query.year = Some(year);
            }
            TimeWindow::Cumulative => query.time_filter = "cumulative".to_string(),
        }

        query
    }

    pub fn to_query_string(&self) -> String {
        serde_qs::to_string(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::filters::Quarter;
    use crate::system::auth::{UserInfo, UserRole};
    use uuid::Uuid;

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

    #[test]
    fn national_user_without_selection_is_national_scope() {
        let query = DataQuery::build(&FilterState::default(), &national_user(), 1);
        assert_eq!(query.region, None);
        assert_eq!(query.role, ROLE_NATIONAL);
        assert_eq!(query.time_filter, "cumulative");
    }

    #[test]
    fn explicit_region_wins_over_assigned() {
        let mut filter = FilterState::default();
        filter.location.set_region(Some("Copperbelt".to_string()));
        let query = DataQuery::build(&filter, &region_user(), 1);
        assert_eq!(query.region.as_deref(), Some("Copperbelt"));
        assert_eq!(query.role, ROLE_REGION);
    }

    #[test]
    fn assigned_region_applies_when_nothing_selected() {
        let query = DataQuery::build(&FilterState::default(), &region_user(), 1);
        assert_eq!(query.region.as_deref(), Some("Central"));
        assert_eq!(query.role, ROLE_REGION);
    }

    #[test]
    fn time_modes_map_to_their_parameters() {
        let mut filter = FilterState::default();

        filter.time = TimeWindow::ByMonthYear { year: 2024, month: 6 };
        let query = DataQuery::build(&filter, &national_user(), 1);
        assert_eq!(query.time_filter, "monthly");
        assert_eq!(query.year, Some(2024));
        assert_eq!(query.month, Some(6));
        assert_eq!(query.quarter, None);

        filter.time = TimeWindow::ByQuarterYear {
            year: 2023,
            quarter: Quarter::Q2,
        };
        let query = DataQuery::build(&filter, &national_user(), 1);
        assert_eq!(query.time_filter, "quarterly");
        assert_eq!(query.quarter.as_deref(), Some("Q2"));
        assert_eq!(query.month, None);

        filter.time = TimeWindow::ByDate {
            date: chrono::NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
        };
        let query = DataQuery::build(&filter, &national_user(), 1);
        assert_eq!(query.time_filter, "daily");
        assert_eq!(query.date_from.as_deref(), Some("2024-03-15"));
        assert_eq!(query.date_to.as_deref(), Some("2024-03-15"));
    }

    #[test]
    fn build_is_deterministic() {
        let mut filter = FilterState::default();
        filter.location.set_region(Some("Central".to_string()));
        filter.time = TimeWindow::ByYear { year: 2024 };
        let user = national_user();
        let a = DataQuery::build(&filter, &user, 3).to_query_string();
        let b = DataQuery::build(&filter, &user, 3).to_query_string();
        assert_eq!(a, b);
    }

    #[test]
    fn filter_parameters_stable_across_pages() {
        let mut filter = FilterState::default();
        filter.location.set_region(Some("Central".to_string()));
        filter.location.set_district(Some("Kabwe".to_string()));
        filter.time = TimeWindow::ByQuarterYear {
            year: 2024,
            quarter: Quarter::Q1,
        };
        let user = region_user();

        let page1 = DataQuery::build(&filter, &user, 1);
        let page2 = DataQuery::build(&filter, &user, 2);
        assert_eq!(page1.region, page2.region);
        assert_eq!(page1.district, page2.district);
        assert_eq!(page1.facility, page2.facility);
        assert_eq!(page1.time_filter, page2.time_filter);
        assert_eq!(page1.year, page2.year);
        assert_eq!(page1.quarter, page2.quarter);
        assert_eq!(page1.page, 1);
        assert_eq!(page2.page, 2);
    }
}
