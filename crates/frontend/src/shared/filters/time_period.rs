//! Time-period selector: one active window mode at a time.
//!
//! Mode switching goes through the `TimeWindow` setters, which clear the
//! other modes' parameters by construction. Month and quarter are mutually
//! exclusive siblings under a chosen year; their controls stay disabled
//! until a year is picked, so an invalid combination can't be expressed.

use chrono::{Datelike, NaiveDate, Utc};
use contracts::shared::filters::{FilterState, Quarter, TimeWindow};
use leptos::prelude::*;

const FIRST_SURVEY_YEAR: i32 = 2018;

const MONTHS: [(u32, &str); 12] = [
    (1, "January"),
    (2, "February"),
    (3, "March"),
    (4, "April"),
    (5, "May"),
    (6, "June"),
    (7, "July"),
    (8, "August"),
    (9, "September"),
    (10, "October"),
    (11, "November"),
    (12, "December"),
];

#[component]
pub fn TimePeriodSelector(filter: RwSignal<FilterState>) -> impl IntoView {
    let current_year = Utc::now().date_naive().year();
    let years: Vec<i32> = (FIRST_SURVEY_YEAR..=current_year).rev().collect();

    let mode_is = move |wanted: &'static str| {
        filter.with(move |f| {
            matches!(
                (&f.time, wanted),
                (TimeWindow::Today, "today") | (TimeWindow::Cumulative, "cumulative")
            )
        })
    };

    view! {
        <div class="time-period-selector">
            <div class="filter-field">
                <label>"Period"</label>
                <div class="time-period-modes">
                    <button
                        class="mode-btn"
                        class=("mode-btn--active", move || mode_is("cumulative"))
                        on:click=move |_| filter.update(|f| f.time.set_cumulative())
                    >
                        "Cumulative"
                    </button>
                    <button
                        class="mode-btn"
                        class=("mode-btn--active", move || mode_is("today"))
                        on:click=move |_| filter.update(|f| f.time.set_today())
                    >
                        "Today"
                    </button>
                </div>
            </div>

            <div class="filter-field">
                <label>"Year"</label>
                <select
                    prop:value=move || {
                        filter.with(|f| f.time.year().map(|y| y.to_string()).unwrap_or_default())
                    }
                    on:change=move |ev| {
                        if let Ok(year) = event_target_value(&ev).parse::<i32>() {
                            filter.update(|f| f.time.set_year(year));
                        }
                    }
                >
                    <option value="">"Year…"</option>
                    {years
                        .iter()
                        .map(|&year| {
                            view! {
                                <option
                                    value=year.to_string()
                                    selected=move || filter.with(|f| f.time.year() == Some(year))
                                >
                                    {year.to_string()}
                                </option>
                            }
                        })
                        .collect_view()}
                </select>
            </div>

            <div class="filter-field">
                <label>"Month"</label>
                <select
                    disabled=move || filter.with(|f| f.time.year().is_none())
                    prop:value=move || {
                        filter.with(|f| f.time.month().map(|m| m.to_string()).unwrap_or_default())
                    }
                    on:change=move |ev| {
                        let raw = event_target_value(&ev);
                        filter.update(|f| {
                            if raw.is_empty() {
                                if let Some(year) = f.time.year() {
                                    f.time = TimeWindow::ByYear { year };
                                }
                            } else if let Ok(month) = raw.parse::<u32>() {
                                f.time.set_month(month);
                            }
                        });
                    }
                >
                    <option value="">"—"</option>
                    {MONTHS
                        .iter()
                        .map(|&(number, name)| {
                            view! {
                                <option
                                    value=number.to_string()
                                    selected=move || filter.with(|f| f.time.month() == Some(number))
                                >
                                    {name}
                                </option>
                            }
                        })
                        .collect_view()}
                </select>
            </div>

            <div class="filter-field">
                <label>"Quarter"</label>
                <select
                    disabled=move || filter.with(|f| f.time.year().is_none())
                    prop:value=move || {
                        filter.with(|f| {
                            f.time.quarter().map(|q| q.to_string()).unwrap_or_default()
                        })
                    }
                    on:change=move |ev| {
                        let raw = event_target_value(&ev);
                        filter.update(|f| {
                            if raw.is_empty() {
                                if let Some(year) = f.time.year() {
                                    f.time = TimeWindow::ByYear { year };
                                }
                            } else if let Some(quarter) = Quarter::parse(&raw) {
                                f.time.set_quarter(quarter);
                            }
                        });
                    }
                >
                    <option value="">"—"</option>
                    {[Quarter::Q1, Quarter::Q2, Quarter::Q3, Quarter::Q4]
                        .iter()
                        .map(|&quarter| {
                            view! {
                                <option
                                    value=quarter.as_str()
                                    selected=move || {
                                        filter.with(|f| f.time.quarter() == Some(quarter))
                                    }
                                >
                                    {quarter.as_str()}
                                </option>
                            }
                        })
                        .collect_view()}
                </select>
            </div>

            <div class="filter-field">
                <label>"Date"</label>
                <input
                    type="date"
                    prop:value=move || {
                        filter.with(|f| match f.time {
                            TimeWindow::ByDate { date } => date.format("%Y-%m-%d").to_string(),
                            _ => String::new(),
                        })
                    }
                    on:change=move |ev| {
                        let raw = event_target_value(&ev);
                        if let Ok(date) = NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
                            filter.update(|f| f.time.set_date(date));
                        }
                    }
                />
            </div>
        </div>
    }
}
