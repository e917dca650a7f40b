//! Satisfaction dashboard: the composition root of the filter layer.
//!
//! One `RwSignal<FilterState>` is the single source of truth; the location
//! and time-period selectors mutate it through its setters, and one effect
//! funnels every accepted change through the emitter (structural dedup),
//! the URL mirror and the generation-tagged paged fetch.

use contracts::dashboards::d100_satisfaction::{DataQuery, SatisfactionRow};
use contracts::shared::filters::{FilterState, TimeWindow};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::dashboards::d100_satisfaction::api;
use crate::shared::components::filter_panel::FilterTag;
use crate::shared::components::pagination_controls::PaginationControls;
use crate::shared::filters::location::LocationFilter;
use crate::shared::filters::sync::{read_url_filter, write_url_filter, FilterEmitter};
use crate::shared::filters::time_period::TimePeriodSelector;
use crate::shared::paging::{PageCursor, PagedFetch};
use crate::system::auth::context::{logout, use_session};
use crate::system::auth::storage;

fn time_window_label(time: &TimeWindow) -> String {
    match *time {
        TimeWindow::Today => "Today".to_string(),
        TimeWindow::ByDate { date } => date.format("%Y-%m-%d").to_string(),
        TimeWindow::ByMonthYear { year, month } => format!("{:02}.{}", month, year),
        TimeWindow::ByQuarterYear { year, quarter } => format!("{} {}", quarter, year),
        TimeWindow::ByYear { year } => year.to_string(),
        TimeWindow::Cumulative => "All time".to_string(),
    }
}

#[component]
fn DashboardHeader(
    #[prop(into)] username: String,
    #[prop(into)] total_records: Signal<u64>,
    #[prop(into)] is_loading: Signal<bool>,
    on_refresh: Callback<()>,
    on_logout: Callback<()>,
) -> impl IntoView {
    view! {
        <div class="page__header">
            <div class="page__header-left">
                <h1 class="page__title">"Client Satisfaction"</h1>
                <Badge appearance=BadgeAppearance::Tint color=BadgeColor::Brand>
                    <span>{move || total_records.get().to_string()}</span>
                </Badge>
            </div>

            <div class="page__header-right">
                <span class="page__user">{username}</span>
                <Button
                    appearance=ButtonAppearance::Secondary
                    on_click=move |_| on_refresh.run(())
                    disabled=is_loading
                >
                    {move || if is_loading.get() { "Loading…" } else { "Refresh" }}
                </Button>
                <Button
                    appearance=ButtonAppearance::Secondary
                    on_click=move |_| on_logout.run(())
                >
                    "Sign out"
                </Button>
            </div>
        </div>
    }
}

#[component]
pub fn SatisfactionDashboard() -> impl IntoView {
    let (session_state, set_session_state) = use_session();

    // The guard upstream admits on either context or persisted state, so
    // fall back to a direct storage read during the hydration window.
    let user = session_state
        .with_untracked(|s| s.user.clone())
        .or_else(|| storage::load_session().map(|s| s.user));
    let Some(user) = user else {
        return view! { <div class="page">"No active session"</div> }.into_any();
    };

    let user_sv = StoredValue::new(user.clone());

    // URL wins on first load, otherwise the user's default scope; a
    // region-scoped user is pinned back to their region either way.
    let initial = {
        let mut state = read_url_filter().unwrap_or_else(|| FilterState::default_for(&user));
        if state.location.region.is_none() {
            if let Some(pinned) = user.scoped_region() {
                state.location.set_region(Some(pinned.to_string()));
            }
        }
        state
    };
    let filter = RwSignal::new(initial);

    let rows = RwSignal::new(Vec::<SatisfactionRow>::new());
    let (cursor, set_cursor) = signal(PageCursor::default());
    let (total_records, set_total_records) = signal(0u64);
    let (is_loading, set_is_loading) = signal(false);
    let (error, set_error) = signal(Option::<String>::None);

    let paged = StoredValue::new(PagedFetch::new());
    let emitter = StoredValue::new(FilterEmitter::new());

    let load = move || {
        let tag = paged.with_value(|p| p.begin());
        let page = paged.with_value(|p| p.cursor().page);
        let query = DataQuery::build(&filter.get_untracked(), &user_sv.get_value(), page);

        set_is_loading.set(true);
        set_error.set(None);

        spawn_local(async move {
            match api::fetch_satisfaction(&query).await {
                Ok(slice) => {
                    let mut fresh = false;
                    paged.update_value(|p| fresh = p.apply(tag, &slice.pagination));
                    if !fresh {
                        // response belongs to a superseded filter
                        return;
                    }
                    rows.set(slice.data);
                    set_cursor.set(paged.with_value(|p| p.cursor()));
                    set_total_records.set(slice.pagination.total_records);
                    set_is_loading.set(false);
                }
                Err(e) => {
                    if tag == paged.with_value(|p| p.generation()) {
                        // a page move that never loaded must not leave the
                        // readout ahead of the rows on display
                        paged.update_value(|p| p.restore(cursor.get_untracked()));
                        set_error.set(Some(e));
                        set_is_loading.set(false);
                    }
                }
            }
        });
    };

    // Every accepted filter change: mirror to the URL, restart pagination,
    // drop accumulated rows so old and new slices never mix, refetch. The
    // first run doubles as the initial load.
    Effect::new(move |_| {
        let current = filter.get();
        let mut changed = false;
        emitter.update_value(|e| changed = e.emit(&current));
        if !changed {
            return;
        }
        write_url_filter(&current);
        paged.update_value(|p| {
            p.filter_changed();
        });
        rows.set(Vec::new());
        set_cursor.set(PageCursor::default());
        load();
    });

    // The readout keeps the current page until the new one actually loads;
    // `load` adopts the cursor on success and rolls it back on error.
    let go_prev = Callback::new(move |_| {
        let mut moved = false;
        paged.update_value(|p| moved = p.prev_page());
        if moved {
            load();
        }
    });

    let go_next = Callback::new(move |_| {
        let mut moved = false;
        paged.update_value(|p| moved = p.next_page());
        if moved {
            load();
        }
    });

    let clear_filters = move |_| {
        filter.update(|f| f.clear_filters(&user_sv.get_value()));
    };

    let pinned_region = user.scoped_region().map(str::to_string);
    let pinned_for_count = pinned_region.clone();
    let active_filters_count = Signal::derive(move || {
        filter.with(|f| {
            let mut count = 0;
            if f.location.region.is_some() && f.location.region != pinned_for_count {
                count += 1;
            }
            if f.location.district.is_some() {
                count += 1;
            }
            if f.location.facility.is_some() {
                count += 1;
            }
            if f.time != TimeWindow::Cumulative {
                count += 1;
            }
            count
        })
    });

    let is_expanded = RwSignal::new(true);
    let toggle_expanded = move |_| is_expanded.update(|e| *e = !*e);

    let pinned_for_tags = pinned_region.clone();
    let filter_tags = move || {
        let state = filter.get();
        let mut tags = Vec::new();
        if let Some(region) = state.location.region.clone() {
            if Some(&region) != pinned_for_tags.as_ref() {
                tags.push(view! {
                    <FilterTag
                        label=format!("Region: {}", region)
                        on_remove=Callback::new(move |_| {
                            filter.update(|f| {
                                let fallback =
                                    user_sv.get_value().scoped_region().map(str::to_string);
                                f.location.set_region(fallback);
                            });
                        })
                    />
                });
            }
        }
        if let Some(district) = state.location.district.clone() {
            tags.push(view! {
                <FilterTag
                    label=format!("District: {}", district)
                    on_remove=Callback::new(move |_| {
                        filter.update(|f| f.location.set_district(None));
                    })
                />
            });
        }
        if let Some(facility) = state.location.facility.clone() {
            tags.push(view! {
                <FilterTag
                    label=format!("Facility: {}", facility)
                    on_remove=Callback::new(move |_| {
                        filter.update(|f| f.location.set_facility(None));
                    })
                />
            });
        }
        if state.time != TimeWindow::Cumulative {
            tags.push(view! {
                <FilterTag
                    label=format!("Period: {}", time_window_label(&state.time))
                    on_remove=Callback::new(move |_| {
                        filter.update(|f| f.time.set_cumulative());
                    })
                />
            });
        }
        tags.into_iter().collect_view()
    };

    let user_for_location = user.clone();

    view! {
        <div class="page page--dashboard">
            <DashboardHeader
                username=user.username.clone()
                total_records=Signal::derive(move || total_records.get())
                is_loading=Signal::derive(move || is_loading.get())
                on_refresh=Callback::new(move |_| load())
                on_logout=Callback::new(move |_| logout(set_session_state))
            />

            {move || {
                if let Some(e) = error.get() {
                    view! {
                        <div class="warning-box warning-box--error">
                            <span class="warning-box__icon">"⚠"</span>
                            <span class="warning-box__text">{e}</span>
                        </div>
                    }
                    .into_any()
                } else {
                    view! { <></> }.into_any()
                }
            }}

            <div class="filter-panel">
                <div class="filter-panel-header">
                    <div class="filter-panel-header__left" on:click=toggle_expanded>
                        <span class="filter-panel__title">"Filters"</span>
                        {move || {
                            let count = active_filters_count.get();
                            if count > 0 {
                                view! { <span class="badge badge--primary">{count}</span> }
                                    .into_any()
                            } else {
                                view! { <></> }.into_any()
                            }
                        }}
                    </div>

                    <div class="filter-panel-header__center">
                        <PaginationControls
                            current_page=Signal::derive(move || cursor.get().page)
                            total_pages=Signal::derive(move || cursor.get().total_pages)
                            total_records=Signal::derive(move || total_records.get())
                            has_next=Signal::derive(move || cursor.get().has_next)
                            on_prev=go_prev
                            on_next=go_next
                        />
                    </div>

                    <div class="filter-panel-header__right">
                        <span class="text-muted">
                            {move || if is_loading.get() { "Loading…" } else { "" }}
                        </span>
                    </div>
                </div>

                <div class=move || {
                    if is_expanded.get() {
                        "filter-panel__collapsible filter-panel__collapsible--expanded"
                    } else {
                        "filter-panel__collapsible filter-panel__collapsible--collapsed"
                    }
                }>
                    <div class="filter-panel-content">
                        <LocationFilter filter=filter user=user_for_location />
                        <TimePeriodSelector filter=filter />
                        <div class="filter-actions">
                            <Button
                                appearance=ButtonAppearance::Secondary
                                on_click=clear_filters
                            >
                                "Clear filters"
                            </Button>
                        </div>
                        <div class="filter-tags">{filter_tags}</div>
                    </div>
                </div>
            </div>

            <div class="page__content">
                <table class="data-table">
                    <thead>
                        <tr>
                            <th>"Period"</th>
                            <th>"Region"</th>
                            <th>"District"</th>
                            <th>"Facility"</th>
                            <th>"Responses"</th>
                            <th>"Satisfied"</th>
                            <th>"Satisfaction"</th>
                        </tr>
                    </thead>
                    <tbody>
                        {move || {
                            let current = rows.get();
                            if current.is_empty() && !is_loading.get() {
                                view! {
                                    <tr>
                                        <td colspan="7" class="data-table__empty">
                                            "No records for the current filter"
                                        </td>
                                    </tr>
                                }
                                .into_any()
                            } else {
                                current
                                    .into_iter()
                                    .map(|row| {
                                        view! {
                                            <tr>
                                                <td>{row.period}</td>
                                                <td>{row.region}</td>
                                                <td>{row.district}</td>
                                                <td>{row.facility}</td>
                                                <td>{row.total_responses}</td>
                                                <td>{row.satisfied}</td>
                                                <td>{format!("{:.1}%", row.satisfaction_rate)}</td>
                                            </tr>
                                        }
                                    })
                                    .collect_view()
                                    .into_any()
                            }
                        }}
                    </tbody>
                </table>
            </div>
        </div>
    }
    .into_any()
}
