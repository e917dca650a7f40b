//! Hierarchical location filter: region → district → facility.
//!
//! Each level is an async lookup gated on its parent; selecting "all" at a
//! level is `None` in the `LocationSelection` and the explicit sentinel in
//! the `<select>`. Cascading resets live in the contracts state machine,
//! this component only feeds it.

use contracts::shared::filters::FilterState;
use contracts::system::auth::UserInfo;
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::api::{fetch_locations, LocationLevel};

pub const ALL_REGIONS: &str = "all_regions";
pub const ALL_DISTRICTS: &str = "all_districts";
pub const ALL_FACILITIES: &str = "all_facilities";

fn select_value(value: String, sentinel: &str) -> Option<String> {
    if value == sentinel {
        None
    } else {
        Some(value)
    }
}

/// Every lookup writes both the option list and the error slot, so a
/// transient failure never outlives the next fetch that succeeds.
fn lookup_outcome(result: Result<Vec<String>, String>) -> (Vec<String>, Option<String>) {
    match result {
        Ok(list) => (list, None),
        Err(e) => (Vec::new(), Some(e)),
    }
}

#[component]
pub fn LocationFilter(filter: RwSignal<FilterState>, user: UserInfo) -> impl IntoView {
    let (regions, set_regions) = signal(Vec::<String>::new());
    let (districts, set_districts) = signal(Vec::<String>::new());
    let (facilities, set_facilities) = signal(Vec::<String>::new());
    let (lookup_error, set_lookup_error) = signal(Option::<String>::None);

    let pinned_region = user.scoped_region().map(str::to_string);
    // A region-scoped user cannot widen to "all regions": selector pinned.
    let region_locked = pinned_region.is_some();

    // Regions: one lookup, pre-scoped for region-scoped users.
    Effect::new(move |_| {
        match pinned_region.clone() {
            Some(region) => set_regions.set(vec![region]),
            None => {
                spawn_local(async move {
                    let (list, err) =
                        lookup_outcome(fetch_locations(LocationLevel::Region, None).await);
                    set_regions.set(list);
                    set_lookup_error.set(err);
                });
            }
        }
    });

    // Memos keep the lookups keyed on their parent value alone: a time
    // filter change must not refetch districts.
    let selected_region = Memo::new(move |_| filter.with(|f| f.location.region.clone()));
    let selected_district = Memo::new(move |_| filter.with(|f| f.location.district.clone()));

    // Districts: only when a concrete region is selected, keyed by it.
    Effect::new(move |_| {
        match selected_region.get() {
            Some(region) => {
                spawn_local(async move {
                    let (list, err) =
                        lookup_outcome(fetch_locations(LocationLevel::District, Some(&region)).await);
                    set_districts.set(list);
                    set_lookup_error.set(err);
                });
            }
            None => set_districts.set(Vec::new()),
        }
    });

    // Facilities: only when a concrete district is selected, keyed by it.
    Effect::new(move |_| {
        match selected_district.get() {
            Some(district) => {
                spawn_local(async move {
                    let (list, err) = lookup_outcome(
                        fetch_locations(LocationLevel::Facility, Some(&district)).await,
                    );
                    set_facilities.set(list);
                    set_lookup_error.set(err);
                });
            }
            None => set_facilities.set(Vec::new()),
        }
    });

    view! {
        <div class="location-filter">
            <div class="filter-field">
                <label>"Region"</label>
                <select
                    disabled=region_locked
                    prop:value=move || {
                        filter.with(|f| {
                            f.location.region.clone().unwrap_or_else(|| ALL_REGIONS.to_string())
                        })
                    }
                    on:change=move |ev| {
                        let value = event_target_value(&ev);
                        filter.update(|f| f.location.set_region(select_value(value, ALL_REGIONS)));
                    }
                >
                    <Show when=move || !region_locked>
                        <option value=ALL_REGIONS>"All regions"</option>
                    </Show>
                    {move || {
                        regions
                            .get()
                            .into_iter()
                            .map(|name| {
                                let value = name.clone();
                                let label = name.clone();
                                let selected = name;
                                view! {
                                    <option
                                        value=value
                                        selected=move || {
                                            filter.with(|f| {
                                                f.location.region.as_deref() == Some(selected.as_str())
                                            })
                                        }
                                    >
                                        {label}
                                    </option>
                                }
                            })
                            .collect_view()
                    }}
                </select>
            </div>

            <div class="filter-field">
                <label>"District"</label>
                <select
                    disabled=move || filter.with(|f| f.location.region.is_none())
                    prop:value=move || {
                        filter.with(|f| {
                            f.location.district.clone().unwrap_or_else(|| ALL_DISTRICTS.to_string())
                        })
                    }
                    on:change=move |ev| {
                        let value = event_target_value(&ev);
                        filter.update(|f| f.location.set_district(select_value(value, ALL_DISTRICTS)));
                    }
                >
                    <option value=ALL_DISTRICTS>"All districts"</option>
                    {move || {
                        districts
                            .get()
                            .into_iter()
                            .map(|name| {
                                let value = name.clone();
                                let label = name.clone();
                                let selected = name;
                                view! {
                                    <option
                                        value=value
                                        selected=move || {
                                            filter.with(|f| {
                                                f.location.district.as_deref() == Some(selected.as_str())
                                            })
                                        }
                                    >
                                        {label}
                                    </option>
                                }
                            })
                            .collect_view()
                    }}
                </select>
            </div>

            <div class="filter-field">
                <label>"Facility"</label>
                <select
                    disabled=move || filter.with(|f| f.location.district.is_none())
                    prop:value=move || {
                        filter.with(|f| {
                            f.location.facility.clone().unwrap_or_else(|| ALL_FACILITIES.to_string())
                        })
                    }
                    on:change=move |ev| {
                        let value = event_target_value(&ev);
                        filter.update(|f| f.location.set_facility(select_value(value, ALL_FACILITIES)));
                    }
                >
                    <option value=ALL_FACILITIES>"All facilities"</option>
                    {move || {
                        facilities
                            .get()
                            .into_iter()
                            .map(|name| {
                                let value = name.clone();
                                let label = name.clone();
                                let selected = name;
                                view! {
                                    <option
                                        value=value
                                        selected=move || {
                                            filter.with(|f| {
                                                f.location.facility.as_deref() == Some(selected.as_str())
                                            })
                                        }
                                    >
                                        {label}
                                    </option>
                                }
                            })
                            .collect_view()
                    }}
                </select>
            </div>

            <Show when=move || lookup_error.get().is_some()>
                <div class="filter-field__error">
                    {move || lookup_error.get().unwrap_or_default()}
                </div>
            </Show>
        </div>
    }
}
