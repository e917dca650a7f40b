use leptos::prelude::*;

/// PaginationControls component - reusable pagination controls
///
/// Pages are 1-indexed, as in the server envelope. Advancing is gated on
/// the server-reported `has_next`; retreating is gated on `page > 1`.
#[component]
pub fn PaginationControls(
    /// Current page (1-indexed)
    #[prop(into)]
    current_page: Signal<u32>,

    /// Total number of pages
    #[prop(into)]
    total_pages: Signal<u32>,

    /// Total count of records
    #[prop(into)]
    total_records: Signal<u64>,

    /// Whether the server reported another page after the current one
    #[prop(into)]
    has_next: Signal<bool>,

    /// Callback for page-1 navigation
    on_prev: Callback<()>,

    /// Callback for page+1 navigation
    on_next: Callback<()>,
) -> impl IntoView {
    view! {
        <div class="pagination-controls">
            <button
                class="pagination-btn"
                on:click=move |_| on_prev.run(())
                disabled=move || current_page.get() <= 1
                title="Previous page"
            >
                "‹"
            </button>
            <span class="pagination-info">
                {move || {
                    format!(
                        "{} / {} ({})",
                        current_page.get(),
                        total_pages.get().max(1),
                        total_records.get(),
                    )
                }}
            </span>
            <button
                class="pagination-btn"
                on:click=move |_| on_next.run(())
                disabled=move || !has_next.get()
                title="Next page"
            >
                "›"
            </button>
        </div>
    }
}
