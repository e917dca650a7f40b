use crate::dashboards::d100_satisfaction::ui::SatisfactionDashboard;
use crate::system::auth::guard::RequireSession;
use leptos::prelude::*;

#[component]
pub fn AppRoutes() -> impl IntoView {
    view! {
        <RequireSession>
            <SatisfactionDashboard />
        </RequireSession>
    }
}
