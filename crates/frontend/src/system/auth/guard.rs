use leptos::prelude::*;

use super::context::use_session;
use super::storage;
use crate::system::pages::login::LoginPage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Checking,
    Authenticated,
    Unauthenticated,
}

/// Wraps protected views. One-shot check per mount, no retry.
///
/// The check reads the persistent store directly in addition to the context:
/// context hydration is asynchronous, and deciding on the context alone
/// during that window would redirect a user whose session is still being
/// restored.
#[component]
pub fn RequireSession(children: ChildrenFn) -> impl IntoView {
    let (session_state, _) = use_session();
    let (guard, set_guard) = signal(GuardState::Checking);

    Effect::new(move |_| {
        let authenticated = session_state.get().is_authenticated || storage::has_session();
        set_guard.set(if authenticated {
            GuardState::Authenticated
        } else {
            GuardState::Unauthenticated
        });
    });

    // Keep the address bar honest when the guard bounces to login.
    Effect::new(move |_| {
        if guard.get() == GuardState::Unauthenticated {
            if let Some(window) = web_sys::window() {
                if let Ok(history) = window.history() {
                    let _ = history.replace_state_with_url(
                        &wasm_bindgen::JsValue::NULL,
                        "",
                        Some("/login"),
                    );
                }
            }
        }
    });

    view! {
        {move || match guard.get() {
            GuardState::Checking => view! {
                <div class="guard-checking">"Checking session…"</div>
            }
            .into_any(),
            GuardState::Authenticated => children(),
            GuardState::Unauthenticated => view! { <LoginPage /> }.into_any(),
        }}
    }
}
