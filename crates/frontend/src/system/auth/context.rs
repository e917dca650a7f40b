use contracts::system::auth::{Session, UserInfo};
use leptos::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use super::storage;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionState {
    pub user: Option<UserInfo>,
    pub is_authenticated: bool,
}

impl SessionState {
    fn from_session(session: Option<Session>) -> Self {
        match session {
            Some(session) => SessionState {
                user: Some(session.user),
                is_authenticated: true,
            },
            None => SessionState::default(),
        }
    }
}

/// Session context provider. Hydrates once from the persistent store and
/// then mirrors cross-tab changes: a login or logout in another tab fires
/// the `storage` event here, and this tab's state follows without a reload.
#[component]
pub fn SessionProvider(children: ChildrenFn) -> impl IntoView {
    let (session_state, set_session_state) =
        signal(SessionState::from_session(storage::load_session()));

    Effect::new(move |_| {
        let Some(window) = web_sys::window() else {
            return;
        };
        let on_storage = Closure::<dyn FnMut(web_sys::StorageEvent)>::new(
            move |event: web_sys::StorageEvent| {
                // Only the session key is ours; ignore unrelated writes.
                if event.key().as_deref() != Some(storage::SESSION_KEY) {
                    return;
                }
                set_session_state.set(SessionState::from_session(storage::load_session()));
            },
        );
        let _ = window.add_event_listener_with_callback(
            "storage",
            on_storage.as_ref().unchecked_ref::<js_sys::Function>(),
        );
        // The listener lives for the whole tab, same as the provider.
        on_storage.forget();
    });

    provide_context(session_state);
    provide_context(set_session_state);

    children()
}

/// Access the session context. Calling this outside a `SessionProvider`
/// is a wiring bug and fails loudly.
pub fn use_session() -> (ReadSignal<SessionState>, WriteSignal<SessionState>) {
    let session_state = use_context::<ReadSignal<SessionState>>()
        .expect("SessionProvider not found in component tree");
    let set_session_state = use_context::<WriteSignal<SessionState>>()
        .expect("SessionProvider not found in component tree");

    (session_state, set_session_state)
}

/// Write-through login: consumes an already-obtained session (no network
/// call) and updates state synchronously.
pub fn login_with(set_session_state: WriteSignal<SessionState>, session: Session) {
    storage::save_session(&session);
    set_session_state.set(SessionState {
        user: Some(session.user),
        is_authenticated: true,
    });
}

/// Clear the store, reset state and navigate to the login view.
pub fn logout(set_session_state: WriteSignal<SessionState>) {
    storage::clear_session();
    set_session_state.set(SessionState::default());

    if let Some(window) = web_sys::window() {
        let _ = window.location().set_href("/login");
    }
}
