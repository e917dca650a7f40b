use contracts::system::auth::Session;
use web_sys::window;

/// The single localStorage key holding the session record. Other tabs watch
/// this key through the `storage` event.
pub const SESSION_KEY: &str = "satisfaction_session_v1";

fn local_storage() -> Option<web_sys::Storage> {
    window()?.local_storage().ok()?
}

/// Persist the session as one JSON record. When storage is unavailable the
/// session simply never persists; nothing here can fail loudly.
pub fn save_session(session: &Session) {
    let Some(storage) = local_storage() else { return };
    let Ok(raw) = serde_json::to_string(session) else {
        return;
    };
    let _ = storage.set_item(SESSION_KEY, &raw);
}

/// Decode one persisted record. `None` marks the record corrupt (truncated
/// write, missing user, hand-edited value) and tells the caller to purge
/// the key so the next load starts from a clean logged-out state.
fn decode_session(raw: &str) -> Option<Session> {
    match serde_json::from_str::<Session>(raw) {
        Ok(session) => Some(session),
        Err(e) => {
            log::warn!("discarding corrupt session record: {}", e);
            None
        }
    }
}

/// Load and validate the persisted session. A record that fails to decode
/// is purged on the spot.
pub fn load_session() -> Option<Session> {
    let storage = local_storage()?;
    let raw = storage.get_item(SESSION_KEY).ok().flatten()?;
    let session = decode_session(&raw);
    if session.is_none() {
        let _ = storage.remove_item(SESSION_KEY);
    }
    session
}

pub fn clear_session() {
    if let Some(storage) = local_storage() {
        let _ = storage.remove_item(SESSION_KEY);
    }
}

/// Direct existence check against storage, bypassing any in-memory state.
pub fn has_session() -> bool {
    load_session().is_some()
}
