use contracts::system::auth::{LoginRequest, LoginResponse};
use gloo_net::http::Request;

use super::storage;
use crate::shared::api_utils::api_url;

/// Login with username and password
pub async fn login(username: String, password: String) -> Result<LoginResponse, String> {
    let request = LoginRequest { username, password };

    let response = Request::post(&api_url("/api/system/auth/login"))
        .json(&request)
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    if !response.ok() {
        return Err(format!("Login failed: {}", response.status()));
    }

    response
        .json::<LoginResponse>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

/// Authenticated GET. Attaches `Authorization: Bearer <token>` when a
/// session exists; a 401 means the session is no longer honoured by the
/// server, so it is purged and the user lands back on the login view.
pub async fn fetch_json<T>(path: &str) -> Result<T, String>
where
    T: for<'de> serde::Deserialize<'de>,
{
    let mut request = Request::get(&api_url(path));
    if let Some(session) = storage::load_session() {
        request = request.header("Authorization", &format!("Bearer {}", session.access_token));
    }

    let response = request
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    if response.status() == 401 {
        storage::clear_session();
        if let Some(window) = web_sys::window() {
            let _ = window.location().set_href("/login");
        }
        return Err("Session rejected by server".to_string());
    }

    if !response.ok() {
        return Err(format!("Request failed: {}", response.status()));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}
