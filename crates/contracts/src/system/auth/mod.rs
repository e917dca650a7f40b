use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// May query across all regions.
    National,
    /// Implicitly restricted to the region assigned in `UserInfo::region`.
    Region,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: Uuid,
    pub username: String,
    pub role: UserRole,
    pub region: Option<String>,
    pub district: Option<String>,
    pub facility: Option<String>,
}

impl UserInfo {
    /// The region this user is pinned to, if region-scoped.
    pub fn scoped_region(&self) -> Option<&str> {
        match self.role {
            UserRole::Region => self.region.as_deref(),
            UserRole::National => None,
        }
    }
}

/// The persisted session record: one localStorage key, JSON-encoded.
/// Both fields are mandatory; a record missing either is corrupt and
/// must fail to parse so the store can purge it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub user: UserInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: UserInfo,
}

impl From<LoginResponse> for Session {
    fn from(resp: LoginResponse) -> Self {
        Session {
            access_token: resp.access_token,
            user: resp.user,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> UserInfo {
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
    fn session_round_trips_as_json() {
        let session = Session {
            access_token: "tok".to_string(),
            user: user(),
        };
        let raw = serde_json::to_string(&session).unwrap();
        let back: Session = serde_json::from_str(&raw).unwrap();
        assert_eq!(back, session);
    }

    #[test]
    fn session_without_user_is_rejected() {
        let raw = r#"{"access_token":"tok"}"#;
        assert!(serde_json::from_str::<Session>(raw).is_err());
    }

    #[test]
    fn session_without_token_is_rejected() {
        let raw = format!(
            r#"{{"user":{}}}"#,
            serde_json::to_string(&user()).unwrap()
        );
        assert!(serde_json::from_str::<Session>(&raw).is_err());
    }

    #[test]
    fn scoped_region_only_for_region_role() {
        let mut u = user();
        assert_eq!(u.scoped_region(), Some("Central"));
        u.role = UserRole::National;
        assert_eq!(u.scoped_region(), None);
    }
}
