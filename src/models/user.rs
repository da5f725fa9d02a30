// Allow dead code: API response structs have fields for completeness
#![allow(dead_code)]

use serde::{Deserialize, Serialize};

/// The authenticated account as returned by GET /users/me.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    #[serde(default, alias = "registration_date")]
    pub created_at: Option<String>,
}

impl User {
    pub fn full_name(&self) -> String {
        let first = self.first_name.as_deref().unwrap_or("");
        let last = self.last_name.as_deref().unwrap_or("");
        let name = format!("{} {}", first, last);
        let name = name.trim();
        if name.is_empty() {
            self.username.clone()
        } else {
            name.to_string()
        }
    }
}

/// Registration payload for POST /users/register.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub username: String,
    pub address: String,
    pub password: String,
}

/// Profile fields the account owner may change via PUT /users/me.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub address: String,
}

/// Response of POST /users/login. The token is opaque to the client.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Aggregate counters for the account dashboard.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardStats {
    #[serde(default)]
    pub total_bookings: i64,
    #[serde(default)]
    pub active_bookings: i64,
    #[serde(default)]
    pub total_favorites: Option<i64>,
}

/// Acknowledgement returned by the favorites endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FavoriteAck {
    #[serde(default)]
    pub car_id: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_login_response() {
        let json = r#"{"access_token": "abc.def.ghi", "token_type": "bearer"}"#;
        let resp: LoginResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.access_token, "abc.def.ghi");
        assert_eq!(resp.token_type.as_deref(), Some("bearer"));
    }

    #[test]
    fn test_full_name_falls_back_to_username() {
        let json = r#"{"id": 1, "username": "kmercer", "email": "k@example.com"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.full_name(), "kmercer");
    }

    #[test]
    fn test_full_name_trims_missing_parts() {
        let json = r#"{"id": 1, "username": "kmercer", "email": "k@example.com",
                       "first_name": "Kay"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.full_name(), "Kay");
    }

    #[test]
    fn test_dashboard_stats_tolerate_missing_fields() {
        let stats: DashboardStats = serde_json::from_str("{}").unwrap();
        assert_eq!(stats.total_bookings, 0);
        assert_eq!(stats.active_bookings, 0);
        assert!(stats.total_favorites.is_none());
    }
}
