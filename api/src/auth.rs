//! Login and password-reset wire shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::envelope;
use crate::Result;

/// Backend account role. Only `Admin` may use the back office.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Customer,
    Inspector,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUser {
    #[serde(deserialize_with = "envelope::de_id")]
    pub user_id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub display_name: String,
    pub role: Role,
    #[serde(default, deserialize_with = "envelope::de_time_opt")]
    pub created_at: Option<DateTime<Utc>>,
}

/// `POST /auth/login` response.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<AdminUser>,
    #[serde(default)]
    pub message: Option<String>,
}

/// `POST /auth/forgot-password` response. The reset token is only present
/// when the backend is configured to short-circuit mail delivery.
#[derive(Debug, Clone, Deserialize)]
pub struct ResetIssued {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub reset_token: Option<String>,
}

/// Plain `{success, message}` acknowledgement.
#[derive(Debug, Clone, Deserialize)]
pub struct AckResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

pub fn parse_login(v: &Value) -> Result<LoginResponse> {
    serde_json::from_value(v.clone()).map_err(Into::into)
}

pub fn parse_reset_issued(v: &Value) -> Result<ResetIssued> {
    // some gateway builds wrap this payload in an RPC-style result key
    let v = v.get("fn_auth_forgot_password_json").unwrap_or(v);
    serde_json::from_value(v.clone()).map_err(Into::into)
}

pub fn parse_ack(v: &Value) -> Result<AckResponse> {
    serde_json::from_value(v.clone()).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn login_response_with_admin_user() {
        let v = json!({
            "success": true,
            "token": "jwt-abc",
            "user": {"user_id": 1, "email": "a@m.vn", "display_name": "An", "role": "ADMIN"}
        });
        let login = parse_login(&v).expect("parse");
        assert!(login.success);
        assert_eq!(login.token.as_deref(), Some("jwt-abc"));
        assert_eq!(login.user.expect("user").role, Role::Admin);
    }

    #[test]
    fn unknown_role_does_not_fail_the_parse() {
        let v = json!({
            "success": true,
            "token": "t",
            "user": {"user_id": "u9", "role": "AUDITOR"}
        });
        let login = parse_login(&v).expect("parse");
        assert_eq!(login.user.expect("user").role, Role::Unknown);
    }

    #[test]
    fn failed_login_carries_message() {
        let v = json!({"success": false, "message": "wrong password"});
        let login = parse_login(&v).expect("parse");
        assert!(!login.success);
        assert!(login.token.is_none());
        assert_eq!(login.message.as_deref(), Some("wrong password"));
    }
}
