use serde::{Deserialize, Serialize};

/// Request body for login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for signup phase 1 and for OTP confirmation (phase 2).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub name: Option<String>,
    pub password: String,
}

/// Request body for logout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoutRequest {
    pub id: i64,
}

/// Public part of the user returned to the client. The `password` field is
/// part of the wire shape but always transmitted blank.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PublicUser {
    pub id: i64,
    pub name: Option<String>,
    pub email: String,
    pub password: String,
}

/// Uniform result of every auth operation. `status` carries HTTP-like
/// semantics (200 ok, 201 signup-pending-otp, 302 no-such-user, 401
/// unauthorized, 403 validation/expired, 404/500 unexpected); callers branch
/// on it explicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthOutcome {
    pub status: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<PublicUser>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl AuthOutcome {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            user: None,
            access_token: None,
            refresh_token: None,
        }
    }

    pub fn logged_in(
        message: impl Into<String>,
        user: PublicUser,
        access_token: String,
        refresh_token: String,
    ) -> Self {
        Self {
            status: 200,
            message: message.into(),
            user: Some(user),
            access_token: Some(access_token),
            refresh_token: Some(refresh_token),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_omits_absent_fields() {
        let outcome = AuthOutcome::new(401, "Invalid user credentials");
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], 401);
        assert!(json.get("user").is_none());
        assert!(json.get("access_token").is_none());
    }

    #[test]
    fn logged_in_outcome_carries_blanked_user() {
        let user = PublicUser {
            id: 1,
            name: Some("Jane".into()),
            email: "jane@example.com".into(),
            password: String::new(),
        };
        let outcome =
            AuthOutcome::logged_in("User successfuly logged in", user, "a".into(), "r".into());
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], 200);
        assert_eq!(json["user"]["password"], "");
    }
}
