use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

use crate::auth::dto::PublicUser;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[serde(skip_serializing)]
    pub refresh_token: Option<String>,
    pub created_at: OffsetDateTime,
}

impl User {
    /// Client-facing view with the password blanked. Every read path goes
    /// through this before anything leaves the process.
    pub fn into_public(self) -> PublicUser {
        PublicUser {
            id: self.id,
            name: self.name,
            email: self.email,
            password: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_view_blanks_password() {
        let user = User {
            id: 3,
            email: "jane@example.com".into(),
            name: Some("Jane".into()),
            password_hash: "$argon2id$not-a-real-hash".into(),
            refresh_token: Some("some.jwt.value".into()),
            created_at: OffsetDateTime::UNIX_EPOCH,
        };
        let public = user.into_public();
        assert_eq!(public.password, "");
        assert_eq!(public.email, "jane@example.com");
    }

    #[test]
    fn row_serialization_never_leaks_secrets() {
        let user = User {
            id: 3,
            email: "jane@example.com".into(),
            name: None,
            password_hash: "$argon2id$not-a-real-hash".into(),
            refresh_token: Some("some.jwt.value".into()),
            created_at: OffsetDateTime::UNIX_EPOCH,
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(!json.contains("some.jwt.value"));
    }
}
