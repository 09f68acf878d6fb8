use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    pub issuer: String,
    pub audience: String,
    pub access_ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

/// Third-party transactional email provider (EmailJS-compatible REST API).
/// Absent when the deployment runs with the logging sender instead.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    pub service_id: String,
    pub template_id: String,
    pub public_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub cookie_secure: bool,
    pub email: Option<EmailConfig>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            access_secret: std::env::var("ACCESS_TOKEN_SECRET")?,
            refresh_secret: std::env::var("REFRESH_TOKEN_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "ecomm".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "ecomm-users".into()),
            access_ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60),
            refresh_ttl_minutes: std::env::var("JWT_REFRESH_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24 * 14),
        };
        let cookie_secure = std::env::var("COOKIE_SECURE")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);
        let email = match (
            std::env::var("EMAILJS_SERVICE_ID"),
            std::env::var("EMAILJS_TEMPLATE_ID"),
            std::env::var("EMAILJS_PUBLIC_KEY"),
        ) {
            (Ok(service_id), Ok(template_id), Ok(public_key)) => Some(EmailConfig {
                service_id,
                template_id,
                public_key,
            }),
            _ => None,
        };
        Ok(Self {
            database_url,
            jwt,
            cookie_secure,
            email,
        })
    }
}
