//! HTTP wrappers over the auth and category surface. The client keeps the
//! token cookies in a cookie store, drives the explicit [`Session`] object
//! through the auth transitions, and applies optimistic picker updates with
//! rollback on failure.

use std::sync::Arc;

use anyhow::{anyhow, Context};
use serde::Serialize;
use tracing::{error, warn};

use crate::auth::dto::{AuthOutcome, LoginRequest, LogoutRequest, SignUpRequest};
use crate::categories::dto::Category;
use crate::client::picker::PickerState;
use crate::client::session::{OtpChallenge, PendingSignup, Session};
use crate::email::{EmailSender, OtpEmail};

/// Result of signup phase 1.
#[derive(Debug)]
pub enum SignUpStep {
    /// The account already existed and the password matched.
    LoggedIn(AuthOutcome),
    /// A new account: the OTP email is on its way, confirmation pending.
    OtpPending(PendingSignup),
}

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    email: Arc<dyn EmailSender>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, email: Arc<dyn EmailSender>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .context("build http client")?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            email,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_auth<T: Serialize>(&self, path: &str, body: &T) -> anyhow::Result<AuthOutcome> {
        let response = self.http.post(self.url(path)).json(body).send().await?;
        Ok(response.json::<AuthOutcome>().await?)
    }

    /// The mount-time session check; corrects the session exactly once.
    pub async fn hydrate(&self, session: &mut Session) -> anyhow::Result<()> {
        let response = self.http.get(self.url("/api/v1/auth/session")).send().await?;
        let outcome = response.json::<AuthOutcome>().await?;
        session.hydrate(&outcome);
        Ok(())
    }

    pub async fn login(
        &self,
        session: &mut Session,
        email: &str,
        password: &str,
    ) -> anyhow::Result<AuthOutcome> {
        let outcome = self
            .post_auth(
                "/api/v1/auth/login",
                &LoginRequest {
                    email: email.into(),
                    password: password.into(),
                },
            )
            .await?;
        if outcome.status != 200 {
            return Err(anyhow!(outcome.message));
        }
        if let Some(user) = outcome.user.clone() {
            session.apply_login(user);
        }
        Ok(outcome)
    }

    /// Signup phase 1. For a brand-new email this generates the OTP locally,
    /// fires the email without waiting for delivery, and hands back the
    /// pending credentials for the confirmation step.
    pub async fn sign_up(
        &self,
        session: &mut Session,
        name: &str,
        email: &str,
        password: &str,
    ) -> anyhow::Result<SignUpStep> {
        let outcome = self
            .post_auth(
                "/api/v1/auth/signup",
                &SignUpRequest {
                    email: email.into(),
                    name: Some(name.into()),
                    password: password.into(),
                },
            )
            .await?;
        match outcome.status {
            200 => {
                if let Some(user) = outcome.user.clone() {
                    session.apply_login(user);
                }
                Ok(SignUpStep::LoggedIn(outcome))
            }
            201 => {
                let challenge = OtpChallenge::generate();
                let message = OtpEmail {
                    name: name.into(),
                    email: email.into(),
                    otp: challenge.code(),
                };
                let sender = Arc::clone(&self.email);
                // Fire-and-forget: delivery failures are logged, not surfaced.
                tokio::spawn(async move {
                    if let Err(e) = sender.send_otp(&message).await {
                        error!(error = %e, "otp email dispatch failed");
                    }
                });
                Ok(SignUpStep::OtpPending(PendingSignup {
                    name: name.into(),
                    email: email.into(),
                    password: password.into(),
                    challenge,
                }))
            }
            _ => Err(anyhow!(outcome.message)),
        }
    }

    /// OTP confirmation (signup phase 2). The code comparison is local; only
    /// a correct code reaches the server.
    pub async fn confirm_otp(
        &self,
        session: &mut Session,
        pending: PendingSignup,
        input: &str,
    ) -> anyhow::Result<AuthOutcome> {
        if !pending.challenge.verify(input) {
            return Err(anyhow!("Please enter the correct code"));
        }
        let outcome = self
            .post_auth(
                "/api/v1/auth/signup/confirm",
                &SignUpRequest {
                    email: pending.email,
                    name: Some(pending.name),
                    password: pending.password,
                },
            )
            .await?;
        if outcome.status != 200 {
            return Err(anyhow!(outcome.message));
        }
        if let Some(user) = outcome.user.clone() {
            session.apply_login(user);
        }
        Ok(outcome)
    }

    /// Server first, then the local state: the session is cleared even when
    /// the server could not clear the stored refresh token.
    pub async fn logout(&self, session: &mut Session) -> anyhow::Result<AuthOutcome> {
        let id = session.user().map(|u| u.id).unwrap_or_default();
        let outcome = self
            .post_auth("/api/v1/auth/logout", &LogoutRequest { id })
            .await?;
        if outcome.status != 200 {
            warn!(status = outcome.status, "server-side logout failed");
        }
        session.apply_logout();
        Ok(outcome)
    }

    pub async fn fetch_all_categories(&self) -> anyhow::Result<Vec<Category>> {
        let response = self.http.get(self.url("/api/v1/categories")).send().await?;
        Ok(response.json().await?)
    }

    pub async fn fetch_my_categories(&self) -> anyhow::Result<Vec<Category>> {
        let response = self
            .http
            .get(self.url("/api/v1/me/categories"))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(anyhow!("Unauthorized request"));
        }
        Ok(response.json().await?)
    }

    /// Optimistic toggle: the picker flips immediately, and the edit is
    /// rolled back if the server rejects the mutation.
    pub async fn toggle_category(
        &self,
        picker: &mut PickerState,
        category_id: i64,
    ) -> anyhow::Result<()> {
        let edit = picker.toggle(category_id);
        let url = self.url(&format!("/api/v1/me/categories/{category_id}"));
        let request = if edit.added {
            self.http.post(url)
        } else {
            self.http.delete(url)
        };
        let result = request.send().await;
        match result {
            Ok(response) if response.status().is_success() => Ok(()),
            Ok(response) => {
                picker.rollback(edit);
                Err(anyhow!("category update failed: {}", response.status()))
            }
            Err(e) => {
                picker.rollback(edit);
                Err(e.into())
            }
        }
    }
}
