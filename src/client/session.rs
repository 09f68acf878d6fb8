//! Client-side session mirror. One `Session` value is owned by the active
//! UI session and passed explicitly to whatever needs it; it starts in a
//! neutral `Unknown` state and is corrected exactly once by the first
//! session check, so guards can hold rendering instead of guessing.

use rand::Rng;

use crate::auth::dto::{AuthOutcome, PublicUser};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionStatus {
    /// The first session check has not resolved yet.
    #[default]
    Unknown,
    SignedIn(PublicUser),
    SignedOut,
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    status: SessionStatus,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> &SessionStatus {
        &self.status
    }

    pub fn is_logged_in(&self) -> bool {
        matches!(self.status, SessionStatus::SignedIn(_))
    }

    pub fn user(&self) -> Option<&PublicUser> {
        match &self.status {
            SessionStatus::SignedIn(user) => Some(user),
            _ => None,
        }
    }

    /// Apply the result of the mount-time session check.
    pub fn hydrate(&mut self, outcome: &AuthOutcome) {
        self.status = match (outcome.status, &outcome.user) {
            (200, Some(user)) => SessionStatus::SignedIn(user.clone()),
            _ => SessionStatus::SignedOut,
        };
    }

    pub fn apply_login(&mut self, user: PublicUser) {
        self.status = SessionStatus::SignedIn(user);
    }

    pub fn apply_logout(&mut self) {
        self.status = SessionStatus::SignedOut;
    }
}

/// Decision for a members-only route boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembersGuard {
    Allow,
    /// Session still unknown: render a neutral loading state.
    Hold,
    RedirectToSignIn,
}

/// Decision for a guests-only boundary (the sign-in page itself).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuestGuard {
    Allow,
    Hold,
    RedirectToHome,
}

pub fn members_area(session: &Session) -> MembersGuard {
    match session.status() {
        SessionStatus::Unknown => MembersGuard::Hold,
        SessionStatus::SignedIn(_) => MembersGuard::Allow,
        SessionStatus::SignedOut => MembersGuard::RedirectToSignIn,
    }
}

pub fn guest_area(session: &Session) -> GuestGuard {
    match session.status() {
        SessionStatus::Unknown => GuestGuard::Hold,
        SessionStatus::SignedIn(_) => GuestGuard::RedirectToHome,
        SessionStatus::SignedOut => GuestGuard::Allow,
    }
}

/// Eight-digit code compared locally; it exists only in client memory for
/// the duration of the verification round-trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OtpChallenge(u32);

impl OtpChallenge {
    pub fn generate() -> Self {
        Self(rand::thread_rng().gen_range(10_000_000..=99_999_999))
    }

    pub fn code(&self) -> u32 {
        self.0
    }

    pub fn verify(&self, input: &str) -> bool {
        input.len() == 8 && input.parse::<u32>() == Ok(self.0)
    }
}

/// Signup credentials held client-side between phase 1 and the OTP
/// confirmation. Never persisted, dropped as soon as the flow completes.
#[derive(Debug, Clone)]
pub struct PendingSignup {
    pub name: String,
    pub email: String,
    pub password: String,
    pub challenge: OtpChallenge,
}
