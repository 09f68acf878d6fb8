//! In-process client for the auth and category surface: the explicit session
//! object with its route guards, the pending-signup OTP flow, the paginated
//! interest picker, and the HTTP wrappers that tie them to the server.

pub mod api;
pub mod picker;
pub mod session;

pub use api::{ApiClient, SignUpStep};
pub use picker::{PickerState, ToggleEdit, CATEGORIES_PER_PAGE};
pub use session::{
    guest_area, members_area, GuestGuard, MembersGuard, OtpChallenge, PendingSignup, Session,
    SessionStatus,
};
