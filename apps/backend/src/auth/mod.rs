//! Self-issued session tokens.
//!
//! A token is the hex rendering of the claims JSON followed by a keyed
//! BLAKE3 MAC over that JSON. See [`codec`] for the wire layout and
//! [`token`] for issuing and verifying.

pub mod claims;
pub mod codec;
pub mod token;

pub use claims::{AuthorizationResult, Claims};
pub use codec::DecodeError;
pub use token::{
    authorize, authorize_admin, issue_session_token, AdminOutcome, AuthError,
    FIXED_SESSION_DURATION,
};
