//! Bearer token authorization for layer mutations.
//!
//! [`AuthGuard`] verifies HS256 tokens minted by [`TokenKey`] and rejects
//! subjects listed in an injected [`RevocationStore`]. Any verification
//! failure means "not authorized"; it is never a system error.

pub mod error;
pub mod guard;
pub mod revocation;
pub mod token;

pub use error::{AuthError, Result};
pub use guard::{AuthGuard, Subject};
pub use revocation::{DEFAULT_REVOCATION_TTL, InMemoryRevocationStore, RevocationStore};
pub use token::{Claims, TokenKey, token_fingerprint};
