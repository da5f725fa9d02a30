//! Authentication module: session state, access control, remembered logins.
//!
//! This module provides:
//! - `SessionStore`: the single durable slot holding the bearer credential
//! - `guard`: the access guard keeping account screens behind a login
//! - `CredentialStore`: remembered passwords in the OS keychain
//!
//! The credential is an opaque string; it persists across restarts and is
//! only removed by logout or overwritten by a later login.

pub mod credentials;
pub mod guard;
pub mod session;

pub use credentials::CredentialStore;
pub use guard::{Decision, NavBadge, Screen, PROTECTED_SCREENS};
pub use session::{FileTokenStorage, MemoryTokenStorage, SessionStore, TokenStorage};
