//! Credential issuance and verification.
//!
//! `jwt` is the signed-token codec, `store` the keyed credential storage,
//! and `session` ties both together into issue / validate / refresh / revoke.

pub mod claims;
pub mod error;
pub mod jwt;
pub mod password;
pub mod session;
pub mod store;

pub use claims::{Claims, TokenClass};
pub use error::AuthError;
pub use session::{CredentialPair, Revocation, SessionManager};
pub use store::{CredentialStore, MemoryCredentialStore, RedisCredentialStore, StoreError};
