use thiserror::Error;

use super::claims::TokenClass;
use super::store::StoreError;

/// Why a credential was rejected or could not be issued.
///
/// Rejections are distinguished here for logs and tests. At the HTTP edge
/// they all collapse into the same 401.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("credential is malformed")]
    Malformed,
    #[error("signing algorithm {0} is not accepted")]
    UnsupportedAlgorithm(String),
    #[error("credential signature is invalid")]
    InvalidSignature,
    #[error("credential has expired")]
    Expired,
    #[error("credential issued in the future")]
    FutureIssued,
    #[error("credential not found")]
    NotFound,
    #[error("expected {expected} credential, got {actual}")]
    WrongClass {
        expected: TokenClass,
        actual: TokenClass,
    },
    #[error("credential storage failure: {0}")]
    StorageFailure(String),
    #[error("failed to sign credential: {0}")]
    Signing(String),
}

impl AuthError {
    /// Short machine-readable reason for security logs.
    pub fn reason(&self) -> &'static str {
        match self {
            AuthError::Malformed => "malformed",
            AuthError::UnsupportedAlgorithm(_) => "unsupported_algorithm",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::Expired => "expired",
            AuthError::FutureIssued => "future_issued",
            AuthError::NotFound => "not_found",
            AuthError::WrongClass { .. } => "wrong_class",
            AuthError::StorageFailure(_) => "storage_failure",
            AuthError::Signing(_) => "signing_failure",
        }
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        AuthError::StorageFailure(err.to_string())
    }
}
