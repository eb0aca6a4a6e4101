use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::AuthError;

/// Token class carried in the `type` claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenClass {
    Access,
    Refresh,
}

impl fmt::Display for TokenClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenClass::Access => f.write_str("access"),
            TokenClass::Refresh => f.write_str("refresh"),
        }
    }
}

/// Claims carried by every backend-issued token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "user_id")]
    pub subject_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Issued-at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
    pub iss: String,
    #[serde(rename = "type")]
    pub class: TokenClass,
}

impl Claims {
    pub fn access(
        subject_id: i64,
        email: Option<&str>,
        role: Option<&str>,
        iat: i64,
        exp: i64,
        iss: &str,
    ) -> Self {
        Self {
            subject_id,
            email: email.map(str::to_owned),
            role: role.map(str::to_owned),
            iat,
            exp,
            iss: iss.to_owned(),
            class: TokenClass::Access,
        }
    }

    /// Refresh tokens carry only the subject.
    pub fn refresh(subject_id: i64, iat: i64, exp: i64, iss: &str) -> Self {
        Self {
            subject_id,
            email: None,
            role: None,
            iat,
            exp,
            iss: iss.to_owned(),
            class: TokenClass::Refresh,
        }
    }

    /// Structural checks that the signature cannot vouch for.
    pub fn check_shape(&self) -> Result<(), AuthError> {
        if self.subject_id <= 0 || self.iss.is_empty() {
            return Err(AuthError::Malformed);
        }
        Ok(())
    }
}
