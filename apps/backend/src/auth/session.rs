//! Credential pair lifecycle: issue, validate, refresh, revoke.
//!
//! One `SessionManager` is built at startup and runs in exactly one
//! [`AuthMode`]. In opaque mode the client only ever sees random handles and
//! the signed tokens stay in the credential store. In direct mode the client
//! holds the signed tokens and nothing is stored server-side.

use std::fmt;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use super::claims::{Claims, TokenClass};
use super::error::AuthError;
use super::jwt::{issue_token, verify_token};
use super::store::CredentialStore;
use crate::logging::pii::Redacted;
use crate::state::security_config::{AuthMode, SecurityConfig};

const KEY_PREFIX: &str = "jwt_tokens";

/// What the client receives after login or refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CredentialPair {
    pub access: String,
    pub refresh: String,
    /// Access credential lifetime in seconds.
    pub expires_in: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Revocation {
    Revoked,
    /// Direct tokens cannot be withdrawn; they live until expiry.
    Unsupported,
}

#[derive(Clone)]
enum SessionBackend {
    Direct,
    Opaque(Arc<dyn CredentialStore>),
}

#[derive(Clone)]
pub struct SessionManager {
    security: SecurityConfig,
    backend: SessionBackend,
}

impl fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionManager")
            .field("security", &self.security)
            .field("mode", &self.mode())
            .finish()
    }
}

fn unix_seconds(now: SystemTime) -> Result<i64, AuthError> {
    now.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .map_err(|_| AuthError::Signing("system clock before unix epoch".to_string()))
}

fn store_key(handle: &str) -> String {
    format!("{KEY_PREFIX}:{handle}")
}

impl SessionManager {
    pub fn direct(security: SecurityConfig) -> Self {
        Self {
            security: security.with_mode(AuthMode::Direct),
            backend: SessionBackend::Direct,
        }
    }

    pub fn opaque(security: SecurityConfig, store: Arc<dyn CredentialStore>) -> Self {
        Self {
            security: security.with_mode(AuthMode::Opaque),
            backend: SessionBackend::Opaque(store),
        }
    }

    pub fn mode(&self) -> AuthMode {
        match self.backend {
            SessionBackend::Direct => AuthMode::Direct,
            SessionBackend::Opaque(_) => AuthMode::Opaque,
        }
    }

    pub fn security(&self) -> &SecurityConfig {
        &self.security
    }

    pub async fn generate_pair(
        &self,
        subject_id: i64,
        email: Option<&str>,
        role: Option<&str>,
    ) -> Result<CredentialPair, AuthError> {
        self.generate_pair_at(subject_id, email, role, SystemTime::now())
            .await
    }

    /// Issue a pair as of `now`. Either both credentials are usable or the
    /// call fails; a half-stored pair is rolled back.
    pub async fn generate_pair_at(
        &self,
        subject_id: i64,
        email: Option<&str>,
        role: Option<&str>,
        now: SystemTime,
    ) -> Result<CredentialPair, AuthError> {
        let iat = unix_seconds(now)?;
        let access_ttl = self.security.access_ttl.as_secs() as i64;
        let refresh_ttl = self.security.refresh_ttl.as_secs() as i64;
        let issuer = self.security.issuer.as_str();

        let access_claims = Claims::access(subject_id, email, role, iat, iat + access_ttl, issuer);
        let refresh_claims = Claims::refresh(subject_id, iat, iat + refresh_ttl, issuer);

        let access_token = issue_token(&access_claims, &self.security)?;
        let refresh_token = issue_token(&refresh_claims, &self.security)?;

        let store = match &self.backend {
            SessionBackend::Direct => {
                return Ok(CredentialPair {
                    access: access_token,
                    refresh: refresh_token,
                    expires_in: access_ttl,
                });
            }
            SessionBackend::Opaque(store) => store,
        };

        let access_handle = Uuid::new_v4().to_string();
        let refresh_handle = Uuid::new_v4().to_string();
        let access_key = store_key(&access_handle);

        store
            .set(&access_key, &access_token, self.security.access_ttl)
            .await?;

        if let Err(err) = store
            .set(
                &store_key(&refresh_handle),
                &refresh_token,
                self.security.refresh_ttl,
            )
            .await
        {
            if let Err(rollback) = store.delete(&access_key).await {
                warn!(
                    subject_id,
                    error = %rollback,
                    "failed to roll back access credential after refresh store failure"
                );
            }
            return Err(err.into());
        }

        debug!(subject_id, "issued opaque credential pair");
        Ok(CredentialPair {
            access: access_handle,
            refresh: refresh_handle,
            expires_in: access_ttl,
        })
    }

    pub async fn validate(&self, presented: &str) -> Result<Claims, AuthError> {
        self.validate_at(presented, SystemTime::now()).await
    }

    /// Resolve and check a presented credential of either class as of `now`.
    pub async fn validate_at(&self, presented: &str, now: SystemTime) -> Result<Claims, AuthError> {
        let presented = presented.trim();
        if presented.is_empty() {
            return Err(AuthError::Malformed);
        }

        let (token, key) = match &self.backend {
            SessionBackend::Direct => (presented.to_owned(), None),
            SessionBackend::Opaque(store) => {
                let handle = Uuid::parse_str(presented).map_err(|_| AuthError::Malformed)?;
                let key = store_key(&handle.to_string());
                let token = store.get(&key).await?.ok_or(AuthError::NotFound)?;
                (token, Some(key))
            }
        };

        let claims = verify_token(&token, &self.security)?;
        if claims.iss != self.security.issuer {
            return Err(AuthError::Malformed);
        }

        let now = unix_seconds(now)?;
        if claims.exp <= now {
            if let (Some(key), SessionBackend::Opaque(store)) = (key, &self.backend) {
                if let Err(err) = store.delete(&key).await {
                    warn!(error = %err, "failed to evict expired credential");
                }
            }
            return Err(AuthError::Expired);
        }

        if claims.iat > now + self.security.clock_skew.as_secs() as i64 {
            return Err(AuthError::FutureIssued);
        }

        Ok(claims)
    }

    async fn validate_class(
        &self,
        presented: &str,
        expected: TokenClass,
        now: SystemTime,
    ) -> Result<Claims, AuthError> {
        let claims = self.validate_at(presented, now).await?;
        if claims.class != expected {
            return Err(AuthError::WrongClass {
                expected,
                actual: claims.class,
            });
        }
        Ok(claims)
    }

    pub async fn validate_access(&self, presented: &str) -> Result<Claims, AuthError> {
        self.validate_class(presented, TokenClass::Access, SystemTime::now())
            .await
    }

    pub async fn validate_access_at(
        &self,
        presented: &str,
        now: SystemTime,
    ) -> Result<Claims, AuthError> {
        self.validate_class(presented, TokenClass::Access, now).await
    }

    pub async fn validate_refresh(&self, presented: &str) -> Result<Claims, AuthError> {
        self.validate_class(presented, TokenClass::Refresh, SystemTime::now())
            .await
    }

    /// Mint a fresh pair from a refresh credential.
    ///
    /// Only the subject id carries over. The new access credential has no
    /// email or role; callers wanting live identity re-read the user and
    /// call [`generate_pair`](Self::generate_pair) themselves. Neither the
    /// presented refresh credential nor the old access credential is revoked.
    pub async fn refresh(&self, presented: &str) -> Result<CredentialPair, AuthError> {
        let claims = self.validate_refresh(presented).await?;
        self.generate_pair(claims.subject_id, None, None).await
    }

    /// Withdraw a credential. A handle that is already gone still counts as
    /// revoked.
    pub async fn revoke(&self, presented: &str) -> Result<Revocation, AuthError> {
        match &self.backend {
            SessionBackend::Direct => {
                warn!(
                    credential = %Redacted(presented),
                    "revocation requested in direct token mode; credential stays valid until expiry"
                );
                Ok(Revocation::Unsupported)
            }
            SessionBackend::Opaque(store) => {
                let handle = Uuid::parse_str(presented.trim()).map_err(|_| AuthError::Malformed)?;
                store.delete(&store_key(&handle.to_string())).await?;
                Ok(Revocation::Revoked)
            }
        }
    }
}
