use std::fmt;
use std::time::Duration;

use jsonwebtoken::Algorithm;

/// How credentials reach the client and how the server checks them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// Client holds an opaque handle (cookie); signed token lives server-side.
    Opaque,
    /// Client holds the signed token itself (Authorization: Bearer).
    Direct,
}

/// What the refresh operation puts into the new pair's identity claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshIdentity {
    /// Only the subject id survives; email and role come back empty.
    Blank,
    /// Email and role are reloaded from the user record.
    Reload,
}

/// Configuration for JWT security settings
#[derive(Clone)]
pub struct SecurityConfig {
    /// JWT secret key for signing and verifying tokens
    pub jwt_secret: Vec<u8>,
    /// JWT algorithm to use (defaults to HS256)
    pub algorithm: Algorithm,
    pub issuer: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
    /// Tolerance for issued-at timestamps slightly in the future.
    pub clock_skew: Duration,
    pub mode: AuthMode,
    pub refresh_identity: RefreshIdentity,
}

pub const DEFAULT_ISSUER: &str = "caloriesapp";
pub const DEFAULT_ACCESS_TTL: Duration = Duration::from_secs(10 * 60 * 60);
pub const DEFAULT_REFRESH_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);
pub const DEFAULT_CLOCK_SKEW: Duration = Duration::from_secs(300);

impl SecurityConfig {
    /// Create a new SecurityConfig with the given JWT secret
    pub fn new(jwt_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            algorithm: Algorithm::HS256,
            issuer: DEFAULT_ISSUER.to_string(),
            access_ttl: DEFAULT_ACCESS_TTL,
            refresh_ttl: DEFAULT_REFRESH_TTL,
            clock_skew: DEFAULT_CLOCK_SKEW,
            mode: AuthMode::Opaque,
            refresh_identity: RefreshIdentity::Blank,
        }
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    pub fn with_ttls(mut self, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        self.access_ttl = access_ttl;
        self.refresh_ttl = refresh_ttl;
        self
    }

    pub fn with_clock_skew(mut self, clock_skew: Duration) -> Self {
        self.clock_skew = clock_skew;
        self
    }

    pub fn with_mode(mut self, mode: AuthMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_refresh_identity(mut self, refresh_identity: RefreshIdentity) -> Self {
        self.refresh_identity = refresh_identity;
        self
    }

    /// Config with a fixed test secret and default lifetimes.
    pub fn for_tests() -> Self {
        Self::new(b"test_secret_for_calories_backend".to_vec())
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self::new(b"default_secret_for_tests_only".to_vec())
    }
}

impl fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("jwt_secret", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field("issuer", &self.issuer)
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .field("clock_skew", &self.clock_skew)
            .field("mode", &self.mode)
            .field("refresh_identity", &self.refresh_identity)
            .finish()
    }
}
