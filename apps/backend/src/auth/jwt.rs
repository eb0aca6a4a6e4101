use std::collections::HashSet;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::claims::Claims;
use super::error::AuthError;
use crate::state::security_config::SecurityConfig;

/// The only algorithms a token may declare. Anything else (RS*, ES*, none)
/// is refused before the signature is looked at.
const HMAC_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

fn is_hmac(alg: Algorithm) -> bool {
    HMAC_ALGORITHMS.contains(&alg)
}

/// Sign a claim set with the configured HMAC algorithm.
pub fn issue_token(claims: &Claims, security: &SecurityConfig) -> Result<String, AuthError> {
    if !is_hmac(security.algorithm) {
        return Err(AuthError::UnsupportedAlgorithm(format!("{:?}", security.algorithm)));
    }

    encode(
        &Header::new(security.algorithm),
        claims,
        &EncodingKey::from_secret(&security.jwt_secret),
    )
    .map_err(|e| AuthError::Signing(e.to_string()))
}

/// Verify signature and structure, returning the claims.
///
/// Expiry and issued-at are deliberately not checked here; the session
/// manager owns the clock.
pub fn verify_token(token: &str, security: &SecurityConfig) -> Result<Claims, AuthError> {
    let header = decode_header(token).map_err(|_| AuthError::Malformed)?;
    if !is_hmac(header.alg) {
        return Err(AuthError::UnsupportedAlgorithm(format!("{:?}", header.alg)));
    }

    let mut validation = Validation::new(security.algorithm);
    validation.algorithms = HMAC_ALGORITHMS.to_vec();
    validation.validate_exp = false;
    validation.validate_nbf = false;
    validation.validate_aud = false;
    validation.required_spec_claims = HashSet::new();

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(&security.jwt_secret),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::InvalidSignature => AuthError::InvalidSignature,
        ErrorKind::InvalidAlgorithm => AuthError::UnsupportedAlgorithm(format!("{:?}", header.alg)),
        _ => AuthError::Malformed,
    })?;

    claims.check_shape()?;
    Ok(claims)
}
