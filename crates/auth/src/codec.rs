//! Signed transport form of a [`Credential`].
//!
//! Tokens are compact JWS strings signed with HMAC-SHA256 over a shared
//! secret. HS256 is the only accepted algorithm; the header is checked
//! against that allow-list before any signature work happens.

use std::collections::HashSet;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Utc};
use jsonwebtoken::{errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::Deserialize;
use thiserror::Error;

use crate::claims::{validate_window, Credential, TokenClaims};

pub const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error("credential is malformed")]
    Malformed,

    #[error("credential signature does not verify")]
    BadSignature,

    #[error("credential is signed with an unsupported algorithm")]
    UnsupportedAlgorithm,

    #[error("credential has expired")]
    Expired,

    #[error("credential could not be encoded: {0}")]
    Encoding(String),
}

/// Signs and verifies credentials with a shared secret.
#[derive(Clone)]
pub struct CredentialCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl CredentialCodec {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(SIGNING_ALGORITHM);
        // Expiry is checked against the caller's clock in `decode`.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.required_spec_claims = HashSet::from(["exp".to_string()]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    pub fn encode(&self, credential: &Credential) -> Result<String, CredentialError> {
        jsonwebtoken::encode(
            &Header::new(SIGNING_ALGORITHM),
            &credential.to_claims(),
            &self.encoding,
        )
        .map_err(|e| CredentialError::Encoding(e.to_string()))
    }

    /// Verify `token` and return the credential it carries.
    ///
    /// Checks, in order: structure, algorithm allow-list, signature, claim
    /// shape, validity window (`now < expires_at`).
    pub fn decode(&self, token: &str, now: DateTime<Utc>) -> Result<Credential, CredentialError> {
        check_algorithm(token)?;

        let data = jsonwebtoken::decode::<TokenClaims>(token, &self.decoding, &self.validation)
            .map_err(|e| map_jwt_error(e.kind()))?;

        let credential = Credential::try_from(data.claims)?;
        validate_window(&credential, now)?;
        Ok(credential)
    }
}

impl core::fmt::Debug for CredentialCodec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CredentialCodec")
            .field("algorithm", &SIGNING_ALGORITHM)
            .finish_non_exhaustive()
    }
}

#[derive(Deserialize)]
struct RawHeader {
    alg: String,
}

fn check_algorithm(token: &str) -> Result<(), CredentialError> {
    let mut segments = token.split('.');
    let (Some(header), Some(_), Some(_), None) =
        (segments.next(), segments.next(), segments.next(), segments.next())
    else {
        return Err(CredentialError::Malformed);
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(header)
        .map_err(|_| CredentialError::Malformed)?;
    let header: RawHeader = serde_json::from_slice(&bytes).map_err(|_| CredentialError::Malformed)?;

    if header.alg != "HS256" {
        return Err(CredentialError::UnsupportedAlgorithm);
    }
    Ok(())
}

fn map_jwt_error(kind: &ErrorKind) -> CredentialError {
    match kind {
        ErrorKind::InvalidSignature => CredentialError::BadSignature,
        ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
            CredentialError::UnsupportedAlgorithm
        }
        ErrorKind::ExpiredSignature => CredentialError::Expired,
        _ => CredentialError::Malformed,
    }
}
