// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session credential holders.
//!
//! The token pair is opaque to the client apart from the access token's
//! `exp` claim, which is read (without signature verification) so that an
//! expired session is detected before calling the service.

use crate::error::AppError;
use crate::models::TokenPair;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Get/set/clear access to the current token pair.
pub trait CredentialStore: Send + Sync {
    fn get(&self) -> Result<Option<TokenPair>, AppError>;
    fn set(&self, tokens: &TokenPair) -> Result<(), AppError>;
    fn clear(&self) -> Result<(), AppError>;
}

/// Process-local holder, used by tests and short-lived sessions.
#[derive(Default)]
pub struct MemoryCredentialStore {
    tokens: Mutex<Option<TokenPair>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(tokens: TokenPair) -> Self {
        Self {
            tokens: Mutex::new(Some(tokens)),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self) -> Result<Option<TokenPair>, AppError> {
        let guard = self
            .tokens
            .lock()
            .map_err(|_| AppError::Storage("credential lock poisoned".to_string()))?;
        Ok(guard.clone())
    }

    fn set(&self, tokens: &TokenPair) -> Result<(), AppError> {
        let mut guard = self
            .tokens
            .lock()
            .map_err(|_| AppError::Storage("credential lock poisoned".to_string()))?;
        *guard = Some(tokens.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), AppError> {
        let mut guard = self
            .tokens
            .lock()
            .map_err(|_| AppError::Storage("credential lock poisoned".to_string()))?;
        *guard = None;
        Ok(())
    }
}

/// Token pair persisted as a JSON file, for use across CLI invocations.
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self) -> Result<Option<TokenPair>, AppError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(AppError::Storage(e.to_string())),
        };

        match serde_json::from_str(&contents) {
            Ok(tokens) => Ok(Some(tokens)),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Ignoring unreadable credentials file");
                Ok(None)
            }
        }
    }

    fn set(&self, tokens: &TokenPair) -> Result<(), AppError> {
        let json = serde_json::to_string_pretty(tokens)
            .map_err(|e| AppError::Storage(e.to_string()))?;
        fs::write(&self.path, json).map_err(|e| AppError::Storage(e.to_string()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))
                .map_err(|e| AppError::Storage(e.to_string()))?;
        }

        Ok(())
    }

    fn clear(&self) -> Result<(), AppError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Storage(e.to_string())),
        }
    }
}

/// Claims the service puts in its tokens.
#[derive(Debug, Deserialize)]
pub struct Claims {
    pub sub: Option<String>,
    /// Expiration time (Unix timestamp)
    pub exp: Option<i64>,
    #[serde(rename = "type")]
    pub token_type: Option<String>,
}

/// Read a token's claims without verifying its signature.
///
/// Returns `None` for tokens that are not JWTs.
pub fn peek_claims(token: &str) -> Option<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
        .ok()
        .map(|data| data.claims)
}

/// Whether `token` is a JWT whose `exp` is at or before `now` (Unix seconds).
pub fn is_expired(token: &str, now: i64) -> bool {
    peek_claims(token)
        .and_then(|c| c.exp)
        .is_some_and(|exp| exp <= now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde::Serialize;

    #[derive(Serialize)]
    struct TestClaims {
        sub: String,
        exp: i64,
        #[serde(rename = "type")]
        token_type: String,
    }

    fn token(exp: i64) -> String {
        let claims = TestClaims {
            sub: "user-1".to_string(),
            exp,
            token_type: "access".to_string(),
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"server-side-secret"),
        )
        .unwrap()
    }

    fn pair(access: &str) -> TokenPair {
        TokenPair {
            access_token: access.to_string(),
            refresh_token: "refresh".to_string(),
            token_type: "bearer".to_string(),
        }
    }

    #[test]
    fn test_peek_claims_ignores_signature() {
        let claims = peek_claims(&token(2_000_000_000)).expect("claims should decode");
        assert_eq!(claims.sub.as_deref(), Some("user-1"));
        assert_eq!(claims.token_type.as_deref(), Some("access"));
    }

    #[test]
    fn test_is_expired() {
        let now = 1_700_000_000;
        assert!(is_expired(&token(now - 1), now));
        assert!(is_expired(&token(now), now));
        assert!(!is_expired(&token(now + 900), now));
        // Opaque tokens are left to the service
        assert!(!is_expired("opaque-token", now));
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryCredentialStore::new();
        assert_eq!(store.get().unwrap(), None);

        store.set(&pair("a")).unwrap();
        assert_eq!(store.get().unwrap(), Some(pair("a")));

        store.clear().unwrap();
        assert_eq!(store.get().unwrap(), None);
    }

    #[test]
    fn test_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("creds.json"));

        assert_eq!(store.get().unwrap(), None);
        store.set(&pair("a")).unwrap();
        assert_eq!(store.get().unwrap(), Some(pair("a")));

        // Survives a new handle on the same file
        let reopened = FileCredentialStore::new(store.path());
        assert_eq!(reopened.get().unwrap(), Some(pair("a")));

        store.clear().unwrap();
        store.clear().unwrap();
        assert_eq!(reopened.get().unwrap(), None);
    }

    #[test]
    fn test_file_store_ignores_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("creds.json");
        fs::write(&path, "not json").unwrap();

        assert_eq!(FileCredentialStore::new(path).get().unwrap(), None);
    }
}
