//! Signed-in user profile.
//!
//! The client only ever reads its own token's claims, so decoding skips
//! signature checks; the backend verifies every request anyway.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{AuthError, Result};
use crate::models::UserProfile;

#[derive(Debug, Deserialize)]
struct Claims {
    #[serde(default)]
    sub: Option<Value>,
    #[serde(default)]
    user_id: Option<Value>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    office: Option<String>,
    #[serde(default)]
    position: Option<String>,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    exp: Option<i64>,
}

pub fn load_from_token(token: &str) -> std::result::Result<UserProfile, AuthError> {
    let token = token.trim();
    if token.split('.').count() != 3 {
        return Err(AuthError::MalformedToken);
    }

    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let claims = jsonwebtoken::decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .map_err(|e| AuthError::InvalidClaims(e.to_string()))?;

    let user_id = claim_id(claims.sub)
        .or_else(|| claim_id(claims.user_id))
        .ok_or(AuthError::MissingSubject)?;

    Ok(UserProfile {
        name: claims.name.unwrap_or_else(|| user_id.clone()),
        user_id,
        office: claims.office,
        position: claims.position,
        role: claims.role,
        expires_at: claims.exp.and_then(|exp| DateTime::from_timestamp(exp, 0)),
    })
}

// Ids show up as strings or bare numbers depending on the backend.
fn claim_id(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(id) if !id.is_empty() => Some(id),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

/// Where the raw token lives between sessions.
pub trait TokenStore {
    fn load(&self) -> Result<Option<String>>;
    fn save(&mut self, token: &str) -> Result<()>;
    fn clear(&mut self) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Option<String>,
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.token.clone())
    }

    fn save(&mut self, token: &str) -> Result<()> {
        self.token = Some(token.to_string());
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.token = None;
        Ok(())
    }
}

#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&mut self, token: &str) -> Result<()> {
        std::fs::write(&self.path, token)?;
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Err(err) if err.kind() != std::io::ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        }
    }
}

/// Application-wide session state, constructed by the host and passed to
/// whatever needs the current user.
#[derive(Debug, Default)]
pub struct AppState {
    profile: Option<UserProfile>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    pub fn sign_in(&mut self, store: &mut dyn TokenStore, token: &str) -> Result<&UserProfile> {
        let profile = load_from_token(token)?;
        store.save(token.trim())?;
        tracing::info!(user = %profile.user_id, "signed in");
        Ok(&*self.profile.insert(profile))
    }

    /// Rebuilds the profile from a stored token. Expired tokens are cleared.
    pub fn restore(&mut self, store: &mut dyn TokenStore, now: DateTime<Utc>) -> Result<&UserProfile> {
        let token = store.load()?.ok_or(AuthError::NoToken)?;
        let profile = load_from_token(&token)?;
        if profile.is_expired(now) {
            tracing::info!(user = %profile.user_id, "stored token expired");
            store.clear()?;
            self.profile = None;
            return Err(AuthError::NoToken.into());
        }
        Ok(&*self.profile.insert(profile))
    }

    pub fn sign_out(&mut self, store: &mut dyn TokenStore) -> Result<()> {
        if let Some(profile) = self.profile.take() {
            tracing::info!(user = %profile.user_id, "signed out");
        }
        store.clear()
    }
}
