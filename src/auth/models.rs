//! Authentication Models
//! Mission: Define credential, claim and login payload structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored credential for one user, owned by the user directory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CredentialRecord {
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // bcrypt hash - never serialize
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub disabled: bool,
}

impl CredentialRecord {
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password_hash: password_hash.into(),
            full_name: None,
            email: None,
            disabled: false,
        }
    }

    pub fn with_profile(mut self, full_name: impl Into<String>, email: impl Into<String>) -> Self {
        self.full_name = Some(full_name.into());
        self.email = Some(email.into());
        self
    }
}

/// JWT Claims payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub sub: String, // username
    pub exp: i64,    // expiration, unix seconds
    pub iat: i64,
}

/// A freshly minted token together with its decoded claims
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: Claims,
}

impl IssuedToken {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.claims.exp, 0)
    }
}

/// `POST /token` form body
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// `POST /token` response
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

/// User response (sanitized)
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub username: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub disabled: bool,
}

impl UserResponse {
    pub fn from_record(record: &CredentialRecord) -> Self {
        Self {
            username: record.username.clone(),
            full_name: record.full_name.clone(),
            email: record.email.clone(),
            disabled: record.disabled,
        }
    }
}
