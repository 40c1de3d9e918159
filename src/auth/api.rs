//! Authentication API Endpoints
//! Mission: Provide the token login endpoint and current-user lookup

use crate::auth::{
    error::AuthError,
    jwt::TokenService,
    middleware::CurrentUser,
    models::{LoginForm, TokenResponse, UserResponse},
    password::CredentialVerifier,
    user_store::{InMemoryUserStore, UserDirectory},
};
use crate::config::Config;
use anyhow::{Context, Result};
use axum::{extract::State, Extension, Form, Json};
use std::sync::Arc;
use tracing::{info, warn};

/// Shared auth state
#[derive(Clone)]
pub struct AuthState {
    pub users: Arc<dyn UserDirectory>,
    pub verifier: Arc<CredentialVerifier>,
    pub tokens: Arc<TokenService>,
}

impl AuthState {
    pub fn new(
        users: Arc<dyn UserDirectory>,
        verifier: Arc<CredentialVerifier>,
        tokens: Arc<TokenService>,
    ) -> Self {
        Self {
            users,
            verifier,
            tokens,
        }
    }

    /// Wire verifier, directory and token service from startup configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let secret = config.signing_secret()?;
        let verifier =
            CredentialVerifier::new(config.bcrypt_cost).context("Invalid bcrypt cost")?;

        let store = match &config.users_file {
            Some(path) => InMemoryUserStore::load(path)?,
            None if config.seed_admin => InMemoryUserStore::with_default_admin(&verifier)?,
            None => {
                warn!("⚠️  No users file and admin seeding disabled - nobody can log in");
                InMemoryUserStore::new()
            }
        };

        // Unknown-user logins should cost what most real records cost
        let verifier = match store.dominant_cost() {
            Some(cost) => verifier.with_dummy_cost(cost)?,
            None => verifier,
        };
        let verifier = Arc::new(verifier);
        let users: Arc<dyn UserDirectory> = Arc::new(store);

        let tokens = Arc::new(
            TokenService::new(secret.as_bytes(), users.clone()).with_default_ttl(config.token_ttl()?),
        );

        info!(
            bcrypt_cost = verifier.cost(),
            dummy_cost = ?verifier.dummy_cost(),
            token_ttl_minutes = config.token_ttl_minutes,
            "🔐 Authentication initialized"
        );

        Ok(Self::new(users, verifier, tokens))
    }
}

/// Login endpoint - POST /token
pub async fn login(
    State(state): State<AuthState>,
    Form(form): Form<LoginForm>,
) -> Result<Json<TokenResponse>, AuthError> {
    info!("🔐 Login attempt: {}", form.username);

    let record = state.users.find(&form.username);
    let verifier = state.verifier.clone();
    let password = form.password;

    // bcrypt is deliberately slow; keep it off the async workers
    let user = tokio::task::spawn_blocking(move || {
        verifier
            .authenticate(&password, record.as_ref())
            .then_some(record)
            .flatten()
    })
    .await
    .map_err(|e| AuthError::Internal(format!("Password verification task failed: {e}")))?;

    let Some(user) = user else {
        warn!("❌ Failed login attempt: {}", form.username);
        return Err(AuthError::CredentialMismatch);
    };

    let issued = state.tokens.issue(&user.username, None)?;

    info!(
        expires_at = issued.claims.exp,
        "✅ Login successful: {}", user.username
    );

    Ok(Json(TokenResponse::bearer(issued.token)))
}

/// Get current user info - GET /users/me
pub async fn read_current_user(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Json<UserResponse> {
    Json(UserResponse::from_record(&user))
}
