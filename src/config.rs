//! Startup configuration, read from flags with environment fallbacks.

use crate::auth::{
    jwt::DEFAULT_TOKEN_TTL_MINUTES,
    password::{MAX_COST, MIN_COST},
};
use anyhow::Result;
use clap::{ArgAction, Parser};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Shortest signing secret accepted for HS256
pub const MIN_SECRET_LEN: usize = 32;

#[derive(Parser, Debug, Clone)]
#[command(name = "nanotox")]
#[command(about = "Nanoparticle toxicity dashboard API")]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "NANOTOX_BIND", default_value = "0.0.0.0:8000")]
    pub bind: SocketAddr,

    /// HMAC secret for signing bearer tokens
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: Option<String>,

    /// Lifetime of issued tokens
    #[arg(long, env = "TOKEN_TTL_MINUTES", default_value_t = DEFAULT_TOKEN_TTL_MINUTES)]
    pub token_ttl_minutes: i64,

    /// bcrypt work factor
    #[arg(
        long,
        env = "BCRYPT_COST",
        default_value_t = bcrypt::DEFAULT_COST,
        value_parser = clap::value_parser!(u32).range(MIN_COST as i64..=MAX_COST as i64)
    )]
    pub bcrypt_cost: u32,

    /// TOML file with `[[users]]` credential records
    #[arg(long, env = "USERS_FILE")]
    pub users_file: Option<PathBuf>,

    /// Seed admin/password123 when no users file is given
    #[arg(long, env = "SEED_ADMIN", default_value_t = true, action = ArgAction::Set)]
    pub seed_admin: bool,
}

impl Config {
    /// The configured signing secret, used byte-for-byte. Missing or short
    /// secrets are fatal, and so is surrounding whitespace.
    pub fn signing_secret(&self) -> Result<&str> {
        let secret = self
            .jwt_secret
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| anyhow::anyhow!("JWT_SECRET is not set; refusing to start"))?;

        if secret.trim() != secret {
            anyhow::bail!("JWT_SECRET has leading or trailing whitespace");
        }

        if secret.len() < MIN_SECRET_LEN {
            anyhow::bail!(
                "JWT_SECRET must be at least {} bytes (got {})",
                MIN_SECRET_LEN,
                secret.len()
            );
        }

        Ok(secret)
    }

    pub fn token_ttl(&self) -> Result<chrono::Duration> {
        if self.token_ttl_minutes <= 0 {
            anyhow::bail!(
                "TOKEN_TTL_MINUTES must be positive (got {})",
                self.token_ttl_minutes
            );
        }
        chrono::Duration::try_minutes(self.token_ttl_minutes)
            .ok_or_else(|| anyhow::anyhow!("TOKEN_TTL_MINUTES is too large"))
    }
}
