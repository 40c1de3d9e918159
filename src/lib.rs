//! Nanotox Backend Library
//!
//! Dashboard API with bcrypt credential checks and signed bearer tokens.
//! Exposes core modules for use by the server binary and tests.

pub mod api;
pub mod auth;
pub mod config;
pub mod middleware;
pub mod models;

pub use api::build_router;
pub use config::Config;
