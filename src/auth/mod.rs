//! Authentication Module
//! Mission: Verify credentials with bcrypt and guard the API with signed bearer tokens

pub mod api;
pub mod clock;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod user_store;

pub use api::AuthState;
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::AuthError;
pub use jwt::TokenService;
pub use middleware::{auth_middleware, CurrentUser};
pub use models::CredentialRecord;
pub use password::CredentialVerifier;
pub use user_store::{InMemoryUserStore, UserDirectory};
