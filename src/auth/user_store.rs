//! User Directory
//! Mission: Resolve usernames to credential records for login and token validation

use crate::auth::{
    models::CredentialRecord,
    password::{hash_cost, CredentialVerifier},
};
use anyhow::{Context, Result};
use parking_lot::RwLock;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
pub const DEFAULT_ADMIN_PASSWORD: &str = "password123";

/// Lookup capability the auth core needs from whatever owns the users
pub trait UserDirectory: Send + Sync {
    fn find(&self, username: &str) -> Option<CredentialRecord>;
}

/// In-memory user directory, populated at startup
#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, CredentialRecord>>,
}

#[derive(Debug, Deserialize)]
struct UsersFile {
    #[serde(default)]
    users: Vec<CredentialRecord>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from records, rejecting duplicate usernames
    pub fn from_records(records: impl IntoIterator<Item = CredentialRecord>) -> Result<Self> {
        let store = Self::new();
        for record in records {
            if record.username.trim().is_empty() {
                anyhow::bail!("User record with empty username");
            }
            if !record.password_hash.starts_with("$2") {
                warn!(
                    username = %record.username,
                    "Password hash is not bcrypt; this user will never log in"
                );
            }
            let username = record.username.clone();
            if store.insert(record).is_some() {
                anyhow::bail!("Duplicate username in user records: {}", username);
            }
        }
        Ok(store)
    }

    /// Parse a TOML users file made of `[[users]]` tables
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let file: UsersFile = toml::from_str(contents).context("Invalid users file")?;
        Self::from_records(file.users)
    }

    /// Load the users file at `path`
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read users file {}", path.display()))?;
        let store = Self::from_toml_str(&contents)?;
        info!("🔐 Loaded {} user(s) from {}", store.len(), path.display());
        Ok(store)
    }

    /// Store holding only the default admin user
    pub fn with_default_admin(verifier: &CredentialVerifier) -> Result<Self> {
        let password_hash = verifier
            .hash_password(DEFAULT_ADMIN_PASSWORD)
            .context("Failed to hash default admin password")?;
        let admin = CredentialRecord::new(DEFAULT_ADMIN_USERNAME, password_hash)
            .with_profile("Admin User", "admin@example.com");

        let store = Self::new();
        store.insert(admin);

        info!(
            "🔐 Default admin user created (username: {}, password: {})",
            DEFAULT_ADMIN_USERNAME, DEFAULT_ADMIN_PASSWORD
        );
        warn!("⚠️  CHANGE DEFAULT PASSWORD IN PRODUCTION!");

        Ok(store)
    }

    /// Insert or replace a record, returning the previous one
    pub fn insert(&self, record: CredentialRecord) -> Option<CredentialRecord> {
        self.users.write().insert(record.username.clone(), record)
    }

    /// Flip the disabled flag. Returns false if the user does not exist.
    pub fn set_disabled(&self, username: &str, disabled: bool) -> bool {
        match self.users.write().get_mut(username) {
            Some(record) => {
                record.disabled = disabled;
                true
            }
            None => false,
        }
    }

    /// Most common bcrypt cost among stored hashes, preferring the higher on ties
    pub fn dominant_cost(&self) -> Option<u32> {
        let mut counts: HashMap<u32, usize> = HashMap::new();
        for record in self.users.read().values() {
            if let Some(cost) = hash_cost(&record.password_hash) {
                *counts.entry(cost).or_default() += 1;
            }
        }
        counts
            .into_iter()
            .max_by_key(|&(cost, count)| (count, cost))
            .map(|(cost, _)| cost)
    }

    pub fn len(&self) -> usize {
        self.users.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.read().is_empty()
    }
}

impl UserDirectory for InMemoryUserStore {
    fn find(&self, username: &str) -> Option<CredentialRecord> {
        self.users.read().get(username).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::MIN_COST;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_admin_created() {
        let verifier = CredentialVerifier::new(MIN_COST).unwrap();
        let store = InMemoryUserStore::with_default_admin(&verifier).unwrap();

        let admin = store.find("admin").unwrap();
        assert_eq!(admin.username, "admin");
        assert_eq!(admin.email.as_deref(), Some("admin@example.com"));
        assert!(!admin.disabled);
        assert!(verifier.verify("password123", &admin));
    }

    #[test]
    fn test_find_unknown_user() {
        let store = InMemoryUserStore::new();
        assert!(store.is_empty());
        assert!(store.find("nobody").is_none());
    }

    #[test]
    fn test_set_disabled() {
        let store = InMemoryUserStore::new();
        store.insert(CredentialRecord::new("alice", "$2b$04$x"));

        assert!(store.set_disabled("alice", true));
        assert!(store.find("alice").unwrap().disabled);
        assert!(store.set_disabled("alice", false));
        assert!(!store.find("alice").unwrap().disabled);
        assert!(!store.set_disabled("bob", true));
    }

    #[test]
    fn test_duplicate_usernames_rejected() {
        let result = InMemoryUserStore::from_records([
            CredentialRecord::new("alice", "$2b$04$a"),
            CredentialRecord::new("alice", "$2b$04$b"),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_username_rejected() {
        let result = InMemoryUserStore::from_records([CredentialRecord::new("  ", "$2b$04$a")]);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_users_file() {
        let verifier = CredentialVerifier::new(MIN_COST).unwrap();
        let alice_hash = verifier.hash_password("wonderland").unwrap();

        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[[users]]
username = "alice"
password_hash = "{alice_hash}"
full_name = "Alice Johnson"
email = "alice.j@university.edu"

[[users]]
username = "mallory"
password_hash = "{alice_hash}"
disabled = true
"#
        )
        .unwrap();

        let store = InMemoryUserStore::load(file.path()).unwrap();
        assert_eq!(store.len(), 2);

        let alice = store.find("alice").unwrap();
        assert_eq!(alice.full_name.as_deref(), Some("Alice Johnson"));
        assert!(verifier.verify("wonderland", &alice));

        let mallory = store.find("mallory").unwrap();
        assert!(mallory.disabled);
        assert!(!verifier.verify("wonderland", &mallory));
    }

    #[test]
    fn test_dominant_cost() {
        let store = InMemoryUserStore::new();
        assert_eq!(store.dominant_cost(), None);

        store.insert(CredentialRecord::new("a", "$2b$10$x"));
        store.insert(CredentialRecord::new("b", "$2b$10$y"));
        store.insert(CredentialRecord::new("c", "$2b$12$z"));
        store.insert(CredentialRecord::new("d", "not-bcrypt"));
        assert_eq!(store.dominant_cost(), Some(10));

        store.insert(CredentialRecord::new("e", "$2b$12$w"));
        assert_eq!(store.dominant_cost(), Some(12));
    }

    #[test]
    fn test_missing_users_file_is_error() {
        let result = InMemoryUserStore::load(Path::new("/nonexistent/users.toml"));
        assert!(result.is_err());
    }
}
