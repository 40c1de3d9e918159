//! JWT Token Service
//! Mission: Issue signed, time-limited bearer tokens and resolve them back to users

use crate::auth::{
    clock::{Clock, SystemClock},
    error::AuthError,
    models::{Claims, CredentialRecord, IssuedToken},
    user_store::UserDirectory,
};
use chrono::Duration;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use std::sync::Arc;
use tracing::debug;

pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 30;

/// Issues and validates HS256 tokens under a single process-wide secret
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    default_ttl: Duration,
    users: Arc<dyn UserDirectory>,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    /// Create a token service signing with `secret` and resolving subjects in `users`
    pub fn new(secret: &[u8], users: Arc<dyn UserDirectory>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against our own clock after the signature.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            default_ttl: Duration::minutes(DEFAULT_TOKEN_TTL_MINUTES),
            users,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Mint a token for `username`, valid for `ttl` (or the default).
    ///
    /// The caller is responsible for having authenticated the user; the
    /// directory is consulted again on every validation.
    pub fn issue(&self, username: &str, ttl: Option<Duration>) -> Result<IssuedToken, AuthError> {
        let ttl = ttl.unwrap_or(self.default_ttl);
        if ttl < Duration::seconds(1) {
            return Err(AuthError::InvalidTtl);
        }

        let now = self.clock.now();
        let expiration = now.checked_add_signed(ttl).ok_or(AuthError::InvalidTtl)?;

        let claims = Claims {
            sub: username.to_string(),
            exp: expiration.timestamp(),
            iat: now.timestamp(),
        };

        debug!(
            "Generating JWT for user {}, expires in {}s",
            username,
            ttl.num_seconds()
        );

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("Failed to generate JWT: {e}")))?;

        Ok(IssuedToken { token, claims })
    }

    /// Parse, check the signature and check expiry. Does not touch the directory.
    pub fn decode_claims(&self, token: &str) -> Result<Claims, AuthError> {
        let decoded = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| classify(e.kind()))?;
        let claims = decoded.claims;

        if claims.exp <= self.clock.now().timestamp() {
            return Err(AuthError::TokenExpired);
        }

        Ok(claims)
    }

    /// Full validation: claims, then the subject must be a known, enabled user.
    pub fn validate(&self, token: &str) -> Result<CredentialRecord, AuthError> {
        let claims = self.decode_claims(token)?;

        let user = self
            .users
            .find(&claims.sub)
            .filter(|record| !record.disabled)
            .ok_or(AuthError::UnknownOrDisabledUser)?;

        debug!("Validated JWT for user {}", user.username);

        Ok(user)
    }
}

fn classify(kind: &ErrorKind) -> AuthError {
    match kind {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => AuthError::InvalidSignature,
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::MalformedToken,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{clock::ManualClock, user_store::InMemoryUserStore};
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
    use chrono::Utc;

    const SECRET: &[u8] = b"test-secret-key-12345-test-secret-key";

    fn store_with(usernames: &[&str]) -> Arc<InMemoryUserStore> {
        let store = InMemoryUserStore::new();
        for username in usernames {
            store.insert(CredentialRecord::new(*username, "$2b$04$unused"));
        }
        Arc::new(store)
    }

    fn service(store: Arc<InMemoryUserStore>, clock: Arc<ManualClock>) -> TokenService {
        TokenService::new(SECRET, store).with_clock(clock)
    }

    fn flip_signature_bit(token: &str) -> String {
        let (message, signature) = token.rsplit_once('.').unwrap();
        let mut raw = URL_SAFE_NO_PAD.decode(signature).unwrap();
        raw[0] ^= 0x01;
        format!("{}.{}", message, URL_SAFE_NO_PAD.encode(raw))
    }

    #[test]
    fn test_issue_then_validate_round_trip() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let tokens = service(store_with(&["admin", "alice"]), clock);

        for username in ["admin", "alice"] {
            let issued = tokens.issue(username, None).unwrap();
            assert_eq!(issued.token.split('.').count(), 3);

            let user = tokens.validate(&issued.token).unwrap();
            assert_eq!(user.username, username);
        }
    }

    #[test]
    fn test_default_ttl_is_thirty_minutes() {
        let start = Utc::now();
        let clock = Arc::new(ManualClock::new(start));
        let tokens = service(store_with(&["admin"]), clock);

        let issued = tokens.issue("admin", None).unwrap();
        assert_eq!(issued.claims.iat, start.timestamp());
        assert_eq!(issued.claims.exp, (start + Duration::minutes(30)).timestamp());
        assert_eq!(tokens.default_ttl(), Duration::minutes(30));
    }

    #[test]
    fn test_expired_after_ttl() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let tokens = service(store_with(&["admin"]), clock.clone());

        let issued = tokens.issue("admin", Some(Duration::minutes(5))).unwrap();
        assert!(tokens.validate(&issued.token).is_ok());

        clock.advance(Duration::minutes(5) + Duration::seconds(1));
        assert!(matches!(
            tokens.validate(&issued.token),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn test_expired_exactly_at_expiry() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let tokens = service(store_with(&["admin"]), clock.clone());

        let issued = tokens.issue("admin", Some(Duration::seconds(10))).unwrap();
        clock.set(issued.expires_at().unwrap());

        assert!(matches!(
            tokens.validate(&issued.token),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn test_one_second_ttl_valid_immediately() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let tokens = service(store_with(&["admin"]), clock);

        let issued = tokens.issue("admin", Some(Duration::seconds(1))).unwrap();
        assert!(tokens.validate(&issued.token).is_ok());
    }

    #[test]
    fn test_sub_second_ttl_rejected() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let tokens = service(store_with(&["admin"]), clock);

        for ttl in [Duration::zero(), Duration::milliseconds(999), Duration::seconds(-5)] {
            assert!(matches!(
                tokens.issue("admin", Some(ttl)),
                Err(AuthError::InvalidTtl)
            ));
        }
    }

    #[test]
    fn test_flipped_signature_bit_rejected() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let tokens = service(store_with(&["admin"]), clock);

        let issued = tokens.issue("admin", None).unwrap();
        let tampered = flip_signature_bit(&issued.token);
        assert_ne!(tampered, issued.token);

        assert!(matches!(
            tokens.validate(&tampered),
            Err(AuthError::InvalidSignature)
        ));
    }

    #[test]
    fn test_tampered_claims_rejected() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let tokens = service(store_with(&["admin", "alice"]), clock);

        let issued = tokens.issue("alice", None).unwrap();
        let parts: Vec<&str> = issued.token.split('.').collect();
        let forged_claims = URL_SAFE_NO_PAD.encode(
            serde_json::to_vec(&Claims {
                sub: "admin".to_string(),
                ..issued.claims.clone()
            })
            .unwrap(),
        );
        let forged = format!("{}.{}.{}", parts[0], forged_claims, parts[2]);

        assert!(matches!(
            tokens.validate(&forged),
            Err(AuthError::InvalidSignature)
        ));
    }

    #[test]
    fn test_different_secrets_reject() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let store = store_with(&["admin"]);
        let issuer = TokenService::new(b"secret-one-secret-one-secret-one!", store.clone())
            .with_clock(clock.clone());
        let verifier =
            TokenService::new(b"secret-two-secret-two-secret-two!", store).with_clock(clock);

        let issued = issuer.issue("admin", None).unwrap();
        assert!(matches!(
            verifier.validate(&issued.token),
            Err(AuthError::InvalidSignature)
        ));
    }

    #[test]
    fn test_malformed_tokens_rejected() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let tokens = service(store_with(&["admin"]), clock);

        for garbage in ["", "not-a-token", "a.b", "invalid.token.here", "...."] {
            assert!(
                matches!(tokens.validate(garbage), Err(AuthError::MalformedToken)),
                "{garbage:?} should be malformed"
            );
        }
    }

    #[test]
    fn test_disabled_after_issue_rejected() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let store = store_with(&["admin"]);
        let tokens = service(store.clone(), clock);

        let issued = tokens.issue("admin", None).unwrap();
        assert!(tokens.validate(&issued.token).is_ok());

        store.set_disabled("admin", true);
        assert!(matches!(
            tokens.validate(&issued.token),
            Err(AuthError::UnknownOrDisabledUser)
        ));
    }

    #[test]
    fn test_unknown_subject_rejected() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let tokens = service(store_with(&["admin"]), clock);

        let issued = tokens.issue("ghost", None).unwrap();
        assert_eq!(tokens.decode_claims(&issued.token).unwrap().sub, "ghost");
        assert!(matches!(
            tokens.validate(&issued.token),
            Err(AuthError::UnknownOrDisabledUser)
        ));
    }

    #[test]
    fn test_same_instant_tokens_equivalent() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let tokens = service(store_with(&["admin"]), clock);

        let a = tokens.issue("admin", None).unwrap();
        let b = tokens.issue("admin", None).unwrap();
        assert_eq!(a.claims, b.claims);
        assert_eq!(
            tokens.decode_claims(&a.token).unwrap(),
            tokens.decode_claims(&b.token).unwrap()
        );
    }
}
