use chrono::{Duration, Utc};
use rand::Rng;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::api::auth::models::SignupInput;
use crate::api::error::ServiceError;
use crate::db::keys;
use crate::db::kv::{KeyValueStore, StoreError};
use crate::db::models::{CredentialRecord, TokenRecord, UserRecord};
use crate::db::user_repository::UserRepository;

const INVALID_CREDENTIALS: &str = "Invalid email or password";
const INVALID_TOKEN: &str = "Invalid or expired token";

/// Resolves bearer tokens to verified identities and owns the
/// credential records behind signup/signin.
///
/// Tokens are opaque UUIDs stored server-side at `token:{uuid}` and
/// checked for expiry on every call; there is nothing to decode
/// client-side.
pub struct IdentityVerifier {
    store: Arc<dyn KeyValueStore>,
    token_ttl: Duration,
}

impl IdentityVerifier {
    pub fn new(store: Arc<dyn KeyValueStore>, token_ttl_hours: i64) -> Self {
        Self {
            store,
            token_ttl: Duration::hours(token_ttl_hours),
        }
    }

    /// Create an account and sign it in.
    ///
    /// # Returns
    /// - `Ok((user, token))` - profile stored, bearer token issued
    /// - `Err(ServiceError::Validation)` - email already registered
    pub async fn signup(&self, input: SignupInput) -> Result<(UserRecord, String), ServiceError> {
        let auth_key = keys::auth(&input.email);

        if self.store.get(&auth_key).await?.is_some() {
            warn!("Signup rejected: email already registered");
            return Err(ServiceError::Validation(
                "An account with this email already exists".to_string(),
            ));
        }

        let user = UserRecord {
            id: Uuid::new_v4().to_string(),
            email: input.email,
            name: input.name,
            user_type: input.user_type,
            phone: input.phone,
            location: input.location,
            business_name: input.business_name,
            created_at: Utc::now(),
        };

        let salt = generate_salt();
        let credential = CredentialRecord {
            user_id: user.id.clone(),
            password_hash: hash_password(&input.password, &salt),
            salt,
        };

        UserRepository::insert(self.store.as_ref(), &user).await?;
        self.store
            .set(&auth_key, serde_json::to_value(&credential).map_err(StoreError::from)?)
            .await?;

        let token = self.issue_token(&user.id).await?;
        info!("User signed up: id={}", user.id);

        Ok((user, token))
    }

    /// Check credentials and issue a fresh bearer token
    pub async fn signin(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(UserRecord, String), ServiceError> {
        let credential = match self.store.get(&keys::auth(email)).await? {
            Some(value) => serde_json::from_value::<CredentialRecord>(value)
                .map_err(StoreError::from)?,
            None => {
                warn!("Signin rejected: unknown email");
                return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS));
            }
        };

        if hash_password(password, &credential.salt) != credential.password_hash {
            warn!("Signin rejected: wrong password for user_id={}", credential.user_id);
            return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS));
        }

        let user = UserRepository::find(self.store.as_ref(), &credential.user_id)
            .await?
            .ok_or(ServiceError::Unauthorized(INVALID_CREDENTIALS))?;

        let token = self.issue_token(&user.id).await?;
        info!("User signed in: id={}", user.id);

        Ok((user, token))
    }

    /// Resolve a bearer token to its user, rejecting unknown and
    /// expired tokens alike with an authentication failure.
    pub async fn verify(&self, token: &str) -> Result<UserRecord, ServiceError> {
        let record = match self.store.get(&keys::token(token)).await? {
            Some(value) => serde_json::from_value::<TokenRecord>(value)
                .map_err(StoreError::from)?,
            None => return Err(ServiceError::Unauthorized(INVALID_TOKEN)),
        };

        if record.expires_at <= Utc::now() {
            warn!("Rejected expired token for user_id={}", record.user_id);
            return Err(ServiceError::Unauthorized(INVALID_TOKEN));
        }

        UserRepository::find(self.store.as_ref(), &record.user_id)
            .await?
            .ok_or(ServiceError::Unauthorized(INVALID_TOKEN))
    }

    async fn issue_token(&self, user_id: &str) -> Result<String, ServiceError> {
        let token = Uuid::new_v4().to_string();
        let now = Utc::now();
        let record = TokenRecord {
            user_id: user_id.to_string(),
            issued_at: now,
            expires_at: now + self.token_ttl,
        };

        self.store
            .set(
                &keys::token(&token),
                serde_json::to_value(&record).map_err(StoreError::from)?,
            )
            .await?;

        Ok(token)
    }
}

fn hash_password(password: &str, salt: &str) -> String {
    let digest = Sha256::digest(format!("{}{}", salt, password).as_bytes());
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

fn generate_salt() -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
    let mut rng = rand::thread_rng();
    (0..16)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}
