use tracing::debug;

use crate::db::keys;
use crate::db::kv::{KeyValueStore, StoreError};
use crate::db::models::UserRecord;

/// Repository for user profiles
pub struct UserRepository;

impl UserRepository {
    pub async fn insert(store: &dyn KeyValueStore, user: &UserRecord) -> Result<(), StoreError> {
        debug!("Storing user profile: id={}", user.id);
        store
            .set(&keys::user(&user.id), serde_json::to_value(user)?)
            .await
    }

    pub async fn find(
        store: &dyn KeyValueStore,
        user_id: &str,
    ) -> Result<Option<UserRecord>, StoreError> {
        match store.get(&keys::user(user_id)).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }
}
