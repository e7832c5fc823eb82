use tracing::debug;

use crate::db::keys;
use crate::db::kv::{KeyValueStore, StoreError};
use crate::db::models::FeedbackRecord;

/// Repository for feedback entries
pub struct FeedbackRepository;

impl FeedbackRepository {
    pub async fn insert(
        store: &dyn KeyValueStore,
        feedback: &FeedbackRecord,
    ) -> Result<(), StoreError> {
        debug!("Storing feedback: id={}", feedback.id);
        store
            .set(&keys::feedback(&feedback.id), serde_json::to_value(feedback)?)
            .await
    }
}
