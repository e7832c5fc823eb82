use chrono::Utc;
use std::sync::Arc;
use tracing::info;

use crate::api::error::ServiceError;
use crate::api::feedback::models::FeedbackInput;
use crate::db::feedback_repository::FeedbackRepository;
use crate::db::kv::KeyValueStore;
use crate::db::models::{generate_id, FeedbackRecord};

pub struct FeedbackService {
    store: Arc<dyn KeyValueStore>,
}

impl FeedbackService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn submit(&self, input: FeedbackInput) -> Result<FeedbackRecord, ServiceError> {
        let feedback = FeedbackRecord {
            id: generate_id(),
            user_id: input.user_id,
            rating: input.rating,
            message: input.message,
            created_at: Utc::now(),
        };

        FeedbackRepository::insert(self.store.as_ref(), &feedback).await?;

        info!("Feedback stored: id={}, rating={}", feedback.id, feedback.rating);
        Ok(feedback)
    }
}
