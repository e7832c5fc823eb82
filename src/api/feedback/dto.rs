use serde::Serialize;

use crate::db::models::FeedbackRecord;

#[derive(Serialize)]
pub struct FeedbackResponse {
    pub success: bool,
    pub feedback: FeedbackRecord,
}
