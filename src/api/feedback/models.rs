use serde::Deserialize;
use validator::Validate;

/// Feedback payload; submitting anonymously is allowed
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackInput {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: u8,

    #[validate(length(min = 1, message = "Message is required"))]
    pub message: String,

    pub user_id: Option<String>,
}
