use serde::Deserialize;
use validator::Validate;

use crate::db::models::ApplicationStatus;

/// Application submission payload. The applicant identity comes from
/// the bearer token, never from the body.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitApplicationInput {
    #[validate(length(min = 1, message = "Job id is required"))]
    pub job_id: String,

    #[validate(length(min = 20, message = "Motivation must be at least 20 characters"))]
    pub motivation: String,

    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: String,

    #[validate(email(message = "A valid email address is required"))]
    pub email: String,

    #[validate(length(min = 8, message = "Please enter a valid phone number"))]
    pub phone: String,
}

/// Applicant-side edit: only the motivation text is editable after
/// submission, and only until the application is finalized.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateApplicationInput {
    #[validate(length(min = 20, message = "Motivation must be at least 20 characters"))]
    pub motivation: Option<String>,
}

/// Employer-side status change; the value is a typed workflow state
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateStatusInput {
    pub status: ApplicationStatus,
}
