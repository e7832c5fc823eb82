use serde::Serialize;

use crate::db::models::ApplicationRecord;

/// Response for submission, edits and status changes
#[derive(Serialize)]
pub struct ApplicationResponse {
    pub success: bool,
    pub application: ApplicationRecord,
}

/// Response for a seeker's own applications
#[derive(Serialize)]
pub struct ApplicationsResponse {
    pub success: bool,
    pub applications: Vec<ApplicationRecord>,
}

/// Response for an employer reviewing a job's applicants
#[derive(Serialize)]
pub struct ApplicantsResponse {
    pub success: bool,
    pub applicants: Vec<ApplicationRecord>,
}
