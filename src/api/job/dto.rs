use serde::Serialize;

use crate::db::models::JobRecord;

/// Job enriched at read time with employer-derived fields. `company`
/// is resolved on every read, never stored on the job record.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobView {
    #[serde(flatten)]
    pub job: JobRecord,
    pub company: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employer_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employer_phone: Option<String>,
}

/// Response for job creation, edits and deactivation
#[derive(Serialize)]
pub struct JobResponse {
    pub success: bool,
    pub job: JobRecord,
}

/// Response for a single public job lookup
#[derive(Serialize)]
pub struct JobViewResponse {
    pub success: bool,
    pub job: JobView,
}

/// Response for the public job listing
#[derive(Serialize)]
pub struct JobListResponse {
    pub success: bool,
    pub jobs: Vec<JobView>,
}

/// Response for an employer's own jobs (counts recomputed per read)
#[derive(Serialize)]
pub struct EmployerJobsResponse {
    pub success: bool,
    pub jobs: Vec<JobRecord>,
}
