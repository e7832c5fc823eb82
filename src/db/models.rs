use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Account kind picked at signup
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Jobseeker,
    Employer,
}

/// Job category shown in listings and used as a search filter
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum JobCategory {
    Domestic,
    Retail,
    Farm,
    Catering,
    Trade,
}

impl JobCategory {
    /// Wire name, as used by the listing's category filter
    pub fn as_str(self) -> &'static str {
        match self {
            JobCategory::Domestic => "Domestic",
            JobCategory::Retail => "Retail",
            JobCategory::Farm => "Farm",
            JobCategory::Catering => "Catering",
            JobCategory::Trade => "Trade",
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SalaryPeriod {
    Weekly,
    Monthly,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Active,
    Inactive,
}

/// Application workflow state.
///
/// `Pending` is the sole initial state. Transitions are forward-only:
/// once an application is accepted or rejected it is frozen.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Reviewed,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    /// Whether moving from `self` to `next` is an allowed workflow step
    pub fn can_transition_to(self, next: ApplicationStatus) -> bool {
        use ApplicationStatus::*;
        match (self, next) {
            (Pending, Reviewed) | (Pending, Accepted) | (Pending, Rejected) => true,
            (Reviewed, Accepted) | (Reviewed, Rejected) => true,
            _ => false,
        }
    }

    /// Terminal states freeze both status and content edits
    pub fn is_terminal(self) -> bool {
        matches!(self, ApplicationStatus::Accepted | ApplicationStatus::Rejected)
    }
}

/// User profile, keyed by `user:{id}`. Immutable after signup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    pub name: String,
    pub user_type: UserType,
    pub phone: String,
    pub location: String,
    pub business_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Job posting, keyed by `job:{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    pub id: String,
    pub employer_id: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub salary: f64,
    pub salary_period: SalaryPeriod,
    pub category: JobCategory,
    #[serde(rename = "type")]
    pub job_type: String,
    pub posted_time: DateTime<Utc>,
    pub status: JobStatus,
    /// Cached length of the `job:{id}:applicants` index. Persisted on
    /// every submission and recomputed from the index at read time on
    /// the employer listing, so the index stays authoritative.
    pub applicant_count: usize,
    #[serde(default)]
    pub requirements: Vec<String>,
}

/// Submitted application, keyed by `application:{id}`.
///
/// `job_title` and `company` are snapshots taken at submission time, not
/// live references: later edits to the job do not touch them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRecord {
    pub id: String,
    pub job_id: String,
    pub user_id: String,
    pub job_title: String,
    pub company: String,
    pub motivation: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub applied_date: DateTime<Utc>,
    pub status: ApplicationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Feedback entry, keyed by `feedback:{id}`. May be anonymous.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRecord {
    pub id: String,
    pub user_id: Option<String>,
    pub rating: u8,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Login credentials, keyed by `auth:{email}`. Never leaves the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRecord {
    pub user_id: String,
    pub password_hash: String,
    pub salt: String,
}

/// Issued bearer token, keyed by `token:{token}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRecord {
    pub user_id: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Generate a fresh entity id: unix-millis plus a short random suffix
pub fn generate_id() -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut rng = rand::thread_rng();
    let suffix: String = (0..7)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();
    format!("{}-{}", Utc::now().timestamp_millis(), suffix)
}
