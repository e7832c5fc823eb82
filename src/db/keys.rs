//! Key builders for the flat key-value namespace.
//!
//! Entity records live at `<entityKind>:<id>`; index lists live at
//! `<ownerKind>:<ownerId>:<relation>`.

/// Prefix shared by all job records (and job-scoped index lists)
pub const JOB_PREFIX: &str = "job:";

pub fn user(user_id: &str) -> String {
    format!("user:{}", user_id)
}

pub fn job(job_id: &str) -> String {
    format!("job:{}", job_id)
}

pub fn application(application_id: &str) -> String {
    format!("application:{}", application_id)
}

pub fn feedback(feedback_id: &str) -> String {
    format!("feedback:{}", feedback_id)
}

/// Credential record for an email, stored lowercased
pub fn auth(email: &str) -> String {
    format!("auth:{}", email.to_lowercase())
}

pub fn token(token: &str) -> String {
    format!("token:{}", token)
}

/// Index: every job an employer created
pub fn employer_jobs(employer_id: &str) -> String {
    format!("employer:{}:jobs", employer_id)
}

/// Index: every application a job seeker submitted
pub fn user_applications(user_id: &str) -> String {
    format!("user:{}:applications", user_id)
}

/// Index: every application submitted to a job
pub fn job_applicants(job_id: &str) -> String {
    format!("job:{}:applicants", job_id)
}

/// True when `key` addresses a job record rather than a job-scoped index
pub fn is_job_record(key: &str) -> bool {
    key.strip_prefix(JOB_PREFIX)
        .is_some_and(|rest| !rest.contains(':'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_record_keys_exclude_index_lists() {
        assert!(is_job_record("job:1754-abc1234"));
        assert!(!is_job_record("job:1754-abc1234:applicants"));
        assert!(!is_job_record("user:42"));
    }

    #[test]
    fn auth_keys_are_case_insensitive() {
        assert_eq!(auth("Jane@Example.COM"), "auth:jane@example.com");
    }
}
