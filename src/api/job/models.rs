use serde::Deserialize;
use validator::Validate;

use crate::db::models::{JobCategory, SalaryPeriod};

/// Job posting payload. Category and salary period are typed enums, so
/// unknown values are rejected at deserialization.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobInput {
    #[validate(length(min = 3, message = "Title must be at least 3 characters"))]
    pub title: String,

    #[validate(length(min = 20, message = "Description must be at least 20 characters"))]
    pub description: String,

    #[validate(length(min = 2, message = "Please enter a valid location"))]
    pub location: String,

    #[validate(range(exclusive_min = 0.0, message = "Salary must be greater than zero"))]
    pub salary: f64,

    pub category: JobCategory,

    #[serde(rename = "type")]
    pub job_type: Option<String>,

    pub salary_period: Option<SalaryPeriod>,

    pub requirements: Option<Vec<String>>,
}

/// Partial job edit. Absent fields are left untouched; `id`,
/// `employerId`, `postedTime`, `status` and `applicantCount` are never
/// editable through this payload.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJobInput {
    #[validate(length(min = 3, message = "Title must be at least 3 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 20, message = "Description must be at least 20 characters"))]
    pub description: Option<String>,

    #[validate(length(min = 2, message = "Please enter a valid location"))]
    pub location: Option<String>,

    #[validate(range(exclusive_min = 0.0, message = "Salary must be greater than zero"))]
    pub salary: Option<f64>,

    pub category: Option<JobCategory>,

    #[serde(rename = "type")]
    pub job_type: Option<String>,

    pub salary_period: Option<SalaryPeriod>,
}

/// Query string for the public job listing
#[derive(Debug, Deserialize)]
pub struct JobListQuery {
    pub search: Option<String>,
    pub category: Option<String>,
}
