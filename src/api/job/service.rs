use chrono::Utc;
use std::sync::Arc;
use tracing::info;

use crate::api::error::ServiceError;
use crate::api::job::dto::JobView;
use crate::api::job::models::{CreateJobInput, UpdateJobInput};
use crate::db::application_repository::ApplicationRepository;
use crate::db::job_repository::JobRepository;
use crate::db::kv::KeyValueStore;
use crate::db::models::{generate_id, JobRecord, JobStatus, SalaryPeriod, UserRecord};
use crate::db::user_repository::UserRepository;

/// Category filter value meaning "no filter"
const ALL_CATEGORIES: &str = "All";

/// Display name for an employer, preferring the business name.
/// Blank fields count as absent, matching how the listing renders.
pub(crate) fn company_name(employer: Option<&UserRecord>) -> String {
    employer
        .and_then(|e| {
            e.business_name
                .clone()
                .filter(|b| !b.is_empty())
                .or_else(|| Some(e.name.clone()).filter(|n| !n.is_empty()))
        })
        .unwrap_or_else(|| "Anonymous Employer".to_string())
}

/// Job service containing business logic and the employer ownership checks
pub struct JobService {
    store: Arc<dyn KeyValueStore>,
}

impl JobService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Create a job posting for an employer.
    ///
    /// Re-posting identical content is allowed; there is no duplicate
    /// detection on jobs.
    pub async fn create(
        &self,
        employer_id: &str,
        input: CreateJobInput,
    ) -> Result<JobRecord, ServiceError> {
        let job = JobRecord {
            id: generate_id(),
            employer_id: employer_id.to_string(),
            title: input.title,
            description: input.description,
            location: input.location,
            salary: input.salary,
            salary_period: input.salary_period.unwrap_or(SalaryPeriod::Monthly),
            category: input.category,
            job_type: input.job_type.unwrap_or_else(|| "Full-time".to_string()),
            posted_time: Utc::now(),
            status: JobStatus::Active,
            applicant_count: 0,
            requirements: input.requirements.unwrap_or_default(),
        };

        JobRepository::insert(self.store.as_ref(), &job).await?;

        info!("Job created: id={}, employer_id={}", job.id, employer_id);
        Ok(job)
    }

    /// Public listing: active jobs only, optionally narrowed by a
    /// case-insensitive search over title/description and by category,
    /// most recent first. Company names are joined in at read time.
    pub async fn list(
        &self,
        search: Option<&str>,
        category: Option<&str>,
    ) -> Result<Vec<JobView>, ServiceError> {
        let mut jobs: Vec<JobRecord> = JobRepository::scan(self.store.as_ref())
            .await?
            .into_iter()
            .filter(|job| job.status == JobStatus::Active)
            .collect();

        if let Some(search) = search.filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            jobs.retain(|job| {
                job.title.to_lowercase().contains(&needle)
                    || job.description.to_lowercase().contains(&needle)
            });
        }

        if let Some(category) = category.filter(|c| !c.is_empty() && *c != ALL_CATEGORIES) {
            jobs.retain(|job| job.category.as_str() == category);
        }

        jobs.sort_by(|a, b| b.posted_time.cmp(&a.posted_time));

        let mut views = Vec::with_capacity(jobs.len());
        for job in jobs {
            let employer = UserRepository::find(self.store.as_ref(), &job.employer_id).await?;
            views.push(JobView {
                company: company_name(employer.as_ref()),
                job,
                employer_email: None,
                employer_phone: None,
            });
        }

        Ok(views)
    }

    /// Single job lookup, enriched with employer contact details
    pub async fn get(&self, job_id: &str) -> Result<JobView, ServiceError> {
        let job = JobRepository::find(self.store.as_ref(), job_id)
            .await?
            .ok_or(ServiceError::NotFound("Job"))?;

        let employer = UserRepository::find(self.store.as_ref(), &job.employer_id).await?;

        Ok(JobView {
            company: company_name(employer.as_ref()),
            employer_email: employer.as_ref().map(|e| e.email.clone()),
            employer_phone: employer.map(|e| e.phone),
            job,
        })
    }

    /// Owner-only edit. Merges the supplied fields; `id`, `postedTime`,
    /// `status` and `applicantCount` are never touched here.
    pub async fn update(
        &self,
        job_id: &str,
        requester_id: &str,
        patch: UpdateJobInput,
    ) -> Result<JobRecord, ServiceError> {
        let mut job = JobRepository::find(self.store.as_ref(), job_id)
            .await?
            .ok_or(ServiceError::NotFound("Job"))?;

        if job.employer_id != requester_id {
            return Err(ServiceError::Forbidden(
                "Only the posting employer may edit this job",
            ));
        }

        if let Some(title) = patch.title {
            job.title = title;
        }
        if let Some(description) = patch.description {
            job.description = description;
        }
        if let Some(location) = patch.location {
            job.location = location;
        }
        if let Some(salary) = patch.salary {
            job.salary = salary;
        }
        if let Some(category) = patch.category {
            job.category = category;
        }
        if let Some(job_type) = patch.job_type {
            job.job_type = job_type;
        }
        if let Some(salary_period) = patch.salary_period {
            job.salary_period = salary_period;
        }

        JobRepository::save(self.store.as_ref(), &job).await?;

        info!("Job updated: id={}", job.id);
        Ok(job)
    }

    /// An employer's own jobs, most recent first. `applicantCount` is
    /// recomputed from the applicant index on every read so a stale
    /// cached value cannot survive this listing.
    pub async fn employer_jobs(&self, employer_id: &str) -> Result<Vec<JobRecord>, ServiceError> {
        let ids = JobRepository::ids_for_employer(self.store.as_ref(), employer_id).await?;
        let mut jobs = JobRepository::find_many(self.store.as_ref(), &ids).await?;

        for job in &mut jobs {
            job.applicant_count = ApplicationRepository::ids_for_job(self.store.as_ref(), &job.id)
                .await?
                .len();
        }

        jobs.sort_by(|a, b| b.posted_time.cmp(&a.posted_time));
        Ok(jobs)
    }

    /// Owner-only deactivation: the job drops out of the public listing
    /// but stays on the employer's own listing. Nothing is deleted.
    pub async fn deactivate(
        &self,
        job_id: &str,
        requester_id: &str,
    ) -> Result<JobRecord, ServiceError> {
        let mut job = JobRepository::find(self.store.as_ref(), job_id)
            .await?
            .ok_or(ServiceError::NotFound("Job"))?;

        if job.employer_id != requester_id {
            return Err(ServiceError::Forbidden(
                "Only the posting employer may deactivate this job",
            ));
        }

        job.status = JobStatus::Inactive;
        JobRepository::save(self.store.as_ref(), &job).await?;

        info!("Job deactivated: id={}", job.id);
        Ok(job)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::kv::MemoryKv;
    use crate::db::models::{JobCategory, UserType};
    use chrono::{Duration, Utc};

    fn store() -> Arc<MemoryKv> {
        Arc::new(MemoryKv::new())
    }

    async fn seed_employer(store: &dyn KeyValueStore, id: &str, business_name: Option<&str>) {
        let user = UserRecord {
            id: id.to_string(),
            email: format!("{}@example.com", id),
            name: "Johanna K.".to_string(),
            user_type: UserType::Employer,
            phone: "0817654321".to_string(),
            location: "Windhoek".to_string(),
            business_name: business_name.map(String::from),
            created_at: Utc::now(),
        };
        UserRepository::insert(store, &user).await.unwrap();
    }

    fn job_input(title: &str) -> CreateJobInput {
        CreateJobInput {
            title: title.to_string(),
            description: "Daily housekeeping and meal preparation for a family".to_string(),
            location: "Klein Windhoek".to_string(),
            salary: 3500.0,
            category: JobCategory::Domestic,
            job_type: None,
            salary_period: None,
            requirements: Some(vec!["References required".to_string()]),
        }
    }

    #[tokio::test]
    async fn create_then_get_round_trip() {
        let store = store();
        seed_employer(store.as_ref(), "emp-1", Some("Kudu Cleaning")).await;
        let service = JobService::new(store);

        let created = service.create("emp-1", job_input("Housekeeper")).await.unwrap();
        assert_eq!(created.status, JobStatus::Active);
        assert_eq!(created.applicant_count, 0);
        assert_eq!(created.salary_period, SalaryPeriod::Monthly);
        assert_eq!(created.job_type, "Full-time");

        let fetched = service.get(&created.id).await.unwrap();
        assert_eq!(fetched.job.id, created.id);
        assert_eq!(fetched.job.title, "Housekeeper");
        assert_eq!(fetched.job.salary, 3500.0);
        assert_eq!(fetched.company, "Kudu Cleaning");
        assert_eq!(fetched.employer_email.as_deref(), Some("emp-1@example.com"));
    }

    #[tokio::test]
    async fn get_unknown_job_is_not_found() {
        let service = JobService::new(store());
        let err = service.get("zzz").await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn listing_keeps_only_active_jobs_most_recent_first() {
        let store = store();
        seed_employer(store.as_ref(), "emp-1", None).await;
        let service = JobService::new(store.clone());

        let older = service.create("emp-1", job_input("Gardener")).await.unwrap();
        let newer = service.create("emp-1", job_input("Housekeeper")).await.unwrap();

        // Push the records apart in time, then retire the third one
        let mut older_rec = older.clone();
        older_rec.posted_time = Utc::now() - Duration::hours(2);
        JobRepository::save(store.as_ref(), &older_rec).await.unwrap();

        let retired = service.create("emp-1", job_input("Shop Assistant")).await.unwrap();
        service.deactivate(&retired.id, "emp-1").await.unwrap();

        let listed = service.list(None, None).await.unwrap();
        let ids: Vec<&str> = listed.iter().map(|v| v.job.id.as_str()).collect();
        assert_eq!(ids, vec![newer.id.as_str(), older.id.as_str()]);
    }

    #[tokio::test]
    async fn search_is_case_insensitive_over_title_and_description() {
        let store = store();
        seed_employer(store.as_ref(), "emp-1", None).await;
        let service = JobService::new(store);

        let mut cook = job_input("Cook wanted");
        cook.description = "Prepare lunch for a small catering business".to_string();
        service.create("emp-1", cook).await.unwrap();

        let mut gardener = job_input("Gardener");
        gardener.description = "Weekly garden maintenance, cooking not required".to_string();
        service.create("emp-1", gardener).await.unwrap();

        service.create("emp-1", job_input("Shop Assistant")).await.unwrap();

        let hits = service.list(Some("COOK"), Some("All")).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|v| {
            v.job.title.to_lowercase().contains("cook")
                || v.job.description.to_lowercase().contains("cook")
        }));
    }

    #[tokio::test]
    async fn category_filter_ignores_the_all_sentinel() {
        let store = store();
        seed_employer(store.as_ref(), "emp-1", None).await;
        let service = JobService::new(store);

        let mut retail = job_input("Shop Assistant");
        retail.category = JobCategory::Retail;
        service.create("emp-1", retail).await.unwrap();
        service.create("emp-1", job_input("Housekeeper")).await.unwrap();

        let all = service.list(None, Some("All")).await.unwrap();
        assert_eq!(all.len(), 2);

        let retail_only = service.list(None, Some("Retail")).await.unwrap();
        assert_eq!(retail_only.len(), 1);
        assert_eq!(retail_only[0].job.category, JobCategory::Retail);
    }

    #[tokio::test]
    async fn company_falls_back_to_name_then_placeholder() {
        let store = store();
        seed_employer(store.as_ref(), "emp-named", None).await;
        let service = JobService::new(store);

        let with_name = service.create("emp-named", job_input("Gardener")).await.unwrap();
        // No user record at all behind this employer id
        let orphan = service.create("emp-ghost", job_input("Cook")).await.unwrap();

        let named = service.get(&with_name.id).await.unwrap();
        assert_eq!(named.company, "Johanna K.");

        let anonymous = service.get(&orphan.id).await.unwrap();
        assert_eq!(anonymous.company, "Anonymous Employer");
    }

    #[tokio::test]
    async fn update_is_owner_only_and_preserves_fixed_fields() {
        let store = store();
        seed_employer(store.as_ref(), "emp-1", None).await;
        let service = JobService::new(store);

        let created = service.create("emp-1", job_input("Housekeeper")).await.unwrap();

        let intruder_patch = UpdateJobInput {
            title: Some("Hijacked".to_string()),
            description: None,
            location: None,
            salary: None,
            category: None,
            job_type: None,
            salary_period: None,
        };
        let err = service.update(&created.id, "emp-2", intruder_patch).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));

        let patch = UpdateJobInput {
            title: Some("Senior Housekeeper".to_string()),
            description: None,
            location: None,
            salary: Some(4200.0),
            category: None,
            job_type: None,
            salary_period: Some(SalaryPeriod::Weekly),
        };
        let updated = service.update(&created.id, "emp-1", patch).await.unwrap();

        assert_eq!(updated.title, "Senior Housekeeper");
        assert_eq!(updated.salary, 4200.0);
        assert_eq!(updated.salary_period, SalaryPeriod::Weekly);
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.posted_time, created.posted_time);
        assert_eq!(updated.applicant_count, created.applicant_count);
        assert_eq!(updated.status, JobStatus::Active);
    }

    #[tokio::test]
    async fn deactivate_is_owner_only() {
        let store = store();
        seed_employer(store.as_ref(), "emp-1", None).await;
        let service = JobService::new(store);

        let created = service.create("emp-1", job_input("Housekeeper")).await.unwrap();

        let err = service.deactivate(&created.id, "emp-2").await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));

        let retired = service.deactivate(&created.id, "emp-1").await.unwrap();
        assert_eq!(retired.status, JobStatus::Inactive);

        // Still visible to its employer
        let mine = service.employer_jobs("emp-1").await.unwrap();
        assert_eq!(mine.len(), 1);
    }
}
