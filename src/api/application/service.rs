use chrono::Utc;
use std::sync::Arc;
use tracing::info;

use crate::api::application::models::{SubmitApplicationInput, UpdateApplicationInput};
use crate::api::error::ServiceError;
use crate::api::job::service::company_name;
use crate::db::application_repository::ApplicationRepository;
use crate::db::job_repository::JobRepository;
use crate::db::kv::KeyValueStore;
use crate::db::models::{generate_id, ApplicationRecord, ApplicationStatus};
use crate::db::user_repository::UserRepository;

/// Application service: submission, the seeker/employer views, and the
/// status workflow, with the ownership checks on every call.
pub struct ApplicationService {
    store: Arc<dyn KeyValueStore>,
}

impl ApplicationService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Submit an application to a job.
    ///
    /// # Business Logic
    /// - The target job must exist
    /// - One application per (applicant, job): duplicates are rejected
    /// - `jobTitle` and `company` are snapshotted from the job as it is
    ///   right now; later job edits do not touch them
    /// - The id is registered on the applicant's and the job's indexes,
    ///   and the job's cached `applicantCount` is refreshed from the
    ///   index length
    pub async fn submit(
        &self,
        applicant_id: &str,
        input: SubmitApplicationInput,
    ) -> Result<ApplicationRecord, ServiceError> {
        let mut job = JobRepository::find(self.store.as_ref(), &input.job_id)
            .await?
            .ok_or(ServiceError::NotFound("Job"))?;

        let submitted_ids =
            ApplicationRepository::ids_for_user(self.store.as_ref(), applicant_id).await?;
        let submitted =
            ApplicationRepository::find_many(self.store.as_ref(), &submitted_ids).await?;
        if submitted.iter().any(|a| a.job_id == input.job_id) {
            return Err(ServiceError::Conflict(
                "You have already applied for this job".to_string(),
            ));
        }

        let employer = UserRepository::find(self.store.as_ref(), &job.employer_id).await?;

        let application = ApplicationRecord {
            id: generate_id(),
            job_id: input.job_id,
            user_id: applicant_id.to_string(),
            job_title: job.title.clone(),
            company: company_name(employer.as_ref()),
            motivation: input.motivation,
            name: input.name,
            email: input.email,
            phone: input.phone,
            applied_date: Utc::now(),
            status: ApplicationStatus::Pending,
            updated_at: None,
        };

        ApplicationRepository::insert(self.store.as_ref(), &application).await?;

        job.applicant_count =
            ApplicationRepository::ids_for_job(self.store.as_ref(), &application.job_id)
                .await?
                .len();
        JobRepository::save(self.store.as_ref(), &job).await?;

        info!(
            "Application submitted: id={}, job_id={}, applicant_count={}",
            application.id, application.job_id, job.applicant_count
        );
        Ok(application)
    }

    /// A seeker's own applications, most recent first
    pub async fn my_applications(
        &self,
        user_id: &str,
    ) -> Result<Vec<ApplicationRecord>, ServiceError> {
        let ids = ApplicationRepository::ids_for_user(self.store.as_ref(), user_id).await?;
        let mut applications =
            ApplicationRepository::find_many(self.store.as_ref(), &ids).await?;

        applications.sort_by(|a, b| b.applied_date.cmp(&a.applied_date));
        Ok(applications)
    }

    /// Applications submitted to a job, most recent first; only the
    /// posting employer may see them.
    pub async fn applicants_for_job(
        &self,
        job_id: &str,
        requester_id: &str,
    ) -> Result<Vec<ApplicationRecord>, ServiceError> {
        let job = JobRepository::find(self.store.as_ref(), job_id)
            .await?
            .ok_or(ServiceError::NotFound("Job"))?;

        if job.employer_id != requester_id {
            return Err(ServiceError::Forbidden(
                "Only the posting employer may view applicants",
            ));
        }

        let ids = ApplicationRepository::ids_for_job(self.store.as_ref(), job_id).await?;
        let mut applicants =
            ApplicationRepository::find_many(self.store.as_ref(), &ids).await?;

        applicants.sort_by(|a, b| b.applied_date.cmp(&a.applied_date));
        Ok(applicants)
    }

    /// Applicant-side edit of the motivation text. Blocked once the
    /// application is finalized (accepted or rejected).
    pub async fn update(
        &self,
        application_id: &str,
        requester_id: &str,
        input: UpdateApplicationInput,
    ) -> Result<ApplicationRecord, ServiceError> {
        let mut application =
            ApplicationRepository::find(self.store.as_ref(), application_id)
                .await?
                .ok_or(ServiceError::NotFound("Application"))?;

        if application.user_id != requester_id {
            return Err(ServiceError::Forbidden(
                "Only the applicant may edit this application",
            ));
        }

        if application.status.is_terminal() {
            return Err(ServiceError::Conflict(
                "This application has been finalized and can no longer be edited".to_string(),
            ));
        }

        if let Some(motivation) = input.motivation {
            application.motivation = motivation;
        }
        application.updated_at = Some(Utc::now());

        ApplicationRepository::save(self.store.as_ref(), &application).await?;

        info!("Application updated: id={}", application.id);
        Ok(application)
    }

    /// Employer-side status change, guarded by the ownership check on
    /// the application's job and by the forward-only transition table.
    pub async fn update_status(
        &self,
        application_id: &str,
        requester_id: &str,
        status: ApplicationStatus,
    ) -> Result<ApplicationRecord, ServiceError> {
        let mut application =
            ApplicationRepository::find(self.store.as_ref(), application_id)
                .await?
                .ok_or(ServiceError::NotFound("Application"))?;

        let job = JobRepository::find(self.store.as_ref(), &application.job_id)
            .await?
            .ok_or(ServiceError::NotFound("Job"))?;

        if job.employer_id != requester_id {
            return Err(ServiceError::Forbidden(
                "Only the posting employer may update this application",
            ));
        }

        if !application.status.can_transition_to(status) {
            return Err(ServiceError::Conflict(format!(
                "Cannot move application from {} to {}",
                format!("{:?}", application.status).to_lowercase(),
                format!("{:?}", status).to_lowercase(),
            )));
        }

        application.status = status;
        application.updated_at = Some(Utc::now());

        ApplicationRepository::save(self.store.as_ref(), &application).await?;

        info!(
            "Application status changed: id={}, status={:?}",
            application.id, application.status
        );
        Ok(application)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::job::models::CreateJobInput;
    use crate::api::job::JobService;
    use crate::db::kv::MemoryKv;
    use crate::db::models::{JobCategory, JobRecord, UserRecord, UserType};
    use chrono::Duration;

    struct Fixture {
        store: Arc<MemoryKv>,
        jobs: JobService,
        applications: ApplicationService,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemoryKv::new());
        Fixture {
            jobs: JobService::new(store.clone()),
            applications: ApplicationService::new(store.clone()),
            store,
        }
    }

    async fn seed_employer(store: &dyn KeyValueStore, id: &str) {
        let user = UserRecord {
            id: id.to_string(),
            email: format!("{}@example.com", id),
            name: "Johanna K.".to_string(),
            user_type: UserType::Employer,
            phone: "0817654321".to_string(),
            location: "Windhoek".to_string(),
            business_name: Some("Kudu Cleaning".to_string()),
            created_at: Utc::now(),
        };
        UserRepository::insert(store, &user).await.unwrap();
    }

    async fn seed_job(fx: &Fixture, employer_id: &str, title: &str) -> JobRecord {
        seed_employer(fx.store.as_ref(), employer_id).await;
        fx.jobs
            .create(
                employer_id,
                CreateJobInput {
                    title: title.to_string(),
                    description: "Daily housekeeping and meal preparation for a family"
                        .to_string(),
                    location: "Klein Windhoek".to_string(),
                    salary: 3500.0,
                    category: JobCategory::Domestic,
                    job_type: None,
                    salary_period: None,
                    requirements: None,
                },
            )
            .await
            .unwrap()
    }

    fn submission(job_id: &str) -> SubmitApplicationInput {
        SubmitApplicationInput {
            job_id: job_id.to_string(),
            motivation: "I am reliable and hardworking".to_string(),
            name: "Maria N.".to_string(),
            email: "maria@example.com".to_string(),
            phone: "0811234567".to_string(),
        }
    }

    #[tokio::test]
    async fn applicant_count_tracks_the_index() {
        let fx = fixture();
        let job = seed_job(&fx, "emp-1", "Housekeeper").await;

        for seeker in ["seeker-1", "seeker-2", "seeker-3"] {
            fx.applications.submit(seeker, submission(&job.id)).await.unwrap();
        }

        let index_len = ApplicationRepository::ids_for_job(fx.store.as_ref(), &job.id)
            .await
            .unwrap()
            .len();
        let stored = JobRepository::find(fx.store.as_ref(), &job.id)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(index_len, 3);
        assert_eq!(stored.applicant_count, index_len);
    }

    #[tokio::test]
    async fn submitting_to_a_missing_job_is_not_found() {
        let fx = fixture();
        let err = fx
            .applications
            .submit("seeker-1", submission("zzz"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn second_application_to_the_same_job_conflicts() {
        let fx = fixture();
        let job = seed_job(&fx, "emp-1", "Housekeeper").await;

        fx.applications.submit("seeker-1", submission(&job.id)).await.unwrap();
        let err = fx
            .applications
            .submit("seeker-1", submission(&job.id))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        // A different seeker is still welcome
        fx.applications.submit("seeker-2", submission(&job.id)).await.unwrap();
    }

    #[tokio::test]
    async fn snapshots_survive_later_job_edits() {
        let fx = fixture();
        let job = seed_job(&fx, "emp-1", "Housekeeper").await;

        let application = fx
            .applications
            .submit("seeker-1", submission(&job.id))
            .await
            .unwrap();
        assert_eq!(application.job_title, "Housekeeper");
        assert_eq!(application.company, "Kudu Cleaning");

        let patch = crate::api::job::models::UpdateJobInput {
            title: Some("Executive Housekeeper".to_string()),
            description: None,
            location: None,
            salary: None,
            category: None,
            job_type: None,
            salary_period: None,
        };
        fx.jobs.update(&job.id, "emp-1", patch).await.unwrap();

        let mine = fx.applications.my_applications("seeker-1").await.unwrap();
        assert_eq!(mine[0].job_title, "Housekeeper");
    }

    #[tokio::test]
    async fn applicant_review_is_owner_only() {
        let fx = fixture();
        let job = seed_job(&fx, "emp-1", "Housekeeper").await;
        seed_employer(fx.store.as_ref(), "emp-2").await;

        let application = fx
            .applications
            .submit("seeker-1", submission(&job.id))
            .await
            .unwrap();

        let applicants = fx
            .applications
            .applicants_for_job(&job.id, "emp-1")
            .await
            .unwrap();
        assert_eq!(applicants.len(), 1);
        assert_eq!(applicants[0].id, application.id);
        assert_eq!(applicants[0].status, ApplicationStatus::Pending);

        let err = fx
            .applications
            .applicants_for_job(&job.id, "emp-2")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
    }

    #[tokio::test]
    async fn my_applications_come_back_most_recent_first() {
        let fx = fixture();
        let first = seed_job(&fx, "emp-1", "Housekeeper").await;
        let second = seed_job(&fx, "emp-2", "Gardener").await;

        let old = fx.applications.submit("seeker-1", submission(&first.id)).await.unwrap();
        fx.applications.submit("seeker-1", submission(&second.id)).await.unwrap();

        // Backdate the first submission to force a stable order
        let mut backdated = old.clone();
        backdated.applied_date = Utc::now() - Duration::hours(3);
        ApplicationRepository::save(fx.store.as_ref(), &backdated).await.unwrap();

        let mine = fx.applications.my_applications("seeker-1").await.unwrap();
        assert_eq!(mine.len(), 2);
        assert_eq!(mine[0].job_id, second.id);
        assert_eq!(mine[1].job_id, first.id);
    }

    #[tokio::test]
    async fn content_edits_are_submitter_only_and_stop_after_finalization() {
        let fx = fixture();
        let job = seed_job(&fx, "emp-1", "Housekeeper").await;
        let application = fx
            .applications
            .submit("seeker-1", submission(&job.id))
            .await
            .unwrap();

        let err = fx
            .applications
            .update(
                &application.id,
                "seeker-2",
                UpdateApplicationInput {
                    motivation: Some("I am even more reliable and hardworking".to_string()),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));

        let edited = fx
            .applications
            .update(
                &application.id,
                "seeker-1",
                UpdateApplicationInput {
                    motivation: Some("I am even more reliable and hardworking".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(edited.motivation, "I am even more reliable and hardworking");
        assert!(edited.updated_at.is_some());

        fx.applications
            .update_status(&application.id, "emp-1", ApplicationStatus::Accepted)
            .await
            .unwrap();

        let err = fx
            .applications
            .update(
                &application.id,
                "seeker-1",
                UpdateApplicationInput {
                    motivation: Some("Let me rephrase that motivation once more".to_string()),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn accepted_status_shows_up_for_the_seeker() {
        let fx = fixture();
        let job = seed_job(&fx, "emp-1", "Housekeeper").await;
        let application = fx
            .applications
            .submit("seeker-1", submission(&job.id))
            .await
            .unwrap();

        fx.applications
            .update_status(&application.id, "emp-1", ApplicationStatus::Accepted)
            .await
            .unwrap();

        let mine = fx.applications.my_applications("seeker-1").await.unwrap();
        assert_eq!(mine[0].status, ApplicationStatus::Accepted);
    }

    #[tokio::test]
    async fn status_changes_are_job_owner_only() {
        let fx = fixture();
        let job = seed_job(&fx, "emp-1", "Housekeeper").await;
        seed_employer(fx.store.as_ref(), "emp-2").await;
        let application = fx
            .applications
            .submit("seeker-1", submission(&job.id))
            .await
            .unwrap();

        let err = fx
            .applications
            .update_status(&application.id, "emp-2", ApplicationStatus::Reviewed)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));

        // The applicant cannot accept themselves either
        let err = fx
            .applications
            .update_status(&application.id, "seeker-1", ApplicationStatus::Accepted)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
    }

    #[tokio::test]
    async fn backward_and_terminal_transitions_conflict() {
        let fx = fixture();
        let job = seed_job(&fx, "emp-1", "Housekeeper").await;
        let application = fx
            .applications
            .submit("seeker-1", submission(&job.id))
            .await
            .unwrap();

        fx.applications
            .update_status(&application.id, "emp-1", ApplicationStatus::Reviewed)
            .await
            .unwrap();

        let err = fx
            .applications
            .update_status(&application.id, "emp-1", ApplicationStatus::Pending)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        fx.applications
            .update_status(&application.id, "emp-1", ApplicationStatus::Rejected)
            .await
            .unwrap();

        let err = fx
            .applications
            .update_status(&application.id, "emp-1", ApplicationStatus::Accepted)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }
}
