use tracing::debug;

use crate::db::keys;
use crate::db::kv::{read_id_list, KeyValueStore, StoreError};
use crate::db::models::JobRecord;

/// Repository for job records and the employer job index
pub struct JobRepository;

impl JobRepository {
    /// Persist a freshly created job and register it on its employer's index
    pub async fn insert(store: &dyn KeyValueStore, job: &JobRecord) -> Result<(), StoreError> {
        debug!("Storing job: id={}, employer_id={}", job.id, job.employer_id);

        store
            .set(&keys::job(&job.id), serde_json::to_value(job)?)
            .await?;
        store
            .append_to_list(&keys::employer_jobs(&job.employer_id), &job.id)
            .await?;

        debug!("Job stored with id={}", job.id);
        Ok(())
    }

    /// Overwrite an existing job record without touching any index
    pub async fn save(store: &dyn KeyValueStore, job: &JobRecord) -> Result<(), StoreError> {
        debug!("Saving job: id={}", job.id);
        store
            .set(&keys::job(&job.id), serde_json::to_value(job)?)
            .await
    }

    pub async fn find(
        store: &dyn KeyValueStore,
        job_id: &str,
    ) -> Result<Option<JobRecord>, StoreError> {
        match store.get(&keys::job(job_id)).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Scan every job record. The `job:` prefix also covers the
    /// job-scoped applicant indexes, so index keys are skipped.
    pub async fn scan(store: &dyn KeyValueStore) -> Result<Vec<JobRecord>, StoreError> {
        let pairs = store.get_by_prefix(keys::JOB_PREFIX).await?;
        debug!("Job scan returned {} keys", pairs.len());

        pairs
            .into_iter()
            .filter(|(key, _)| keys::is_job_record(key))
            .map(|(_, value)| serde_json::from_value(value).map_err(StoreError::from))
            .collect()
    }

    pub async fn ids_for_employer(
        store: &dyn KeyValueStore,
        employer_id: &str,
    ) -> Result<Vec<String>, StoreError> {
        read_id_list(store, &keys::employer_jobs(employer_id)).await
    }

    /// Resolve job ids to records, skipping dangling ids
    pub async fn find_many(
        store: &dyn KeyValueStore,
        job_ids: &[String],
    ) -> Result<Vec<JobRecord>, StoreError> {
        let record_keys: Vec<String> = job_ids.iter().map(|id| keys::job(id)).collect();
        store
            .mget(&record_keys)
            .await?
            .into_iter()
            .map(|value| serde_json::from_value(value).map_err(StoreError::from))
            .collect()
    }
}
