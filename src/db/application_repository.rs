use tracing::debug;

use crate::db::keys;
use crate::db::kv::{read_id_list, KeyValueStore, StoreError};
use crate::db::models::ApplicationRecord;

/// Repository for application records and the submitter/job indexes
pub struct ApplicationRepository;

impl ApplicationRepository {
    /// Persist a freshly submitted application and register it on both
    /// its submitter's index and the target job's applicant index.
    pub async fn insert(
        store: &dyn KeyValueStore,
        application: &ApplicationRecord,
    ) -> Result<(), StoreError> {
        debug!(
            "Storing application: id={}, job_id={}, user_id={}",
            application.id, application.job_id, application.user_id
        );

        store
            .set(
                &keys::application(&application.id),
                serde_json::to_value(application)?,
            )
            .await?;
        store
            .append_to_list(
                &keys::user_applications(&application.user_id),
                &application.id,
            )
            .await?;
        store
            .append_to_list(&keys::job_applicants(&application.job_id), &application.id)
            .await?;

        debug!("Application stored with id={}", application.id);
        Ok(())
    }

    /// Overwrite an existing application record without touching any index
    pub async fn save(
        store: &dyn KeyValueStore,
        application: &ApplicationRecord,
    ) -> Result<(), StoreError> {
        debug!("Saving application: id={}", application.id);
        store
            .set(
                &keys::application(&application.id),
                serde_json::to_value(application)?,
            )
            .await
    }

    pub async fn find(
        store: &dyn KeyValueStore,
        application_id: &str,
    ) -> Result<Option<ApplicationRecord>, StoreError> {
        match store.get(&keys::application(application_id)).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    pub async fn ids_for_user(
        store: &dyn KeyValueStore,
        user_id: &str,
    ) -> Result<Vec<String>, StoreError> {
        read_id_list(store, &keys::user_applications(user_id)).await
    }

    pub async fn ids_for_job(
        store: &dyn KeyValueStore,
        job_id: &str,
    ) -> Result<Vec<String>, StoreError> {
        read_id_list(store, &keys::job_applicants(job_id)).await
    }

    /// Resolve application ids to records, skipping dangling ids
    pub async fn find_many(
        store: &dyn KeyValueStore,
        application_ids: &[String],
    ) -> Result<Vec<ApplicationRecord>, StoreError> {
        let record_keys: Vec<String> = application_ids
            .iter()
            .map(|id| keys::application(id))
            .collect();
        store
            .mget(&record_keys)
            .await?
            .into_iter()
            .map(|value| serde_json::from_value(value).map_err(StoreError::from))
            .collect()
    }
}
