use actix_web::{
    HttpResponse, get, post, put,
    web::{Data, Path, Query, ServiceConfig, scope},
};
use actix_web_validator::Json;

use crate::api::application::dto::ApplicantsResponse;
use crate::api::application::service::ApplicationService;
use crate::api::auth::AuthUser;
use crate::api::error::ServiceError;
use crate::api::job::dto::{EmployerJobsResponse, JobListResponse, JobResponse, JobViewResponse};
use crate::api::job::models::{CreateJobInput, JobListQuery, UpdateJobInput};
use crate::api::job::JobService;
use crate::config::Config;

#[post("")]
async fn create_job(
    auth: AuthUser,
    service: Data<JobService>,
    input: Json<CreateJobInput>,
) -> Result<HttpResponse, ServiceError> {
    let job = service.create(&auth.user.id, input.into_inner()).await?;
    Ok(HttpResponse::Ok().json(JobResponse { success: true, job }))
}

#[get("")]
async fn list_jobs(
    service: Data<JobService>,
    query: Query<JobListQuery>,
) -> Result<HttpResponse, ServiceError> {
    let jobs = service
        .list(query.search.as_deref(), query.category.as_deref())
        .await?;
    Ok(HttpResponse::Ok().json(JobListResponse { success: true, jobs }))
}

#[get("/{job_id}")]
async fn get_job(
    service: Data<JobService>,
    path: Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let job = service.get(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(JobViewResponse { success: true, job }))
}

#[put("/{job_id}")]
async fn update_job(
    auth: AuthUser,
    service: Data<JobService>,
    path: Path<String>,
    input: Json<UpdateJobInput>,
) -> Result<HttpResponse, ServiceError> {
    let job = service
        .update(&path.into_inner(), &auth.user.id, input.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(JobResponse { success: true, job }))
}

/// Retire a posting without deleting it. Behind a deployment flag while
/// it is unclear whether the marketplace wants an append-only history;
/// with the flag off the route reports not-found.
#[post("/{job_id}/deactivate")]
async fn deactivate_job(
    auth: AuthUser,
    service: Data<JobService>,
    config: Data<Config>,
    path: Path<String>,
) -> Result<HttpResponse, ServiceError> {
    if !config.enable_job_deactivation {
        return Err(ServiceError::NotFound("Job"));
    }

    let job = service.deactivate(&path.into_inner(), &auth.user.id).await?;
    Ok(HttpResponse::Ok().json(JobResponse { success: true, job }))
}

/// Employer review of a job's applications; owner only
#[get("/{job_id}/applicants")]
async fn list_applicants(
    auth: AuthUser,
    service: Data<ApplicationService>,
    path: Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let applicants = service
        .applicants_for_job(&path.into_inner(), &auth.user.id)
        .await?;
    Ok(HttpResponse::Ok().json(ApplicantsResponse {
        success: true,
        applicants,
    }))
}

#[get("/employer/jobs")]
async fn employer_jobs(
    auth: AuthUser,
    service: Data<JobService>,
) -> Result<HttpResponse, ServiceError> {
    let jobs = service.employer_jobs(&auth.user.id).await?;
    Ok(HttpResponse::Ok().json(EmployerJobsResponse { success: true, jobs }))
}

pub fn job_config(config: &mut ServiceConfig) {
    config
        .service(
            scope("/jobs")
                .service(create_job)
                .service(list_jobs)
                .service(list_applicants)
                .service(deactivate_job)
                .service(get_job)
                .service(update_job),
        )
        .service(employer_jobs);
}
