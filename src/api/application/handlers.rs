use actix_web::{
    HttpResponse, get, post, put,
    web::{Data, Path, ServiceConfig, scope},
};
use actix_web_validator::Json;

use crate::api::application::dto::{ApplicationResponse, ApplicationsResponse};
use crate::api::application::models::{
    SubmitApplicationInput, UpdateApplicationInput, UpdateStatusInput,
};
use crate::api::application::service::ApplicationService;
use crate::api::auth::AuthUser;
use crate::api::error::ServiceError;

#[post("")]
async fn submit_application(
    auth: AuthUser,
    service: Data<ApplicationService>,
    input: Json<SubmitApplicationInput>,
) -> Result<HttpResponse, ServiceError> {
    let application = service.submit(&auth.user.id, input.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApplicationResponse {
        success: true,
        application,
    }))
}

#[get("")]
async fn my_applications(
    auth: AuthUser,
    service: Data<ApplicationService>,
) -> Result<HttpResponse, ServiceError> {
    let applications = service.my_applications(&auth.user.id).await?;
    Ok(HttpResponse::Ok().json(ApplicationsResponse {
        success: true,
        applications,
    }))
}

#[put("/{application_id}")]
async fn update_application(
    auth: AuthUser,
    service: Data<ApplicationService>,
    path: Path<String>,
    input: Json<UpdateApplicationInput>,
) -> Result<HttpResponse, ServiceError> {
    let application = service
        .update(&path.into_inner(), &auth.user.id, input.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApplicationResponse {
        success: true,
        application,
    }))
}

#[put("/{application_id}/status")]
async fn update_application_status(
    auth: AuthUser,
    service: Data<ApplicationService>,
    path: Path<String>,
    input: Json<UpdateStatusInput>,
) -> Result<HttpResponse, ServiceError> {
    let application = service
        .update_status(&path.into_inner(), &auth.user.id, input.status)
        .await?;
    Ok(HttpResponse::Ok().json(ApplicationResponse {
        success: true,
        application,
    }))
}

pub fn application_config(config: &mut ServiceConfig) {
    config.service(
        scope("/applications")
            .service(submit_application)
            .service(my_applications)
            .service(update_application_status)
            .service(update_application),
    );
}
