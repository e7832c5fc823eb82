use actix_web::{
    HttpResponse, post,
    web::{Data, ServiceConfig},
};
use actix_web_validator::Json;

use crate::api::error::ServiceError;
use crate::api::feedback::dto::FeedbackResponse;
use crate::api::feedback::models::FeedbackInput;
use crate::api::feedback::service::FeedbackService;

#[post("/feedback")]
async fn submit_feedback(
    service: Data<FeedbackService>,
    input: Json<FeedbackInput>,
) -> Result<HttpResponse, ServiceError> {
    let feedback = service.submit(input.into_inner()).await?;
    Ok(HttpResponse::Ok().json(FeedbackResponse {
        success: true,
        feedback,
    }))
}

pub fn feedback_config(config: &mut ServiceConfig) {
    config.service(submit_feedback);
}
