use actix_web::{
    HttpResponse, get, post,
    web::{Data, ServiceConfig},
};
use actix_web_validator::Json;
use tracing::info;

use crate::api::auth::dto::{SessionResponse, SigninResponse, SignupResponse};
use crate::api::auth::extractor::AuthUser;
use crate::api::auth::identity::IdentityVerifier;
use crate::api::auth::models::{SigninInput, SignupInput};
use crate::api::error::ServiceError;

#[post("/signup")]
async fn signup(
    verifier: Data<IdentityVerifier>,
    input: Json<SignupInput>,
) -> Result<HttpResponse, ServiceError> {
    let (user, token) = verifier.signup(input.into_inner()).await?;

    info!("Signup completed: user_id={}", user.id);

    Ok(HttpResponse::Ok().json(SignupResponse {
        success: true,
        user_id: user.id.clone(),
        user,
        access_token: Some(token),
    }))
}

#[post("/signin")]
async fn signin(
    verifier: Data<IdentityVerifier>,
    input: Json<SigninInput>,
) -> Result<HttpResponse, ServiceError> {
    let (user, token) = verifier.signin(&input.email, &input.password).await?;

    Ok(HttpResponse::Ok().json(SigninResponse {
        success: true,
        user,
        access_token: token,
    }))
}

#[get("/session")]
async fn session(auth: AuthUser) -> HttpResponse {
    HttpResponse::Ok().json(SessionResponse {
        success: true,
        user: auth.user,
    })
}

pub fn auth_config(config: &mut ServiceConfig) {
    config.service(signup).service(signin).service(session);
}
