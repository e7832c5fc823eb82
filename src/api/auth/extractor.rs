use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, web};
use futures_util::future::LocalBoxFuture;

use crate::api::auth::identity::IdentityVerifier;
use crate::api::error::ServiceError;
use crate::db::models::UserRecord;

/// Verified caller identity, resolved from `Authorization: Bearer <token>`.
///
/// Extracting this in a handler is what makes the route identity-scoped:
/// the request is answered 401 before the handler body runs if the token
/// is missing, unknown or expired. Ownership checks (403) stay in the
/// services.
pub struct AuthUser {
    pub user: UserRecord,
}

impl FromRequest for AuthUser {
    type Error = ServiceError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let verifier = req.app_data::<web::Data<IdentityVerifier>>().cloned();
        let token = bearer_token(req);

        Box::pin(async move {
            let verifier =
                verifier.ok_or(ServiceError::Unauthorized("Identity verifier missing"))?;
            let token = token.ok_or(ServiceError::Unauthorized("No token provided"))?;
            let user = verifier.verify(&token).await?;
            Ok(AuthUser { user })
        })
    }
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}
