use serde::Deserialize;
use validator::Validate;

use crate::db::models::UserType;

/// Signup payload. The identity layer issues the user id; everything
/// else is caller-supplied and validated before any write.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupInput {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: String,

    pub user_type: UserType,

    #[validate(length(min = 8, message = "Please enter a valid phone number"))]
    pub phone: String,

    #[validate(length(min = 2, message = "Please enter a valid location"))]
    pub location: String,

    pub business_name: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SigninInput {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,

    pub password: String,
}
