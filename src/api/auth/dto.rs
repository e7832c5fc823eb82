use serde::Serialize;

use crate::db::models::UserRecord;

/// Response for account creation (token present when auto-signin worked)
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    pub success: bool,
    pub user: UserRecord,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SigninResponse {
    pub success: bool,
    pub user: UserRecord,
    pub access_token: String,
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub success: bool,
    pub user: UserRecord,
}
