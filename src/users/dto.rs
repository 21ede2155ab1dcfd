use serde::{Deserialize, Serialize};

/// Request body for account creation. Fields are optional so that missing
/// keys reach the boundary validator instead of dying inside the JSON
/// decoder with a less useful message.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Request body for login. Same shape as registration on purpose.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// The only user shape that ever leaves the repository: no password, no hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: i64,
    pub email: String,
    pub created_at: String,
}
