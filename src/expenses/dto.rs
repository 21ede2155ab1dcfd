use serde::Deserialize;

/// Fields are optional so that a missing key reaches the handler's own
/// validation instead of bouncing off deserialization with a decoder error.
#[derive(Debug, Deserialize)]
pub struct CreateExpenseRequest {
    pub title: Option<String>,
    pub amount: Option<f64>,
    pub user_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateExpenseRequest {
    pub title: Option<String>,
    pub amount: Option<f64>,
}
