use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::error::{not_found, AppError};
use crate::state::AppState;

use super::dto::{CreateExpenseRequest, UpdateExpenseRequest};
use super::repo::{self, Expense};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/expenses",
            get(list_expenses).post(create_expense).fallback(not_found),
        )
        .route(
            "/expenses/:id",
            get(get_expense)
                .put(update_expense)
                .delete(delete_expense)
                .fallback(not_found),
        )
}

/// Item routes only exist for ids made of decimal digits. Anything else in
/// the id segment is a route miss, answered exactly like an unknown path
/// rather than as a complaint about a malformed id.
fn parse_item_id(raw: &str) -> Result<i64, AppError> {
    if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(id) = raw.parse::<i64>() {
            return Ok(id);
        }
    }
    Err(AppError::route_not_found())
}

fn validate_title(title: &str) -> Result<(), AppError> {
    if title.trim().is_empty() {
        return Err(AppError::Validation(
            "Title must be a non-empty string".into(),
        ));
    }
    Ok(())
}

fn validate_amount(amount: f64) -> Result<(), AppError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(AppError::Validation(
            "Amount must be a positive number".into(),
        ));
    }
    Ok(())
}

/// GET /api/expenses
#[instrument(skip(state))]
pub async fn list_expenses(
    State(state): State<AppState>,
) -> Result<Json<Vec<Expense>>, AppError> {
    let expenses = repo::list(&state.db).await?;
    Ok(Json(expenses))
}

/// GET /api/expenses/:id
#[instrument(skip(state))]
pub async fn get_expense(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Expense>, AppError> {
    let id = parse_item_id(&id)?;

    match repo::get_by_id(&state.db, id).await? {
        Some(expense) => Ok(Json(expense)),
        None => Err(AppError::NotFound("Expense not found")),
    }
}

/// POST /api/expenses
#[instrument(skip(state, payload))]
pub async fn create_expense(
    State(state): State<AppState>,
    payload: Result<Json<CreateExpenseRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Expense>), AppError> {
    let Json(payload) = payload?;

    let Some(user_id) = payload.user_id else {
        warn!("expense rejected: missing user_id");
        return Err(AppError::Validation("A user_id is required".into()));
    };
    let title = payload.title.unwrap_or_default();
    validate_title(&title)?;
    let amount = payload.amount.unwrap_or(0.0);
    validate_amount(amount)?;

    let expense = repo::create(&state.db, user_id, &title, amount).await?;

    info!(expense_id = expense.id, user_id, "expense created");
    Ok((StatusCode::CREATED, Json(expense)))
}

/// PUT /api/expenses/:id
///
/// Partial update: only the fields present in the body are validated and
/// applied. An empty body object is a no-op that returns the stored record.
#[instrument(skip(state, payload))]
pub async fn update_expense(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateExpenseRequest>, JsonRejection>,
) -> Result<Json<Expense>, AppError> {
    let id = parse_item_id(&id)?;
    let Json(payload) = payload?;

    if let Some(title) = &payload.title {
        validate_title(title)?;
    }
    if let Some(amount) = payload.amount {
        validate_amount(amount)?;
    }

    match repo::update(&state.db, id, payload.title, payload.amount).await? {
        Some(expense) => {
            info!(expense_id = expense.id, "expense updated");
            Ok(Json(expense))
        }
        None => Err(AppError::NotFound("Expense not found")),
    }
}

/// DELETE /api/expenses/:id
#[instrument(skip(state))]
pub async fn delete_expense(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_item_id(&id)?;

    if repo::delete(&state.db, id).await? {
        info!(expense_id = id, "expense deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("Expense not found"))
    }
}
