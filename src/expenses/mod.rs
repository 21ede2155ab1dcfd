use axum::Router;

use crate::state::AppState;

mod dto;
mod handlers;
mod repo;

pub use repo::Expense;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
