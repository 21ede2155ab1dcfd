use axum::Router;

use crate::state::AppState;

mod dto;
mod handlers;
mod password;
mod repo;

pub use dto::PublicUser;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
