use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::error::{not_found, AppError};
use crate::state::AppState;

use super::dto::{LoginRequest, PublicUser, RegisterRequest};
use super::repo;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(register).fallback(not_found))
        .route("/users/login", post(login).fallback(not_found))
}

fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// POST /api/users
///
/// Registration validates shape here at the boundary; the repository only
/// sees an email that already passed the format checks.
#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PublicUser>), AppError> {
    let Json(payload) = payload?;

    let (Some(email), Some(password)) = (payload.email, payload.password) else {
        warn!("registration rejected: missing fields");
        return Err(AppError::Validation("Email and password required".into()));
    };

    let email = email.trim().to_lowercase();
    if email.is_empty() || password.is_empty() {
        warn!("registration rejected: empty fields");
        return Err(AppError::Validation("Email and password required".into()));
    }
    if !is_valid_email(&email) {
        warn!(email = %email, "registration rejected: invalid email");
        return Err(AppError::Validation("Invalid email".into()));
    }
    if password.len() < 8 {
        warn!(email = %email, "registration rejected: password too short");
        return Err(AppError::Validation(
            "Password must be at least 8 characters".into(),
        ));
    }

    let user = repo::create(&state.db, &email, &password).await?;

    info!(user_id = user.id, email = %user.email, "user registered");
    Ok((StatusCode::CREATED, Json(user)))
}

/// POST /api/users/login
///
/// Login only checks that both fields are present. Format checks belong to
/// registration; a malformed email here is simply a credential that will not
/// match, and must fail exactly like any other bad credential.
#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<PublicUser>, AppError> {
    let Json(payload) = payload?;

    let (Some(email), Some(password)) = (payload.email, payload.password) else {
        return Err(AppError::Validation("Email and password required".into()));
    };

    let email = email.trim().to_lowercase();
    if email.is_empty() || password.is_empty() {
        return Err(AppError::Validation("Email and password required".into()));
    }

    match repo::login(&state.db, &email, &password).await? {
        Some(user) => {
            info!(user_id = user.id, "user logged in");
            Ok(Json(user))
        }
        None => {
            warn!(email = %email, "login failed");
            Err(AppError::Auth("Invalid email or password"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::is_valid_email;

    #[test]
    fn email_validation_accepts_plain_addresses() {
        assert!(is_valid_email("dana@example.com"));
        assert!(is_valid_email("first.last@sub.example.co"));
    }

    #[test]
    fn email_validation_rejects_malformed_addresses() {
        assert!(!is_valid_email("notanemail"));
        assert!(!is_valid_email("missing@tld"));
        assert!(!is_valid_email("two@@example.com"));
        assert!(!is_valid_email("spaces in@example.com"));
        assert!(!is_valid_email(""));
    }
}
