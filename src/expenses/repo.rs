use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, FromRow, Row, SqlitePool};

use crate::db;
use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub amount: f64,
    pub date: String,
}

impl<'r> FromRow<'r, SqliteRow> for Expense {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            title: row.try_get("title")?,
            amount: amount_from_row(row)?,
            date: row.try_get("date")?,
        })
    }
}

/// SQLite columns are dynamically typed, so an amount written by another tool
/// can come back as REAL, INTEGER, or TEXT. Callers always get an `f64`; a
/// value that cannot be read as a number is a decode error, never a panic.
fn amount_from_row(row: &SqliteRow) -> Result<f64, sqlx::Error> {
    if let Ok(value) = row.try_get::<f64, _>("amount") {
        return Ok(value);
    }
    if let Ok(value) = row.try_get::<i64, _>("amount") {
        return Ok(value as f64);
    }
    let raw: String = row.try_get("amount")?;
    raw.trim()
        .parse::<f64>()
        .map_err(|e| sqlx::Error::ColumnDecode {
            index: "amount".into(),
            source: Box::new(e),
        })
}

/// Insert a new expense. The record date is set here, once, and never
/// changes afterwards.
pub async fn create(
    db: &SqlitePool,
    user_id: i64,
    title: &str,
    amount: f64,
) -> Result<Expense, AppError> {
    let date = db::now_rfc3339()?;

    let expense = sqlx::query_as::<_, Expense>(
        r#"
        INSERT INTO expenses (user_id, title, amount, date)
        VALUES (?, ?, ?, ?)
        RETURNING id, user_id, title, amount, date
        "#,
    )
    .bind(user_id)
    .bind(title)
    .bind(amount)
    .bind(&date)
    .fetch_one(db)
    .await?;

    Ok(expense)
}

/// All expenses across all users, oldest first by id.
pub async fn list(db: &SqlitePool) -> Result<Vec<Expense>, AppError> {
    let expenses = sqlx::query_as::<_, Expense>(
        r#"
        SELECT id, user_id, title, amount, date
        FROM expenses
        ORDER BY id ASC
        "#,
    )
    .fetch_all(db)
    .await?;

    Ok(expenses)
}

pub async fn get_by_id(db: &SqlitePool, id: i64) -> Result<Option<Expense>, AppError> {
    let expense = sqlx::query_as::<_, Expense>(
        r#"
        SELECT id, user_id, title, amount, date
        FROM expenses
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?;

    Ok(expense)
}

/// Merge the supplied fields into the stored record; fields left as `None`
/// keep their current values, and `date` is never touched. The read and the
/// write are separate statements, so concurrent updates to the same id
/// settle last-writer-wins.
pub async fn update(
    db: &SqlitePool,
    id: i64,
    title: Option<String>,
    amount: Option<f64>,
) -> Result<Option<Expense>, AppError> {
    let Some(existing) = get_by_id(db, id).await? else {
        return Ok(None);
    };

    let title = title.unwrap_or(existing.title);
    let amount = amount.unwrap_or(existing.amount);

    // The row can vanish between the read and the write; that surfaces as
    // absence, the same as a miss on the initial read.
    let updated = sqlx::query_as::<_, Expense>(
        r#"
        UPDATE expenses
        SET title = ?, amount = ?
        WHERE id = ?
        RETURNING id, user_id, title, amount, date
        "#,
    )
    .bind(&title)
    .bind(amount)
    .bind(id)
    .fetch_optional(db)
    .await?;

    Ok(updated)
}

/// Delete by id. `Ok(false)` means there was nothing to delete, which the
/// handler layer turns into a 404.
pub async fn delete(db: &SqlitePool, id: i64) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM expenses WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;

    Ok(result.rows_affected() > 0)
}
