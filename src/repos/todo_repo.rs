/*
 * Responsibility
 * - SQLx operations for the todos table
 * - Takes a PgPool and returns rows; no ownership policy here beyond
 *   owner-scoped WHERE clauses (the handler decides Forbidden vs NotFound)
 */
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::error::RepoError;

#[derive(Debug, Clone, FromRow)]
pub struct TodoRow {
    #[sqlx(rename = "todoId")]
    pub todo_id: Uuid,

    // Raw principal string from the token's `sub`; compared verbatim.
    #[sqlx(rename = "userId")]
    pub user_id: String,

    pub name: String,

    #[sqlx(rename = "dueDate")]
    pub due_date: NaiveDate,

    pub done: bool,

    #[sqlx(rename = "attachmentUrl")]
    pub attachment_url: Option<String>,

    #[sqlx(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

pub async fn list_by_owner(db: &PgPool, user_id: &str) -> Result<Vec<TodoRow>, RepoError> {
    let rows = sqlx::query_as::<_, TodoRow>(
        r#"
        SELECT "todoId", "userId", name, "dueDate", done, "attachmentUrl", "createdAt"
        FROM todos
        WHERE "userId" = $1
        ORDER BY "createdAt" DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;

    Ok(rows)
}

pub async fn create(
    db: &PgPool,
    user_id: &str,
    name: &str,
    due_date: NaiveDate,
) -> Result<TodoRow, RepoError> {
    let row = sqlx::query_as::<_, TodoRow>(
        r#"
        INSERT INTO todos ("todoId", "userId", name, "dueDate", done)
        VALUES ($1, $2, $3, $4, FALSE)
        RETURNING "todoId", "userId", name, "dueDate", done, "attachmentUrl", "createdAt"
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(name)
    .bind(due_date)
    .fetch_one(db)
    .await?;

    Ok(row)
}

pub async fn get(db: &PgPool, todo_id: Uuid) -> Result<Option<TodoRow>, RepoError> {
    let row = sqlx::query_as::<_, TodoRow>(
        r#"
        SELECT "todoId", "userId", name, "dueDate", done, "attachmentUrl", "createdAt"
        FROM todos
        WHERE "todoId" = $1
        "#,
    )
    .bind(todo_id)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

/// Owner-scoped update: the WHERE clause repeats the ownership condition
/// so a concurrent owner change cannot slip a write past the handler's
/// check.
pub async fn update(
    db: &PgPool,
    todo_id: Uuid,
    user_id: &str,
    name: Option<&str>,
    due_date: Option<NaiveDate>,
    done: Option<bool>,
) -> Result<Option<TodoRow>, RepoError> {
    let row = sqlx::query_as::<_, TodoRow>(
        r#"
        UPDATE todos
        SET
            name = COALESCE($3, name),
            "dueDate" = COALESCE($4, "dueDate"),
            done = COALESCE($5, done)
        WHERE "todoId" = $1 AND "userId" = $2
        RETURNING "todoId", "userId", name, "dueDate", done, "attachmentUrl", "createdAt"
        "#,
    )
    .bind(todo_id)
    .bind(user_id)
    .bind(name)
    .bind(due_date)
    .bind(done)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn delete(db: &PgPool, todo_id: Uuid, user_id: &str) -> Result<bool, RepoError> {
    let result = sqlx::query(
        r#"
        DELETE FROM todos
        WHERE "todoId" = $1 AND "userId" = $2
        "#,
    )
    .bind(todo_id)
    .bind(user_id)
    .execute(db)
    .await?;

    Ok(result.rows_affected() > 0)
}
