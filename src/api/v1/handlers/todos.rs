/*
 * Responsibility
 * - /todos CRUD handlers
 * - Every mutation is attributed to the AuthCtx principal; the ownership
 *   check runs before any state change (Forbidden beats the update)
 */
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    api::v1::{
        dto::todos::{
            CreateTodoRequest, TodoItemEnvelope, TodoListEnvelope, TodoResponse,
            UpdateTodoRequest,
        },
        extractors::AuthCtxExtractor,
    },
    error::AppError,
    repos::todo_repo,
    services::authz::CallerIdentity,
    state::AppState,
};

fn row_to_response(row: todo_repo::TodoRow) -> TodoResponse {
    TodoResponse {
        todo_id: row.todo_id,
        name: row.name,
        due_date: row.due_date,
        done: row.done,
        attachment_url: row.attachment_url,
        created_at: row.created_at,
    }
}

/// Recorded owner must equal the caller's principal, byte for byte.
/// Callers and owner records use the same raw identity format.
fn ensure_owner(recorded_owner: &str, caller: &CallerIdentity) -> Result<(), AppError> {
    if recorded_owner == caller.as_str() {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

pub async fn list_todos(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
) -> Result<Json<TodoListEnvelope>, AppError> {
    let rows = todo_repo::list_by_owner(&state.db, auth.principal.as_str()).await?;

    Ok(Json(TodoListEnvelope {
        items: rows.into_iter().map(row_to_response).collect(),
    }))
}

pub async fn create_todo(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    Json(req): Json<CreateTodoRequest>,
) -> Result<(StatusCode, Json<TodoItemEnvelope>), AppError> {
    req.validate()
        .map_err(|msg| AppError::bad_request("INVALID_TODO", msg))?;

    let row = todo_repo::create(&state.db, auth.principal.as_str(), &req.name, req.due_date)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(TodoItemEnvelope {
            item: row_to_response(row),
        }),
    ))
}

pub async fn update_todo(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    Path(todo_id): Path<Uuid>,
    Json(req): Json<UpdateTodoRequest>,
) -> Result<(StatusCode, Json<TodoItemEnvelope>), AppError> {
    req.validate()
        .map_err(|msg| AppError::bad_request("INVALID_TODO", msg))?;

    // Ownership is decided before anything is written.
    let existing = todo_repo::get(&state.db, todo_id)
        .await?
        .ok_or(AppError::not_found("todo"))?;
    ensure_owner(&existing.user_id, &auth.principal)?;

    // The update is owner-scoped as well, so a row that changed hands
    // between the check and the write comes back as not found.
    let row = todo_repo::update(
        &state.db,
        todo_id,
        auth.principal.as_str(),
        req.name.as_deref(),
        req.due_date,
        req.done,
    )
    .await?
    .ok_or(AppError::not_found("todo"))?;

    Ok((
        StatusCode::NO_CONTENT,
        Json(TodoItemEnvelope {
            item: row_to_response(row),
        }),
    ))
}

pub async fn delete_todo(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    Path(todo_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let existing = todo_repo::get(&state.db, todo_id)
        .await?
        .ok_or(AppError::not_found("todo"))?;
    ensure_owner(&existing.user_id, &auth.principal)?;

    let deleted = todo_repo::delete(&state.db, todo_id, auth.principal.as_str()).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("todo"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_match_passes() {
        let caller = CallerIdentity::for_tests("user-123");
        assert!(ensure_owner("user-123", &caller).is_ok());
    }

    #[test]
    fn owner_mismatch_is_forbidden() {
        let caller = CallerIdentity::for_tests("user-123");
        assert!(matches!(
            ensure_owner("user-456", &caller),
            Err(AppError::Forbidden)
        ));
    }

    #[test]
    fn owner_comparison_is_not_normalized() {
        let caller = CallerIdentity::for_tests("user-123");
        assert!(matches!(
            ensure_owner("USER-123", &caller),
            Err(AppError::Forbidden)
        ));
        assert!(matches!(
            ensure_owner(" user-123", &caller),
            Err(AppError::Forbidden)
        ));
    }
}
