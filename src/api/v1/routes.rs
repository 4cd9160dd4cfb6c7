/*
 * Responsibility
 * - v1 URL structure
 * - /health stays open; everything under /todos sits behind the bearer
 *   authorization layer
 */
use axum::{
    Router,
    routing::{get, patch},
};

use crate::middleware;
use crate::state::AppState;

use crate::api::v1::handlers::{
    health::health,
    todos::{create_todo, delete_todo, list_todos, update_todo},
};

pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/{todo_id}", patch(update_todo).delete(delete_todo));

    let protected = middleware::auth::access::apply(protected, state);

    Router::new().route("/health", get(health)).merge(protected)
}
