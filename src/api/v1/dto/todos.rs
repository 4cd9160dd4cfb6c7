/*
 * Responsibility
 * - Todos request/response DTOs (camelCase wire format)
 * - validate() for shape checks
 */
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodoRequest {
    pub name: String,
    pub due_date: NaiveDate,
}

impl CreateTodoRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() {
            return Err("name is required");
        }
        if self.name.len() > 256 {
            return Err("name must be <= 256 chars");
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodoRequest {
    pub name: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub done: Option<bool>,
}

impl UpdateTodoRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err("name cannot be empty");
            }
            if name.len() > 256 {
                return Err("name must be <= 256 chars");
            }
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoResponse {
    pub todo_id: Uuid,
    pub name: String,
    pub due_date: NaiveDate,
    pub done: bool,
    pub attachment_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// `{"item": ...}` envelope used by create/update responses.
#[derive(Debug, Serialize)]
pub struct TodoItemEnvelope {
    pub item: TodoResponse,
}

/// `{"items": [...]}` envelope used by list responses.
#[derive(Debug, Serialize)]
pub struct TodoListEnvelope {
    pub items: Vec<TodoResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_requires_a_name() {
        let req = CreateTodoRequest {
            name: "   ".into(),
            due_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn update_accepts_partial_payloads() {
        let req = UpdateTodoRequest {
            name: None,
            due_date: None,
            done: Some(true),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn update_rejects_empty_name() {
        let req = UpdateTodoRequest {
            name: Some("".into()),
            due_date: None,
            done: None,
        };
        assert!(req.validate().is_err());
    }
}
