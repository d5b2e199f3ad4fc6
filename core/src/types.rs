//! Domain types for users and their todos.
//!
//! # Design
//! The same structs are used for storage and for the JSON wire format, so
//! field names here are the field names clients see. A `Todo` only exists
//! inside its owner's `todos` list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::deadline::{timestamp, Deadline};

/// Maximum number of todos a non-pro user may hold.
pub const TODO_QUOTA: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub pro: bool,
    pub todos: Vec<Todo>,
}

impl User {
    pub fn new(name: String, username: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            username,
            pro: false,
            todos: Vec::new(),
        }
    }

    /// Whether the quota still allows this user to add a todo.
    pub fn can_add_todo(&self) -> bool {
        self.pro || self.todos.len() < TODO_QUOTA
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: Uuid,
    pub title: String,
    pub deadline: Deadline,
    pub done: bool,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Todo {
    pub fn new(input: TodoInput) -> Self {
        Self {
            id: Uuid::new_v4(),
            deadline: Deadline::parse(input.deadline.as_deref()),
            title: input.title,
            done: false,
            created_at: Utc::now(),
        }
    }
}

/// Request payload for creating a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub username: String,
}

/// Request payload for creating or updating a todo. Both fields are
/// optional on the wire: a missing `title` is stored empty and `deadline` is
/// kept raw and parsed leniently, see [`Deadline::parse`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TodoInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub deadline: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_user_starts_without_pro_or_todos() {
        let user = User::new("Ada".to_string(), "ada".to_string());
        assert!(!user.pro);
        assert!(user.todos.is_empty());
        assert_eq!(user.id.get_version_num(), 4);
    }

    #[test]
    fn user_serializes_wire_fields() {
        let mut user = User::new("Ada".to_string(), "ada".to_string());
        user.id = Uuid::nil();
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "00000000-0000-0000-0000-000000000000",
                "name": "Ada",
                "username": "ada",
                "pro": false,
                "todos": []
            })
        );
    }

    #[test]
    fn todo_serializes_wire_fields() {
        let todo = Todo::new(TodoInput {
            title: "Ship it".to_string(),
            deadline: Some("2025-01-01".to_string()),
        });
        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(json["title"], "Ship it");
        assert_eq!(json["done"], false);
        assert_eq!(json["deadline"], "2025-01-01T00:00:00.000Z");
        assert!(json["created_at"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn todo_input_deadline_is_optional() {
        let input: TodoInput = serde_json::from_str(r#"{"title":"No deadline"}"#).unwrap();
        assert!(input.deadline.is_none());
        assert!(!Todo::new(input).deadline.is_valid());
    }

    #[test]
    fn todo_input_missing_title_is_empty() {
        let input: TodoInput = serde_json::from_str(r#"{"deadline":"2025-01-01"}"#).unwrap();
        assert_eq!(input.title, "");
        assert_eq!(input.deadline.as_deref(), Some("2025-01-01"));
    }

    #[test]
    fn quota_applies_only_to_non_pro() {
        let mut user = User::new("Ada".to_string(), "ada".to_string());
        for n in 0..TODO_QUOTA {
            assert!(user.can_add_todo());
            user.todos.push(Todo::new(TodoInput {
                title: format!("todo {n}"),
                deadline: None,
            }));
        }
        assert!(!user.can_add_todo());
        user.pro = true;
        assert!(user.can_add_todo());
    }
}
