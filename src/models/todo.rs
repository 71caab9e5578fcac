use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Todo {
    pub id: String,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTodo {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl NewTodo {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTodo {
    pub title: String,
    pub description: String,
    pub completed: bool,
}

/// Body of the create/update HTML forms.
///
/// A checkbox that is not ticked is simply absent from the submitted form,
/// so `completed` only records whether the key was sent at all.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TodoForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub completed: Option<String>,
}

impl TodoForm {
    pub fn into_new(self) -> NewTodo {
        NewTodo {
            title: self.title,
            description: self.description,
        }
    }

    pub fn into_update(self) -> UpdateTodo {
        UpdateTodo {
            completed: self.completed.is_some(),
            title: self.title,
            description: self.description,
        }
    }
}
