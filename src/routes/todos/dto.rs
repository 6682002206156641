use serde::{Deserialize, Deserializer};

use crate::error::{AppError, Result};

pub const TITLE_MAX_CHARS: usize = 255;
const DEFAULT_LIMIT: u32 = 100;

#[derive(Debug, Deserialize)]
pub struct CreateTodo {
    pub title: String,
    pub description: Option<String>,
}

/// Validated insert payload. Ids, `completed` and timestamps come from the table defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub title: String,
    pub description: Option<String>,
}

impl CreateTodo {
    pub fn validate(self) -> Result<NewTodo> {
        validate_title(&self.title).map_err(AppError::Validation)?;
        if let Some(description) = &self.description {
            validate_description(description).map_err(AppError::Validation)?;
        }

        Ok(NewTodo {
            title: self.title,
            description: self.description,
        })
    }
}

/// Outer `None` means the key was absent, `Some(None)` means an explicit `null`.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTodo {
    #[serde(default, deserialize_with = "present")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub completed: Option<Option<bool>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoField {
    Title(String),
    Description(Option<String>),
    Completed(bool),
}

impl TodoField {
    pub fn column(&self) -> &'static str {
        match self {
            TodoField::Title(_) => "title",
            TodoField::Description(_) => "description",
            TodoField::Completed(_) => "completed",
        }
    }
}

/// Only the fields that were present in the request body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    pub fields: Vec<TodoField>,
}

impl TodoPatch {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl UpdateTodo {
    pub fn into_patch(self) -> Result<TodoPatch> {
        let mut fields = Vec::new();

        match self.title {
            None => {}
            Some(None) => {
                return Err(AppError::Validation("title cannot be null".to_string()));
            }
            Some(Some(title)) => {
                validate_title(&title).map_err(AppError::Validation)?;
                fields.push(TodoField::Title(title));
            }
        }

        if let Some(description) = self.description {
            if let Some(text) = &description {
                validate_description(text).map_err(AppError::Validation)?;
            }
            fields.push(TodoField::Description(description));
        }

        match self.completed {
            None => {}
            Some(None) => {
                return Err(AppError::Validation("completed cannot be null".to_string()));
            }
            Some(Some(completed)) => fields.push(TodoField::Completed(completed)),
        }

        Ok(TodoPatch { fields })
    }
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub skip: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl ListParams {
    pub fn validate(&self) -> Result<()> {
        if self.limit == 0 {
            return Err(AppError::Validation(
                "limit must be a positive integer".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

fn present<'de, T, D>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

pub fn validate_title(title: &str) -> std::result::Result<(), String> {
    if title.trim().is_empty() {
        return Err("title cannot be empty".to_string());
    }

    if title.contains('\0') {
        return Err("title cannot contain NUL characters".to_string());
    }

    if title.chars().count() > TITLE_MAX_CHARS {
        return Err(format!(
            "title is too long (Max: {} characters)",
            TITLE_MAX_CHARS
        ));
    }

    Ok(())
}

// Postgres text columns cannot store U+0000
pub fn validate_description(description: &str) -> std::result::Result<(), String> {
    if description.contains('\0') {
        return Err("description cannot contain NUL characters".to_string());
    }

    Ok(())
}
