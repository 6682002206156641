//! In-process `TodoRepository` for handler tests. Mirrors the table's server-side defaults.

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

use super::dto::{NewTodo, TodoField, TodoPatch};
use super::model::Todo;
use super::repository::TodoRepository;
use crate::error::{AppError, Result};

#[derive(Default)]
struct Table {
    rows: Vec<Todo>,
    next_id: i32,
}

#[derive(Default)]
pub struct MemoryTodoRepository {
    table: Mutex<Table>,
    offline: AtomicBool,
}

impl MemoryTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every call fail as if the database went away.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub async fn row_count(&self) -> usize {
        self.table.lock().await.rows.len()
    }

    fn check_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

#[async_trait]
impl TodoRepository for MemoryTodoRepository {
    async fn list(&self, skip: u32, limit: u32) -> Result<Vec<Todo>> {
        self.check_online()?;
        let table = self.table.lock().await;

        // rows are kept in insertion order, which is id order
        Ok(table
            .rows
            .iter()
            .skip(skip as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn create(&self, todo: NewTodo) -> Result<Todo> {
        self.check_online()?;
        let mut table = self.table.lock().await;

        table.next_id += 1;
        let ts = now();
        let rec = Todo {
            id: table.next_id,
            title: todo.title,
            description: todo.description,
            completed: false,
            created_at: ts,
            updated_at: ts,
        };
        table.rows.push(rec.clone());

        Ok(rec)
    }

    async fn update(&self, id: i32, patch: TodoPatch) -> Result<Todo> {
        self.check_online()?;
        let mut table = self.table.lock().await;

        let row = table
            .rows
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(AppError::NotFound)?;

        if patch.is_empty() {
            return Ok(row.clone());
        }

        for field in patch.fields {
            match field {
                TodoField::Title(title) => row.title = title,
                TodoField::Description(description) => row.description = description,
                TodoField::Completed(completed) => row.completed = completed,
            }
        }
        row.updated_at = now().max(row.created_at);

        Ok(row.clone())
    }

    async fn delete(&self, id: i32) -> Result<()> {
        self.check_online()?;
        let mut table = self.table.lock().await;

        let before = table.rows.len();
        table.rows.retain(|t| t.id != id);

        if table.rows.len() == before {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        self.check_online()
    }
}
