use async_trait::async_trait;
use sqlx::PgPool;

use super::dto::{NewTodo, TodoField, TodoPatch};
use super::model::Todo;
use crate::error::{AppError, Result};

const TODO_COLUMNS: &str = "id, title, description, completed, created_at, updated_at";

/// Storage for todos. Each call is its own unit of work: it either commits fully or leaves
/// the table untouched.
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Todos ordered by id, skipping `skip` rows and returning at most `limit`.
    async fn list(&self, skip: u32, limit: u32) -> Result<Vec<Todo>>;

    /// Inserts a row; id, `completed` and both timestamps come from the table defaults.
    async fn create(&self, todo: NewTodo) -> Result<Todo>;

    /// Applies only the fields in `patch` and refreshes `updated_at`.
    /// An empty patch writes nothing and returns the stored row.
    async fn update(&self, id: i32, patch: TodoPatch) -> Result<Todo>;

    async fn delete(&self, id: i32) -> Result<()>;

    /// Round trip used by the health check.
    async fn ping(&self) -> Result<()>;
}

pub struct PgTodoRepository {
    pool: PgPool,
}

impl PgTodoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TodoRepository for PgTodoRepository {
    async fn list(&self, skip: u32, limit: u32) -> Result<Vec<Todo>> {
        let todos = sqlx::query_as::<_, Todo>(&format!(
            "SELECT {TODO_COLUMNS} FROM todos ORDER BY id ASC OFFSET $1 LIMIT $2"
        ))
        .bind(i64::from(skip))
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        Ok(todos)
    }

    async fn create(&self, todo: NewTodo) -> Result<Todo> {
        let mut tx = self.pool.begin().await?;

        let rec = sqlx::query_as::<_, Todo>(&format!(
            r#"
            INSERT INTO todos (title, description)
            VALUES ($1, $2)
            RETURNING {TODO_COLUMNS}
            "#
        ))
        .bind(&todo.title)
        .bind(&todo.description)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(rec)
    }

    async fn update(&self, id: i32, patch: TodoPatch) -> Result<Todo> {
        if patch.is_empty() {
            return sqlx::query_as::<_, Todo>(&format!(
                "SELECT {TODO_COLUMNS} FROM todos WHERE id = $1"
            ))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::NotFound);
        }

        // Build the SET list from the fields that were actually sent
        let mut query = String::from("UPDATE todos SET updated_at = (NOW() AT TIME ZONE 'UTC')");
        let mut bind_count = 1;

        for field in &patch.fields {
            query.push_str(&format!(", {} = ${}", field.column(), bind_count));
            bind_count += 1;
        }

        query.push_str(&format!(
            " WHERE id = ${} RETURNING {TODO_COLUMNS}",
            bind_count
        ));

        let mut query_builder = sqlx::query_as::<_, Todo>(&query);

        for field in patch.fields {
            query_builder = match field {
                TodoField::Title(title) => query_builder.bind(title),
                TodoField::Description(description) => query_builder.bind(description),
                TodoField::Completed(completed) => query_builder.bind(completed),
            };
        }

        let mut tx = self.pool.begin().await?;

        let rec = query_builder
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(AppError::NotFound)?;

        tx.commit().await?;

        Ok(rec)
    }

    async fn delete(&self, id: i32) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
