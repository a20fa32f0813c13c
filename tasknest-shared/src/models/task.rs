/// Task model and database operations
///
/// Tasks are the core entity of tasknest: a titled, described to-do item
/// owned by exactly one user. A task is "open" until its completion
/// timestamp is set, after which it is "completed" and the timestamp never
/// moves again.
///
/// Every lookup and mutation is scoped to `(id, owner_id)`. A caller asking
/// about another user's task gets the same answer as for a task that does
/// not exist.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     owner_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     title VARCHAR(200) NOT NULL,
///     description VARCHAR(1000) NOT NULL,
///     important BOOLEAN NOT NULL DEFAULT FALSE,
///     created TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     completed_at TIMESTAMPTZ
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use tasknest_shared::models::task::{NewTask, Task, TaskChanges};
/// # use sqlx::PgPool;
/// # use uuid::Uuid;
///
/// # async fn example(pool: PgPool, owner_id: Uuid) -> Result<(), sqlx::Error> {
/// let task = Task::create(&pool, owner_id, NewTask {
///     title: "Buy milk".to_string(),
///     description: "2% milk".to_string(),
///     important: false,
/// }).await?;
///
/// let completed = Task::complete(&pool, task.id, owner_id).await?;
/// assert!(completed.unwrap().completed_at.is_some());
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// A to-do item owned by exactly one user
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Owning user
    pub owner_id: Uuid,

    /// Short title (at most 200 characters)
    pub title: String,

    /// Longer description (at most 1000 characters)
    pub description: String,

    /// Whether the task is flagged important
    pub important: bool,

    /// When the task was created; immutable after insert
    pub created: DateTime<Utc>,

    /// When the task was completed; None while open. Set exactly once.
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Whether the task is still open
    pub fn is_open(&self) -> bool {
        self.completed_at.is_none()
    }
}

/// Field values for inserting a task
///
/// The owner is passed separately by the handler; it never comes from the
/// request body.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub important: bool,
}

/// Field values for updating a task
///
/// Only the user-editable fields; `created`, `completed_at`, and the owner
/// cannot be changed through updates.
#[derive(Debug, Clone)]
pub struct TaskChanges {
    pub title: String,
    pub description: String,
    pub important: bool,
}

impl Task {
    /// Inserts a new task owned by `owner_id`
    pub async fn create(
        pool: &PgPool,
        owner_id: Uuid,
        data: NewTask,
    ) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (owner_id, title, description, important)
            VALUES ($1, $2, $3, $4)
            RETURNING id, owner_id, title, description, important, created, completed_at
            "#,
        )
        .bind(owner_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.important)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID, scoped to its owner
    ///
    /// Returns None both for nonexistent tasks and for tasks owned by
    /// someone else.
    pub async fn find(
        pool: &PgPool,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, owner_id, title, description, important, created, completed_at
            FROM tasks
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists a user's open tasks
    ///
    /// Ordered by creation time so the listing is stable across requests.
    pub async fn list_open(pool: &PgPool, owner_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, owner_id, title, description, important, created, completed_at
            FROM tasks
            WHERE owner_id = $1 AND completed_at IS NULL
            ORDER BY created ASC
            "#,
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Lists a user's completed tasks, newest completion first
    pub async fn list_completed(
        pool: &PgPool,
        owner_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, owner_id, title, description, important, created, completed_at
            FROM tasks
            WHERE owner_id = $1 AND completed_at IS NOT NULL
            ORDER BY completed_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Updates a task's editable fields, scoped to its owner
    ///
    /// `created`, `completed_at`, and the owner are left untouched.
    /// Returns None if the task does not exist or is owned by someone else.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        owner_id: Uuid,
        changes: TaskChanges,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET title = $3, description = $4, important = $5
            WHERE id = $1 AND owner_id = $2
            RETURNING id, owner_id, title, description, important, created, completed_at
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(changes.title)
        .bind(changes.description)
        .bind(changes.important)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Marks a task completed, scoped to its owner
    ///
    /// The timestamp is set only if the task is still open; completing an
    /// already completed task leaves the original timestamp in place. Either
    /// way the current row is returned, or None if the task does not exist
    /// for this owner.
    pub async fn complete(
        pool: &PgPool,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let completed = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET completed_at = NOW()
            WHERE id = $1 AND owner_id = $2 AND completed_at IS NULL
            RETURNING id, owner_id, title, description, important, created, completed_at
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await?;

        match completed {
            Some(task) => Ok(Some(task)),
            // Already completed, or missing; the scoped find distinguishes
            None => Self::find(pool, id, owner_id).await,
        }
    }

    /// Deletes a task, scoped to its owner
    ///
    /// Returns true if a row was removed.
    pub async fn delete(pool: &PgPool, id: Uuid, owner_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_open() {
        let mut task = Task {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            title: "Buy milk".to_string(),
            description: "2% milk".to_string(),
            important: false,
            created: Utc::now(),
            completed_at: None,
        };
        assert!(task.is_open());

        task.completed_at = Some(Utc::now());
        assert!(!task.is_open());
    }

    // Store-level invariants (owner scoping, single-shot completion,
    // listing order) are covered in tests/store_tests.rs.
}
