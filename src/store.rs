//! Persistence interface consumed by the task services.

use crate::query::{Predicate, Sort};
use crate::types::Task;
use anyhow::Result;

/// Relational store for task aggregates.
///
/// Implementations own atomicity: `save` and `delete_by_id` must either apply
/// completely (task row plus subtask reconciliation) or not at all.
pub trait TaskStore: Send + Sync {
    /// Load a task and its subtasks.
    fn find_by_id(&self, id: i64) -> Result<Option<Task>>;

    /// Load every task matching `predicate`, ordered by `sort`.
    fn find_all(&self, predicate: &Predicate, sort: &Sort) -> Result<Vec<Task>>;

    /// Insert (`task.id == None`) or update a task and return the stored aggregate.
    ///
    /// On update the stored subtask set becomes exactly `task.subtasks`:
    /// subtasks missing from it are deleted.
    fn save(&self, task: &Task) -> Result<Task>;

    /// Delete a task and all of its subtasks. Returns false if nothing was deleted.
    fn delete_by_id(&self, id: i64) -> Result<bool>;
}
