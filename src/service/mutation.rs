//! Write-side task operations: create, full replacement and delete.

use crate::error::{ApiError, ApiResult};
use crate::store::TaskStore;
use crate::types::{SubtaskPayload, Task, TaskPayload};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

/// Drives a task through `absent -> created -> (updated)* -> deleted`.
#[derive(Clone)]
pub struct TaskMutationService {
    store: Arc<dyn TaskStore>,
}

impl TaskMutationService {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    /// Persist a new task together with its subtasks.
    ///
    /// Client-supplied ids are discarded; the store assigns ids and `created_at`.
    pub fn create_task(&self, candidate: TaskPayload) -> ApiResult<Task> {
        let task = Task {
            id: None,
            description: candidate.description,
            completed: candidate.completed,
            priority: candidate.priority,
            created_at: None,
            subtasks: candidate
                .subtasks
                .unwrap_or_default()
                .into_iter()
                .map(|s| s.into_subtask(None, false))
                .collect(),
        };

        let saved = self.store.save(&task)?;
        info!(
            task_id = ?saved.id,
            subtasks = saved.subtasks.len(),
            "Created task"
        );
        Ok(saved)
    }

    /// Replace the mutable fields of an existing task.
    ///
    /// Description, completed and priority are copied onto the stored task;
    /// its id and creation time are kept. A `Some` subtask list replaces the
    /// stored set (removed subtasks are deleted), `None` leaves it alone.
    /// Returns `None` without writing when the task does not exist.
    /// A subtask id listed twice is rejected before the store is touched.
    pub fn update_task(&self, id: i64, replacement: TaskPayload) -> ApiResult<Option<Task>> {
        if let Some(subtasks) = &replacement.subtasks {
            reject_duplicate_ids(subtasks)?;
        }

        let Some(mut existing) = self.store.find_by_id(id)? else {
            debug!(task_id = id, "Update skipped, task not found");
            return Ok(None);
        };

        existing.description = replacement.description;
        existing.completed = replacement.completed;
        existing.priority = replacement.priority;

        if let Some(subtasks) = replacement.subtasks {
            let task_id = existing.id;
            existing.subtasks.clear();
            existing
                .subtasks
                .extend(subtasks.into_iter().map(|s| s.into_subtask(task_id, true)));
        }

        let saved = self.store.save(&existing)?;
        info!(task_id = id, subtasks = saved.subtasks.len(), "Updated task");
        Ok(Some(saved))
    }

    /// Delete a task and its subtasks, returning the task as it was before deletion.
    pub fn delete_task(&self, id: i64) -> ApiResult<Option<Task>> {
        let Some(existing) = self.store.find_by_id(id)? else {
            debug!(task_id = id, "Delete skipped, task not found");
            return Ok(None);
        };

        self.store.delete_by_id(id)?;
        info!(task_id = id, subtasks = existing.subtasks.len(), "Deleted task");
        Ok(Some(existing))
    }
}

fn reject_duplicate_ids(subtasks: &[SubtaskPayload]) -> ApiResult<()> {
    let mut seen = HashSet::new();
    for id in subtasks.iter().filter_map(|s| s.id) {
        if !seen.insert(id) {
            return Err(ApiError::invalid_argument(
                "subtasks",
                &format!("Subtask id {} appears more than once", id),
            ));
        }
    }
    Ok(())
}
