//! Read-side task operations.

use crate::error::ApiResult;
use crate::query::{Predicate, Sort};
use crate::store::TaskStore;
use crate::types::Task;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Answers task listings and lookups. Holds nothing but the store handle.
#[derive(Clone)]
pub struct TaskQueryService {
    store: Arc<dyn TaskStore>,
}

impl TaskQueryService {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    /// List tasks matching every entry of `filter`, ordered by `sort`.
    ///
    /// An unparseable filter fails before the store is queried.
    pub fn get_all_tasks(
        &self,
        filter: &HashMap<String, String>,
        sort: Sort,
    ) -> ApiResult<Vec<Task>> {
        let predicate = Predicate::from_filter(filter)?;
        let tasks = self.store.find_all(&predicate, &sort)?;

        debug!(
            filters = filter.len(),
            sort_field = %sort.field,
            sort_direction = %sort.direction,
            count = tasks.len(),
            "Listed tasks"
        );
        Ok(tasks)
    }

    /// Fetch one task. `None` when no task has this id.
    pub fn get_task_by_id(&self, id: i64) -> ApiResult<Option<Task>> {
        let task = self.store.find_by_id(id)?;
        if task.is_none() {
            debug!(task_id = id, "Task not found");
        }
        Ok(task)
    }
}
