//! Task and subtask persistence.

use super::filter::{order_clause, where_clause};
use super::{Database, now_ms};
use crate::query::{Predicate, Sort};
use crate::store::TaskStore;
use crate::types::{Priority, Subtask, Task};
use anyhow::{Result, anyhow, bail};
use rusqlite::{Connection, Row, params, params_from_iter};
use std::collections::{HashMap, HashSet};
use tracing::debug;

const TASK_COLUMNS: &str = "t.id, t.description, t.completed, t.priority, t.created_at";
const SUBTASK_COLUMNS: &str = "s.id, s.task_id, s.description, s.completed, s.priority";

pub fn parse_task_row(row: &Row) -> rusqlite::Result<Task> {
    let priority: String = row.get("priority")?;
    let priority = priority.parse::<Priority>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            3,
            rusqlite::types::Type::Text,
            Box::new(e),
        )
    })?;

    Ok(Task {
        id: Some(row.get("id")?),
        description: row.get("description")?,
        completed: row.get("completed")?,
        priority,
        created_at: row.get("created_at")?,
        subtasks: Vec::new(),
    })
}

pub fn parse_subtask_row(row: &Row) -> rusqlite::Result<Subtask> {
    Ok(Subtask {
        id: Some(row.get("id")?),
        task_id: Some(row.get("task_id")?),
        description: row.get("description")?,
        completed: row.get("completed")?,
        priority: row.get("priority")?,
    })
}

/// Internal helper to get a task using an existing connection (avoids deadlock).
fn get_task_internal(conn: &Connection, task_id: i64) -> Result<Option<Task>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM tasks t WHERE t.id = ?1",
        TASK_COLUMNS
    ))?;

    let result = stmt.query_row(params![task_id], parse_task_row);

    match result {
        Ok(mut task) => {
            task.subtasks = get_subtasks_internal(conn, task_id)?;
            Ok(Some(task))
        }
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn get_subtasks_internal(conn: &Connection, task_id: i64) -> Result<Vec<Subtask>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM subtasks s WHERE s.task_id = ?1 ORDER BY s.id",
        SUBTASK_COLUMNS
    ))?;

    let subtasks = stmt
        .query_map(params![task_id], parse_subtask_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(subtasks)
}

fn insert_task_row(conn: &Connection, task: &Task) -> Result<i64> {
    conn.execute(
        "INSERT INTO tasks (description, completed, priority, created_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            task.description,
            task.completed,
            task.priority.as_str(),
            now_ms()
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Overwrite the mutable columns. `created_at` is never touched after insert.
fn update_task_row(conn: &Connection, task_id: i64, task: &Task) -> Result<()> {
    let updated = conn.execute(
        "UPDATE tasks SET description = ?1, completed = ?2, priority = ?3 WHERE id = ?4",
        params![
            task.description,
            task.completed,
            task.priority.as_str(),
            task_id
        ],
    )?;

    if updated == 0 {
        bail!("Cannot update task {}: no such row", task_id);
    }
    Ok(())
}

/// Make the stored subtasks of `task_id` exactly `subtasks`.
///
/// Subtasks carrying an id already owned by this task are updated in place,
/// the rest are inserted, and owned subtasks absent from the list are deleted.
fn sync_subtasks(conn: &Connection, task_id: i64, subtasks: &[Subtask]) -> Result<()> {
    let existing: HashSet<i64> = {
        let mut stmt = conn.prepare("SELECT id FROM subtasks WHERE task_id = ?1")?;
        let ids = stmt
            .query_map(params![task_id], |row| row.get(0))?
            .collect::<rusqlite::Result<_>>()?;
        ids
    };

    let kept: HashSet<i64> = subtasks
        .iter()
        .filter_map(|s| s.id)
        .filter(|id| existing.contains(id))
        .collect();

    for orphan in existing.difference(&kept) {
        conn.execute("DELETE FROM subtasks WHERE id = ?1", params![orphan])?;
    }

    for subtask in subtasks {
        match subtask.id.filter(|id| kept.contains(id)) {
            Some(id) => {
                conn.execute(
                    "UPDATE subtasks SET description = ?1, completed = ?2, priority = ?3
                     WHERE id = ?4",
                    params![subtask.description, subtask.completed, subtask.priority, id],
                )?;
            }
            None => {
                conn.execute(
                    "INSERT INTO subtasks (task_id, description, completed, priority)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![
                        task_id,
                        subtask.description,
                        subtask.completed,
                        subtask.priority
                    ],
                )?;
            }
        }
    }

    debug!(
        task_id,
        removed = existing.len() - kept.len(),
        total = subtasks.len(),
        "Synced subtasks"
    );
    Ok(())
}

impl TaskStore for Database {
    fn find_by_id(&self, id: i64) -> Result<Option<Task>> {
        self.with_conn(|conn| get_task_internal(conn, id))
    }

    fn find_all(&self, predicate: &Predicate, sort: &Sort) -> Result<Vec<Task>> {
        let mut params = Vec::new();
        let filter = where_clause(predicate, &mut params);
        let order = order_clause(sort);

        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM tasks t WHERE {} ORDER BY {}",
                TASK_COLUMNS, filter, order
            ))?;
            let mut tasks = stmt
                .query_map(params_from_iter(params.iter()), parse_task_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            // Fetch the subtasks of every matching task in one pass.
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM subtasks s
                 WHERE s.task_id IN (SELECT t.id FROM tasks t WHERE {})
                 ORDER BY s.id",
                SUBTASK_COLUMNS, filter
            ))?;
            let mut by_task: HashMap<i64, Vec<Subtask>> = HashMap::new();
            for subtask in stmt.query_map(params_from_iter(params.iter()), parse_subtask_row)? {
                let subtask = subtask?;
                if let Some(task_id) = subtask.task_id {
                    by_task.entry(task_id).or_default().push(subtask);
                }
            }

            for task in &mut tasks {
                if let Some(subtasks) = task.id.and_then(|id| by_task.remove(&id)) {
                    task.subtasks = subtasks;
                }
            }

            Ok(tasks)
        })
    }

    fn save(&self, task: &Task) -> Result<Task> {
        self.with_transaction(|tx| {
            let task_id = match task.id {
                None => insert_task_row(tx, task)?,
                Some(id) => {
                    update_task_row(tx, id, task)?;
                    id
                }
            };
            sync_subtasks(tx, task_id, &task.subtasks)?;

            get_task_internal(tx, task_id)?
                .ok_or_else(|| anyhow!("Task {} missing after save", task_id))
        })
    }

    fn delete_by_id(&self, id: i64) -> Result<bool> {
        self.with_transaction(|tx| {
            tx.execute("DELETE FROM subtasks WHERE task_id = ?1", params![id])?;
            let deleted = tx.execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
            Ok(deleted > 0)
        })
    }
}

impl Database {
    /// Count all tasks.
    pub fn count_tasks(&self) -> Result<i64> {
        self.with_conn(|conn| {
            let count = conn.query_row("SELECT COUNT(*) FROM tasks", [], |row| row.get(0))?;
            Ok(count)
        })
    }

    /// Count subtasks across all tasks.
    pub fn count_subtasks(&self) -> Result<i64> {
        self.with_conn(|conn| {
            let count = conn.query_row("SELECT COUNT(*) FROM subtasks", [], |row| row.get(0))?;
            Ok(count)
        })
    }

    /// Insert the two demo tasks if the database has no tasks yet.
    ///
    /// Returns the number of tasks inserted.
    pub fn seed_demo_tasks(&self) -> Result<usize> {
        if self.count_tasks()? > 0 {
            return Ok(0);
        }

        let demo = [("Task 1", Priority::Low), ("Task 2", Priority::High)];
        for (description, priority) in demo {
            self.save(&Task {
                id: None,
                description: Some(description.to_string()),
                completed: false,
                priority,
                created_at: None,
                subtasks: Vec::new(),
            })?;
        }
        Ok(demo.len())
    }
}
