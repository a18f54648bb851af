//! Composable task predicates built from raw filter maps.

use super::vocabulary::{FilterKey, parse_flag};
use crate::error::ApiResult;
use crate::types::{Priority, Task};
use std::collections::HashMap;

/// Boolean test over a task's attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Predicate {
    /// Matches every task.
    #[default]
    All,
    PriorityEquals(Priority),
    CompletedEquals(bool),
    /// Conjunction of at least two distinct leaf predicates.
    And(Vec<Predicate>),
}

impl Predicate {
    /// Logical AND. `All` is the identity on either side.
    ///
    /// The result stays flat and drops repeated leaves, so a conjunction holds
    /// at most one entry per distinct priority or completed value.
    pub fn and(self, other: Predicate) -> Predicate {
        let mut leaves = self.into_leaves();
        for leaf in other.into_leaves() {
            if !leaves.contains(&leaf) {
                leaves.push(leaf);
            }
        }

        if leaves.len() > 1 {
            Predicate::And(leaves)
        } else {
            leaves.pop().unwrap_or_default()
        }
    }

    fn into_leaves(self) -> Vec<Predicate> {
        match self {
            Predicate::All => Vec::new(),
            Predicate::And(leaves) => leaves,
            leaf => vec![leaf],
        }
    }

    /// Build the predicate for a single filter entry.
    pub fn from_entry(key: &str, value: &str) -> ApiResult<Predicate> {
        match FilterKey::classify(key) {
            FilterKey::Priority => Ok(Predicate::PriorityEquals(value.parse()?)),
            FilterKey::Completed => Ok(Predicate::CompletedEquals(parse_flag(value))),
        }
    }

    /// AND together one predicate per filter entry. An empty map yields `All`.
    ///
    /// Fails on the first unparseable priority value; nothing is partially built.
    pub fn from_filter(filter: &HashMap<String, String>) -> ApiResult<Predicate> {
        let parts = filter
            .iter()
            .map(|(key, value)| Predicate::from_entry(key, value))
            .collect::<ApiResult<Vec<_>>>()?;

        Ok(parts
            .into_iter()
            .reduce(Predicate::and)
            .unwrap_or(Predicate::All))
    }

    /// Evaluate against an in-memory task.
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            Predicate::All => true,
            Predicate::PriorityEquals(p) => task.priority == *p,
            Predicate::CompletedEquals(c) => task.completed == *c,
            Predicate::And(leaves) => leaves.iter().all(|p| p.matches(task)),
        }
    }
}
