//! Rendering of predicates and sort orders into SQL fragments.
//!
//! Values are always bound as positional parameters; only fixed column
//! names and keywords are interpolated.

use crate::query::{Predicate, Sort, SortField};
use rusqlite::types::Value;

/// Priority ordered by rank rather than by its stored name.
const PRIORITY_RANK: &str =
    "CASE t.priority WHEN 'LOW' THEN 0 WHEN 'MEDIUM' THEN 1 WHEN 'HIGH' THEN 2 END";

/// Build a WHERE expression over the `tasks t` alias, appending bound values to `params`.
pub(super) fn where_clause(predicate: &Predicate, params: &mut Vec<Value>) -> String {
    match predicate {
        Predicate::All => "1 = 1".to_string(),
        Predicate::PriorityEquals(priority) => {
            params.push(Value::Text(priority.as_str().to_string()));
            "t.priority = ?".to_string()
        }
        Predicate::CompletedEquals(completed) => {
            params.push(Value::Integer(i64::from(*completed)));
            "t.completed = ?".to_string()
        }
        Predicate::And(leaves) => {
            let parts: Vec<String> = leaves.iter().map(|p| where_clause(p, params)).collect();
            format!("({})", parts.join(" AND "))
        }
    }
}

/// Build an ORDER BY expression with `t.id` as a stable tiebreaker.
pub(super) fn order_clause(sort: &Sort) -> String {
    let expr = match sort.field {
        SortField::Priority => PRIORITY_RANK.to_string(),
        field => format!("t.{}", field.column()),
    };

    if sort.field == SortField::Id {
        format!("{} {}", expr, sort.direction.as_sql())
    } else {
        format!("{} {}, t.id ASC", expr, sort.direction.as_sql())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::SortDirection;
    use crate::types::Priority;

    #[test]
    fn all_renders_tautology_without_params() {
        let mut params = Vec::new();
        assert_eq!(where_clause(&Predicate::All, &mut params), "1 = 1");
        assert!(params.is_empty());
    }

    #[test]
    fn conjunction_binds_values_in_order() {
        let predicate = Predicate::PriorityEquals(Priority::High)
            .and(Predicate::CompletedEquals(true));
        let mut params = Vec::new();
        let sql = where_clause(&predicate, &mut params);

        assert_eq!(sql, "(t.priority = ? AND t.completed = ?)");
        assert_eq!(
            params,
            vec![Value::Text("HIGH".to_string()), Value::Integer(1)]
        );
    }

    #[test]
    fn conjunction_stays_flat() {
        let predicate = Predicate::CompletedEquals(false)
            .and(Predicate::PriorityEquals(Priority::Low))
            .and(Predicate::PriorityEquals(Priority::High));
        let mut params = Vec::new();
        let sql = where_clause(&predicate, &mut params);

        assert_eq!(
            sql,
            "(t.completed = ? AND t.priority = ? AND t.priority = ?)"
        );
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn priority_orders_by_rank() {
        let sort = Sort::new(SortField::Priority, SortDirection::Desc);
        assert_eq!(order_clause(&sort), format!("{} DESC, t.id ASC", PRIORITY_RANK));
    }

    #[test]
    fn id_order_needs_no_tiebreaker() {
        let sort = Sort::new(SortField::Id, SortDirection::Asc);
        assert_eq!(order_clause(&sort), "t.id ASC");
    }
}
