//! Closed vocabularies for sorting and filtering tasks.

use crate::error::{ApiError, ApiResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sort direction. Parsed case-insensitively.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Native ordering token for the relational store.
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl FromStr for SortDirection {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ASC" => Ok(SortDirection::Asc),
            "DESC" => Ok(SortDirection::Desc),
            _ => Err(ApiError::invalid_argument(
                "sortDirection",
                &format!("Unknown sort direction '{}', expected ASC or DESC", s),
            )),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Task attribute a listing can be ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortField {
    #[default]
    Priority,
    Id,
    Description,
    Completed,
    CreatedAt,
}

impl SortField {
    pub const ALL: [SortField; 5] = [
        SortField::Priority,
        SortField::Id,
        SortField::Description,
        SortField::Completed,
        SortField::CreatedAt,
    ];

    /// Symbolic name accepted on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Priority => "PRIORITY",
            SortField::Id => "ID",
            SortField::Description => "DESCRIPTION",
            SortField::Completed => "COMPLETED",
            SortField::CreatedAt => "CREATED_AT",
        }
    }

    /// Underlying `tasks` column the field orders by.
    pub fn column(&self) -> &'static str {
        match self {
            SortField::Priority => "priority",
            SortField::Id => "id",
            SortField::Description => "description",
            SortField::Completed => "completed",
            SortField::CreatedAt => "created_at",
        }
    }
}

impl FromStr for SortField {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.to_ascii_uppercase();
        SortField::ALL
            .into_iter()
            .find(|f| f.as_str() == wanted)
            .ok_or_else(|| {
                ApiError::invalid_argument(
                    "sortField",
                    &format!("Unknown sort field '{}'", s),
                )
            })
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Requested ordering for a task listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Sort {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Parse raw transport values. Missing or blank values take the
    /// contractual defaults (PRIORITY, ASC); unknown values are rejected.
    pub fn parse(field: Option<&str>, direction: Option<&str>) -> ApiResult<Self> {
        let field = non_blank(field).map(str::parse).transpose()?.unwrap_or_default();
        let direction = non_blank(direction)
            .map(str::parse)
            .transpose()?
            .unwrap_or_default();
        Ok(Self { field, direction })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Filter keys understood by the predicate builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKey {
    Priority,
    Completed,
}

impl FilterKey {
    pub const PRIORITY: &'static str = "priority";

    /// Classify a raw filter key.
    ///
    /// Only the exact key `priority` selects the priority filter; every other
    /// key falls back to the completed filter.
    // TODO: reject unknown keys once clients stop relying on the fallback.
    pub fn classify(key: &str) -> FilterKey {
        if key == Self::PRIORITY {
            FilterKey::Priority
        } else {
            FilterKey::Completed
        }
    }
}

/// Lenient boolean parse: `"true"` in any case is true, everything else false.
pub fn parse_flag(value: &str) -> bool {
    value.eq_ignore_ascii_case("true")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn direction_is_case_insensitive() {
        assert_eq!("asc".parse::<SortDirection>().unwrap(), SortDirection::Asc);
        assert_eq!("Desc".parse::<SortDirection>().unwrap(), SortDirection::Desc);
        assert_eq!(SortDirection::Desc.as_sql(), "DESC");
    }

    #[test]
    fn unknown_direction_fails_fast() {
        let err = "sideways".parse::<SortDirection>().unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidArgument);
        assert_eq!(err.field.as_deref(), Some("sortDirection"));
    }

    #[test]
    fn field_maps_to_column() {
        assert_eq!("priority".parse::<SortField>().unwrap().column(), "priority");
        assert_eq!("CREATED_AT".parse::<SortField>().unwrap().column(), "created_at");
        assert!("NAME".parse::<SortField>().is_err());
    }

    #[test]
    fn sort_parse_defaults_missing_or_blank_values() {
        assert_eq!(
            Sort::parse(None, None).unwrap(),
            Sort::new(SortField::Priority, SortDirection::Asc)
        );
        assert_eq!(
            Sort::parse(Some("id"), Some("desc")).unwrap(),
            Sort::new(SortField::Id, SortDirection::Desc)
        );
        assert_eq!(Sort::parse(Some(""), None).unwrap(), Sort::default());
        assert_eq!(Sort::parse(None, Some("  ")).unwrap(), Sort::default());
        assert_eq!(
            Sort::parse(Some(" id "), Some("")).unwrap(),
            Sort::new(SortField::Id, SortDirection::Asc)
        );
        assert!(Sort::parse(Some("NAME"), None).is_err());
    }

    #[test]
    fn filter_key_falls_back_to_completed() {
        assert_eq!(FilterKey::classify("priority"), FilterKey::Priority);
        assert_eq!(FilterKey::classify("completed"), FilterKey::Completed);
        assert_eq!(FilterKey::classify("Priority"), FilterKey::Completed);
        assert_eq!(FilterKey::classify("owner"), FilterKey::Completed);
    }

    #[test]
    fn flag_parse_is_lenient() {
        assert!(parse_flag("true"));
        assert!(parse_flag("TRUE"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag("yes"));
        assert!(!parse_flag(""));
    }
}
