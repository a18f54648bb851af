//! Query construction: sort/filter vocabulary and predicate composition.

pub mod predicate;
pub mod vocabulary;

pub use predicate::Predicate;
pub use vocabulary::{FilterKey, Sort, SortDirection, SortField, parse_flag};
