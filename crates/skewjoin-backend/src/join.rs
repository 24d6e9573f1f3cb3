//! Join kind and equality predicate shared between the planner and backends.

use serde::{Deserialize, Serialize};

/// Join kind enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
}

impl JoinType {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "inner" => Ok(JoinType::Inner),
            "left" | "leftouter" => Ok(JoinType::Left),
            "right" | "rightouter" => Ok(JoinType::Right),
            "full" | "outer" => Ok(JoinType::Full),
            _ => Err(format!("unknown join type: {}", s)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JoinType::Inner => "inner",
            JoinType::Left => "left",
            JoinType::Right => "right",
            JoinType::Full => "full",
        }
    }

    /// Whether unmatched left-side rows survive, padded with nulls.
    pub fn keeps_left(&self) -> bool {
        matches!(self, JoinType::Left | JoinType::Full)
    }

    /// Whether unmatched right-side rows survive, padded with nulls.
    pub fn keeps_right(&self) -> bool {
        matches!(self, JoinType::Right | JoinType::Full)
    }
}

/// Conjunction of per-column equalities between the two sides of one join
/// step. When `null_safe` is set each equality is true for null = null,
/// otherwise nulls never match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinPredicate {
    /// (left column, right column) name pairs, in key order.
    pub on: Vec<(String, String)>,
    pub null_safe: bool,
}

impl JoinPredicate {
    pub fn new(on: Vec<(String, String)>, null_safe: bool) -> Self {
        Self { on, null_safe }
    }
}
