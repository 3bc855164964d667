//! Enumerated fields and the `all` sentinel
//!
//! Stored values are plain strings. Known values map to variants; anything
//! else is kept verbatim in `Other` so it can still be displayed and ranked
//! last instead of being dropped.

use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Rank given to enumerated values the tracker does not recognise
pub const UNKNOWN_RANK: u8 = 99;

/// The three mirrored collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// `employees` collection
    Employees,
    /// `projects` collection
    Projects,
    /// `tasks` collection
    Tasks,
}

impl EntityKind {
    /// All kinds, in attach order
    pub const ALL: [EntityKind; 3] = [Self::Employees, Self::Projects, Self::Tasks];

    /// Collection name in the document store
    #[inline]
    #[must_use]
    pub fn collection(self) -> &'static str {
        match self {
            Self::Employees => "employees",
            Self::Projects => "projects",
            Self::Tasks => "tasks",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.collection())
    }
}

impl FromStr for EntityKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "employees" => Ok(Self::Employees),
            "projects" => Ok(Self::Projects),
            "tasks" => Ok(Self::Tasks),
            other => Err(ModelError::UnknownKind(other.to_string())),
        }
    }
}

/// Task priority
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Priority {
    /// `high`
    High,
    /// `medium`
    #[default]
    Medium,
    /// `low`
    Low,
    /// Any other stored value
    Other(String),
}

impl Priority {
    /// Stored representation
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::Other(s) => s,
        }
    }

    /// Sort rank: high first, unknown last
    #[inline]
    #[must_use]
    pub fn rank(&self) -> u8 {
        match self {
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
            Self::Other(_) => UNKNOWN_RANK,
        }
    }
}

impl From<&str> for Priority {
    fn from(s: &str) -> Self {
        match s {
            "high" => Self::High,
            "medium" => Self::Medium,
            "low" => Self::Low,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for Priority {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<Priority> for String {
    fn from(p: Priority) -> Self {
        p.as_str().to_string()
    }
}

/// Task status
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskStatus {
    /// `pending`
    #[default]
    Pending,
    /// `in-progress`
    InProgress,
    /// `completed`
    Completed,
    /// Any other stored value
    Other(String),
}

impl TaskStatus {
    /// Known statuses, in filter-option order
    pub const KNOWN: [TaskStatus; 3] = [Self::Pending, Self::InProgress, Self::Completed];

    /// Stored representation
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
            Self::Other(s) => s,
        }
    }

    /// Sort rank: in-progress first, unknown last
    #[inline]
    #[must_use]
    pub fn rank(&self) -> u8 {
        match self {
            Self::InProgress => 1,
            Self::Pending => 2,
            Self::Completed => 3,
            Self::Other(_) => UNKNOWN_RANK,
        }
    }

    /// Whether the task is done
    #[inline]
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl From<&str> for TaskStatus {
    fn from(s: &str) -> Self {
        match s {
            "pending" => Self::Pending,
            "in-progress" => Self::InProgress,
            "completed" => Self::Completed,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for TaskStatus {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<TaskStatus> for String {
    fn from(s: TaskStatus) -> Self {
        s.as_str().to_string()
    }
}

/// Project status
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProjectStatus {
    /// `active`
    #[default]
    Active,
    /// `completed`
    Completed,
    /// `paused`
    Paused,
    /// Any other stored value
    Other(String),
}

impl ProjectStatus {
    /// Known statuses, in filter-option order
    pub const KNOWN: [ProjectStatus; 3] = [Self::Active, Self::Completed, Self::Paused];

    /// Stored representation
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Paused => "paused",
            Self::Other(s) => s,
        }
    }
}

impl From<&str> for ProjectStatus {
    fn from(s: &str) -> Self {
        match s {
            "active" => Self::Active,
            "completed" => Self::Completed,
            "paused" => Self::Paused,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for ProjectStatus {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<ProjectStatus> for String {
    fn from(s: ProjectStatus) -> Self {
        s.as_str().to_string()
    }
}

/// A filter value: either no constraint (`all`) or one concrete value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Choice<T> {
    /// No constraint
    #[default]
    All,
    /// Exactly this value
    Only(T),
}

impl<T> Choice<T> {
    /// Wire name of the sentinel
    pub const ALL_SENTINEL: &'static str = "all";

    /// Whether this is the `all` sentinel
    #[inline]
    #[must_use]
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// The concrete value, if any
    #[inline]
    #[must_use]
    pub fn as_only(&self) -> Option<&T> {
        match self {
            Self::All => None,
            Self::Only(v) => Some(v),
        }
    }
}

impl<T: PartialEq> Choice<T> {
    /// Whether `value` passes this constraint
    #[inline]
    #[must_use]
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Self::All => true,
            Self::Only(v) => v == value,
        }
    }

    /// Whether an optional value passes; `None` only passes `All`
    #[inline]
    #[must_use]
    pub fn admits_opt(&self, value: Option<&T>) -> bool {
        match (self, value) {
            (Self::All, _) => true,
            (Self::Only(v), Some(x)) => v == x,
            (Self::Only(_), None) => false,
        }
    }
}

impl<T: for<'a> From<&'a str>> Choice<T> {
    /// Parse a select-control value, where `all` (or empty) means no constraint
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "" | "all" => Self::All,
            other => Self::Only(T::from(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_known_values() {
        assert_eq!(Priority::default(), Priority::Medium);
        assert_eq!(TaskStatus::default(), TaskStatus::Pending);
        assert_eq!(ProjectStatus::default(), ProjectStatus::Active);
        assert_eq!(Choice::<Priority>::default(), Choice::All);
    }

    #[test]
    fn unknown_values_are_preserved() {
        let p = Priority::from("urgent");
        assert_eq!(p, Priority::Other("urgent".to_string()));
        assert_eq!(p.as_str(), "urgent");
        assert_eq!(p.rank(), UNKNOWN_RANK);
    }

    #[test]
    fn rank_tables() {
        assert!(Priority::High.rank() < Priority::Medium.rank());
        assert!(Priority::Medium.rank() < Priority::Low.rank());
        assert!(TaskStatus::InProgress.rank() < TaskStatus::Pending.rank());
        assert!(TaskStatus::Pending.rank() < TaskStatus::Completed.rank());
        assert_eq!(TaskStatus::from("blocked").rank(), UNKNOWN_RANK);
    }

    #[test]
    fn statuses_serde_as_strings() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, "\"in-progress\"");
        let back: ProjectStatus = serde_json::from_str("\"paused\"").unwrap();
        assert_eq!(back, ProjectStatus::Paused);
    }

    #[test]
    fn entity_kind_round_trip() {
        for kind in EntityKind::ALL {
            assert_eq!(kind.collection().parse::<EntityKind>().unwrap(), kind);
        }
        assert!("teams".parse::<EntityKind>().is_err());
    }

    #[test]
    fn choice_parse_and_admit() {
        let all: Choice<TaskStatus> = Choice::parse("all");
        assert!(all.is_all());
        assert!(all.admits(&TaskStatus::Completed));

        let only: Choice<TaskStatus> = Choice::parse("completed");
        assert!(only.admits(&TaskStatus::Completed));
        assert!(!only.admits(&TaskStatus::Pending));
        assert!(!only.admits_opt(None));
    }
}
