// Task entity and its validated field types

use crate::error::ValidationError;
use crate::record::Record;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";

/// A single task record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub description: String,
    #[serde(default)]
    pub due_date: Option<DueDate>,
    #[serde(default)]
    pub due_time: Option<DueTime>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    /// Combined (date, time) ordering key. `None` unless both parts are set.
    pub fn due_moment(&self) -> Option<NaiveDateTime> {
        match (self.due_date, self.due_time) {
            (Some(date), Some(time)) => Some(date.0.and_time(time.0)),
            _ => None,
        }
    }

    /// Case-insensitive substring match on the description
    pub fn matches(&self, needle_lower: &str) -> bool {
        self.description.to_lowercase().contains(needle_lower)
    }
}

impl Record for Task {
    fn id(&self) -> &str {
        &self.id
    }

    fn collection_name() -> &'static str {
        "todos"
    }

    fn is_valid(&self) -> bool {
        !self.id.trim().is_empty() && !self.description.trim().is_empty()
    }
}

/// Generate a fresh task id (UUIDv7: unique and creation-ordered)
pub fn new_id() -> String {
    uuid::Uuid::now_v7().to_string()
}

/// Calendar date serialized as `YYYY-MM-DD`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DueDate(NaiveDate);

impl FromStr for DueDate {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        // chrono accepts unpadded fields, the stored form does not
        if s.len() != 10 {
            return Err(ValidationError::InvalidDate(s.to_string()));
        }
        NaiveDate::parse_from_str(s, DATE_FORMAT)
            .map(DueDate)
            .map_err(|_| ValidationError::InvalidDate(s.to_string()))
    }
}

impl TryFrom<String> for DueDate {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DueDate> for String {
    fn from(value: DueDate) -> Self {
        value.to_string()
    }
}

impl fmt::Display for DueDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

/// Time of day serialized as `HH:MM` (24-hour)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DueTime(NaiveTime);

impl FromStr for DueTime {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.len() != 5 {
            return Err(ValidationError::InvalidTime(s.to_string()));
        }
        NaiveTime::parse_from_str(s, TIME_FORMAT)
            .map(DueTime)
            .map_err(|_| ValidationError::InvalidTime(s.to_string()))
    }
}

impl TryFrom<String> for DueTime {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DueTime> for String {
    fn from(value: DueTime) -> Self {
        value.to_string()
    }
}

impl fmt::Display for DueTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIME_FORMAT))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(ValidationError::InvalidPriority(s.to_string())),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Raw user input for a new task. Blank date/time strings mean "not set".
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub description: String,
    pub due_date: Option<String>,
    pub due_time: Option<String>,
    pub priority: Option<String>,
}

impl NewTask {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Default::default()
        }
    }

    pub fn due_date(mut self, date: impl Into<String>) -> Self {
        self.due_date = Some(date.into());
        self
    }

    pub fn due_time(mut self, time: impl Into<String>) -> Self {
        self.due_time = Some(time.into());
        self
    }

    pub fn priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }
}

/// Structured edit request. Only the fields that are `Some` change.
///
/// `due_date` / `due_time` use `Some(None)` to clear the field.
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    pub description: Option<String>,
    pub due_date: Option<Option<String>>,
    pub due_time: Option<Option<String>>,
    pub priority: Option<String>,
    pub completed: Option<bool>,
}

impl TaskUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn due_date(mut self, date: impl Into<String>) -> Self {
        self.due_date = Some(Some(date.into()));
        self
    }

    pub fn clear_due_date(mut self) -> Self {
        self.due_date = Some(None);
        self
    }

    pub fn due_time(mut self, time: impl Into<String>) -> Self {
        self.due_time = Some(Some(time.into()));
        self
    }

    pub fn clear_due_time(mut self) -> Self {
        self.due_time = Some(None);
        self
    }

    pub fn priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.due_date.is_none()
            && self.due_time.is_none()
            && self.priority.is_none()
            && self.completed.is_none()
    }
}

/// Trim and reject an empty description
pub fn parse_description(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyDescription);
    }
    Ok(trimmed.to_string())
}

pub fn parse_due_date(raw: Option<&str>) -> Result<Option<DueDate>, ValidationError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some),
    }
}

pub fn parse_due_time(raw: Option<&str>) -> Result<Option<DueTime>, ValidationError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some),
    }
}

pub fn parse_priority(raw: Option<&str>) -> Result<Priority, ValidationError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(Priority::default()),
        Some(s) => s.parse(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Task {
        Task {
            id: "t1".to_string(),
            description: "Buy milk".to_string(),
            due_date: Some("2024-01-10".parse().unwrap()),
            due_time: Some("09:00".parse().unwrap()),
            priority: Priority::Low,
            completed: false,
        }
    }

    #[test]
    fn test_task_serialization_shape() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["id"], "t1");
        assert_eq!(json["description"], "Buy milk");
        assert_eq!(json["dueDate"], "2024-01-10");
        assert_eq!(json["dueTime"], "09:00");
        assert_eq!(json["priority"], "low");
        assert_eq!(json["completed"], false);
    }

    #[test]
    fn test_task_deserialization_defaults() {
        let task: Task = serde_json::from_str(r#"{"id":"x","description":"Walk"}"#).unwrap();
        assert_eq!(task.priority, Priority::Low);
        assert!(!task.completed);
        assert!(task.due_date.is_none());
        assert!(task.due_time.is_none());
    }

    #[test]
    fn test_task_rejects_malformed_date_in_json() {
        let result: Result<Task, _> =
            serde_json::from_str(r#"{"id":"x","description":"Walk","dueDate":"10/01/2024"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_due_date_parsing() {
        assert!("2024-02-29".parse::<DueDate>().is_ok());
        assert!(" 2024-01-05 ".parse::<DueDate>().is_ok());
        assert_eq!(
            "2023-02-29".parse::<DueDate>(),
            Err(ValidationError::InvalidDate("2023-02-29".to_string()))
        );
        assert!("2024-1-5".parse::<DueDate>().is_err());
        assert!("tomorrow".parse::<DueDate>().is_err());
    }

    #[test]
    fn test_due_time_parsing() {
        assert_eq!("08:00".parse::<DueTime>().unwrap().to_string(), "08:00");
        assert_eq!("23:59".parse::<DueTime>().unwrap().to_string(), "23:59");
        assert!("24:00".parse::<DueTime>().is_err());
        assert!("8:00".parse::<DueTime>().is_err());
        assert!("08:00:00".parse::<DueTime>().is_err());
    }

    #[test]
    fn test_priority_parsing() {
        assert_eq!("HIGH".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!(" medium ".parse::<Priority>().unwrap(), Priority::Medium);
        assert!("urgent".parse::<Priority>().is_err());
        assert_eq!(parse_priority(None).unwrap(), Priority::Low);
        assert_eq!(parse_priority(Some("")).unwrap(), Priority::Low);
    }

    #[test]
    fn test_blank_optional_fields_mean_unset() {
        assert_eq!(parse_due_date(Some("  ")).unwrap(), None);
        assert_eq!(parse_due_time(Some("")).unwrap(), None);
        assert_eq!(parse_due_date(None).unwrap(), None);
    }

    #[test]
    fn test_parse_description() {
        assert_eq!(parse_description("  Pay rent ").unwrap(), "Pay rent");
        assert_eq!(parse_description("   "), Err(ValidationError::EmptyDescription));
    }

    #[test]
    fn test_due_moment_requires_both_parts() {
        let mut task = sample();
        assert!(task.due_moment().is_some());
        task.due_time = None;
        assert!(task.due_moment().is_none());
    }

    #[test]
    fn test_record_validity() {
        let mut task = sample();
        assert!(task.is_valid());
        task.description = " ".to_string();
        assert!(!task.is_valid());
    }

    #[test]
    fn test_new_ids_are_distinct() {
        let ids: std::collections::HashSet<String> = (0..1000).map(|_| new_id()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_task_update_is_empty() {
        assert!(TaskUpdate::new().is_empty());
        assert!(!TaskUpdate::new().clear_due_date().is_empty());
    }
}
