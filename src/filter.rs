// Query filtering over the task collection

use crate::task::Task;
use std::fmt;
use std::str::FromStr;

/// Which completion state a listing selects
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Completed,
}

impl StatusFilter {
    pub fn accepts(self, task: &Task) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Pending => !task.completed,
            StatusFilter::Completed => task.completed,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "pending" => Ok(StatusFilter::Pending),
            "completed" => Ok(StatusFilter::Completed),
            other => Err(format!("unknown status filter: {} (expected all, pending or completed)", other)),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => write!(f, "all"),
            StatusFilter::Pending => write!(f, "pending"),
            StatusFilter::Completed => write!(f, "completed"),
        }
    }
}

/// Status filter plus an optional case-insensitive description search.
///
/// The search text is matched exactly as given; only `""` disables it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub status: StatusFilter,
    pub search: String,
}

impl Query {
    pub fn new(status: StatusFilter, search: impl Into<String>) -> Self {
        Self {
            status,
            search: search.into(),
        }
    }

    pub fn all() -> Self {
        Self::default()
    }

    /// Select matching tasks, keeping collection order
    pub fn apply<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        let needle = self.search.to_lowercase();
        tasks
            .iter()
            .filter(|t| self.status.accepts(t))
            .filter(|t| needle.is_empty() || t.matches(&needle))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Priority;

    fn task(id: &str, description: &str, completed: bool) -> Task {
        Task {
            id: id.to_string(),
            description: description.to_string(),
            due_date: None,
            due_time: None,
            priority: Priority::Low,
            completed,
        }
    }

    fn ids(tasks: Vec<&Task>) -> Vec<&str> {
        tasks.into_iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn test_status_filter_parse() {
        assert_eq!("All".parse::<StatusFilter>().unwrap(), StatusFilter::All);
        assert_eq!("pending".parse::<StatusFilter>().unwrap(), StatusFilter::Pending);
        assert_eq!(" COMPLETED ".parse::<StatusFilter>().unwrap(), StatusFilter::Completed);
        assert!("done".parse::<StatusFilter>().is_err());
    }

    #[test]
    fn test_status_filter_display() {
        assert_eq!(StatusFilter::All.to_string(), "all");
        assert_eq!(StatusFilter::Pending.to_string(), "pending");
    }

    #[test]
    fn test_query_by_status() {
        let tasks = vec![task("a", "one", false), task("b", "two", true), task("c", "three", false)];

        assert_eq!(ids(Query::all().apply(&tasks)), vec!["a", "b", "c"]);
        assert_eq!(ids(Query::new(StatusFilter::Pending, "").apply(&tasks)), vec!["a", "c"]);
        assert_eq!(ids(Query::new(StatusFilter::Completed, "").apply(&tasks)), vec!["b"]);
    }

    #[test]
    fn test_query_search_is_case_insensitive() {
        let tasks = vec![task("a", "Buy MILK", false), task("b", "Pay rent", true)];

        assert_eq!(ids(Query::new(StatusFilter::All, "milk").apply(&tasks)), vec!["a"]);
        assert_eq!(ids(Query::new(StatusFilter::All, "RENT").apply(&tasks)), vec!["b"]);
        assert!(Query::new(StatusFilter::Pending, "rent").apply(&tasks).is_empty());
    }

    #[test]
    fn test_query_empty_search_matches_everything() {
        let tasks = vec![task("a", "one", false), task("b", "two", true)];
        assert_eq!(Query::new(StatusFilter::All, "").apply(&tasks).len(), 2);
    }

    #[test]
    fn test_query_search_keeps_whitespace() {
        let tasks = vec![task("a", "Buy milk", false), task("b", "Nospace", false), task("c", "Pay rent", false)];

        assert!(Query::new(StatusFilter::All, "milk ").apply(&tasks).is_empty());
        assert_eq!(ids(Query::new(StatusFilter::All, " ").apply(&tasks)), vec!["a", "c"]);
        assert_eq!(ids(Query::new(StatusFilter::All, "buy ").apply(&tasks)), vec!["a"]);
    }
}
