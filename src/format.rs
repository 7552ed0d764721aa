// Display formatting for task listings

use crate::task::Task;
use colored::Colorize;

#[derive(Debug, Clone, Copy)]
pub struct TaskFormatter {
    preview_len: usize,
}

impl Default for TaskFormatter {
    fn default() -> Self {
        Self { preview_len: 14 }
    }
}

impl TaskFormatter {
    pub fn new(preview_len: usize) -> Self {
        Self { preview_len }
    }

    /// Truncate to `preview_len` characters, marking the cut with "..."
    pub fn description(&self, description: &str) -> String {
        if description.chars().count() > self.preview_len {
            let head: String = description.chars().take(self.preview_len).collect();
            format!("{}...", head)
        } else {
            description.to_string()
        }
    }

    pub fn due(&self, task: &Task) -> String {
        match (task.due_date, task.due_time) {
            (Some(date), Some(time)) => format!("{} {}", date, time),
            (Some(date), None) => date.to_string(),
            (None, Some(time)) => format!("No due date {}", time),
            (None, None) => "No due date".to_string(),
        }
    }

    pub fn status(&self, completed: bool) -> &'static str {
        if completed { "Completed" } else { "Pending" }
    }

    /// One listing row: id, description, due, priority, status
    pub fn row(&self, task: &Task) -> String {
        let status = self.status(task.completed);
        let status = if task.completed { status.green() } else { status.yellow() };
        format!(
            "{}  {:<width$}  {:<16}  {:<6}  {}",
            task.id.dimmed(),
            self.description(&task.description),
            self.due(task),
            task.priority,
            status,
            width = self.preview_len + 3
        )
    }
}
