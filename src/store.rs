// Task store: in-memory collection persisted to a single storage slot

use crate::error::{Result, StoreError, ValidationError};
use crate::filter::{Query, StatusFilter};
use crate::record::Record;
use crate::slot;
use crate::storage::{self, Storage};
use crate::task::{self, NewTask, Task, TaskUpdate};
use tracing::{debug, info, warn};

/// Construction-time settings for a [`TaskStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    /// Storage key holding the serialized collection
    pub key: String,
    /// Reject tasks without a due date
    pub require_due_date: bool,
    /// Reject tasks without a due time
    pub require_due_time: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            key: Task::collection_name().to_string(),
            require_due_date: false,
            require_due_time: false,
        }
    }
}

/// Number of tasks per completion state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskCounts {
    pub all: usize,
    pub pending: usize,
    pub completed: usize,
}

/// Owns the task list and writes all of it back after every mutation.
///
/// The in-memory collection always equals the last value successfully
/// written: a mutation whose write fails is rolled back before the error is
/// returned.
pub struct TaskStore<S: Storage> {
    storage: S,
    options: StoreOptions,
    tasks: Vec<Task>,
    in_batch: bool,
}

impl<S: Storage> TaskStore<S> {
    /// Open a store over `storage`, loading whatever the slot holds
    pub fn open(storage: S, options: StoreOptions) -> Result<Self> {
        storage::validate_key(&options.key)?;

        let mut store = Self {
            storage,
            options,
            tasks: Vec::new(),
            in_batch: false,
        };
        store.load();

        Ok(store)
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Replace the in-memory collection with the slot contents.
    ///
    /// Missing, unreadable or corrupt data yields an empty collection.
    pub fn load(&mut self) -> usize {
        self.tasks = match self.storage.get(&self.options.key) {
            Ok(Some(raw)) => slot::decode(&raw),
            Ok(None) => {
                debug!(key = %self.options.key, "No stored tasks yet");
                Vec::new()
            }
            Err(e) => {
                warn!(key = %self.options.key, error = %e, "Failed to read stored tasks, starting empty");
                Vec::new()
            }
        };

        info!(key = %self.options.key, count = self.tasks.len(), "Loaded tasks");
        self.tasks.len()
    }

    /// Write the full collection to the slot
    pub fn persist(&mut self) -> Result<()> {
        let raw = slot::encode(&self.tasks)?;
        self.storage.set(&self.options.key, &raw)?;
        debug!(key = %self.options.key, count = self.tasks.len(), "Persisted tasks");
        Ok(())
    }

    // ========================================================================
    // Read API
    // ========================================================================

    /// All tasks in collection order
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn counts(&self) -> TaskCounts {
        let completed = self.tasks.iter().filter(|t| t.completed).count();
        TaskCounts {
            all: self.tasks.len(),
            pending: self.tasks.len() - completed,
            completed,
        }
    }

    /// Get a task by id
    pub fn get(&self, id: &str) -> Result<&Task> {
        self.tasks
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Filtered view in collection order
    pub fn query(&self, query: &Query) -> Vec<&Task> {
        query.apply(&self.tasks)
    }

    /// Shorthand for `query` with a status filter and search text
    pub fn filter(&self, status: StatusFilter, search: &str) -> Vec<&Task> {
        self.query(&Query::new(status, search))
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Validate raw input and append a new task
    pub fn create(&mut self, input: NewTask) -> Result<Task> {
        let description = task::parse_description(&input.description)?;
        let due_date = task::parse_due_date(input.due_date.as_deref())?;
        let due_time = task::parse_due_time(input.due_time.as_deref())?;
        let priority = task::parse_priority(input.priority.as_deref())?;
        self.check_required(due_date.is_some(), due_time.is_some())?;

        let mut id = task::new_id();
        while self.position(&id).is_some() {
            id = task::new_id();
        }

        let task = Task {
            id,
            description,
            due_date,
            due_time,
            priority,
            completed: false,
        };

        let created = task.clone();
        self.mutate(move |tasks| tasks.push(task))?;
        debug!(id = %created.id, "Created task");

        Ok(created)
    }

    /// Apply a structured edit to one task. Either every field changes or none.
    pub fn update(&mut self, id: &str, update: TaskUpdate) -> Result<Task> {
        let index = self.position(id).ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let mut task = self.tasks[index].clone();

        if update.is_empty() {
            return Ok(task);
        }

        if let Some(description) = &update.description {
            task.description = task::parse_description(description)?;
        }
        if let Some(due_date) = &update.due_date {
            task.due_date = task::parse_due_date(due_date.as_deref())?;
        }
        if let Some(due_time) = &update.due_time {
            task.due_time = task::parse_due_time(due_time.as_deref())?;
        }
        if let Some(priority) = &update.priority {
            // Blank means "default" only on create; an edit must name a priority
            task.priority = priority.parse()?;
        }
        if let Some(completed) = update.completed {
            task.completed = completed;
        }
        self.check_required(task.due_date.is_some(), task.due_time.is_some())?;

        let updated = task.clone();
        self.mutate(move |tasks| tasks[index] = task)?;
        debug!(id, "Updated task");

        Ok(updated)
    }

    /// Flip the completed flag
    pub fn toggle_completed(&mut self, id: &str) -> Result<Task> {
        let index = self.position(id).ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let toggled = self.mutate(move |tasks| {
            tasks[index].completed = !tasks[index].completed;
            tasks[index].clone()
        })?;
        debug!(id, completed = toggled.completed, "Toggled task");

        Ok(toggled)
    }

    /// Remove a task. Returns false, without writing, when the id is absent.
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        let Some(index) = self.position(id) else {
            debug!(id, "Delete of unknown task ignored");
            return Ok(false);
        };

        self.mutate(move |tasks| {
            tasks.remove(index);
        })?;
        debug!(id, "Deleted task");

        Ok(true)
    }

    /// Remove every task. Returns whether anything was removed.
    pub fn delete_all(&mut self) -> Result<bool> {
        if self.tasks.is_empty() {
            return Ok(false);
        }

        let removed = self.mutate(|tasks| std::mem::take(tasks).len())?;
        debug!(removed, "Deleted all tasks");

        Ok(true)
    }

    /// Stable ascending sort by due moment; undated tasks go last
    pub fn sort_by_due_moment(&mut self) -> Result<()> {
        self.mutate(|tasks| tasks.sort_by_key(|t| (t.due_moment().is_none(), t.due_moment())))?;
        debug!("Sorted tasks by due moment");
        Ok(())
    }

    /// Run several operations with a single write at the end.
    ///
    /// If `f` fails, every change it made is discarded.
    pub fn batch<F, R>(&mut self, f: F) -> Result<R>
    where
        F: FnOnce(&mut Self) -> Result<R>,
    {
        if self.in_batch {
            return f(self);
        }

        let snapshot = self.tasks.clone();
        self.in_batch = true;
        let result = f(self);
        self.in_batch = false;

        let value = match result {
            Ok(value) => value,
            Err(e) => {
                self.tasks = snapshot;
                return Err(e);
            }
        };

        if let Err(e) = self.persist() {
            self.tasks = snapshot;
            return Err(e);
        }

        Ok(value)
    }

    // ========================================================================
    // Helper methods
    // ========================================================================

    fn position(&self, id: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    fn check_required(&self, has_date: bool, has_time: bool) -> Result<(), ValidationError> {
        if self.options.require_due_date && !has_date {
            return Err(ValidationError::MissingDueDate);
        }
        if self.options.require_due_time && !has_time {
            return Err(ValidationError::MissingDueTime);
        }
        Ok(())
    }

    /// Apply `f` and persist, restoring the previous collection if the write fails
    fn mutate<R>(&mut self, f: impl FnOnce(&mut Vec<Task>) -> R) -> Result<R> {
        if self.in_batch {
            return Ok(f(&mut self.tasks));
        }

        let snapshot = self.tasks.clone();
        let value = f(&mut self.tasks);

        if let Err(e) = self.persist() {
            warn!(key = %self.options.key, error = %e, "Failed to persist tasks, rolling back");
            self.tasks = snapshot;
            return Err(e);
        }

        Ok(value)
    }
}
