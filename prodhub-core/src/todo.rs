//! The to-do list: append-only ordering, toggle, delete, persisted after
//! every change.

use std::sync::Arc;

use crate::model::{Task, fresh_id, now_ms};
use crate::store::{KvStore, ListStore, TODOS_NAMESPACE};

/// Errors that can occur during to-do list operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TodoError {
    /// Task text is empty or whitespace only.
    #[error("task text cannot be empty")]
    TextEmpty,
    /// No task has the given id.
    #[error("task not found: {0}")]
    NotFound(u64),
}

/// In-memory task list mirrored to a [`ListStore`].
pub struct TodoList {
    tasks: Vec<Task>,
    store: ListStore<Task>,
}

impl TodoList {
    /// Load the list from the `todos` namespace of `backend`.
    ///
    /// Unreadable data yields an empty list (see [`ListStore::load`]).
    #[must_use]
    pub fn load(backend: Arc<dyn KvStore>) -> Self {
        let store = ListStore::new(backend, TODOS_NAMESPACE);
        let tasks = store.load();
        Self { tasks, store }
    }

    /// Tasks in insertion order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Number of tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the list has no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Append a new open task. The text is stored as entered.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::TextEmpty`] if `text` is blank.
    pub fn add(&mut self, text: &str) -> Result<&Task, TodoError> {
        self.add_at(text, now_ms())
    }

    /// [`add`](Self::add) with an explicit creation time in epoch ms.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::TextEmpty`] if `text` is blank.
    pub fn add_at(&mut self, text: &str, now: u64) -> Result<&Task, TodoError> {
        if text.trim().is_empty() {
            return Err(TodoError::TextEmpty);
        }
        let id = fresh_id(now, self.tasks.iter().map(|t| t.id));
        self.tasks.push(Task {
            id,
            text: text.to_string(),
            completed: false,
        });
        tracing::debug!(id, "task added");
        self.flush();
        let last = self.tasks.len() - 1;
        Ok(&self.tasks[last])
    }

    /// Flip the completed flag of task `id`, returning the new value.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::NotFound`] if no task has that id.
    pub fn toggle(&mut self, id: u64) -> Result<bool, TodoError> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(TodoError::NotFound(id))?;
        task.completed = !task.completed;
        let completed = task.completed;
        tracing::debug!(id, completed, "task toggled");
        self.flush();
        Ok(completed)
    }

    /// Remove task `id`, returning it.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::NotFound`] if no task has that id.
    pub fn delete(&mut self, id: u64) -> Result<Task, TodoError> {
        let idx = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(TodoError::NotFound(id))?;
        let task = self.tasks.remove(idx);
        tracing::debug!(id, "task deleted");
        self.flush();
        Ok(task)
    }

    fn flush(&self) {
        self.store.save(&self.tasks);
    }
}
