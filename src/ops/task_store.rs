use crate::backend::{Backend, BackendError, NewTaskRecord};
use crate::model::{Notification, StatusFilter, Task, TaskDraft, filter_tasks};

/// The signed-in user's tasks, held in fetch order (newest first).
///
/// Every mutation goes to the backend first; the in-memory list changes only
/// after the backend confirms, and is left untouched on any error.
#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    user_id: String,
    tasks: Vec<Task>,
}

impl TaskStore {
    pub fn new(user_id: impl Into<String>) -> Self {
        TaskStore {
            user_id: user_id.into(),
            tasks: Vec::new(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn filtered(&self, filter: StatusFilter) -> Vec<&Task> {
        filter_tasks(&self.tasks, filter)
    }

    /// Replace the list with the user's tasks, newest first
    pub fn load(&mut self, backend: &mut dyn Backend) -> Result<usize, BackendError> {
        let records = backend.list_tasks(&self.user_id)?;
        self.tasks = records.into_iter().map(|r| r.into_task()).collect();
        tracing::debug!(count = self.tasks.len(), "tasks loaded");
        Ok(self.tasks.len())
    }

    /// Insert a task and put the stored row at the top of the list
    pub fn create(
        &mut self,
        backend: &mut dyn Backend,
        draft: TaskDraft,
    ) -> Result<&Task, BackendError> {
        let record = backend.insert_task(NewTaskRecord::from_draft(draft, &self.user_id))?;
        self.tasks.insert(0, record.into_task());
        Ok(&self.tasks[0])
    }

    /// Overwrite the editable fields of task `id`
    pub fn update(
        &mut self,
        backend: &mut dyn Backend,
        id: &str,
        draft: TaskDraft,
    ) -> Result<(), BackendError> {
        backend.update_task(id, &draft)?;
        if let Some(slot) = self.tasks.iter_mut().find(|t| t.id == id) {
            *slot = slot.with_draft(draft);
        }
        Ok(())
    }

    pub fn delete(&mut self, backend: &mut dyn Backend, id: &str) -> Result<(), BackendError> {
        backend.delete_task(id)?;
        self.tasks.retain(|t| t.id != id);
        Ok(())
    }
}

/// Notification for the outcome of a store operation
pub fn outcome_notification<T>(
    result: &Result<T, BackendError>,
    title: &str,
    description: &str,
) -> Notification {
    match result {
        Ok(_) => Notification::success(title, description),
        Err(e) => {
            tracing::warn!(error = %e, action = title, "task operation failed");
            Notification::failure("Error", e.to_string())
        }
    }
}
