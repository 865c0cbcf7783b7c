//! Observable client-side mirror of the server's task list.
//!
//! Every state change goes through a `watch` channel, so views re-render
//! only at the mutation points below. Mutations wait for the server: the
//! local list changes only after a successful response.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::warn;
use uuid::Uuid;

use crate::{
    api::TaskApi,
    models::{Task, TaskPatch},
};

pub const FETCH_FAILED: &str = "Failed to fetch tasks";
pub const ADD_FAILED: &str = "Failed to add task";
pub const UPDATE_FAILED: &str = "Failed to update task";
pub const DELETE_FAILED: &str = "Failed to delete task";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskStoreState {
    pub tasks: Vec<Task>,
    pub loading: bool,
    pub error: Option<String>,
}

pub struct TaskStore {
    api: Arc<dyn TaskApi>,
    state: watch::Sender<TaskStoreState>,
}

impl TaskStore {
    pub fn new(api: Arc<dyn TaskApi>) -> Self {
        let (state, _) = watch::channel(TaskStoreState::default());
        Self { api, state }
    }

    /// Receiver that is marked changed after every mutation.
    pub fn subscribe(&self) -> watch::Receiver<TaskStoreState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> TaskStoreState {
        self.state.borrow().clone()
    }

    pub async fn fetch_tasks(&self) {
        self.state.send_modify(|state| state.loading = true);
        let _loading = LoadingGuard(&self.state);

        match self.api.list_tasks().await {
            Ok(tasks) => self.state.send_modify(|state| {
                state.tasks = tasks;
                state.error = None;
            }),
            Err(e) => {
                warn!(error = %e, "{}", FETCH_FAILED);
                self.set_error(FETCH_FAILED);
            }
        }
    }

    pub async fn add_task(&self, title: &str) {
        match self.api.create_task(title).await {
            Ok(task) => self.state.send_modify(|state| state.tasks.push(task)),
            Err(e) => {
                warn!(error = %e, "{}", ADD_FAILED);
                self.set_error(ADD_FAILED);
            }
        }
    }

    /// Flip `completed` on the server, then adopt whatever value it returns.
    pub async fn toggle_task(&self, id: Uuid) {
        let Some(completed) = self
            .state
            .borrow()
            .tasks
            .iter()
            .find(|task| task.id == id)
            .map(|task| task.completed)
        else {
            return;
        };

        match self.api.update_task(id, &TaskPatch::completed(!completed)).await {
            Ok(updated) => self.state.send_modify(|state| {
                if let Some(task) = state.tasks.iter_mut().find(|task| task.id == id) {
                    task.completed = updated.completed;
                }
            }),
            Err(e) => {
                warn!(task_id = %id, error = %e, "{}", UPDATE_FAILED);
                self.set_error(UPDATE_FAILED);
            }
        }
    }

    pub async fn delete_task(&self, id: Uuid) {
        match self.api.delete_task(id).await {
            Ok(()) => self
                .state
                .send_modify(|state| state.tasks.retain(|task| task.id != id)),
            Err(e) => {
                warn!(task_id = %id, error = %e, "{}", DELETE_FAILED);
                self.set_error(DELETE_FAILED);
            }
        }
    }

    fn set_error(&self, message: &str) {
        self.state
            .send_modify(|state| state.error = Some(message.to_string()));
    }
}

/// Clears `loading` when dropped, whichever way the fetch ends.
struct LoadingGuard<'a>(&'a watch::Sender<TaskStoreState>);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.send_modify(|state| state.loading = false);
    }
}
