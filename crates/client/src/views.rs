//! Text views over the task store and the intents a user can issue.

use std::sync::Arc;

use thiserror::Error;
use tokio::task::JoinSet;
use tracing::warn;

use crate::store::{TaskStore, TaskStoreState};

pub const HELP: &str = "\
Commands:
  add <title>     create a task
  toggle <n>      flip task n between done and not done
  delete <n>      delete task n
  refresh         reload the list from the server
  help            show this message
  quit            leave";

/// Render the store state the way the task list shows it.
///
/// An error replaces an empty list; with tasks present it is shown as a
/// banner above them.
pub fn render(state: &TaskStoreState) -> String {
    if state.loading {
        return "Loading...".to_string();
    }
    if state.tasks.is_empty() {
        return state
            .error
            .clone()
            .unwrap_or_else(|| "No tasks yet.".to_string());
    }

    let lines = state.tasks.iter().enumerate().map(|(i, task)| {
        let mark = if task.completed { 'x' } else { ' ' };
        format!("{}. [{}] {}", i + 1, mark, task.title)
    });
    state
        .error
        .iter()
        .cloned()
        .chain(lines)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Text box plus "Add" button.
#[derive(Debug, Default)]
pub struct NewTaskInput {
    value: String,
}

impl NewTaskInput {
    pub fn set(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Yields the trimmed title and clears the box, or `None` when there is
    /// nothing to submit.
    pub fn submit(&mut self) -> Option<String> {
        let title = self.value.trim();
        if title.is_empty() {
            return None;
        }
        let title = title.to_string();
        self.value.clear();
        Some(title)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(String),
    Toggle(usize),
    Delete(usize),
    Refresh,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseCommandError {
    #[error("type a command, or 'help'")]
    Empty,
    #[error("unknown command '{0}', type 'help'")]
    Unknown(String),
    #[error("'{0}' needs a task number")]
    MissingPosition(&'static str),
    #[error("'{0}' is not a task number")]
    InvalidPosition(String),
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, ParseCommandError> {
        let line = line.trim();
        let (verb, rest) = line
            .split_once(char::is_whitespace)
            .map(|(verb, rest)| (verb, rest.trim()))
            .unwrap_or((line, ""));

        match verb.to_ascii_lowercase().as_str() {
            "" => Err(ParseCommandError::Empty),
            "add" => Ok(Command::Add(rest.to_string())),
            "toggle" => parse_position("toggle", rest).map(Command::Toggle),
            "delete" | "rm" => parse_position("delete", rest).map(Command::Delete),
            "refresh" | "list" => Ok(Command::Refresh),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(ParseCommandError::Unknown(other.to_string())),
        }
    }
}

fn parse_position(verb: &'static str, raw: &str) -> Result<usize, ParseCommandError> {
    if raw.is_empty() {
        return Err(ParseCommandError::MissingPosition(verb));
    }
    match raw.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ParseCommandError::InvalidPosition(raw.to_string())),
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The store operation runs in the background until `App::settle`.
    Dispatched,
    Ignored(String),
    Help,
    Quit,
}

/// UI root: owns the store handle, the new-task input and the store
/// operations still in flight.
pub struct App {
    store: Arc<TaskStore>,
    input: NewTaskInput,
    pending: JoinSet<()>,
}

impl App {
    pub fn new(store: Arc<TaskStore>) -> Self {
        Self {
            store,
            input: NewTaskInput::default(),
            pending: JoinSet::new(),
        }
    }

    /// Initial load, issued once when the list first appears.
    pub fn mount(&mut self) {
        let store = self.store.clone();
        self.pending.spawn(async move { store.fetch_tasks().await });
    }

    /// Wait for every dispatched operation to finish.
    pub async fn settle(&mut self) {
        while let Some(result) = self.pending.join_next().await {
            if let Err(e) = result {
                warn!(error = %e, "Task operation did not complete");
            }
        }
    }

    pub fn render(&self) -> String {
        render(&self.store.snapshot())
    }

    /// Must be called from within a Tokio runtime.
    pub fn dispatch(&mut self, command: Command) -> Outcome {
        // Drop results of operations that already finished.
        while self.pending.try_join_next().is_some() {}

        let store = self.store.clone();
        match command {
            Command::Add(title) => {
                self.input.set(title);
                match self.input.submit() {
                    Some(title) => {
                        self.pending
                            .spawn(async move { store.add_task(&title).await });
                        Outcome::Dispatched
                    }
                    None => Outcome::Ignored("Task title cannot be empty".to_string()),
                }
            }
            Command::Toggle(position) => match self.task_id_at(position) {
                Some(id) => {
                    self.pending
                        .spawn(async move { store.toggle_task(id).await });
                    Outcome::Dispatched
                }
                None => Outcome::Ignored(format!("No task at position {}", position)),
            },
            Command::Delete(position) => match self.task_id_at(position) {
                Some(id) => {
                    self.pending
                        .spawn(async move { store.delete_task(id).await });
                    Outcome::Dispatched
                }
                None => Outcome::Ignored(format!("No task at position {}", position)),
            },
            Command::Refresh => {
                self.mount();
                Outcome::Dispatched
            }
            Command::Help => Outcome::Help,
            Command::Quit => Outcome::Quit,
        }
    }

    fn task_id_at(&self, position: usize) -> Option<uuid::Uuid> {
        let state = self.store.snapshot();
        position
            .checked_sub(1)
            .and_then(|index| state.tasks.get(index))
            .map(|task| task.id)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::{
        models::Task,
        store::{DELETE_FAILED, tests::FakeApi},
    };

    fn task(title: &str, completed: bool) -> Task {
        let now = Utc::now();
        Task {
            id: Uuid::new_v4(),
            title: title.to_string(),
            completed,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn render_prefers_loading_then_error() {
        let mut state = TaskStoreState {
            tasks: vec![],
            loading: true,
            error: Some("Failed to fetch tasks".to_string()),
        };
        assert_eq!(render(&state), "Loading...");

        state.loading = false;
        assert_eq!(render(&state), "Failed to fetch tasks");
    }

    #[test]
    fn render_shows_error_above_existing_tasks() {
        let state = TaskStoreState {
            tasks: vec![task("Buy milk", true)],
            loading: false,
            error: Some("Failed to update task".to_string()),
        };
        assert_eq!(render(&state), "Failed to update task\n1. [x] Buy milk");
    }

    #[tokio::test]
    async fn failed_delete_still_renders_the_task() {
        let store = TaskStore::new(Arc::new(FakeApi::with_tasks(&["stays"])));
        store.fetch_tasks().await;

        store.delete_task(Uuid::new_v4()).await;

        let out = render(&store.snapshot());
        assert!(out.starts_with(DELETE_FAILED));
        assert!(out.contains("1. [ ] stays"));
    }

    #[test]
    fn render_lists_tasks_with_checkboxes() {
        let state = TaskStoreState {
            tasks: vec![task("Buy milk", false), task("Walk dog", true)],
            ..Default::default()
        };
        assert_eq!(render(&state), "1. [ ] Buy milk\n2. [x] Walk dog");
        assert_eq!(render(&TaskStoreState::default()), "No tasks yet.");
    }

    #[test]
    fn input_trims_and_ignores_blank_titles() {
        let mut input = NewTaskInput::default();
        input.set("   ");
        assert_eq!(input.submit(), None);
        assert_eq!(input.value(), "   ");

        input.set("  Buy milk \n");
        assert_eq!(input.submit().as_deref(), Some("Buy milk"));
        assert_eq!(input.value(), "");
    }

    #[test]
    fn parses_commands() {
        assert_eq!(
            Command::parse("add  Buy oat milk "),
            Ok(Command::Add("Buy oat milk".to_string()))
        );
        assert_eq!(Command::parse("add"), Ok(Command::Add(String::new())));
        assert_eq!(Command::parse("TOGGLE 2"), Ok(Command::Toggle(2)));
        assert_eq!(Command::parse("rm 1"), Ok(Command::Delete(1)));
        assert_eq!(Command::parse("list"), Ok(Command::Refresh));
        assert_eq!(Command::parse("exit"), Ok(Command::Quit));
    }

    #[test]
    fn rejects_malformed_commands() {
        assert_eq!(Command::parse("   "), Err(ParseCommandError::Empty));
        assert_eq!(
            Command::parse("toggle"),
            Err(ParseCommandError::MissingPosition("toggle"))
        );
        assert_eq!(
            Command::parse("delete 0"),
            Err(ParseCommandError::InvalidPosition("0".to_string()))
        );
        assert_eq!(
            Command::parse("fly away"),
            Err(ParseCommandError::Unknown("fly".to_string()))
        );
    }

    #[tokio::test]
    async fn app_dispatches_intents_to_store() {
        let store = Arc::new(TaskStore::new(Arc::new(FakeApi::with_tasks(&["existing"]))));
        let mut app = App::new(store);
        app.mount();
        app.settle().await;
        assert_eq!(app.render(), "1. [ ] existing");

        assert_eq!(
            app.dispatch(Command::Add(" new one ".to_string())),
            Outcome::Dispatched
        );
        app.settle().await;

        assert_eq!(app.dispatch(Command::Toggle(2)), Outcome::Dispatched);
        app.settle().await;
        assert_eq!(app.render(), "1. [ ] existing\n2. [x] new one");

        assert_eq!(app.dispatch(Command::Delete(1)), Outcome::Dispatched);
        app.settle().await;
        assert_eq!(app.render(), "1. [x] new one");
    }

    #[tokio::test]
    async fn settle_finishes_work_dispatched_before_quit() {
        let api = Arc::new(FakeApi::default());
        let mut app = App::new(Arc::new(TaskStore::new(api.clone())));

        for title in ["milk", "eggs", "bread"] {
            assert_eq!(
                app.dispatch(Command::Add(title.to_string())),
                Outcome::Dispatched
            );
        }
        assert_eq!(app.dispatch(Command::Quit), Outcome::Quit);
        app.settle().await;

        assert_eq!(api.stored().len(), 3);
        assert_eq!(app.store.snapshot().tasks.len(), 3);
    }

    #[tokio::test]
    async fn app_ignores_blank_titles_and_bad_positions() {
        let store = Arc::new(TaskStore::new(Arc::new(FakeApi::default())));
        let mut app = App::new(store.clone());

        assert!(matches!(
            app.dispatch(Command::Add("   ".to_string())),
            Outcome::Ignored(_)
        ));
        assert!(matches!(app.dispatch(Command::Toggle(3)), Outcome::Ignored(_)));
        assert!(matches!(app.dispatch(Command::Delete(1)), Outcome::Ignored(_)));
        assert!(store.snapshot().tasks.is_empty());
    }
}
