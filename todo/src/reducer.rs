//! Reducer logic for the Todo List widget.
//!
//! Commands are validated and turned into events; events are applied to
//! state. Rejected commands are not errors: the widget simply ignores them,
//! the same way a form ignores a key that does not submit it.

use crate::config::TodoListConfig;
use crate::types::{Filter, Todo, TodoAction, TodoId, TodoState};
use std::sync::Arc;
use widget_core::{
    environment::{Clock, IdGenerator},
    reducer::Reducer,
};

/// Environment dependencies for the Todo reducer
#[derive(Clone)]
pub struct TodoEnvironment {
    /// Clock for creation timestamps
    pub clock: Arc<dyn Clock>,
    /// Source of ids for new todos
    pub ids: Arc<dyn IdGenerator>,
}

impl TodoEnvironment {
    /// Creates a new `TodoEnvironment`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { clock, ids }
    }
}

impl std::fmt::Debug for TodoEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoEnvironment").finish_non_exhaustive()
    }
}

/// Reducer for the Todo List widget
#[derive(Clone, Debug)]
pub struct TodoReducer {
    submit_key: String,
}

impl TodoReducer {
    /// Creates a reducer that submits on `Enter`
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(&TodoListConfig::default())
    }

    /// Creates a reducer using the submit key from `config`
    #[must_use]
    pub fn from_config(config: &TodoListConfig) -> Self {
        Self {
            submit_key: config.submit_key.clone(),
        }
    }

    /// Validates a `CreateTodo` command, returning the title to store
    fn validate_create_todo<'a>(&self, title: &'a str, key: &str) -> Result<&'a str, String> {
        if key != self.submit_key {
            return Err(format!("key {key:?} does not submit"));
        }

        if title.is_empty() {
            return Err("Todo title cannot be empty".to_string());
        }

        Ok(title)
    }

    /// Validates a command addressing an existing todo
    fn validate_known_todo<'a>(state: &'a TodoState, id: &TodoId) -> Result<&'a Todo, String> {
        state
            .get(id)
            .ok_or_else(|| format!("Todo with ID {id} not found"))
    }

    /// Applies an event to state
    fn apply_event(state: &mut TodoState, action: &TodoAction) {
        match action {
            TodoAction::DraftUpdated { value } => {
                state.draft.clone_from(value);
            },
            TodoAction::TodoCreated {
                id,
                title,
                created_at,
            } => {
                if state.exists(id) {
                    tracing::debug!(%id, "Ignoring TodoCreated for an existing id");
                    return;
                }
                state.todos.push(Todo::new(*id, title.clone(), *created_at));
                state.draft.clear();
            },
            TodoAction::TodoToggled { id, done } => {
                if let Some(todo) = state.todos.iter_mut().find(|t| &t.id == id) {
                    todo.done = *done;
                }
            },
            TodoAction::TodoDeleted { id } => {
                if let Some(position) = state.position(id) {
                    state.todos.remove(position);
                }
            },
            TodoAction::FilterChanged { filter } => {
                state.filter = *filter;
            },
            // Commands are not applied to state
            TodoAction::UpdateDraft { .. }
            | TodoAction::CreateTodo { .. }
            | TodoAction::ToggleTodoDone { .. }
            | TodoAction::DeleteTodo { .. }
            | TodoAction::SetFilter { .. } => {},
        }
    }

    /// Turns a command into the event it produces, or the reason it was ignored
    fn decide(
        &self,
        state: &TodoState,
        command: TodoAction,
        env: &TodoEnvironment,
    ) -> Result<TodoAction, String> {
        match command {
            TodoAction::UpdateDraft { value } => Ok(TodoAction::DraftUpdated { value }),
            TodoAction::CreateTodo { title, key } => {
                let title = self.validate_create_todo(&title, &key)?;
                Ok(TodoAction::TodoCreated {
                    id: TodoId::from_uuid(env.ids.next_id()),
                    title: title.to_string(),
                    created_at: env.clock.now(),
                })
            },
            TodoAction::ToggleTodoDone { id } => {
                let todo = Self::validate_known_todo(state, &id)?;
                Ok(TodoAction::TodoToggled {
                    id,
                    done: !todo.done,
                })
            },
            TodoAction::DeleteTodo { id } => {
                Self::validate_known_todo(state, &id)?;
                Ok(TodoAction::TodoDeleted { id })
            },
            TodoAction::SetFilter { filter } => Ok(TodoAction::FilterChanged { filter }),
            event => Ok(event),
        }
    }
}

impl Default for TodoReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl Reducer for TodoReducer {
    type State = TodoState;
    type Action = TodoAction;
    type Environment = TodoEnvironment;

    fn reduce(&self, state: &mut Self::State, action: Self::Action, env: &Self::Environment) {
        let name = action.name();

        match self.decide(state, action, env) {
            Ok(event) => {
                tracing::trace!(action = name, event = event.name(), "Applying event");
                Self::apply_event(state, &event);
            },
            Err(reason) => {
                tracing::debug!(action = name, %reason, "Ignored command");
            },
        }
    }
}

/// Convenience for tests and demos: the filter a `SetFilter` command selects
impl From<Filter> for TodoAction {
    fn from(filter: Filter) -> Self {
        Self::SetFilter { filter }
    }
}
