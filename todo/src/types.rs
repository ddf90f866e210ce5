//! Domain types for the Todo List widget.
//!
//! A todo list is an ordered sequence of todo items plus the filter that
//! decides which of them are shown, and the text currently typed into the
//! new-todo input.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;
use widget_core::environment::{Clock, IdGenerator};
use widget_macros::Action;

/// Unique identifier for a todo item
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TodoId(Uuid);

impl TodoId {
    /// Creates a new random `TodoId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a `TodoId` from a UUID
    #[must_use]
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Returns the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TodoId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single todo item
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Stable identifier
    pub id: TodoId,
    /// What needs doing
    pub title: String,
    /// Whether the todo is done
    pub done: bool,
    /// When the todo was created
    pub created_at: DateTime<Utc>,
}

impl Todo {
    /// Creates a todo that is not done yet
    #[must_use]
    pub const fn new(id: TodoId, title: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title,
            done: false,
            created_at,
        }
    }

    /// Flips the done flag
    pub const fn toggle(&mut self) {
        self.done = !self.done;
    }

    /// `(title, done)`, the part of a todo the user sees
    #[must_use]
    pub fn summary(&self) -> (&str, bool) {
        (self.title.as_str(), self.done)
    }
}

/// Which todos the list shows
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    /// Every todo
    #[default]
    All,
    /// Todos not done yet
    Active,
    /// Todos already done
    Completed,
}

impl Filter {
    /// All filters, in the order their buttons appear
    pub const ALL: [Self; 3] = [Self::All, Self::Active, Self::Completed];

    /// Lowercase name used in element ids and configuration
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    /// Whether `todo` is shown under this filter
    #[must_use]
    pub const fn matches(self, todo: &Todo) -> bool {
        match self {
            Self::All => true,
            Self::Active => !todo.done,
            Self::Completed => todo.done,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A filter name that is not `all`, `active` or `completed`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown filter {0:?} (expected all, active or completed)")]
pub struct ParseFilterError(pub String);

impl FromStr for Filter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|filter| filter.as_str() == s)
            .ok_or_else(|| ParseFilterError(s.to_string()))
    }
}

/// State of the todo list widget
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoState {
    /// All todos, in insertion order
    pub todos: Vec<Todo>,
    /// Current filter
    pub filter: Filter,
    /// Value bound to the new-todo input
    pub draft: String,
}

impl TodoState {
    /// Creates an empty todo list showing all todos
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a list from `(title, done)` pairs, drawing ids and timestamps
    /// from the given environment
    #[must_use]
    pub fn from_summaries<T>(
        items: impl IntoIterator<Item = (T, bool)>,
        clock: &dyn Clock,
        ids: &dyn IdGenerator,
    ) -> Self
    where
        T: Into<String>,
    {
        let todos = items
            .into_iter()
            .map(|(title, done)| Todo {
                done,
                ..Todo::new(TodoId::from_uuid(ids.next_id()), title.into(), clock.now())
            })
            .collect();

        Self {
            todos,
            ..Self::default()
        }
    }

    /// Returns the same state with a different filter
    #[must_use]
    pub const fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    /// Returns the number of todos
    #[must_use]
    pub fn count(&self) -> usize {
        self.todos.len()
    }

    /// Number of todos not done yet
    #[must_use]
    pub fn remaining_count(&self) -> usize {
        self.todos.iter().filter(|t| !t.done).count()
    }

    /// Number of todos done
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.todos.iter().filter(|t| t.done).count()
    }

    /// Returns a todo by ID
    #[must_use]
    pub fn get(&self, id: &TodoId) -> Option<&Todo> {
        self.todos.iter().find(|t| &t.id == id)
    }

    /// Position of a todo in the list
    #[must_use]
    pub fn position(&self, id: &TodoId) -> Option<usize> {
        self.todos.iter().position(|t| &t.id == id)
    }

    /// Checks if a todo exists
    #[must_use]
    pub fn exists(&self, id: &TodoId) -> bool {
        self.get(id).is_some()
    }

    /// Id of the todo at `index`, if the index is in range
    #[must_use]
    pub fn id_at(&self, index: usize) -> Option<TodoId> {
        self.todos.get(index).map(|t| t.id)
    }

    /// Todos passing the current filter, with their position in the full list
    pub fn visible(&self) -> impl Iterator<Item = (usize, &Todo)> {
        let filter = self.filter;
        self.todos
            .iter()
            .enumerate()
            .filter(move |(_, todo)| filter.matches(todo))
    }

    /// `(title, done)` for every todo, in order
    #[must_use]
    pub fn summaries(&self) -> Vec<(&str, bool)> {
        self.todos.iter().map(Todo::summary).collect()
    }
}

/// Actions representing commands and events for the todo list
///
/// Commands come from the user (through the rendered elements or the
/// component's methods). The reducer validates them and turns accepted ones
/// into events, which are what actually change state.
#[derive(Action, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TodoAction {
    // ========== Commands ==========
    /// Command: The new-todo input changed
    #[command]
    UpdateDraft {
        /// Current input value
        value: String,
    },

    /// Command: A key was released in the new-todo input
    #[command]
    CreateTodo {
        /// Title typed so far
        title: String,
        /// Name of the released key
        key: String,
    },

    /// Command: Flip a todo between done and not done
    #[command]
    ToggleTodoDone {
        /// Todo to toggle
        id: TodoId,
    },

    /// Command: Remove a todo
    #[command]
    DeleteTodo {
        /// Todo to delete
        id: TodoId,
    },

    /// Command: Show a different subset of todos
    #[command]
    SetFilter {
        /// Filter to select
        filter: Filter,
    },

    // ========== Events ==========
    /// Event: The draft value changed
    #[event]
    DraftUpdated {
        /// New draft value
        value: String,
    },

    /// Event: A todo was appended and the draft cleared
    #[event]
    TodoCreated {
        /// Todo identifier
        id: TodoId,
        /// Title of the todo
        title: String,
        /// When the todo was created
        created_at: DateTime<Utc>,
    },

    /// Event: A todo's done flag was set
    #[event]
    TodoToggled {
        /// Todo identifier
        id: TodoId,
        /// Done flag after the toggle
        done: bool,
    },

    /// Event: A todo was removed
    #[event]
    TodoDeleted {
        /// Todo identifier
        id: TodoId,
    },

    /// Event: The filter changed
    #[event]
    FilterChanged {
        /// Newly selected filter
        filter: Filter,
    },
}
