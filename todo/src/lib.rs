//! Todo List widget built on the widget runtime.
//!
//! A list of todos that can be created, toggled done, deleted and filtered,
//! rendered as an element tree that reacts to DOM-style events.
//!
//! - [`types`]: todos, filters, state and actions
//! - [`reducer`]: command validation and event application
//! - [`view`] and [`dom`]: rendering state into elements with event handlers
//! - [`component`]: the mounted widget tying store, document and render task together
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use todo_list::{DomEvent, Target, TodoEnvironment, TodoList};
//! use widget_core::environment::{RandomIdGenerator, SystemClock};
//!
//! # async fn example() -> Result<(), todo_list::TodoListError> {
//! let env = TodoEnvironment::new(Arc::new(SystemClock), Arc::new(RandomIdGenerator));
//! let list = TodoList::mount_default(env).await;
//!
//! // Type a title and press Enter
//! let input = Target::name("new-todo");
//! list.dispatch(input.clone(), DomEvent::input("Buy milk")).await?;
//! list.dispatch(input, DomEvent::key_up("Enter")).await?;
//!
//! // Wait for the document to re-render, then read it
//! list.next_tick().await;
//! println!("{}", list.document().await);
//!
//! list.unmount(Duration::from_secs(5)).await?;
//! # Ok(())
//! # }
//! ```

pub mod component;
pub mod config;
pub mod dom;
pub mod error;
pub mod reducer;
pub mod types;
pub mod view;

// Re-export commonly used types
pub use component::TodoList;
pub use config::TodoListConfig;
pub use dom::{DomEvent, Element, EventKind, Handler, Target};
pub use error::TodoListError;
pub use reducer::{TodoEnvironment, TodoReducer};
pub use types::{Filter, ParseFilterError, Todo, TodoAction, TodoId, TodoState};
pub use view::render;
