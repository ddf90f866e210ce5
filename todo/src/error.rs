//! Errors surfaced by the mounted widget.

use thiserror::Error;
use widget_runtime::StoreError;

/// Errors returned by [`crate::TodoList`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TodoListError {
    /// The underlying store rejected the action or failed to shut down
    #[error(transparent)]
    Store(#[from] StoreError),

    /// No element matches the dispatch target
    #[error("No element matches {0}")]
    ElementNotFound(String),

    /// The document did not catch up with state in time
    #[error("Timed out waiting for render")]
    RenderTimeout,
}
