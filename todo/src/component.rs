//! The mounted Todo List widget.
//!
//! [`TodoList`] ties a [`Store`] to a rendered document. State changes go
//! through the store; a render task observes the store's change revisions
//! and rebuilds the document after each one. Rendering is asynchronous, so
//! callers that inspect the document after a change await
//! [`TodoList::next_tick`] first.

use crate::config::TodoListConfig;
use crate::dom::{DomEvent, Element, Handler, Target};
use crate::error::TodoListError;
use crate::reducer::{TodoEnvironment, TodoReducer};
use crate::types::{Filter, Todo, TodoAction, TodoState};
use crate::view;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, watch, RwLock};
use tokio::task::JoinHandle;
use widget_runtime::Store;

type TodoStore = Store<TodoState, TodoAction, TodoEnvironment, TodoReducer>;

/// A mounted todo list: store, rendered document and render task
pub struct TodoList {
    store: TodoStore,
    config: Arc<TodoListConfig>,
    document: Arc<RwLock<Element>>,
    /// Store revision the document was last rendered from
    rendered: watch::Receiver<u64>,
    render_task: JoinHandle<()>,
}

impl TodoList {
    /// Mounts the widget with the given initial state
    ///
    /// The initial document is rendered before this returns. Must be called
    /// from within a tokio runtime.
    pub async fn mount(
        initial_state: TodoState,
        environment: TodoEnvironment,
        config: TodoListConfig,
    ) -> Self {
        let config = Arc::new(config);
        let reducer = TodoReducer::from_config(&config);
        let store = Store::with_config(initial_state, reducer, environment, config.store_config());

        // Subscribe before the first render so no change slips between them
        let changes = store.subscribe_changes();
        let (document, revision) = store
            .state_with_revision(|state| view::render(state, &config))
            .await;
        let document = Arc::new(RwLock::new(document));
        let (rendered_tx, rendered) = watch::channel(revision);

        let render_task = tokio::spawn(render_loop(
            store.clone(),
            changes,
            Arc::clone(&config),
            Arc::clone(&document),
            rendered_tx,
        ));

        tracing::debug!(revision, "Mounted todo list");

        Self {
            store,
            config,
            document,
            rendered,
            render_task,
        }
    }

    /// Mounts an empty list with the default configuration
    pub async fn mount_default(environment: TodoEnvironment) -> Self {
        Self::mount(TodoState::default(), environment, TodoListConfig::default()).await
    }

    /// Configuration the widget was mounted with
    #[must_use]
    pub fn config(&self) -> &TodoListConfig {
        &self.config
    }

    // ========== Operations ==========

    /// Submits `title` as if `key` was released in the new-todo input
    ///
    /// Only the configured submit key with a non-empty title creates a todo.
    /// The title is stored as given.
    ///
    /// # Errors
    ///
    /// Returns [`TodoListError::Store`] once the widget is unmounting.
    pub async fn create_todo(
        &self,
        title: impl Into<String>,
        key: impl Into<String>,
    ) -> Result<(), TodoListError> {
        self.send(TodoAction::CreateTodo {
            title: title.into(),
            key: key.into(),
        })
        .await
    }

    /// Flips `todos[index]` between done and not done
    ///
    /// An index past the end of the list does nothing.
    ///
    /// # Errors
    ///
    /// Returns [`TodoListError::Store`] once the widget is unmounting.
    pub async fn toggle_todo_done(&self, index: usize) -> Result<(), TodoListError> {
        let Some(id) = self.store.state(|s| s.id_at(index)).await else {
            tracing::debug!(index, "No todo to toggle");
            return Ok(());
        };
        self.send(TodoAction::ToggleTodoDone { id }).await
    }

    /// Removes `todos[index]`
    ///
    /// An index past the end of the list does nothing.
    ///
    /// # Errors
    ///
    /// Returns [`TodoListError::Store`] once the widget is unmounting.
    pub async fn delete_todo(&self, index: usize) -> Result<(), TodoListError> {
        let Some(id) = self.store.state(|s| s.id_at(index)).await else {
            tracing::debug!(index, "No todo to delete");
            return Ok(());
        };
        self.send(TodoAction::DeleteTodo { id }).await
    }

    /// Selects which todos are listed
    ///
    /// # Errors
    ///
    /// Returns [`TodoListError::Store`] once the widget is unmounting.
    pub async fn set_filter(&self, filter: Filter) -> Result<(), TodoListError> {
        self.send(filter.into()).await
    }

    /// Sets the new-todo input's bound value
    ///
    /// # Errors
    ///
    /// Returns [`TodoListError::Store`] once the widget is unmounting.
    pub async fn update_draft(&self, value: impl Into<String>) -> Result<(), TodoListError> {
        self.send(TodoAction::UpdateDraft {
            value: value.into(),
        })
        .await
    }

    /// Delivers a DOM event to the element addressed by `target`
    ///
    /// Events the element has no handler for are ignored, as in a browser.
    ///
    /// # Errors
    ///
    /// - [`TodoListError::ElementNotFound`] if nothing in the current
    ///   document matches `target`
    /// - [`TodoListError::Store`] once the widget is unmounting
    pub async fn dispatch(&self, target: Target, event: DomEvent) -> Result<(), TodoListError> {
        // Held until the action is processed, so a render of older state
        // cannot replace a value written into the live document here
        let mut document = self.document.write().await;
        let element = document
            .find_target_mut(&target)
            .ok_or_else(|| TodoListError::ElementNotFound(target.to_string()))?;

        let kind = event.kind();
        let Some(handler) = element.handler(kind).cloned() else {
            tracing::trace!(%target, %kind, "No handler for event");
            return Ok(());
        };

        let action = match (handler, event) {
            (Handler::Dispatch(action), _) => action,
            (Handler::BindDraft, DomEvent::Input { value }) => {
                element.set_attr("value", value.as_str());
                TodoAction::UpdateDraft { value }
            },
            (Handler::SubmitDraft, DomEvent::KeyUp { key }) => TodoAction::CreateTodo {
                title: element.value().to_string(),
                key,
            },
            (handler, _) => {
                tracing::trace!(%target, %kind, ?handler, "Handler does not accept event");
                return Ok(());
            },
        };

        tracing::debug!(%target, action = action.name(), "Dispatching DOM event");
        let result = self.send(action).await;
        drop(document);
        result
    }

    async fn send(&self, action: TodoAction) -> Result<(), TodoListError> {
        self.store.send(action).await?;
        Ok(())
    }

    // ========== Reads ==========

    /// Snapshot of the current state
    pub async fn state(&self) -> TodoState {
        self.store.state(Clone::clone).await
    }

    /// Current todos, in order
    pub async fn todos(&self) -> Vec<Todo> {
        self.store.state(|s| s.todos.clone()).await
    }

    /// Current filter
    pub async fn filter(&self) -> Filter {
        self.store.state(|s| s.filter).await
    }

    /// Number of todos not done yet
    pub async fn remaining_count(&self) -> usize {
        self.store.state(TodoState::remaining_count).await
    }

    /// Copy of the last rendered document
    ///
    /// May lag behind state until [`TodoList::next_tick`] resolves.
    pub async fn document(&self) -> Element {
        self.document.read().await.clone()
    }

    /// Every action the store processes, in order
    #[must_use]
    pub fn subscribe_actions(&self) -> broadcast::Receiver<TodoAction> {
        self.store.subscribe_actions()
    }

    // ========== Rendering ==========

    /// Waits until the document reflects every state change made so far
    pub async fn next_tick(&self) {
        let target = self.store.revision();
        let mut rendered = self.rendered.clone();

        if rendered.wait_for(|revision| *revision >= target).await.is_err() {
            tracing::warn!(target, "Render task stopped before catching up");
        }
    }

    /// [`TodoList::next_tick`] bounded by `timeout`
    ///
    /// # Errors
    ///
    /// Returns [`TodoListError::RenderTimeout`] if the document has not
    /// caught up when `timeout` expires.
    pub async fn next_tick_with_timeout(&self, timeout: Duration) -> Result<(), TodoListError> {
        tokio::time::timeout(timeout, self.next_tick())
            .await
            .map_err(|_| TodoListError::RenderTimeout)
    }

    /// Stops accepting actions and waits up to `timeout` for an in-flight
    /// action or render read to finish
    ///
    /// The render task stops when the widget is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`TodoListError::Store`] if the state is still busy when
    /// `timeout` expires.
    pub async fn unmount(self, timeout: Duration) -> Result<(), TodoListError> {
        tracing::info!("Unmounting todo list");
        self.store.shutdown(timeout).await?;
        Ok(())
    }
}

impl Drop for TodoList {
    fn drop(&mut self) {
        self.render_task.abort();
    }
}

impl std::fmt::Debug for TodoList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoList")
            .field("config", &self.config)
            .field("revision", &self.store.revision())
            .field("rendered", &*self.rendered.borrow())
            .finish_non_exhaustive()
    }
}

/// Re-renders the document whenever the store reports a change
async fn render_loop(
    store: TodoStore,
    mut changes: watch::Receiver<u64>,
    config: Arc<TodoListConfig>,
    document: Arc<RwLock<Element>>,
    rendered: watch::Sender<u64>,
) {
    while changes.changed().await.is_ok() {
        let (tree, revision) = store
            .state_with_revision(|state| view::render(state, &config))
            .await;

        let mut current = document.write().await;

        // State moved on while this tree was built: a newer render follows,
        // and this one would clobber values dispatch wrote meanwhile
        if revision <= *rendered.borrow() || store.revision() > revision {
            tracing::trace!(revision, "Skipping stale render");
            continue;
        }

        *current = tree;
        drop(current);
        rendered.send_replace(revision);
        tracing::trace!(revision, "Rendered");
    }

    tracing::debug!("Render loop stopped");
}
