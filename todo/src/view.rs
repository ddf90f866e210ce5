//! Renders [`TodoState`] into an element tree.
//!
//! Element ids use a todo's position in the full list, so `toggle-todo-1`
//! always addresses `todos[1]` whatever the filter hides.

use crate::config::TodoListConfig;
use crate::dom::{Element, EventKind, Handler};
use crate::types::{Filter, Todo, TodoAction, TodoState};

/// Name of the new-todo input
pub const NEW_TODO_INPUT: &str = "new-todo";

/// Id of the checkbox toggling `todos[index]`
#[must_use]
pub fn toggle_id(index: usize) -> String {
    format!("toggle-todo-{index}")
}

/// Id of the button deleting `todos[index]`
#[must_use]
pub fn delete_id(index: usize) -> String {
    format!("delete-todo-{index}")
}

/// Id of the button selecting `filter`
#[must_use]
pub fn filter_button_id(filter: Filter) -> String {
    format!("{}-todos", filter.as_str())
}

const fn filter_label(filter: Filter) -> &'static str {
    match filter {
        Filter::All => "All",
        Filter::Active => "Active",
        Filter::Completed => "Completed",
    }
}

/// Builds the whole widget for `state`
#[must_use]
pub fn render(state: &TodoState, config: &TodoListConfig) -> Element {
    metrics::counter!("todo_list.renders.total").increment(1);
    tracing::trace!(
        todos = state.count(),
        filter = %state.filter,
        "Rendering todo list"
    );

    Element::new("div")
        .with_class("todo-list")
        .with_child(Element::new("h1").with_text(config.heading.as_str()))
        .with_child(new_todo_input(&state.draft))
        .with_child(
            Element::new("ul")
                .with_children(state.visible().map(|(index, todo)| todo_item(index, todo))),
        )
        .with_child(footer(state))
}

fn new_todo_input(draft: &str) -> Element {
    Element::new("input")
        .with_attr("name", NEW_TODO_INPUT)
        .with_attr("type", "text")
        .with_attr("value", draft)
        .on(EventKind::Input, Handler::BindDraft)
        .on(EventKind::KeyUp, Handler::SubmitDraft)
}

fn todo_item(index: usize, todo: &Todo) -> Element {
    Element::new("li")
        .with_class_if("done", todo.done)
        .with_child(
            Element::new("input")
                .with_id(toggle_id(index))
                .with_attr("type", "checkbox")
                .with_flag("checked", todo.done)
                .on(
                    EventKind::Click,
                    Handler::Dispatch(TodoAction::ToggleTodoDone { id: todo.id }),
                ),
        )
        .with_child(
            Element::new("span")
                .with_class("todo-title")
                .with_text(todo.title.as_str()),
        )
        .with_child(
            Element::new("button")
                .with_id(delete_id(index))
                .with_text("Delete")
                .on(
                    EventKind::Click,
                    Handler::Dispatch(TodoAction::DeleteTodo { id: todo.id }),
                ),
        )
}

fn footer(state: &TodoState) -> Element {
    Element::new("footer")
        .with_child(
            Element::new("span")
                .with_class("todos-left")
                .with_text(format!("{} left", state.remaining_count())),
        )
        .with_children(Filter::ALL.into_iter().map(|filter| {
            Element::new("button")
                .with_id(filter_button_id(filter))
                .with_class_if("active", filter == state.filter)
                .with_text(filter_label(filter))
                .on(EventKind::Click, Handler::Dispatch(filter.into()))
        }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use widget_testing::{test_clock, SequentialIdGenerator};

    fn state(items: &[(&str, bool)]) -> TodoState {
        TodoState::from_summaries(
            items.iter().copied(),
            &test_clock(),
            &SequentialIdGenerator::new(),
        )
    }

    fn list_titles(document: &Element) -> Vec<String> {
        document
            .find_all(&|e: &Element| e.has_class("todo-title"))
            .into_iter()
            .map(Element::text)
            .collect()
    }

    #[test]
    fn renders_heading_from_config() {
        let config = TodoListConfig {
            heading: "Chores".to_string(),
            ..TodoListConfig::default()
        };
        let document = render(&TodoState::new(), &config);

        assert_eq!(
            document.find_by_tag("h1").map(Element::text).as_deref(),
            Some("Chores")
        );
    }

    #[test]
    fn input_shows_draft() {
        let mut todo_state = TodoState::new();
        todo_state.draft = "Walk the".to_string();
        let document = render(&todo_state, &TodoListConfig::default());

        let input = document.find_by_name(NEW_TODO_INPUT);
        assert_eq!(input.map(Element::value), Some("Walk the"));
        assert_eq!(
            input.and_then(|i| i.handler(EventKind::KeyUp)),
            Some(&Handler::SubmitDraft)
        );
    }

    #[test]
    fn items_carry_positional_ids_and_done_markers() {
        let todo_state = state(&[("Write some code", false), ("Learn TDD", true)]);
        let document = render(&todo_state, &TodoListConfig::default());

        assert!(document
            .find_by_id(&toggle_id(0))
            .is_some_and(|c| !c.is_checked()));
        assert!(document.find_by_id(&toggle_id(1)).is_some_and(Element::is_checked));
        assert!(document.find_by_id(&delete_id(1)).is_some());

        let done_items = document.find_all(&|e: &Element| e.tag() == "li" && e.has_class("done"));
        assert_eq!(done_items.len(), 1);
        assert_eq!(list_titles(&document), vec!["Write some code", "Learn TDD"]);
    }

    #[test]
    fn filtered_items_keep_full_list_positions() {
        let todo_state = state(&[("Write some code", false), ("Learn TDD", true)])
            .with_filter(Filter::Completed);
        let document = render(&todo_state, &TodoListConfig::default());

        assert_eq!(list_titles(&document), vec!["Learn TDD"]);
        assert!(document.find_by_id(&toggle_id(0)).is_none());
        assert_eq!(
            document
                .find_by_id(&delete_id(1))
                .and_then(|b| b.handler(EventKind::Click)),
            Some(&Handler::Dispatch(TodoAction::DeleteTodo {
                id: todo_state.todos[1].id
            }))
        );
    }

    #[test]
    fn footer_shows_remaining_and_marks_selected_filter() {
        let todo_state =
            state(&[("a", false), ("b", true), ("c", false)]).with_filter(Filter::Active);
        let document = render(&todo_state, &TodoListConfig::default());

        assert_eq!(
            document
                .find(&|e: &Element| e.has_class("todos-left"))
                .map(Element::text)
                .as_deref(),
            Some("2 left")
        );

        let active: Vec<_> = document
            .find_all(&|e: &Element| e.tag() == "button" && e.has_class("active"))
            .into_iter()
            .filter_map(Element::id)
            .collect();
        assert_eq!(active, vec!["active-todos"]);
    }

    #[test]
    fn html_output() {
        let todo_state = state(&[("Fish & chips", true)]);
        let html = render(&todo_state, &TodoListConfig::default()).to_html();

        assert!(html.starts_with("<div class=\"todo-list\"><h1>Todo List</h1>"));
        assert!(html.contains(
            "<li class=\"done\"><input checked id=\"toggle-todo-0\" type=\"checkbox\">"
        ));
        assert!(html.contains("<span class=\"todo-title\">Fish &amp; chips</span>"));
        assert!(html.contains("<span class=\"todos-left\">0 left</span>"));
        assert!(html.contains("<button class=\"active\" id=\"all-todos\">All</button>"));
    }
}
