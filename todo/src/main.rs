//! Scripted walkthrough of the Todo List widget.
//!
//! Mounts the widget, drives it only through DOM events and prints the
//! rendered HTML after every step. Configuration comes from `TODO_LIST_*`
//! environment variables, optionally loaded from a `.env` file.

use std::sync::Arc;
use todo_list::{DomEvent, Filter, Target, TodoEnvironment, TodoList, TodoListConfig, TodoState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use widget_core::environment::{RandomIdGenerator, SystemClock};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo_list=debug,widget_runtime=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = TodoListConfig::from_env();
    let shutdown_timeout = config.shutdown_timeout();
    let submit_key = config.submit_key.clone();
    tracing::info!(?config, "Starting todo list demo");

    println!("=== {} ===\n", config.heading);

    let env = TodoEnvironment::new(Arc::new(SystemClock), Arc::new(RandomIdGenerator));
    let list = TodoList::mount(TodoState::new(), env, config).await;
    let input = Target::name("new-todo");

    for title in ["Write some code", "Learn TDD", "Walk the dog"] {
        list.dispatch(input.clone(), DomEvent::input(title)).await?;
        list.dispatch(input.clone(), DomEvent::key_up(submit_key.as_str())).await?;
    }
    show(&list, "Created three todos").await;

    list.dispatch(Target::id("toggle-todo-1"), DomEvent::Click).await?;
    show(&list, "Clicked #toggle-todo-1").await;

    for filter in [Filter::Active, Filter::Completed, Filter::All] {
        list.dispatch(Target::id(format!("{filter}-todos")), DomEvent::Click).await?;
        show(&list, &format!("Clicked #{filter}-todos")).await;
    }

    list.dispatch(Target::id("delete-todo-0"), DomEvent::Click).await?;
    show(&list, "Clicked #delete-todo-0").await;

    println!(
        "{} of {} todos left",
        list.remaining_count().await,
        list.todos().await.len()
    );

    list.unmount(shutdown_timeout).await?;
    Ok(())
}

async fn show(list: &TodoList, step: &str) {
    list.next_tick().await;
    println!(">>> {step}");
    println!("{}\n", list.document().await);
}
