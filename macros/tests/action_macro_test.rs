//! Tests for #[derive(Action)] macro

use widget_macros::Action;

#[derive(Action, Clone, Debug, PartialEq)]
enum FormAction {
    #[command]
    Submit {
        value: String,
        key: String,
    },

    #[command]
    Reset,

    #[event]
    Submitted(String),

    #[event]
    Cleared,

    /// Neither a command nor an event
    Focus,
}

#[derive(Action, Clone, Debug)]
enum Wrapped<T> {
    #[command]
    Push(T),

    #[event]
    Pushed(T),
}

#[test]
fn test_is_command() {
    let action = FormAction::Submit {
        value: "Walk the dog".to_string(),
        key: "Enter".to_string(),
    };
    assert!(action.is_command());
    assert!(!action.is_event());
    assert!(FormAction::Reset.is_command());
}

#[test]
fn test_is_event() {
    let action = FormAction::Submitted("Walk the dog".to_string());
    assert!(!action.is_command());
    assert!(action.is_event());
    assert!(FormAction::Cleared.is_event());
}

#[test]
fn test_unmarked_variant_is_neither() {
    assert!(!FormAction::Focus.is_command());
    assert!(!FormAction::Focus.is_event());
}

#[test]
fn test_names_cover_every_variant_shape() {
    let cases = vec![
        (
            FormAction::Submit {
                value: String::new(),
                key: String::new(),
            },
            "Submit",
        ),
        (FormAction::Reset, "Reset"),
        (FormAction::Submitted(String::new()), "Submitted"),
        (FormAction::Cleared, "Cleared"),
        (FormAction::Focus, "Focus"),
    ];

    for (action, expected) in cases {
        assert_eq!(action.name(), expected, "wrong name for {action:?}");
    }
}

#[test]
fn test_generic_enum() {
    let push = Wrapped::Push(1_u8);
    let pushed = Wrapped::Pushed(1_u8);

    assert!(push.is_command());
    assert!(pushed.is_event());
    assert_eq!(pushed.name(), "Pushed");
}
