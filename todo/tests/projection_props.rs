//! Property tests for the filtered projection and the remaining count.

use proptest::prelude::*;
use todo_list::{render, Element, Filter, TodoListConfig, TodoState};
use widget_testing::{test_clock, SequentialIdGenerator};

fn state_strategy() -> impl Strategy<Value = TodoState> {
    prop::collection::vec(("[a-z ]{1,12}", any::<bool>()), 0..20).prop_map(|items| {
        TodoState::from_summaries(items, &test_clock(), &SequentialIdGenerator::new())
    })
}

fn visible_count(state: &TodoState, filter: Filter) -> usize {
    state.clone().with_filter(filter).visible().count()
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    #[test]
    fn active_and_completed_partition_the_list(state in state_strategy()) {
        let active = visible_count(&state, Filter::Active);
        let completed = visible_count(&state, Filter::Completed);

        prop_assert_eq!(active + completed, state.count());
        prop_assert_eq!(visible_count(&state, Filter::All), state.count());
        prop_assert_eq!(state.remaining_count(), active);
    }

    #[test]
    fn rendered_items_match_the_projection(
        state in state_strategy(),
        filter in prop::sample::select(Filter::ALL.to_vec()),
    ) {
        let state = state.with_filter(filter);
        let document = render(&state, &TodoListConfig::default());

        let items = document.find_all(&|e: &Element| e.tag() == "li").len();
        prop_assert_eq!(items, state.visible().count());

        let left = document
            .find(&|e: &Element| e.has_class("todos-left"))
            .map(Element::text);
        prop_assert_eq!(left, Some(format!("{} left", state.remaining_count())));
    }
}
