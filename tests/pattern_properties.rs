//! Property tests for the coordinate and flag patterns

use proptest::prelude::*;
use wiki_loot_extract::infrastructure::extraction::patterns::{coordinates, flag_position};

fn decimal() -> impl Strategy<Value = String> {
    (0u32..100, 0u32..100).prop_map(|(whole, fraction)| format!("{whole}.{fraction}"))
}

proptest! {
    #[test]
    fn flag_joins_exactly_two_coordinates(x in decimal(), y in decimal(), zone in "[A-Za-z ]{0,20}") {
        let text = format!("{zone} (x:{x}, y:{y})");
        prop_assert_eq!(flag_position(&text), Some(format!("({x},{y})")));
    }

    #[test]
    fn flag_needs_exactly_two(values in prop::collection::vec(decimal(), 0..6)) {
        let text = values.join(" ");
        let flag = flag_position(&text);
        prop_assert_eq!(flag.is_some(), values.len() == 2);
        prop_assert_eq!(coordinates(&text).len(), values.len());
    }

    #[test]
    fn clock_times_are_not_coordinates(hour in 1u32..13, minute in 0u32..60, x in decimal(), y in decimal()) {
        let text = format!("{hour}:{minute:02} am ({x}, {y})");
        prop_assert_eq!(flag_position(&text), Some(format!("({x},{y})")));
    }
}
