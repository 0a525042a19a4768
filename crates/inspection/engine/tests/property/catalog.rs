//! Property tests: the variable catalog is sorted, unique and first-wins.

use inspection_engine::VariableCatalog;
use inspection_types::{Variable, VariableValue};
use proptest::prelude::*;
use std::collections::HashMap;

fn arb_variables() -> impl Strategy<Value = Vec<Variable>> {
    prop::collection::vec(
        (
            prop_oneof![Just("startUserKey".to_string()), "[a-dA-D]{1,3}"],
            any::<i64>(),
        )
            .prop_map(|(name, n)| Variable::inferred(name, n)),
        0..20,
    )
}

proptest! {
    /// Names come out strictly ascending, so no duplicates survive.
    #[test]
    fn catalog_is_strictly_sorted(variables in arb_variables()) {
        let list = VariableCatalog::default().catalog(&variables);
        for pair in list.windows(2) {
            prop_assert!(pair[0].name < pair[1].name);
        }
        prop_assert!(list.iter().all(|v| v.name != "startUserKey"));
    }

    /// Each retained entry carries its name's first value.
    #[test]
    fn catalog_keeps_first_occurrence(variables in arb_variables()) {
        let mut first: HashMap<&str, &VariableValue> = HashMap::new();
        for v in &variables {
            first.entry(v.name.as_str()).or_insert(&v.value);
        }

        let list = VariableCatalog::default().catalog(&variables);
        for entry in &list {
            prop_assert_eq!(Some(&&entry.value), first.get(entry.name.as_str()));
        }
    }
}

#[test]
fn duplicate_names_collapse_to_first() {
    let variables = vec![
        Variable::inferred("b", "bee"),
        Variable::inferred("a", "first"),
        Variable::inferred("a", "dup"),
    ];

    let list = VariableCatalog::default().catalog(&variables);
    let names: Vec<&str> = list.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b"]);
    assert_eq!(list[0].value, VariableValue::from("first"));
}
