use condswitch::SwitchOptions;
use condswitch::advanced::{StmtKind, Switch, parse, pretty, rewrite};
use condswitch::convert_to_switch;
use proptest::prelude::*;

fn arb_operand() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("$x".to_string()),
        Just("$y".to_string()),
        (0i64..100).prop_map(|n| n.to_string()),
        "[a-z]{1,6}".prop_map(|s| format!("'{s}'")),
    ]
}

fn arb_condition(depth: u32) -> BoxedStrategy<String> {
    let comparison = (
        arb_operand(),
        prop_oneof![Just("=="), Just("==="), Just("<"), Just("!=")],
        arb_operand(),
    )
        .prop_map(|(lhs, op, rhs)| format!("{lhs} {op} {rhs}"));
    if depth == 0 {
        return comparison.boxed();
    }
    let logical = (
        arb_condition(depth - 1),
        prop_oneof![Just("&&"), Just("||")],
        arb_condition(depth - 1),
    )
        .prop_map(|(lhs, op, rhs)| format!("({lhs}) {op} ({rhs})"));
    let call = arb_operand().prop_map(|arg| format!("check({arg})"));
    prop_oneof![comparison, logical, call].boxed()
}

/// An `if` chain with one branch per condition and an optional `else`
fn chain_source(conditions: &[String], with_default: bool) -> String {
    let mut source = String::from("<?php\n");
    for (i, cond) in conditions.iter().enumerate() {
        let keyword = if i == 0 { "if" } else { "} elseif" };
        source.push_str(&format!("{keyword} ({cond}) {{\n    echo {i};\n"));
    }
    if with_default {
        source.push_str("} else {\n    echo 'default';\n");
    }
    source.push_str("}\n");
    source
}

fn only_switch(source: &str) -> Switch {
    let program = rewrite(parse(source).unwrap(), &SwitchOptions::default());
    assert_eq!(program.stmts.len(), 1);
    match program.stmts.into_iter().next().map(|stmt| stmt.kind) {
        Some(StmtKind::Switch(switch)) => switch,
        other => panic!("Expected switch, got {:?}", other),
    }
}

proptest! {
    #[test]
    fn branch_count_is_preserved(
        conditions in prop::collection::vec(arb_condition(2), 1..8),
        with_default in any::<bool>(),
    ) {
        let switch = only_switch(&chain_source(&conditions, with_default));
        prop_assert_eq!(switch.cases.len(), conditions.len() + usize::from(with_default));
    }

    #[test]
    fn default_case_is_unique_and_last(
        conditions in prop::collection::vec(arb_condition(2), 1..8),
        with_default in any::<bool>(),
    ) {
        let switch = only_switch(&chain_source(&conditions, with_default));
        let defaults: Vec<usize> = switch
            .cases
            .iter()
            .enumerate()
            .filter(|(_, case)| case.key.is_none())
            .map(|(i, _)| i)
            .collect();
        if with_default {
            prop_assert_eq!(defaults, vec![switch.cases.len() - 1]);
        } else {
            prop_assert!(defaults.is_empty());
        }
    }

    #[test]
    fn bodies_stay_in_source_order(
        conditions in prop::collection::vec(arb_condition(1), 1..8),
    ) {
        let out = convert_to_switch(&chain_source(&conditions, true)).unwrap();
        let positions: Vec<usize> = (0..conditions.len())
            .map(|i| out.find(&format!("echo {i};")).unwrap())
            .collect();
        prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(out.find("echo 'default';").unwrap() > positions[positions.len() - 1]);
    }

    #[test]
    fn parse_pretty_roundtrip(
        conditions in prop::collection::vec(arb_condition(2), 1..5),
        with_default in any::<bool>(),
    ) {
        let source = chain_source(&conditions, with_default);
        let parsed = parse(&source).expect("generated chain should parse");
        let rendered = pretty(&parsed);
        let reparsed = parse(&rendered).expect("pretty output should reparse");
        prop_assert_eq!(parsed, reparsed);
    }

    #[test]
    fn switch_output_reparses(
        conditions in prop::collection::vec(arb_condition(2), 1..5),
        with_default in any::<bool>(),
    ) {
        let out = convert_to_switch(&chain_source(&conditions, with_default)).unwrap();
        prop_assert!(parse(&out).is_ok(), "output did not reparse:\n{}", out);
    }
}
