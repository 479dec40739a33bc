use proptest::prelude::*;
use tagcheck::{Registry, parse_tag};

fn rule_segment() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "required",
        "omitempty",
        "numeric",
        "min=1",
        "max=5",
        "len=3",
        "email|numeric",
        "oneof=a b c",
        "contains=0x2C",
    ])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    // Same tag, same lookup: equal plans
    #[test]
    fn parsing_is_deterministic(segments in prop::collection::vec(rule_segment(), 1..8)) {
        let tag = segments.join(",");
        let registry = Registry::new();
        let first = parse_tag(&tag, &registry);
        let second = parse_tag(&tag, &registry);
        prop_assert!(first.is_ok());
        prop_assert_eq!(first, second);
    }

    // Flat tags keep one rule per non-directive segment, in order
    #[test]
    fn flat_tags_keep_rule_order(segments in prop::collection::vec(rule_segment(), 1..8)) {
        let tag = segments.join(",");
        let plan = parse_tag(&tag, &Registry::new()).unwrap();
        let expected: Vec<&str> = segments
            .iter()
            .filter(|s| **s != "omitempty")
            .map(|s| s.split(['=', '|']).next().unwrap())
            .collect();
        let actual: Vec<&str> = plan.rules.iter().map(|r| r.name.as_str()).collect();
        prop_assert_eq!(actual, expected);
        prop_assert_eq!(plan.omit_empty, segments.contains(&"omitempty"));
    }

    // Elements after a dive form the nested level
    #[test]
    fn dive_nests_the_tail(
        head in prop::collection::vec(rule_segment(), 0..4),
        tail in prop::collection::vec(rule_segment(), 0..4),
    ) {
        let mut segments: Vec<&str> = head.clone();
        segments.push("dive");
        segments.extend(tail.iter().copied());
        let plan = parse_tag(&segments.join(","), &Registry::new()).unwrap();

        let dive = plan.dive.as_ref().unwrap();
        let head_rules = head.iter().filter(|s| **s != "omitempty").count();
        let tail_rules = tail.iter().filter(|s| **s != "omitempty").count();
        prop_assert_eq!(plan.rules.len(), head_rules);
        prop_assert_eq!(dive.elements.rules.len(), tail_rules);
    }

    // Arbitrary input never panics
    #[test]
    fn arbitrary_tags_do_not_panic(tag in "\\PC{0,40}") {
        let _ = parse_tag(&tag, &Registry::new());
    }

    // Arbitrary comma/pipe/directive soup never panics
    #[test]
    fn directive_soup_does_not_panic(
        tokens in prop::collection::vec(
            prop::sample::select(vec!["dive", "keys", "endkeys", "omitempty", "required", "", "-", "min=1", "a|b"]),
            0..10,
        )
    ) {
        let _ = parse_tag(&tokens.join(","), &Registry::new());
    }
}
