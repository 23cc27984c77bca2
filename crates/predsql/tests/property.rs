use predsql::advanced::parse;
use predsql::{ParameterWriter, QueryStringBuilder, Value, compile};
use proptest::prelude::*;

/// A generated predicate: its source and the literals in source order
#[derive(Debug, Clone)]
struct Generated {
    source: String,
    literals: Vec<Value>,
}

fn arb_literal() -> impl Strategy<Value = (String, Value)> {
    prop_oneof![
        (0i64..1000).prop_map(|n| (n.to_string(), Value::Int(n))),
        "[a-z]{0,6}".prop_map(|s| (format!("'{s}'"), Value::String(s))),
        any::<bool>().prop_map(|b| (b.to_string(), Value::Bool(b))),
        Just(("null".to_string(), Value::Null)),
    ]
}

fn arb_comparison() -> impl Strategy<Value = Generated> {
    (
        prop_oneof![Just("a"), Just("b"), Just("name"), Just("count")],
        prop_oneof![
            Just("=="),
            Just("==="),
            Just("!="),
            Just("!=="),
            Just(">"),
            Just(">="),
            Just("<"),
            Just("<=")
        ],
        arb_literal(),
    )
        .prop_map(|(field, op, (text, value))| Generated {
            source: format!("x.{field} {op} {text}"),
            literals: vec![value],
        })
}

fn arb_predicate(depth: u32) -> BoxedStrategy<Generated> {
    if depth == 0 {
        return arb_comparison().boxed();
    }

    let leaf = arb_comparison();
    let nested = (
        arb_predicate(depth - 1),
        prop_oneof![Just("&&"), Just("||")],
        arb_predicate(depth - 1),
        any::<bool>(),
    )
        .prop_map(|(lhs, op, rhs, grouped)| {
            let source = if grouped {
                format!("({}) {op} ({})", lhs.source, rhs.source)
            } else {
                format!("{} {op} {}", lhs.source, rhs.source)
            };
            let mut literals = lhs.literals;
            literals.extend(rhs.literals);
            Generated { source, literals }
        });
    prop_oneof![leaf, nested].boxed()
}

/// Placeholders in the order they appear in rendered text
fn placeholders_in(text: &str) -> Vec<String> {
    text.split_whitespace()
        .filter(|token| token.starts_with("@p"))
        .map(str::to_string)
        .collect()
}

fn index_of(name: &str) -> usize {
    name.trim_start_matches("@p")
        .parse()
        .expect("placeholder should end in a number")
}

proptest! {
    #[test]
    fn rendering_and_parameters_stay_in_lockstep(p in arb_predicate(3)) {
        let predicate = compile(&format!("x => {}", p.source))
            .expect("generated predicate should compile");
        let text = predicate.to_raw_string();
        let params = predicate.parameters();

        let names: Vec<String> = params.iter().map(|p| p.placeholder_name.clone()).collect();
        prop_assert_eq!(placeholders_in(&text), names);

        let values: Vec<Value> = params.into_iter().map(|p| p.value).collect();
        prop_assert_eq!(values, p.literals);
    }

    #[test]
    fn placeholders_are_distinct_and_increasing(p in arb_predicate(3)) {
        let predicate = compile(&format!("function (x) {{ return {}; }}", p.source))
            .expect("generated predicate should compile");
        let indices: Vec<usize> = predicate
            .parameters()
            .iter()
            .map(|p| index_of(&p.placeholder_name))
            .collect();
        prop_assert_eq!(indices, (0..p.literals.len()).collect::<Vec<_>>());
    }

    #[test]
    fn compiling_twice_is_deterministic(p in arb_predicate(2)) {
        let source = format!("x => {}", p.source);
        let first = compile(&source).expect("generated predicate should compile");
        let second = compile(&source).expect("generated predicate should compile");
        prop_assert_eq!(first.to_raw_string(), second.to_raw_string());
        prop_assert_eq!(first.parameters(), second.parameters());
    }

    #[test]
    fn parse_pretty_roundtrip(p in arb_predicate(3)) {
        let source = format!("x => {}", p.source);
        let parsed = parse(&source).expect("generated source should parse");
        let rendered = parsed.to_string();
        let reparsed = parse(&rendered).expect("pretty output should reparse");
        prop_assert_eq!(parsed, reparsed);
    }
}
