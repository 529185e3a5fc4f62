#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use mirror_core::{Constraint, Record, Value};
use mirror_runtime::{CommitOutcome, Mirror};

#[derive(Debug, Arbitrary)]
enum RawInput {
    Text(String),
    Checked(bool),
}

#[derive(Debug, Arbitrary)]
struct Case {
    reference: f64,
    predicate: u8,
    fallback: Option<String>,
    inputs: Vec<RawInput>,
}

const PREDICATES: [&str; 6] = ["less", "lessOrEqual", "equal", "greater", "greaterOrEqual", "bogus"];

fuzz_target!(|case: Case| {
    let mirror = Mirror::new(false);
    let record = Record::new().with("target", 0).with("reference", case.reference);
    mirror.register_object("r", record.clone()).unwrap();

    let mut constraint = Constraint::new(
        PREDICATES[usize::from(case.predicate) % PREDICATES.len()],
        "reference",
    );
    if let Some(fallback) = case.fallback {
        constraint = constraint.with_fallback(fallback);
    }
    let binding = mirror.resolve_binding("r", "target", Some(constraint)).unwrap();

    for input in case.inputs.into_iter().take(64) {
        let raw = match input {
            RawInput::Text(s) => Value::from(s),
            RawInput::Checked(b) => Value::from(b),
        };
        let before = record.get("target");
        match mirror.handle_change(&binding, raw) {
            CommitOutcome::Committed(v) | CommitOutcome::FellBack { committed: v, .. } => {
                assert!(v.as_number().is_some());
            }
            CommitOutcome::Rejected => assert_eq!(record.get("target").map(|v| v.to_string()), before.map(|v| v.to_string())),
            CommitOutcome::Detached => unreachable!("record stays registered"),
        }
    }
});
