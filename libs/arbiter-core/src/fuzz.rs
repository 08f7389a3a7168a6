//! Randomized test-case generation from a parsed signature.
//!
//! Generation is total: any annotation the generator does not recognize
//! falls back to a deterministic numeric zero, so a structurally valid
//! signature can never make a grading attempt fail. Outputs use the same
//! `name = <json value>` assignment encoding as sample cases, which keeps a
//! single input-decoding path in the drivers.

use crate::signature::Param;
use arbiter_common::types::TestCase;
use rand::Rng;
use serde_json::Value;

const INT_RANGE: std::ops::RangeInclusive<i64> = -100..=100;
const MAX_LIST_LEN: usize = 10;
const MAX_STRING_LEN: usize = 10;

/// Generate `count` fuzz cases for the given parameters, each with
/// `expected = None` (to be back-filled from the reference run).
pub fn generate_cases(params: &[Param], count: usize) -> Vec<TestCase> {
    let mut rng = rand::thread_rng();
    let mut cases = Vec::with_capacity(count);

    for _ in 0..count {
        let assignments: Vec<String> = params
            .iter()
            .map(|p| format!("{} = {}", p.name, generate_value(&p.ty, &mut rng)))
            .collect();

        cases.push(TestCase {
            input: assignments.join(", "),
            expected: None,
        });
    }

    cases
}

/// Synthesize a random JSON value for a declared type, recursing through
/// nested `List[...]` annotations to arbitrary depth.
fn generate_value(ty: &str, rng: &mut impl Rng) -> Value {
    match ty {
        "int" => Value::from(rng.gen_range(INT_RANGE)),
        "float" => Value::from(rng.gen_range(-100.0..100.0)),
        "bool" => Value::from(rng.gen_bool(0.5)),
        "str" => Value::from(random_lowercase(rng)),
        _ if ty.starts_with("List[") && ty.ends_with(']') => {
            let inner = &ty["List[".len()..ty.len() - 1];
            let len = rng.gen_range(0..MAX_LIST_LEN);
            Value::Array((0..len).map(|_| generate_value(inner, rng)).collect())
        }
        // Optional / unrecognized annotations get a harmless default.
        _ => Value::from(0),
    }
}

fn random_lowercase(rng: &mut impl Rng) -> String {
    let len = rng.gen_range(0..MAX_STRING_LEN);
    (0..len)
        .map(|_| char::from(b'a' + rng.gen_range(0..26u8)))
        .collect()
}
