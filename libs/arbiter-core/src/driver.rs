//! Driver synthesis: turn a bare user-submitted solution body into a
//! complete, runnable harness program for the execution sandbox.
//!
//! **Critical architectural boundary:**
//! - The synthesizer is purely textual; it never executes anything.
//! - The user's source is embedded verbatim and unmodified.
//! - Each case runs in an isolated scope; one case's failure never aborts
//!   the remaining cases.
//! - The harness prints exactly one line containing the JSON result array as
//!   the *final* line of stdout. User `print` calls may clutter earlier
//!   lines; the sandbox client only ever reads the last non-empty line.
//!   This is a hard contract, not a heuristic.

use arbiter_common::types::{Language, TestCase};
use base64::{engine::general_purpose, Engine as _};
use regex::Regex;
use std::sync::OnceLock;

/// Matches `, ` followed by the start of a new `identifier =` assignment.
/// Commas inside list/array literals are not followed by an identifier and
/// an equals sign, so they never trigger a split. Known edge case: a string
/// literal containing a `, name =`-shaped substring would be split too.
fn assignment_boundary() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r", ([A-Za-z_][A-Za-z0-9_]*\s*=)").expect("valid literal regex"))
}

/// Rewrite a multi-assignment input text (`a = 1, b = 2`) onto the target
/// language's statement-separator convention.
fn translate_assignments(input: &str, separator: &str) -> String {
    let replacement = format!("{}$1", separator);
    assignment_boundary()
        .replace_all(input, replacement.as_str())
        .into_owned()
}

/// Serialize the working test set into the JSON shape the drivers consume,
/// with each input translated to the language's statement separator.
fn driver_cases_json(cases: &[TestCase], separator: &str) -> String {
    let entries: Vec<serde_json::Value> = cases
        .iter()
        .map(|case| {
            serde_json::json!({
                "input_code": translate_assignments(&case.input, separator),
                "expected": case.expected,
            })
        })
        .collect();
    serde_json::Value::Array(entries).to_string()
}

/// Synthesize a complete harness program for `language`.
///
/// The harness embeds `user_source` verbatim, materializes each case's input
/// assignments in an isolated scope, locates the callable named
/// `entry_point` (instance method on a `Solution` type first, bare
/// top-level function second), invokes it, classifies per-case failures,
/// and prints the JSON result array as its last stdout line.
pub fn synthesize(
    language: Language,
    user_source: &str,
    entry_point: &str,
    cases: &[TestCase],
) -> String {
    match language {
        Language::Python => synthesize_python(user_source, entry_point, cases),
        Language::Javascript => synthesize_javascript(user_source, entry_point, cases),
    }
}

fn synthesize_python(user_source: &str, entry_point: &str, cases: &[TestCase]) -> String {
    // Raw JSON is not a valid Python literal once null/true/false appear
    // (fuzz cases carry `expected: null`), so the cases travel base64-encoded
    // and are decoded with json.loads inside the harness.
    let cases_b64 = general_purpose::STANDARD.encode(driver_cases_json(cases, "\n"));

    // The user source is substituted last so the template markers can never
    // rewrite anything inside it.
    PYTHON_TEMPLATE
        .replace("__ENTRY_POINT__", entry_point)
        .replace("__TEST_CASES_B64__", &cases_b64)
        .replace("__USER_SOURCE__", user_source)
}

fn synthesize_javascript(user_source: &str, entry_point: &str, cases: &[TestCase]) -> String {
    // JSON is valid JavaScript, so the cases are embedded as a literal.
    JAVASCRIPT_TEMPLATE
        .replace("__ENTRY_POINT__", entry_point)
        .replace("__TEST_CASES__", &driver_cases_json(cases, "; "))
        .replace("__USER_SOURCE__", user_source)
}

const PYTHON_TEMPLATE: &str = r#"import sys
import json
import base64
from typing import *
import math
import collections
import heapq
import bisect
import random
import functools
from collections import deque, defaultdict, Counter
from functools import lru_cache

__USER_SOURCE__

# Driver code. The JSON result array must be the last line of stdout.
def _locate_entry_point():
    solution_cls = globals().get('Solution')
    if isinstance(solution_cls, type):
        method = getattr(solution_cls(), '__ENTRY_POINT__', None)
        if callable(method):
            return method
    module_fn = globals().get('__ENTRY_POINT__')
    if callable(module_fn):
        return module_fn
    return None

def run_tests():
    test_cases = json.loads(base64.b64decode('__TEST_CASES_B64__').decode('utf-8'))
    results = []

    try:
        method = _locate_entry_point()
    except Exception as e:
        print(json.dumps([{'status': 'Setup Error', 'id': 0, 'error': str(e)}]))
        return

    for i, test in enumerate(test_cases):
        local_scope = {}
        try:
            exec(test['input_code'], {}, local_scope)
        except Exception as e:
            results.append({'status': 'Runtime Error (Input Parsing)', 'id': i, 'error': str(e)})
            continue

        if method is None:
            results.append({'status': 'Method Not Found', 'id': i, 'error': 'Method __ENTRY_POINT__ not found'})
            continue

        args = {k: v for k, v in local_scope.items() if not k.startswith('__')}
        try:
            output = method(**args)
            if isinstance(output, (str, int, float, bool, type(None))):
                actual = str(output)
            else:
                actual = json.dumps(output, sort_keys=True)
            results.append({'status': 'Finished', 'id': i, 'actual': actual, 'expected': test.get('expected')})
        except Exception as e:
            results.append({'status': 'Runtime Error', 'id': i, 'error': str(e)})

    print(json.dumps(results))

if __name__ == '__main__':
    run_tests()
"#;

const JAVASCRIPT_TEMPLATE: &str = r#"__USER_SOURCE__

// Driver code. The JSON result array must be the last line of stdout.
(function () {
    const testCases = __TEST_CASES__;
    const results = [];

    let func = null;
    let context = null;

    try {
        if (typeof Solution === 'function') {
            const sol = new Solution();
            if (typeof sol.__ENTRY_POINT__ === 'function') {
                func = sol.__ENTRY_POINT__;
                context = sol;
            }
        }
        if (!func && typeof __ENTRY_POINT__ === 'function') {
            func = __ENTRY_POINT__;
        }
    } catch (e) {
        console.log(JSON.stringify([{ status: 'Setup Error', id: 0, error: e.toString() }]));
        return;
    }

    if (!func) {
        console.log(JSON.stringify([{ status: 'Method Not Found', id: 0, error: 'Method __ENTRY_POINT__ not found' }]));
        return;
    }

    testCases.forEach(function (test, i) {
        let keys = [];
        let argsObj = null;
        try {
            const matches = test.input_code.match(/([A-Za-z0-9_]+)\s*=/g) || [];
            keys = matches.map(function (k) { return k.replace('=', '').trim(); });
            const runner = new Function(test.input_code + '; return { ' + keys.join(', ') + ' };');
            argsObj = runner();
        } catch (e) {
            results.push({ status: 'Runtime Error (Input Parsing)', id: i, error: e.toString() });
            return;
        }

        try {
            const args = keys.map(function (k) { return argsObj[k]; });
            const output = func.apply(context, args);
            results.push({ status: 'Finished', id: i, actual: JSON.stringify(output), expected: test.expected });
        } catch (e) {
            results.push({ status: 'Runtime Error', id: i, error: e.toString() });
        }
    });

    console.log(JSON.stringify(results));
})();
"#;
