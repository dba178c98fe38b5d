use datatest_stable::Utf8Path;
use serde_json::Value;

/// A recorded request and the parts of the response it must produce.
#[derive(serde::Deserialize)]
struct Fixture {
    request: Value,
    response: Value,
}

/// Check that every key in `expected` is present in `actual` with a matching
/// value. Arrays must have the same length. Extra keys in `actual` are fine.
fn find_mismatch(expected: &Value, actual: &Value, path: &str) -> Option<String> {
    match (expected, actual) {
        (Value::Object(want), Value::Object(got)) => want.iter().find_map(|(key, value)| {
            let child = format!("{path}.{key}");
            match got.get(key) {
                Some(actual) => find_mismatch(value, actual, &child),
                None => Some(format!("{child}: missing")),
            }
        }),
        (Value::Array(want), Value::Array(got)) => {
            if want.len() != got.len() {
                return Some(format!("{path}: expected {} items, got {}", want.len(), got.len()));
            }
            want.iter()
                .zip(got)
                .enumerate()
                .find_map(|(i, (w, g))| find_mismatch(w, g, &format!("{path}[{i}]")))
        }
        _ if expected == actual => None,
        _ => Some(format!("{path}: expected {expected}, got {actual}")),
    }
}

/// Format a colored inline diff using dissimilar
fn format_inline_diff(expected: &str, actual: &str) -> String {
    use dissimilar::Chunk;

    let mut output = String::from("\n=== Inline Diff (expected vs actual) ===\n");
    output.push_str("Legend: [-expected only-] [+actual only+] [unchanged]\n\n");

    for chunk in dissimilar::diff(expected, actual) {
        match chunk {
            Chunk::Equal(s) => output.push_str(s),
            Chunk::Delete(s) => {
                output.push_str("\x1b[31m[-");
                output.push_str(s);
                output.push_str("-]\x1b[0m");
            }
            Chunk::Insert(s) => {
                output.push_str("\x1b[32m[+");
                output.push_str(s);
                output.push_str("+]\x1b[0m");
            }
        }
    }

    output
}

fn check_fixture(path: &Utf8Path) -> datatest_stable::Result<()> {
    let source = std::fs::read_to_string(path)?;
    let fixture: Fixture = serde_json::from_str(&source)?;

    let input = serde_json::to_string(&fixture.request)?;
    let response = serde_json::to_value(bikefit::handle_json(&input))?;

    if let Some(mismatch) = find_mismatch(&fixture.response, &response, "response") {
        let expected = serde_json::to_string_pretty(&fixture.response)?;
        let actual = serde_json::to_string_pretty(&response)?;
        panic!(
            "response mismatch for {}:\n{}\n{}",
            path,
            mismatch,
            format_inline_diff(&expected, &actual)
        );
    }

    Ok(())
}

datatest_stable::harness! {
    { test = check_fixture, root = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures"), pattern = r"\.json$" },
}
