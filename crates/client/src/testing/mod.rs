//! Test support utilities, available behind the `test-utils` feature.

use serde_json::Value;
use std::path::Path;

/// Load a JSON fixture from the crate's `fixtures/` directory.
///
/// `path` is relative, e.g. `"firewall/policy_list.json"`.
///
/// # Panics
///
/// Panics when the fixture is missing or not valid JSON; fixtures are
/// compiled-in test inputs and a broken one is a test bug.
pub fn load_fixture(path: &str) -> Value {
    let full = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(path);
    let text = std::fs::read_to_string(&full)
        .unwrap_or_else(|e| panic!("failed to read fixture {}: {}", full.display(), e));
    serde_json::from_str(&text)
        .unwrap_or_else(|e| panic!("fixture {} is not valid JSON: {}", full.display(), e))
}
