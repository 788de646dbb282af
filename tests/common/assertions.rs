//! Assertions over handler output

use serde_json::Value;

pub fn assert_success(output: &Value) {
    assert_eq!(
        output["success"], true,
        "expected success, got: {}",
        output
    );
    assert!(output.get("error").is_none(), "unexpected error: {}", output["error"]);
}

pub fn assert_failure_contains(output: &Value, needle: &str) {
    assert_eq!(output["success"], false, "expected failure, got: {}", output);
    let error = output["error"].as_str().unwrap_or_default();
    assert!(error.contains(needle), "error {:?} does not contain {:?}", error, needle);
}
