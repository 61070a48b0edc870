//! # Keystash CLI
//!
//! Argument parsing and output helpers shared by the `keystash-cli` binary.

use std::collections::HashSet;
use std::time::Duration;

/// Parses a `key=value` argument. The value may itself contain `=`.
pub fn parse_pair(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((key, _)) if key.is_empty() => Err(format!("missing key in '{arg}'")),
        Some((key, value)) => Ok((key.to_string(), value.to_string())),
        None => Err(format!("expected KEY=VALUE, got '{arg}'")),
    }
}

/// Parses a TTL in whole seconds; `0` means no expiry.
pub fn parse_ttl(arg: &str) -> Result<Duration, String> {
    arg.parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| format!("invalid TTL '{arg}': expected whole seconds"))
}

/// Renders an optional text value the way `redis-cli` does.
pub fn render_value(value: Option<&str>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "(nil)".to_string(),
    }
}

/// Renders a set with its members sorted, so output is stable.
pub fn render_set(members: &HashSet<String>) -> serde_json::Result<String> {
    let mut sorted: Vec<&String> = members.iter().collect();
    sorted.sort();
    serde_json::to_string_pretty(&sorted)
}
