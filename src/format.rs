//! Rendering helpers that turn an [`AggregateResult`] into agent-ready text.

use crate::curriculum::AggregateResult;
use serde::Serialize;
use std::collections::HashSet;

/// Separator placed between chunk texts in rendered context.
pub const CONTEXT_SEPARATOR: &str = "\n\n---\n\n";

/// Join every chunk text across all queries, in result order.
pub fn render_context(result: &AggregateResult) -> String {
    result
        .results
        .iter()
        .flat_map(|entry| entry.data.iter())
        .map(|record| record.text.as_str())
        .filter(|text| !text.trim().is_empty())
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR)
}

/// Distinct chunk sources in first-seen order.
pub fn unique_sources(result: &AggregateResult) -> Vec<String> {
    let mut seen = HashSet::new();
    result
        .results
        .iter()
        .flat_map(|entry| entry.data.iter())
        .filter(|record| seen.insert(record.source.as_str()))
        .map(|record| record.source.clone())
        .collect()
}

/// Serialize a value to JSON, falling back to compact formatting on error.
pub fn to_pretty_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|error| {
        tracing::warn!(%error, "Failed to serialize JSON prettily");
        serde_json::to_string(value).unwrap_or_else(|_| "{}".into())
    })
}
