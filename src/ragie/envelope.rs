//! Envelope unwrapping and chunk mapping for Ragie responses.
//!
//! Ragie has shipped several response shapes over time. Each known shape is an accessor rule;
//! rules are probed in order and the first one yielding a non-empty value supplies the chunks.

use crate::ragie::types::{ChunkRecord, RagieError};
use serde_json::{Map, Value};

/// Looks up a candidate chunk list inside a response document.
pub type EnvelopeAccessor = fn(&Map<String, Value>) -> Option<&Value>;

/// Known envelope shapes in priority order.
pub const ENVELOPE_RULES: &[(&str, EnvelopeAccessor)] = &[
    ("chunks", top_level_chunks),
    ("results", top_level_results),
    ("scored_chunks", top_level_scored_chunks),
    ("retrieval.chunks", nested_retrieval_chunks),
];

fn top_level_chunks(doc: &Map<String, Value>) -> Option<&Value> {
    doc.get("chunks")
}

fn top_level_results(doc: &Map<String, Value>) -> Option<&Value> {
    doc.get("results")
}

fn top_level_scored_chunks(doc: &Map<String, Value>) -> Option<&Value> {
    doc.get("scored_chunks")
}

fn nested_retrieval_chunks(doc: &Map<String, Value>) -> Option<&Value> {
    doc.get("retrieval")
        .and_then(Value::as_object)
        .and_then(|retrieval| retrieval.get("chunks"))
}

/// Parse a raw response body into a JSON object.
///
/// An empty body or a JSON `null` is treated as an empty object.
pub fn parse_document(body: &str) -> Result<Map<String, Value>, RagieError> {
    if body.trim().is_empty() {
        return Ok(Map::new());
    }
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(Value::Null) => Ok(Map::new()),
        Ok(other) => Err(RagieError::MalformedResponse(format!(
            "expected a JSON object, found {}",
            kind(&other)
        ))),
        Err(err) => Err(RagieError::MalformedResponse(err.to_string())),
    }
}

/// Select the chunk list from the first envelope rule with a non-empty match.
pub fn extract_chunks(document: &Map<String, Value>) -> Result<&[Value], RagieError> {
    for (name, accessor) in ENVELOPE_RULES {
        let Some(candidate) = accessor(document).filter(|value| is_truthy(value)) else {
            continue;
        };
        return match candidate {
            Value::Array(items) => {
                tracing::trace!(envelope = *name, count = items.len(), "Matched envelope");
                Ok(items.as_slice())
            }
            other => Err(RagieError::MalformedResponse(format!(
                "`{name}` should be a list, found {}",
                kind(other)
            ))),
        };
    }
    Ok(&[])
}

/// Map every chunk in order; a non-object entry fails the whole list.
pub fn map_chunks(chunks: &[Value]) -> Result<Vec<ChunkRecord>, RagieError> {
    chunks
        .iter()
        .enumerate()
        .map(|(index, chunk)| map_chunk(chunk).ok_or(RagieError::MalformedChunk { index }))
        .collect()
}

/// Convert one remote chunk into a [`ChunkRecord`], or `None` if it is not an object.
pub fn map_chunk(chunk: &Value) -> Option<ChunkRecord> {
    let map = chunk.as_object()?;
    let source = scalar_text(map.get("source_url"))
        .or_else(|| scalar_text(map.get("document_id")))
        .unwrap_or_else(|| "unknown".to_string());
    let text = match map.get("text") {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        _ => String::new(),
    };
    Some(ChunkRecord { source, text })
}

fn scalar_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
