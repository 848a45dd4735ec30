// JSON encoding of the task list
//
// The stored value is one JSON array. Decoding is best-effort: a record that
// cannot be turned into a task is logged and skipped, and missing optional
// fields fall back to their defaults.

use crate::error::{Result, StoreError};
use crate::models::{DEFAULT_TAG, Task};
use serde_json::Value;
use tracing::{debug, warn};

/// Serialize every task into a single JSON array string
pub fn encode_tasks(tasks: &[Task]) -> Result<String> {
    serde_json::to_string(tasks).map_err(StoreError::Encode)
}

/// Parse a stored JSON array into tasks
///
/// An empty or whitespace-only string is an empty list. A string that is not
/// a JSON array is a [`StoreError::Parse`]. Individual malformed records are
/// skipped.
pub fn decode_tasks(raw: &str) -> Result<Vec<Task>> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }

    let records: Vec<Value> = serde_json::from_str(raw).map_err(StoreError::Parse)?;
    let mut tasks = Vec::with_capacity(records.len());

    for (index, record) in records.iter().enumerate() {
        match decode_record(record) {
            Ok(task) => tasks.push(task),
            Err(reason) => {
                warn!(index, reason, "Skipping malformed task record");
            }
        }
    }

    debug!(count = tasks.len(), total = records.len(), "Decoded task records");
    Ok(tasks)
}

fn decode_record(record: &Value) -> std::result::Result<Task, &'static str> {
    let fields = record.as_object().ok_or("record is not an object")?;

    let text = match fields.get("text") {
        Some(Value::String(s)) => s.clone(),
        Some(_) => return Err("text is not a string"),
        None => return Err("missing text"),
    };

    let due_date = coerce_i64(fields.get("dueDate")).unwrap_or(0).max(0);
    let priority = coerce_i64(fields.get("priority")).unwrap_or(0);
    let tag = fields
        .get("tag")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_TAG)
        .to_string();

    Ok(Task {
        text,
        due_date,
        priority,
        tag,
    })
}

/// Lenient integer read: integers, finite floats (truncated) and numeric strings
fn coerce_i64(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f as i64))
        }
        _ => None,
    }
}
