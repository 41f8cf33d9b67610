//! Map an untyped status body onto [`TaskStatus`].

use serde_json::Value;

use super::TaskStatus;

const PROGRESS_KEYS: &[&str] = &["progreso", "progress"];
const STATUS_KEYS: &[&str] = &["estado", "status", "state"];

/// First key whose value is present and not null.
fn first_present<'a>(body: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| body.get(*k))
        .find(|v| !v.is_null())
}

fn as_progress(value: &Value) -> Option<f64> {
    let progress = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    progress.filter(|p| p.is_finite())
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Links count only when they are non-empty strings.
fn as_link(body: &Value, key: &str) -> Option<String> {
    body.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl TaskStatus {
    pub fn from_value(body: &Value) -> TaskStatus {
        TaskStatus {
            progress: first_present(body, PROGRESS_KEYS)
                .and_then(as_progress)
                .unwrap_or(0.0),
            status: first_present(body, STATUS_KEYS).and_then(as_text),
            pdf: as_link(body, "pdf"),
            excel: as_link(body, "excel"),
        }
    }
}
