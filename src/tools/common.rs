use serde_json::Value;

/// Coerce a numeric-looking string cell to a JSON number; everything else is
/// returned unchanged. Empty strings stay strings (blank cells are mapped to
/// null by the codecs before coercion).
pub(super) fn coerce_cell(value: Value) -> Value {
    let Value::String(s) = &value else {
        return value;
    };

    let trimmed = s.trim();
    if trimmed.is_empty() {
        return value;
    }
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => Value::from(n),
        _ => value,
    }
}

/// Read a cell as a number, defaulting missing or non-numeric values to 0.
pub(super) fn value_as_f64(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    }
}
