use serde_json::Value;

/// Print just the key answer value from the output.
///
/// Looks for well-known result fields in order of priority, then falls
/// back to the first field in the result object.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let priority_keys = [
        "state",
        "annualized_earning_rate",
        "realized_earning_rate",
        "total_interest",
        "reality_price",
    ];

    if let Value::Object(map) = result_obj {
        for key in &priority_keys {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}", format_minimal(val));
                    return;
                }
            }
        }

        // Nested reports keep their headline figure one level down.
        for section in ["delinquency_rollup", "summary", "overview"] {
            if let Some(Value::Object(inner)) = map.get(section) {
                for key in &priority_keys {
                    if let Some(val) = inner.get(*key).filter(|v| !v.is_null()) {
                        println!("{}", format_minimal(val));
                        return;
                    }
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    if let Value::Array(items) = result_obj {
        println!("{}", items.len());
        return;
    }

    println!("{}", format_minimal(result_obj));
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
