use serde_json::Value;

/// Print just the key answer from the envelope.
///
/// For a scan that is the cointegrated-pair count; for a single test the
/// p-value; otherwise the first scalar field.
pub fn print_minimal(value: &Value) {
    if let Some(count) = value.get("cointegrated_count") {
        println!("{}", scalar(count));
        return;
    }

    if let Some(result) = value.get("result") {
        for key in ["p_value", "statistic", "z_score"] {
            if let Some(val) = result.get(key) {
                if !val.is_null() {
                    println!("{}", scalar(val));
                    return;
                }
            }
        }
    }

    if let Value::Object(map) = value {
        if let Some((key, val)) = map.iter().find(|(_, v)| !v.is_null()) {
            println!("{}: {}", key, scalar(val));
            return;
        }
    }

    println!("{}", scalar(value));
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
