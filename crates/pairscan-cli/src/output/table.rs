use serde_json::Value;
use tabled::{builder::Builder, Table};

/// Render the command envelope as tables.
///
/// An `analyze` envelope gets its summary rows as a table followed by the
/// skipped-pairs and warnings sections; single-result envelopes fall back
/// to a two-column field/value table.
pub fn print_table(value: &Value) {
    if let Some(rows) = value.get("summary").and_then(Value::as_array) {
        print_summary(rows);
        print_scan_counts(value);
        print_skipped(value);
        print_warnings(value);
        return;
    }

    if let Some(result) = value.get("result") {
        print_fields(result);
        if let Some(stats) = value.get("spread_statistics") {
            if !stats.is_null() {
                println!("\nSpread statistics:");
                print_fields(stats);
            }
        }
        return;
    }

    print_fields(value);
}

fn print_summary(rows: &[Value]) {
    if rows.is_empty() {
        println!("(no cointegrated pairs)");
        return;
    }

    let headers: Vec<String> = match rows.first() {
        Some(Value::Object(first)) => first.keys().cloned().collect(),
        _ => return,
    };

    let mut builder = Builder::default();
    builder.push_record(&headers);
    for row in rows {
        if let Value::Object(map) = row {
            let record: Vec<String> = headers
                .iter()
                .map(|h| map.get(h).map(|v| cell("", v)).unwrap_or_default())
                .collect();
            builder.push_record(record);
        }
    }
    println!("{}", Table::from(builder));
}

fn print_scan_counts(envelope: &Value) {
    let attempted = envelope.get("pairs_attempted").and_then(Value::as_u64);
    let tested = envelope.get("pairs_tested").and_then(Value::as_u64);
    let cointegrated = envelope.get("cointegrated_count").and_then(Value::as_u64);
    if let (Some(attempted), Some(tested), Some(cointegrated)) =
        (attempted, tested, cointegrated)
    {
        println!(
            "\n{} of {} attempted pairs tested, {} cointegrated",
            tested, attempted, cointegrated
        );
    }
}

fn print_skipped(envelope: &Value) {
    if let Some(Value::Array(skipped)) = envelope.get("skipped") {
        if skipped.is_empty() {
            return;
        }
        println!("\nSkipped pairs:");
        for failure in skipped {
            let a = failure.get("symbol_a").and_then(Value::as_str).unwrap_or("?");
            let b = failure.get("symbol_b").and_then(Value::as_str).unwrap_or("?");
            let reason = failure.get("reason").and_then(Value::as_str).unwrap_or("");
            println!("  - {}/{}: {}", a, b, reason);
        }
    }
}

fn print_warnings(envelope: &Value) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if warnings.is_empty() {
            return;
        }
        println!("\nWarnings:");
        for warning in warnings {
            if let Value::String(s) = warning {
                println!("  - {}", s);
            }
        }
    }
}

fn print_fields(value: &Value) {
    if let Value::Object(map) = value {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in map {
            builder.push_record([key.as_str(), &cell(key, val)]);
        }
        println!("{}", Table::from(builder));
    } else {
        println!("{}", value);
    }
}

/// Scalar cells print directly; the spread series would swamp the table, so
/// it collapses to its point count.
fn cell(key: &str, value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Object(map) if key == "spread" => {
            let points = map
                .get("values")
                .and_then(Value::as_array)
                .map(|v| v.len())
                .unwrap_or(0);
            format!("({} points)", points)
        }
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(|v| cell("", v)).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
