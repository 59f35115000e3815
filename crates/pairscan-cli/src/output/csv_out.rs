use chrono::SecondsFormat;
use pairscan_core::PriceMatrix;
use serde_json::Value;
use std::io;

/// Write the command envelope as CSV to stdout: summary rows when present,
/// otherwise a two-column field/value dump of the result.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    if let Some(Value::Array(rows)) = value.get("summary") {
        write_rows(&mut wtr, rows);
    } else if let Some(Value::Object(result)) = value.get("result") {
        let _ = wtr.write_record(["field", "value"]);
        for (key, val) in result {
            // The spread series has no place in a two-column dump.
            if key == "spread" {
                continue;
            }
            let _ = wtr.write_record([key.as_str(), &scalar(val)]);
        }
    } else if let Value::Object(map) = value {
        let _ = wtr.write_record(["field", "value"]);
        for (key, val) in map {
            let _ = wtr.write_record([key.as_str(), &scalar(val)]);
        }
    }

    let _ = wtr.flush();
}

fn write_rows(wtr: &mut csv::Writer<io::StdoutLock<'_>>, rows: &[Value]) {
    let headers: Vec<&str> = match rows.first() {
        Some(Value::Object(first)) => first.keys().map(|k| k.as_str()).collect(),
        _ => return,
    };
    let _ = wtr.write_record(&headers);

    for row in rows {
        if let Value::Object(map) = row {
            let record: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(scalar).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&record);
        }
    }
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

/// Write a price matrix as CSV: `timestamp` column plus one column per
/// symbol, blank cells for missing observations. The layout round-trips
/// through the CSV input reader.
pub fn write_matrix_csv(
    path: &str,
    matrix: &PriceMatrix,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut wtr = csv::Writer::from_path(path)
        .map_err(|e| format!("Failed to write '{}': {}", path, e))?;

    let mut headers = vec!["timestamp".to_string()];
    headers.extend(matrix.symbols().iter().cloned());
    wtr.write_record(&headers)?;

    let columns: Vec<&[f64]> = matrix
        .symbols()
        .iter()
        .filter_map(|s| matrix.column(s))
        .collect();

    for (row, timestamp) in matrix.timestamps().iter().enumerate() {
        let mut record =
            vec![timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)];
        for column in &columns {
            let value = column[row];
            record.push(if value.is_finite() {
                value.to_string()
            } else {
                String::new()
            });
        }
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}
