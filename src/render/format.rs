// src/render/format.rs
use serde_json::Value;

pub const MISSING: &str = "n/a";

/// Fare amounts: two decimals with a dollar sign. Non-numeric values pass through.
pub fn format_fare(value: Option<&Value>) -> String {
    match value {
        Some(Value::Number(n)) => match n.as_f64() {
            Some(f) => format!("${:.2}", f),
            None => n.to_string(),
        },
        other => format_plain(other),
    }
}

/// Trip counts with thousands grouping (`1,234`). Non-numeric values pass through.
pub fn format_count(value: Option<&Value>) -> String {
    match value {
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                group_thousands(i.into())
            } else if let Some(u) = n.as_u64() {
                group_thousands(u.into())
            } else if let Some(f) = n.as_f64().filter(|f| f.is_finite()) {
                // at most three fraction digits, rounded before splitting
                let f = (f * 1000.0).round() / 1000.0;
                let whole = group_thousands(f.trunc() as i128);
                let fraction = format!("{:.3}", f.fract().abs());
                let fraction = fraction.trim_start_matches('0').trim_end_matches('0').trim_end_matches('.');
                if f < 0.0 && f.trunc() == 0.0 && !fraction.is_empty() {
                    format!("-{}{}", whole, fraction)
                } else {
                    format!("{}{}", whole, fraction)
                }
            } else {
                n.to_string()
            }
        }
        other => format_plain(other),
    }
}

/// Identifier-like cells: strings unquoted, everything else as written.
pub fn format_plain(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => MISSING.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

pub fn format_hour(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => MISSING.to_string(),
        other => format!("{}:00", format_plain(other)),
    }
}

fn group_thousands(n: i128) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if n < 0 {
        grouped.insert(0, '-');
    }
    grouped
}
