use chrono::{DateTime, Utc};

/// Compact counter: `1.2K`, `3.4M`.
pub fn format_number(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

pub fn format_date(dt: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
    let days = now.signed_duration_since(*dt).num_days();
    match days {
        0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        2..=6 => format!("{} days ago", days),
        _ => dt.format("%b %-d, %Y").to_string(),
    }
}
