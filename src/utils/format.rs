//! Format - Formatting Utilities

use chrono::{DateTime, Local, Utc};

use crate::constants::MAX_NAME_LENGTH;
use crate::domain::{DisplayCard, Node};

/// Format a UTC datetime for display
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    let local: DateTime<Local> = dt.with_timezone(&Local);
    local.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Format a card's last-update stamp relative to `now`.
///
/// Under a minute reads "Just now", then minutes and hours, then the full
/// timestamp once a day has passed.
pub fn format_relative(dt: &DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(*dt);
    let seconds = elapsed.num_seconds();

    if seconds < 60 {
        "Just now".to_string()
    } else if seconds < 3600 {
        format!("{}m ago", elapsed.num_minutes())
    } else if seconds < 86400 {
        format!("{}h ago", elapsed.num_hours())
    } else {
        format_datetime(dt)
    }
}

/// One-line dashboard rendering of a card
pub fn format_card_line(card: &DisplayCard, now: DateTime<Utc>) -> String {
    let slot = |value: Option<f64>| {
        value
            .map(|v| format!("{v:.1}"))
            .unwrap_or_else(|| "--".to_string())
    };
    let updated = card
        .last_update
        .map(|t| format_relative(&t, now))
        .unwrap_or_else(|| "never".to_string());
    format!(
        "{:<width$} {} T={} H={} ({updated})",
        truncate(&card.title, MAX_NAME_LENGTH),
        card.device_name,
        slot(card.temperature.value),
        slot(card.humidity.value),
        width = MAX_NAME_LENGTH,
    )
}

/// One-line device-screen rendering of a node
pub fn format_node_line(node: &Node) -> String {
    format!(
        "{:<width$} @{} {} {} t={}ms",
        truncate(&node.name, MAX_NAME_LENGTH),
        node.address,
        node.function.label(),
        node.data_type.label(),
        node.timeout,
        width = MAX_NAME_LENGTH,
    )
}

/// Truncate a string to max length with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{head}...")
    }
}
