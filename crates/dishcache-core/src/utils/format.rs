use chrono::{DateTime, Utc};

/// Path prefix the backend serves uploaded images from.
const IMAGE_PREVIEW_PATH: &str = "/admin/file/preview/";

/// Describe how long ago `then` was, relative to `now`.
/// Anything older than 30 days is shown as a date.
pub fn format_relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - then).num_minutes();
    if minutes < 1 {
        // Also covers clock skew
        "just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if minutes < 60 * 24 {
        format!("{}h ago", minutes / 60)
    } else if minutes < 60 * 24 * 30 {
        format!("{}d ago", minutes / (60 * 24))
    } else {
        then.format("%Y/%m/%d").to_string()
    }
}

/// Resolve an image reference from the backend to a fetchable URL.
pub fn image_url(path: Option<&str>, base_url: &str) -> Option<String> {
    let path = path.map(str::trim).filter(|p| !p.is_empty())?;
    if path.starts_with("http://") || path.starts_with("https://") {
        return Some(path.to_string());
    }
    Some(format!(
        "{}{}{}",
        base_url.trim_end_matches('/'),
        IMAGE_PREVIEW_PATH,
        path.trim_start_matches('/')
    ))
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}
