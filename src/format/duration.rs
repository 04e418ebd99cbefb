use std::sync::LazyLock;

use regex::Regex;

static DURATION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?").expect("duration regex must compile")
});

/// Render an ISO-8601 `PT#H#M#S` duration as `"1h 2m 3s"`.
///
/// Input without a `PT` time section, or with a component too large for
/// `u64`, is returned as-is.
pub fn format_duration(iso_duration: &str) -> String {
    let Some(caps) = DURATION_REGEX.captures(iso_duration) else {
        return iso_duration.to_string();
    };
    let mut parts = [0u64; 3];
    for (idx, part) in parts.iter_mut().enumerate() {
        if let Some(m) = caps.get(idx + 1) {
            match m.as_str().parse() {
                Ok(value) => *part = value,
                Err(_) => return iso_duration.to_string(),
            }
        }
    }
    let [hours, minutes, seconds] = parts;
    format!("{hours}h {minutes}m {seconds}s")
}
