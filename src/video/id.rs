use std::sync::LazyLock;

use regex::Regex;

static VIDEO_ID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:youtu\.be/|youtube\.com/(?:embed/|v/|watch\?v=|shorts/)|youtube\.googleapis\.com/embed/)([a-zA-Z0-9_-]+)",
    )
    .expect("video id regex must compile")
});

/// Pull the video id out of the first recognised YouTube link shape in `url`.
pub fn extract_video_id(url: &str) -> Option<String> {
    VIDEO_ID_REGEX
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
