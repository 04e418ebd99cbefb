/// Characters that cannot appear in a note file name on at least one platform.
pub const FORBIDDEN_FILENAME_CHARS: [char; 10] = ['/', '\\', '?', '%', '*', ':', '|', '"', '<', '>'];

/// Map a video title to a file name stem by replacing forbidden characters with `-`.
pub fn sanitize_filename(title: &str) -> String {
    title
        .chars()
        .map(|ch| {
            if FORBIDDEN_FILENAME_CHARS.contains(&ch) {
                '-'
            } else {
                ch
            }
        })
        .collect::<String>()
        .trim()
        .to_string()
}
