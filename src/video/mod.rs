pub mod id;

use serde::Deserialize;

/// The subset of a YouTube `videos` resource that gets written into a note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoMetadata {
    pub title: String,
    pub channel_title: String,
    pub published_at: String,
    pub description: String,
    pub duration_iso: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoListResponse {
    #[serde(default)]
    pub items: Vec<VideoItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoItem {
    pub snippet: VideoSnippet,
    #[serde(rename = "contentDetails")]
    pub content_details: VideoContentDetails,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoSnippet {
    pub title: String,
    #[serde(rename = "channelTitle")]
    pub channel_title: String,
    #[serde(rename = "publishedAt")]
    pub published_at: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoContentDetails {
    pub duration: String,
}

impl From<VideoItem> for VideoMetadata {
    fn from(item: VideoItem) -> Self {
        Self {
            title: item.snippet.title,
            channel_title: item.snippet.channel_title,
            published_at: item.snippet.published_at,
            description: item.snippet.description,
            duration_iso: item.content_details.duration,
        }
    }
}

impl VideoListResponse {
    /// Only the first item is used; the API is queried by a single id.
    pub fn into_first(self) -> Option<VideoMetadata> {
        self.items.into_iter().next().map(VideoMetadata::from)
    }
}
