use std::time::Duration;

use anyhow::{Context, Result, bail};

use crate::host::MetadataProvider;
use crate::video::{VideoListResponse, VideoMetadata};

pub const DEFAULT_API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

#[derive(Debug, Clone)]
pub struct YoutubeClient {
    base_url: String,
    agent: ureq::Agent,
}

impl YoutubeClient {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self> {
        let sanitized = sanitize_base_url(&base_url)?;
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Ok(Self {
            base_url: sanitized,
            agent,
        })
    }

    pub fn videos_url(&self, video_id: &str, api_key: &str) -> String {
        let id: String = url::form_urlencoded::byte_serialize(video_id.as_bytes()).collect();
        let key: String = url::form_urlencoded::byte_serialize(api_key.as_bytes()).collect();
        format!(
            "{}/videos?part=snippet,contentDetails&id={id}&key={key}",
            self.base_url
        )
    }

    pub fn list_videos(&self, video_id: &str, api_key: &str) -> Result<VideoListResponse> {
        let url = self.videos_url(video_id, api_key);
        let response = self
            .agent
            .get(&url)
            .call()
            .map_err(|err| map_http_error(err, "fetch video info"))?;
        let body: VideoListResponse = response
            .into_json()
            .context("YouTube API returned invalid JSON for video list")?;
        Ok(body)
    }
}

impl MetadataProvider for YoutubeClient {
    fn fetch_video(&self, video_id: &str, api_key: &str) -> Result<Option<VideoMetadata>> {
        Ok(self.list_videos(video_id, api_key)?.into_first())
    }
}

fn sanitize_base_url(base_url: &str) -> Result<String> {
    let trimmed = base_url.trim();
    if trimmed.is_empty() {
        bail!("API base URL must not be empty");
    }
    let parsed =
        url::Url::parse(trimmed).with_context(|| format!("invalid API base URL: {trimmed}"))?;
    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        bail!("API base URL must be http or https: {trimmed}");
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

fn map_http_error(err: ureq::Error, action: &str) -> anyhow::Error {
    match err {
        ureq::Error::Status(status, response) => {
            let body = response.into_string().unwrap_or_default();
            let message = extract_error_message(&body);
            anyhow::anyhow!("{action} failed with HTTP {status}: {message}")
        }
        ureq::Error::Transport(transport) => {
            anyhow::anyhow!("{action} failed: {}", transport)
        }
    }
}

// Google APIs wrap errors as {"error": {"code": 403, "message": "..."}}.
fn extract_error_message(body: &str) -> String {
    if body.trim().is_empty() {
        return "empty response body".to_string();
    }
    if let Ok(parsed) = serde_json::from_str::<serde_json::Value>(body) {
        let error = parsed.get("error");
        if let Some(message) = error
            .and_then(|e| e.get("message"))
            .and_then(|v| v.as_str())
        {
            return message.to_string();
        }
        if let Some(message) = error.and_then(|e| e.as_str()) {
            return message.to_string();
        }
    }
    body.trim().to_string()
}
