//! YouTube module: video id extraction and transcript fetching.
//!
//! The id is taken from one of two known URL shapes; the video's snippet is
//! then fetched from the YouTube Data API v3, and its description serves as
//! the transcript text for summarisation.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// User-Agent string identifying this client
const USER_AGENT: &str = concat!("studia/", env!("CARGO_PKG_VERSION"));

/// Default timeout for HTTP requests
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const VIDEOS_ENDPOINT: &str = "https://www.googleapis.com/youtube/v3/videos";

#[derive(Error, Debug)]
pub enum YoutubeError {
    #[error("invalid YouTube URL")]
    InvalidUrl,
    #[error("failed to fetch video details: {0}")]
    FetchError(#[from] reqwest::Error),
    #[error("video not found")]
    VideoNotFound,
    #[error("no transcript available for this video")]
    NoTranscript,
}

/// Extract the video id from a YouTube URL.
///
/// Exactly two shapes are recognised: `youtu.be/<id>` (id runs up to the
/// next `?`) and `watch?v=<id>` (id runs up to the next `&`). Anything else
/// is an invalid URL.
pub fn extract_video_id(url: &str) -> Result<&str, YoutubeError> {
    if let Some((_, rest)) = url.split_once("youtu.be/") {
        return Ok(rest.split('?').next().unwrap_or(rest));
    }
    if let Some((_, rest)) = url.split_once("watch?v=") {
        return Ok(rest.split('&').next().unwrap_or(rest));
    }
    Err(YoutubeError::InvalidUrl)
}

#[derive(Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Deserialize)]
struct VideoItem {
    snippet: Snippet,
}

#[derive(Deserialize)]
struct Snippet {
    #[serde(default)]
    description: String,
}

/// Client for the YouTube Data API v3.
pub struct YoutubeClient {
    http: Client,
    api_key: String,
}

impl YoutubeClient {
    pub fn new(api_key: &str) -> Result<Self, YoutubeError> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            api_key: api_key.to_string(),
        })
    }

    /// Fetch the transcript text for a video id.
    ///
    /// The snippet description is used as the transcript; a missing video or
    /// an empty description is an error, since there is nothing to
    /// summarise.
    pub async fn fetch_transcript(&self, video_id: &str) -> Result<String, YoutubeError> {
        let response = self
            .http
            .get(VIDEOS_ENDPOINT)
            .query(&[
                ("part", "snippet"),
                ("id", video_id),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json::<VideoListResponse>()
            .await?;

        let item = response.items.into_iter().next().ok_or(YoutubeError::VideoNotFound)?;

        let description = item.snippet.description;
        if description.trim().is_empty() {
            return Err(YoutubeError::NoTranscript);
        }
        Ok(description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_id_from_short_url() {
        assert_eq!(
            extract_video_id("https://youtu.be/abc123?t=5").unwrap(),
            "abc123"
        );
    }

    #[test]
    fn extracts_id_from_watch_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=xyz789&t=5").unwrap(),
            "xyz789"
        );
    }

    #[test]
    fn plain_urls_keep_full_id() {
        assert_eq!(extract_video_id("https://youtu.be/abc123").unwrap(), "abc123");
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=xyz789").unwrap(),
            "xyz789"
        );
    }

    #[test]
    fn unknown_shapes_are_invalid() {
        assert!(matches!(
            extract_video_id("https://example.com/watch/abc"),
            Err(YoutubeError::InvalidUrl)
        ));
        assert!(matches!(
            extract_video_id("not a url"),
            Err(YoutubeError::InvalidUrl)
        ));
    }

    #[test]
    fn video_list_json_parses() {
        let json = r#"{"items":[{"snippet":{"description":"a talk about Rust"}}]}"#;
        let parsed: VideoListResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.items[0].snippet.description, "a talk about Rust");
    }
}
