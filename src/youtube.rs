use anyhow::Result;
use log::{debug, warn};
use regex::Regex;
use serde_json::Value;

use crate::provider::{TranscriptError, TranscriptProvider, TranscriptSegment};

const WATCH_URL: &str = "https://www.youtube.com/watch?v=";
const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/120.0.0.0 Safari/537.36";

/// Transcript provider backed by the public YouTube watch page: scrapes the
/// embedded player response for caption track metadata, then fetches and
/// parses the selected timedtext document.
pub struct YouTubeTranscriptClient {
    http: reqwest::Client,
    text_re: Regex,
}

impl YouTubeTranscriptClient {
    pub fn new() -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()?;
        // Matches one timed cue; `dur` is optional in timedtext documents.
        let text_re =
            Regex::new(r#"(?s)<text start="([\d.]+)"(?: dur="([\d.]+)")?[^>]*>(.*?)</text>"#)?;
        Ok(Self { http, text_re })
    }

    async fn fetch_page(&self, url: &str, accept_language: &str) -> Result<String, TranscriptError> {
        let response = self
            .http
            .get(url)
            .header("Accept-Language", accept_language)
            .send()
            .await
            .map_err(|e| TranscriptError::RetrievalFailed(e.to_string()))?;
        response
            .text()
            .await
            .map_err(|e| TranscriptError::RetrievalFailed(e.to_string()))
    }

    fn parse_timedtext(&self, xml: &str) -> Vec<TranscriptSegment> {
        self.text_re
            .captures_iter(xml)
            .filter_map(|caps| {
                let start: f64 = caps.get(1)?.as_str().parse().ok()?;
                let duration: f64 = caps
                    .get(2)
                    .map(|m| m.as_str().parse().unwrap_or(0.0))
                    .unwrap_or(0.0);
                Some(TranscriptSegment {
                    text: unescape_entities(caps.get(3)?.as_str()),
                    start,
                    duration,
                })
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl TranscriptProvider for YouTubeTranscriptClient {
    async fn fetch_transcript(
        &self,
        video_id: &str,
        languages: &[String],
    ) -> Result<Vec<TranscriptSegment>, TranscriptError> {
        let accept = accept_language(languages);
        let url = format!("{WATCH_URL}{video_id}");
        debug!("Fetching watch page: {url} (Accept-Language: {accept})");
        let html = self.fetch_page(&url, &accept).await?;

        let tracks = extract_caption_tracks(&html)?;
        debug!("Found {} caption track(s) for {video_id}", tracks.len());

        let track = select_track(&tracks, languages).ok_or(TranscriptError::NotFound)?;
        let base_url = track
            .get("baseUrl")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                warn!("Caption track for {video_id} has no baseUrl");
                TranscriptError::RetrievalFailed("caption track has no baseUrl".to_string())
            })?;

        let xml = self.fetch_page(base_url, &accept).await?;
        Ok(self.parse_timedtext(&xml))
    }
}

/// Pulls the `captionTracks` array out of the player response JSON embedded
/// in the watch page. Distinguishes a removed/private video from one that
/// simply has captions turned off.
fn extract_caption_tracks(html: &str) -> Result<Vec<Value>, TranscriptError> {
    if !html.contains(r#""playabilityStatus":"#) {
        return Err(TranscriptError::VideoUnavailable);
    }

    let after = match html.split_once(r#""captions":"#) {
        Some((_, rest)) => rest,
        None => return Err(TranscriptError::Disabled),
    };

    // Take the single JSON value that follows the key; whatever player
    // response fields trail it are not ours to parse.
    let captions: Value = serde_json::Deserializer::from_str(after)
        .into_iter::<Value>()
        .next()
        .ok_or_else(|| {
            TranscriptError::RetrievalFailed("empty captions JSON".to_string())
        })?
        .map_err(|e| TranscriptError::RetrievalFailed(format!("malformed captions JSON: {e}")))?;

    let tracks = captions
        .get("playerCaptionsTracklistRenderer")
        .and_then(|r| r.get("captionTracks"))
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    if tracks.is_empty() {
        return Err(TranscriptError::Disabled);
    }
    Ok(tracks)
}

/// First track whose `languageCode` matches the preference list, scanning
/// preferences in order rather than document order.
fn select_track<'a>(tracks: &'a [Value], languages: &[String]) -> Option<&'a Value> {
    languages.iter().find_map(|lang| {
        tracks.iter().find(|track| {
            track
                .get("languageCode")
                .and_then(Value::as_str)
                .is_some_and(|code| code == lang)
        })
    })
}

/// `Accept-Language` header value for outbound requests, preserving the
/// caller's preference order.
fn accept_language(languages: &[String]) -> String {
    if languages.is_empty() {
        "en-US".to_string()
    } else {
        languages.join(",")
    }
}

fn unescape_entities(text: &str) -> String {
    // `&amp;` goes last so `&amp;lt;` decodes to `&lt;`, not `<`.
    let mut out = text
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    // Timedtext occasionally carries literal newlines inside a cue.
    if out.contains('\n') {
        out = out.replace('\n', " ");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_with_captions(captions_json: &str) -> String {
        format!(
            r#"<html>var ytInitialPlayerResponse = {{"playabilityStatus":{{"status":"OK"}},"captions":{captions_json},"videoDetails":{{"videoId":"abc"}}}};</html>"#
        )
    }

    fn tracks_json(tracks: &str) -> String {
        format!(r#"{{"playerCaptionsTracklistRenderer":{{"captionTracks":{tracks}}}}}"#)
    }

    #[test]
    fn page_without_playability_status_is_unavailable() {
        let err = extract_caption_tracks("<html>nothing here</html>").unwrap_err();
        assert!(matches!(err, TranscriptError::VideoUnavailable));
    }

    #[test]
    fn page_without_captions_key_is_disabled() {
        let html = r#"<html>{"playabilityStatus":{"status":"OK"}}</html>"#;
        let err = extract_caption_tracks(html).unwrap_err();
        assert!(matches!(err, TranscriptError::Disabled));
    }

    #[test]
    fn empty_track_list_is_disabled() {
        let html = page_with_captions(&tracks_json("[]"));
        let err = extract_caption_tracks(&html).unwrap_err();
        assert!(matches!(err, TranscriptError::Disabled));
    }

    #[test]
    fn extracts_caption_tracks() {
        let html = page_with_captions(&tracks_json(
            r#"[{"baseUrl":"https://example.com/tt","languageCode":"en"}]"#,
        ));
        let tracks = extract_caption_tracks(&html).unwrap();
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0]["languageCode"], "en");
    }

    #[test]
    fn extracts_tracks_without_video_details_marker() {
        // Player responses do not always put videoDetails right after the
        // captions object; the trailing fields must not break extraction.
        let html = format!(
            r#"<html>{{"playabilityStatus":{{"status":"OK"}},"captions":{},"playerConfig":{{"audioConfig":{{}}}}}};</html>"#,
            tracks_json(r#"[{"baseUrl":"https://example.com/tt","languageCode":"en"}]"#)
        );
        let tracks = extract_caption_tracks(&html).unwrap();
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0]["languageCode"], "en");
    }

    #[test]
    fn track_selection_honors_preference_order() {
        let tracks: Vec<Value> = serde_json::from_str(
            r#"[{"baseUrl":"u1","languageCode":"en"},{"baseUrl":"u2","languageCode":"de"}]"#,
        )
        .unwrap();
        let langs = vec!["de".to_string(), "en".to_string()];
        let track = select_track(&tracks, &langs).unwrap();
        assert_eq!(track["languageCode"], "de");
    }

    #[test]
    fn track_selection_misses_when_no_language_matches() {
        let tracks: Vec<Value> =
            serde_json::from_str(r#"[{"baseUrl":"u1","languageCode":"fr"}]"#).unwrap();
        let langs = vec!["de".to_string(), "en".to_string(), "en-US".to_string()];
        assert!(select_track(&tracks, &langs).is_none());
    }

    #[test]
    fn parses_timedtext_cues() {
        let client = YouTubeTranscriptClient::new().unwrap();
        let xml = r#"<?xml version="1.0" encoding="utf-8" ?><transcript>
            <text start="0" dur="1.2">Hello</text>
            <text start="1.2" dur="0.8">World</text>
        </transcript>"#;
        let segments = client.parse_timedtext(xml);
        assert_eq!(
            segments,
            vec![
                TranscriptSegment {
                    text: "Hello".to_string(),
                    start: 0.0,
                    duration: 1.2,
                },
                TranscriptSegment {
                    text: "World".to_string(),
                    start: 1.2,
                    duration: 0.8,
                },
            ]
        );
    }

    #[test]
    fn missing_dur_defaults_to_zero() {
        let client = YouTubeTranscriptClient::new().unwrap();
        let segments = client.parse_timedtext(r#"<text start="3.5">cue</text>"#);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].start, 3.5);
        assert_eq!(segments[0].duration, 0.0);
    }

    #[test]
    fn empty_document_yields_no_segments() {
        let client = YouTubeTranscriptClient::new().unwrap();
        assert!(client.parse_timedtext("<transcript></transcript>").is_empty());
    }

    #[test]
    fn accept_language_header_follows_preference_order() {
        let langs: Vec<String> = ["de", "en", "en-US"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(accept_language(&langs), "de,en,en-US");
    }

    #[test]
    fn accept_language_header_defaults_when_no_preferences() {
        assert_eq!(accept_language(&[]), "en-US");
    }

    #[test]
    fn unescapes_html_entities() {
        assert_eq!(
            unescape_entities("Tom &amp; Jerry &#39;live&#39; &lt;now&gt;"),
            "Tom & Jerry 'live' <now>"
        );
    }
}
