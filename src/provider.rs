use thiserror::Error;

/// A caption segment as produced by a provider. Carries exactly the fields
/// the API exposes; anything else a source returns is dropped at the parse
/// boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptSegment {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

/// The distinguished failure signals of the transcript contract. The handler
/// dispatches on these tags to pick the HTTP status and body.
#[derive(Debug, Error)]
pub enum TranscriptError {
    #[error("transcripts are disabled for this video")]
    Disabled,

    #[error("no transcript found for the requested languages")]
    NotFound,

    #[error("video is unavailable")]
    VideoUnavailable,

    #[error("could not retrieve transcript: {0}")]
    RetrievalFailed(String),

    #[error("{0}")]
    Other(String),
}

/// Fetch transcript segments for a video id, given an ordered list of
/// acceptable language codes, most-preferred first.
#[async_trait::async_trait]
pub trait TranscriptProvider: Send + Sync {
    async fn fetch_transcript(
        &self,
        video_id: &str,
        languages: &[String],
    ) -> Result<Vec<TranscriptSegment>, TranscriptError>;
}

/// Language preference list sent to the provider: the requested language
/// first, then the English fallbacks. Duplicates are harmless since the
/// provider picks the first matching track.
pub fn language_preferences(lang: &str) -> Vec<String> {
    vec![lang.to_string(), "en".to_string(), "en-US".to_string()]
}
