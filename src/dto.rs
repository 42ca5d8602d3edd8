/// Body of `POST /api/transcript`.
///
/// `video_id` is required semantically but optional in the wire type so that
/// an absent or null field reaches the handler's own validation instead of
/// being rejected by the deserializer.
#[derive(serde::Deserialize)]
pub struct TranscriptRequest {
    #[serde(rename = "videoId")]
    pub video_id: Option<String>,
    pub lang: Option<String>,
}

/// One timed caption segment as returned to the client. Field order is part
/// of the response contract.
#[derive(serde::Serialize, Debug, Clone, PartialEq)]
pub struct TranscriptEntry {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

#[derive(serde::Serialize)]
pub struct TranscriptDto {
    pub transcript: Vec<TranscriptEntry>,
}
