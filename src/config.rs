#[derive(Debug)]
pub struct ClientConfig {
    pub server_url: String,
    pub video_id: String,
    pub lang: String,
}

impl ClientConfig {
    pub fn new(server_url: String, video_id: String, lang: String) -> Self {
        Self {
            server_url,
            video_id,
            lang,
        }
    }
}
