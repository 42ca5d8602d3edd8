use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, middleware::Logger, post, web};
use log::{debug, error, info, warn};

use crate::dto::{TranscriptDto, TranscriptEntry, TranscriptRequest};
use crate::provider::{TranscriptError, TranscriptProvider, language_preferences};
use crate::youtube::YouTubeTranscriptClient;

pub struct AppState {
    pub provider: Arc<dyn TranscriptProvider>,
}

#[get("/api/health")]
pub async fn health_check() -> impl Responder {
    debug!("Health check endpoint called");
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "message": "Transcript service is running"
    }))
}

#[post("/api/transcript")]
pub async fn get_transcript(
    data: web::Data<AppState>,
    body: web::Json<TranscriptRequest>,
) -> impl Responder {
    debug!("Transcript request received");

    let video_id = match body.video_id.as_deref() {
        Some(id) if !id.is_empty() => id,
        _ => {
            warn!("Transcript request rejected: missing videoId");
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": "Missing videoId"
            }));
        }
    };

    let lang = body.lang.as_deref().unwrap_or("en");
    let languages = language_preferences(lang);

    info!("Fetching transcript for video {video_id} (languages: {languages:?})");

    match data.provider.fetch_transcript(video_id, &languages).await {
        Ok(segments) => {
            info!(
                "Transcript fetched for {video_id}: {} segment(s)",
                segments.len()
            );
            let transcript: Vec<TranscriptEntry> = segments
                .into_iter()
                .map(|seg| TranscriptEntry {
                    text: seg.text,
                    start: seg.start,
                    duration: seg.duration,
                })
                .collect();
            HttpResponse::Ok().json(TranscriptDto { transcript })
        }
        Err(TranscriptError::Disabled) | Err(TranscriptError::NotFound) => {
            warn!("No transcript available for {video_id}");
            HttpResponse::NotFound().json(serde_json::json!({
                "transcript": [],
                "error": "No transcript available"
            }))
        }
        Err(TranscriptError::VideoUnavailable) => {
            warn!("Video {video_id} is unavailable");
            HttpResponse::NotFound().json(serde_json::json!({
                "error": "Video is unavailable"
            }))
        }
        Err(TranscriptError::RetrievalFailed(reason)) => {
            warn!("Transcript retrieval failed for {video_id}: {reason}");
            HttpResponse::BadGateway().json(serde_json::json!({
                "error": "Transcript retrieval failed due to network or page error"
            }))
        }
        Err(TranscriptError::Other(message)) => {
            error!("Unexpected error fetching transcript for {video_id}: {message}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Server error: {}", message)
            }))
        }
    }
}

pub async fn run_server(host: String, port: u16) -> std::io::Result<()> {
    info!("Starting transcript service");

    let provider = match YouTubeTranscriptClient::new() {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!("Failed to initialize transcript provider: {e}");
            std::process::exit(1);
        }
    };

    let app_state = web::Data::new(AppState { provider });

    info!("Starting HTTP server on {host}:{port}");

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .app_data(web::JsonConfig::default().limit(64 * 1024)) // 64KB
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(health_check)
            .service(get_transcript)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
