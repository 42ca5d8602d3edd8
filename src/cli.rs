use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "yt-transcript-service",
    about = "YouTube Transcript Service - fetch video captions as JSON",
    long_about = "An HTTP service that fetches the caption track for a YouTube video and returns it as structured JSON, with a bundled client for querying a running instance.",
    after_help = "EXAMPLES:\n    # Start the transcript server\n    yt-transcript-service serve\n\n    # Bind to all interfaces on a custom port\n    yt-transcript-service serve --host 0.0.0.0 --port 9090\n\n    # Fetch a transcript through a running server\n    yt-transcript-service fetch dQw4w9WgXcQ\n\n    # Prefer a non-English caption track\n    yt-transcript-service fetch dQw4w9WgXcQ --lang de\n\n    # Query a different server\n    yt-transcript-service fetch dQw4w9WgXcQ --server-url http://my-server:8080"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(name = "serve")]
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        #[arg(long, default_value = "8080")]
        port: u16,
    },
    #[command(name = "fetch")]
    Fetch {
        video_id: String,

        #[arg(long, default_value = "en")]
        lang: String,

        #[arg(long, default_value = "http://localhost:8080")]
        server_url: String,
    },
}
