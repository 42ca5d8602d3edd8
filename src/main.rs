mod cli;
mod client;
mod config;
mod dto;
mod provider;
mod server;
mod youtube;

use clap::Parser;

use cli::{Cli, Commands};
use config::ClientConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { host, port } => {
            server::run_server(host, port).await?;
        }
        Commands::Fetch {
            video_id,
            lang,
            server_url,
        } => {
            let config = ClientConfig::new(server_url, video_id, lang);
            client::run_client(config).await?;
        }
    }

    Ok(())
}
