use std::future;

use aider_ollama::apis::ollama::BASE_URL;
use aider_ollama::commands::probe::{Probe, report};
use aider_ollama::utilities::config::Config;
use aider_ollama::utilities::logchamp;
use clap::Parser;
use tokio::signal;
use url::Url;

/// Test the generate and chat endpoints of a local Ollama server.
#[derive(Parser)]
#[command(version)]
struct Args {}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    logchamp::init();
    let Args {} = Args::parse();
    let config = Config::load();

    let base_url = match Url::parse(BASE_URL) {
        Ok(base_url) => base_url,
        Err(err) => {
            log::error!("invalid base URL {BASE_URL}: {err}");
            return;
        }
    };

    let probe = match Probe::new(base_url, config.ollama_api_key().map(str::to_owned)) {
        Ok(probe) => probe,
        Err(err) => {
            log::error!("failed to build the HTTP client: {err}");
            return;
        }
    };

    let interrupt = async {
        if let Err(err) = signal::ctrl_c().await {
            log::error!("failed to listen for Ctrl+C: {err}");
            future::pending::<()>().await;
        }
    };

    probe
        .run_all(interrupt, |endpoint, result| println!("{}", report(endpoint, result)))
        .await;
}
