use aider_ollama::commands::launch::Launcher;
use aider_ollama::utilities::config::Config;
use aider_ollama::utilities::logchamp;
use clap::Parser;

/// Run Aider with a specified model.
#[derive(Parser)]
#[command(version)]
struct Args {
    /// Specify the model to use: ollama or groq
    #[arg(long)]
    model: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    logchamp::init();
    let args = Args::parse();
    let config = Config::load();

    if let Some(Err(err)) = Launcher::default().run(&args.model, &config).await {
        log::error!("failed to start the assistant: {err}");
    }
}
