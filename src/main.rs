//! pcmviz: live terminal waveform and spectrum visualizer for raw PCM streams.

mod app;
mod commands;
mod config;
mod logging;
mod ui;
mod visualization;

#[tokio::main]
async fn main() {
    if let Err(e) = app::run().await {
        tracing::error!("Fatal: {e:#}");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
