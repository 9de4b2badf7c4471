//! Live visualization of a PCM stream.
//!
//! Validates configuration and opens the source before taking over the terminal,
//! then runs the frame loop on its own thread and keyboard polling on a blocking
//! task, and waits until either of them (or a termination signal) cancels.

use anyhow::anyhow;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crate::config::{FileConfig, Overrides, VizConfig};
use crate::ui::TerminalSession;
use crate::visualization::{input, CancelToken, FrameLoop, Renderer, SampleReader};

const SUPERVISE_INTERVAL: Duration = Duration::from_millis(50);

/// How many supervise intervals to wait for the frame loop after cancellation.
const JOIN_GRACE_TICKS: u32 = 10;

/// Runs the visualizer until cancelled or the stream ends.
///
/// # Errors
/// - Invalid configuration (reported before the terminal is touched)
/// - If the PCM source cannot be opened
/// - If the terminal cannot be initialized
/// - Fatal I/O errors from the stream while drawing
pub async fn handle_visualize(
    overrides: Overrides,
    config_path: Option<PathBuf>,
) -> anyhow::Result<()> {
    tracing::info!("=== pcmviz started ===");

    let file_config = match config_path {
        Some(path) => FileConfig::load_from(&path)?,
        None => FileConfig::load()?,
    };
    let config = VizConfig::resolve(file_config, overrides).map_err(|e| {
        tracing::error!("Invalid configuration: {e}");
        e
    })?;

    tracing::info!(
        "Configuration: viz={}, step={}, scale={}, file={}",
        config.visualization,
        config.step,
        config.scale,
        config.file.display()
    );

    let source = SampleReader::open(&config.file)?;

    let mut session = TerminalSession::enter()?;
    let mut terminal = session.terminal()?;

    let cancel = CancelToken::new();

    let term_signal = Arc::new(AtomicBool::new(false));
    for signal in [signal_hook::consts::SIGTERM, signal_hook::consts::SIGHUP] {
        signal_hook::flag::register(signal, Arc::clone(&term_signal))
            .map_err(|e| anyhow!("Failed to register signal handler: {e}"))?;
    }

    let mut frame_loop = FrameLoop::new(
        source,
        Renderer::from_config(&config),
        config.palette.clone(),
        cancel.clone(),
    );
    let frames = std::thread::Builder::new()
        .name("pcmviz-frames".to_string())
        .spawn(move || frame_loop.run(&mut terminal))?;

    let input_cancel = cancel.clone();
    let input_task = tokio::task::spawn_blocking(move || {
        let result = input::poll_until_cancelled(input_cancel.clone());
        if result.is_err() {
            input_cancel.cancel();
        }
        result
    });

    let frame_result = supervise(&cancel, &term_signal, frames).await;

    match input_task.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::error!("Input polling failed: {e}"),
        Err(e) => tracing::error!("Input task failed: {e}"),
    }

    exit_status(frame_result, session.cleanup())?;
    tracing::info!("=== pcmviz exited successfully ===");
    Ok(())
}

/// Picks the error to report, preferring the stream's over the terminal restore's.
fn exit_status(
    frame_result: anyhow::Result<()>,
    cleanup_result: anyhow::Result<()>,
) -> anyhow::Result<()> {
    if let Err(e) = &cleanup_result {
        tracing::error!("Failed to restore terminal: {e:#}");
    }
    frame_result?;
    cleanup_result
}

/// Waits until the token is cancelled, then collects the frame loop's result.
///
/// A frame loop still blocked on a read after the grace period is left behind and
/// dies with the process. It still owns a terminal handle, but it re-checks the
/// token after every read and never draws once cancelled.
async fn supervise(
    cancel: &CancelToken,
    term_signal: &AtomicBool,
    frames: JoinHandle<anyhow::Result<()>>,
) -> anyhow::Result<()> {
    loop {
        if term_signal.load(Ordering::Relaxed) && cancel.cancel() {
            tracing::info!("Termination signal received");
        }
        if cancel.is_cancelled() {
            break;
        }
        tokio::time::sleep(SUPERVISE_INTERVAL).await;
    }

    for _ in 0..JOIN_GRACE_TICKS {
        if frames.is_finished() {
            return frames
                .join()
                .map_err(|_| anyhow!("Frame loop panicked"))?;
        }
        tokio::time::sleep(SUPERVISE_INTERVAL).await;
    }

    tracing::warn!("Frame loop still blocked on the PCM source, not waiting for it");
    Ok(())
}
