//! # VITRINE Headless Driver
//!
//! Runs the whole landing sequence without a page or GPU: loads the scene
//! payload from disk, auto-confirms the loading screen, waits for the intro
//! camera to settle, then stops.
//!
//! ```bash
//! ./vitrine_headless                 # built-in configuration
//! ./vitrine_headless vitrine.toml    # custom assets / timing
//! ```

use std::time::Duration;

use vitrine::{
    open_decoder, ConfirmAction, PortfolioSession, RecordingAudio, TransitionState, VitrineConfig,
};
use vitrine_loader::FileFetcher;
use vitrine_scene::{SystemClock, ViewportDims};

/// ~60 Hz.
const FRAME: Duration = Duration::from_micros(16_667);

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .init();

    println!("═══════════════════════════════════════════════════════════════════");
    println!("                    VITRINE HEADLESS v{}", env!("CARGO_PKG_VERSION"));
    println!("═══════════════════════════════════════════════════════════════════");
    println!();

    let config = match std::env::args().nth(1) {
        Some(path) => match VitrineConfig::load(&path) {
            Ok(config) => {
                println!("  Config:   {path} ✓");
                config
            }
            Err(e) => {
                eprintln!("  ✗ FATAL: {e}");
                std::process::exit(2);
            }
        },
        None => {
            println!("  Config:   built-in");
            VitrineConfig::default()
        }
    };

    let decoder = match open_decoder(&config.assets) {
        Ok(decoder) => decoder,
        Err(e) => {
            eprintln!("  ✗ FATAL: {e}");
            std::process::exit(2);
        }
    };
    println!(
        "  Decoder:  {}",
        decoder.module().map_or_else(
            || "none".to_owned(),
            |m| format!("{} ({} bytes)", m.path().display(), m.len())
        )
    );
    println!("  Primary:  {}", config.assets.primary);
    println!("  Fallback: {}", config.assets.fallback);
    println!();

    let fetcher = FileFetcher::new(config.assets.chunk_size);
    let audio = RecordingAudio::new();
    let mut session = PortfolioSession::headless(config, fetcher, decoder, audio.clone(), SystemClock::new());
    let signals = session.signals();
    let stop = session.stop_handle();

    session.resize(ViewportDims {
        primary: (1920, 1080),
        detail: (960, 540),
        device_pixel_ratio: 1.0,
    });
    session.report_autoplay(Ok(()));
    session.start();

    while let Some(report) = session.tick() {
        for signal in signals.drain() {
            println!("  [{:>6}] {signal:?}", report.frame);
        }

        match session.state() {
            TransitionState::AwaitingUserConfirm => {
                session.confirm(ConfirmAction::Continue);
            }
            TransitionState::Failed => stop.stop(),
            TransitionState::Interactive if session.is_intro_finished() => stop.stop(),
            _ => {}
        }

        std::thread::sleep(FRAME);
    }

    let stats = session.render_loop().stats();
    println!();
    println!("═══════════════════════════════════════════════════════════════════");
    println!("  Final state:   {:?}", session.state());
    println!("  Frames:        {}", stats.total_frames);
    println!("  Longest frame: {:?}", stats.longest_delta);
    println!("  Fetches:       {}", session.loader().attempts_issued());
    println!("  Audio mutes:   {}", audio.mutes());
    println!("═══════════════════════════════════════════════════════════════════");

    if session.state() == TransitionState::Failed {
        std::process::exit(1);
    }
}
