//! # VITRINE
//!
//! The asset-loading and scene-transition controller of the landing
//! experience: from "nothing loaded" to "interactive 3D scene".
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      PortfolioSession                        │
//! ├──────────────┬──────────────────────┬────────────────────────┤
//! │ AssetLoader  │ TransitionController │ SceneSession + Loop    │
//! │ (fallback x1)│ (timers, signals)    │ (tweens, parallax)     │
//! ├──────────────┴──────────────────────┴────────────────────────┤
//! │           AudioSlot  ·  Showcase  ·  SignalBus               │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! let config = VitrineConfig::load("vitrine.toml")?;
//! let decoder = open_decoder(&config.assets)?;
//! let mut session = PortfolioSession::headless(config, fetcher, decoder, audio, SystemClock::new());
//! session.start();
//! while let Some(_frame) = session.tick() {
//!     for signal in session.signals().drain() { /* update the page */ }
//! }
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod audio;
pub mod config;
pub mod error;
pub mod scheduler;
pub mod session;
pub mod showcase;
pub mod transition;

pub use audio::{AudioBackend, AudioHandle, AudioLog, AudioSlot, RecordingAudio};
pub use config::{
    AssetsConfig, CharacterConfig, DecoderKind, TimingConfig, ViewportConfig, VitrineConfig,
};
pub use error::{ConfigError, ConfigResult, MediaError, VitrineError, VitrineResult};
pub use scheduler::{Scheduler, Timer};
pub use session::{open_decoder, PortfolioSession};
pub use showcase::{Character, Showcase};
pub use transition::{
    ConfirmAction, TransitionController, TransitionPhase, TransitionState, TransitionTiming,
};
