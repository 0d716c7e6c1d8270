//! # VITRINE Shared
//!
//! Common types used by the loader, the scene session and the controller.
//!
//! ## CRITICAL RULE
//!
//! This crate must NEVER depend on:
//! - a renderer or windowing crate
//! - a network or file transport
//!
//! If you need scene types, put them in `vitrine_scene`.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod constants;
pub mod events;
pub mod math;

pub use constants::{
    FADE_OUT_DURATION, FOCUS_DURATION, GLITCH_DURATION, INTRO_DURATION, REVEAL_DELAY,
    REVEAL_DURATION, VISIBILITY_CUTOFF,
};
pub use events::{LifecycleSignal, RevealTarget, SignalBus, SignalReceiver, SignalSender};
pub use math::{Vec2, Vec3};
