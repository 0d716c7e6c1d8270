//! # Lifecycle Signals
//!
//! The controller talks to the presentation layer only through these
//! signals. The page subscribes; the controller never reaches into
//! arbitrary page elements.
//!
//! ```text
//! ┌─────────────┐      ┌─────────────┐      ┌──────────────────┐
//! │  Loader     │─────>│ Controller  │─────>│  Signal Channel  │──> page
//! └─────────────┘      └─────────────┘      └──────────────────┘
//! ```

use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, SendError, Sender};

/// Page elements revealed once the intro camera settles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RevealTarget {
    /// The site header.
    Header,
    /// The lead paragraph of the first section.
    Lead,
}

/// Signals emitted towards the presentation layer.
#[derive(Clone, Debug, PartialEq)]
pub enum LifecycleSignal {
    // =========================================================================
    // Load lifecycle
    // =========================================================================
    /// Load progress in percent, always within `[0, 100]`.
    Progress(f32),
    /// The scene payload is fetched and decoded; the continue affordance may show.
    Ready,
    /// A terminal load failure.
    Error {
        /// Human-readable cause.
        reason: String,
    },
    /// Freeze the progress display in its error presentation.
    ProgressFailed {
        /// Message replacing the loading status.
        message: String,
        /// Color applied to the progress indicator.
        color: String,
    },

    // =========================================================================
    // Loading surface affordances
    // =========================================================================
    /// Autoplay with sound was blocked; offer a one-shot "enable sound" prompt.
    ShowSoundPrompt,
    /// The sound prompt was used and must disappear.
    HideSoundPrompt,
    /// Unmute and resume the background video.
    UnmuteLoadingVideo,
    /// Surface the "continue" / "start experience" affordance.
    ShowContinue,
    /// Play the decorative glitch effect on the loading surface.
    Glitch {
        /// How long the effect runs before the fade begins.
        duration: Duration,
    },
    /// Stop and mute every audio and video element on the page.
    MuteAllMedia,
    /// Fade out the loading surface.
    FadeOutLoading {
        /// Fade length.
        duration: Duration,
    },

    // =========================================================================
    // Main content
    // =========================================================================
    /// Show the main content with its fade/slide-in.
    RevealMain {
        /// Delay before the slide-in starts.
        delay: Duration,
        /// Slide-in length.
        duration: Duration,
    },
    /// Re-enable page scrolling.
    RestoreScroll,
    /// Remove the loading-only elements from the page.
    RemoveLoadingDom,
    /// Scroll back to the page origin.
    ResetScroll,
    /// The intro camera animation has settled.
    IntroFinished,
    /// Mark an element as revealed.
    Reveal(RevealTarget),

    // =========================================================================
    // Showcase
    // =========================================================================
    /// Mark one character as active in the navigation.
    SetActiveCharacter {
        /// Character identifier.
        id: String,
    },
    /// Replace the content panel.
    ShowContent {
        /// Character identifier.
        id: String,
        /// Content template for the panel.
        template: String,
    },
}

/// Unbounded channel carrying [`LifecycleSignal`]s to the page.
///
/// Never drops a signal: a page that drains late still sees every
/// `Error` and `MuteAllMedia`.
pub struct SignalBus {
    sender: Sender<LifecycleSignal>,
    receiver: Receiver<LifecycleSignal>,
}

impl SignalBus {
    /// Creates a new bus.
    #[must_use]
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self { sender, receiver }
    }

    /// Creates a sender handle.
    #[must_use]
    pub fn sender(&self) -> SignalSender {
        SignalSender {
            sender: self.sender.clone(),
        }
    }

    /// Creates a receiver handle.
    #[must_use]
    pub fn receiver(&self) -> SignalReceiver {
        SignalReceiver {
            receiver: self.receiver.clone(),
        }
    }
}

impl Default for SignalBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle for emitting signals.
#[derive(Clone)]
pub struct SignalSender {
    sender: Sender<LifecycleSignal>,
}

impl SignalSender {
    /// Emits a signal (non-blocking).
    ///
    /// Returns `false` once every receiver is gone.
    #[inline]
    pub fn emit(&self, signal: LifecycleSignal) -> bool {
        match self.sender.send(signal) {
            Ok(()) => true,
            Err(SendError(signal)) => {
                tracing::warn!("No listener for {signal:?}; dropped");
                false
            }
        }
    }
}

/// Handle for consuming signals.
#[derive(Clone)]
pub struct SignalReceiver {
    receiver: Receiver<LifecycleSignal>,
}

impl SignalReceiver {
    /// Receives all pending signals (non-blocking).
    #[inline]
    #[must_use]
    pub fn drain(&self) -> Vec<LifecycleSignal> {
        self.receiver.try_iter().collect()
    }

    /// Receives one signal (non-blocking).
    #[inline]
    #[must_use]
    pub fn try_recv(&self) -> Option<LifecycleSignal> {
        self.receiver.try_recv().ok()
    }

    /// Checks if there are pending signals.
    #[inline]
    #[must_use]
    pub fn has_signals(&self) -> bool {
        !self.receiver.is_empty()
    }
}
