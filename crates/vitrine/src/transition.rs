//! # Transition Controller
//!
//! Drives the loading screen into the main content.
//!
//! ## States
//!
//! ```text
//!                  100% (decoded)                confirm(Continue)
//! LoadingVideoPlaying ───────> AwaitingUserConfirm ─────────────────┐
//!         │                            │ confirm(StartExperience)   │
//!         │ terminal                   ▼                            ▼
//!         │ load failure     Transitioning(Glitch) ──3000ms──> Transitioning(FadeOut)
//!         ▼                                                         │ 800ms
//!       Failed                                                      ▼
//!                                                              Interactive
//! ```
//!
//! The loader reports 100 % only for a decoded payload, so reaching
//! `AwaitingUserConfirm` means the scene exists. The skip action is
//! `StartExperience` from that state: load completion and the continue
//! affordance arrive together, so there is no separate path out of
//! `LoadingVideoPlaying`.
//!
//! Entering `Transitioning` by either action mutes all media at once.
//! `Interactive` and `Failed` are terminal. Every presentation change is a
//! [`LifecycleSignal`]; the controller never touches the page itself.

use std::time::Duration;

use vitrine_loader::{LoadError, LoadProgress};
use vitrine_shared::constants::{ERROR_PROGRESS_COLOR, LOAD_ERROR_MESSAGE};
use vitrine_shared::{
    LifecycleSignal, SignalSender, FADE_OUT_DURATION, GLITCH_DURATION, REVEAL_DELAY,
    REVEAL_DURATION,
};

use crate::config::TimingConfig;
use crate::error::MediaError;
use crate::scheduler::Scheduler;

/// Sub-phase of [`TransitionState::Transitioning`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransitionPhase {
    /// Glitch effect before the fade.
    Glitch,
    /// Loading surface fading out.
    FadeOut,
}

/// Where the experience is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TransitionState {
    /// Loading screen with its background video; payload in flight.
    #[default]
    LoadingVideoPlaying,
    /// Payload complete; waiting for the visitor to continue.
    AwaitingUserConfirm,
    /// Leaving the loading screen.
    Transitioning(TransitionPhase),
    /// Main content and 3D scene live. Terminal.
    Interactive,
    /// The payload could not be loaded. Terminal until reload.
    Failed,
}

impl TransitionState {
    /// True for `Interactive` and `Failed`.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Interactive | Self::Failed)
    }
}

/// Which affordance the visitor used to leave the loading screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConfirmAction {
    /// Plain continue: fade immediately.
    Continue,
    /// "Start experience": glitch first, then fade.
    StartExperience,
}

/// Fixed delays used by the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransitionTiming {
    /// Glitch length.
    pub glitch: Duration,
    /// Fade-out length.
    pub fade_out: Duration,
    /// Delay before the main content slides in.
    pub reveal_delay: Duration,
    /// Slide-in length.
    pub reveal_duration: Duration,
}

impl Default for TransitionTiming {
    fn default() -> Self {
        Self {
            glitch: GLITCH_DURATION,
            fade_out: FADE_OUT_DURATION,
            reveal_delay: REVEAL_DELAY,
            reveal_duration: REVEAL_DURATION,
        }
    }
}

impl From<&TimingConfig> for TransitionTiming {
    fn from(timing: &TimingConfig) -> Self {
        Self {
            glitch: timing.glitch(),
            fade_out: timing.fade_out(),
            reveal_delay: timing.reveal_delay(),
            reveal_duration: timing.reveal_duration(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TransitionTimer {
    GlitchFinished,
    FadeFinished,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SoundPrompt {
    Hidden,
    Shown,
    Spent,
}

/// The loading-screen state machine.
pub struct TransitionController {
    state: TransitionState,
    timing: TransitionTiming,
    signals: SignalSender,
    timers: Scheduler<TransitionTimer>,
    load_complete: bool,
    sound_prompt: SoundPrompt,
}

impl TransitionController {
    /// Creates a controller in `LoadingVideoPlaying`.
    #[must_use]
    pub fn new(timing: TransitionTiming, signals: SignalSender) -> Self {
        Self {
            state: TransitionState::LoadingVideoPlaying,
            timing,
            signals,
            timers: Scheduler::new(),
            load_complete: false,
            sound_prompt: SoundPrompt::Hidden,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> TransitionState {
        self.state
    }

    /// True once the decoded payload reached 100 %.
    #[must_use]
    pub fn is_load_complete(&self) -> bool {
        self.load_complete
    }

    /// True while the "enable sound" prompt is on screen.
    #[must_use]
    pub fn is_sound_prompt_visible(&self) -> bool {
        self.sound_prompt == SoundPrompt::Shown
    }

    /// Reports how the background video's autoplay went.
    ///
    /// A blocked autoplay leaves the video playing muted and offers the
    /// sound prompt once.
    pub fn on_autoplay(&mut self, result: Result<(), MediaError>) {
        let Err(error) = result else {
            tracing::debug!("Loading video autoplaying with sound");
            return;
        };
        tracing::warn!("Loading video: {error}; continuing muted");
        let on_loading_screen = matches!(
            self.state,
            TransitionState::LoadingVideoPlaying | TransitionState::AwaitingUserConfirm
        );
        if on_loading_screen && self.sound_prompt == SoundPrompt::Hidden {
            self.sound_prompt = SoundPrompt::Shown;
            self.signals.emit(LifecycleSignal::ShowSoundPrompt);
        }
    }

    /// The visitor used the sound prompt. Returns false if there was none.
    pub fn enable_sound(&mut self) -> bool {
        if self.sound_prompt != SoundPrompt::Shown {
            return false;
        }
        self.sound_prompt = SoundPrompt::Spent;
        self.signals.emit(LifecycleSignal::UnmuteLoadingVideo);
        self.signals.emit(LifecycleSignal::HideSoundPrompt);
        true
    }

    /// Feeds loader progress. Returns the new state if it changed.
    pub fn on_progress(&mut self, progress: LoadProgress) -> Option<TransitionState> {
        if self.state == TransitionState::Failed {
            return None;
        }
        let percent = progress.percent();
        self.signals.emit(LifecycleSignal::Progress(percent));

        if !progress.is_complete() || self.load_complete {
            return None;
        }
        self.load_complete = true;
        self.signals.emit(LifecycleSignal::Ready);

        if self.state != TransitionState::LoadingVideoPlaying {
            return None;
        }
        self.enter(TransitionState::AwaitingUserConfirm);
        self.signals.emit(LifecycleSignal::ShowContinue);
        Some(self.state)
    }

    /// Feeds a terminal loader failure.
    ///
    /// The `Error` signal always goes out. Anywhere before `Interactive` the
    /// controller also freezes in `Failed`.
    pub fn on_load_failure(&mut self, error: &LoadError) -> Option<TransitionState> {
        tracing::error!("Scene payload unavailable: {error}");
        self.signals.emit(LifecycleSignal::Error {
            reason: error.to_string(),
        });
        if self.state.is_terminal() {
            tracing::warn!("Load failure after {:?}; state unchanged", self.state);
            return None;
        }
        self.timers.clear();
        self.enter(TransitionState::Failed);
        self.signals.emit(LifecycleSignal::ProgressFailed {
            message: LOAD_ERROR_MESSAGE.to_owned(),
            color: ERROR_PROGRESS_COLOR.to_owned(),
        });
        Some(self.state)
    }

    /// The visitor left the loading screen.
    ///
    /// Accepted only from `AwaitingUserConfirm`. Both actions hard-mute every
    /// media element before anything else. Returns the new state, or `None`
    /// if ignored.
    pub fn confirm(&mut self, action: ConfirmAction, now: Duration) -> Option<TransitionState> {
        if self.state != TransitionState::AwaitingUserConfirm {
            tracing::debug!("Ignoring {action:?} in {:?}", self.state);
            return None;
        }

        let phase = match action {
            ConfirmAction::Continue => TransitionPhase::FadeOut,
            ConfirmAction::StartExperience => TransitionPhase::Glitch,
        };
        self.enter(TransitionState::Transitioning(phase));
        self.sound_prompt = SoundPrompt::Spent;
        self.signals.emit(LifecycleSignal::MuteAllMedia);

        match action {
            ConfirmAction::Continue => self.begin_fade(now),
            ConfirmAction::StartExperience => {
                self.signals.emit(LifecycleSignal::Glitch {
                    duration: self.timing.glitch,
                });
                self.timers.schedule(now, self.timing.glitch, TransitionTimer::GlitchFinished);
            }
        }
        Some(self.state)
    }

    /// Fires due timers. Returns every state entered, in order.
    pub fn advance(&mut self, now: Duration) -> Vec<TransitionState> {
        let mut entered = Vec::new();
        while let Some(timer) = self.timers.pop_due(now) {
            match timer.kind {
                TransitionTimer::GlitchFinished => {
                    self.enter(TransitionState::Transitioning(TransitionPhase::FadeOut));
                    self.begin_fade(timer.due);
                }
                TransitionTimer::FadeFinished => self.enter_interactive(),
            }
            entered.push(self.state);
        }
        entered
    }

    fn begin_fade(&mut self, at: Duration) {
        self.signals.emit(LifecycleSignal::FadeOutLoading {
            duration: self.timing.fade_out,
        });
        self.timers.schedule(at, self.timing.fade_out, TransitionTimer::FadeFinished);
    }

    fn enter_interactive(&mut self) {
        self.enter(TransitionState::Interactive);
        self.signals.emit(LifecycleSignal::RevealMain {
            delay: self.timing.reveal_delay,
            duration: self.timing.reveal_duration,
        });
        self.signals.emit(LifecycleSignal::RestoreScroll);
        self.signals.emit(LifecycleSignal::RemoveLoadingDom);
        self.signals.emit(LifecycleSignal::ResetScroll);
    }

    fn enter(&mut self, next: TransitionState) {
        tracing::info!("Transition: {:?} -> {next:?}", self.state);
        self.state = next;
    }
}
