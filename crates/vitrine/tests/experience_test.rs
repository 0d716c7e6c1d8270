//! End-to-end tests for the landing experience.

use std::time::Duration;

use vitrine::{
    ConfirmAction, PortfolioSession, RecordingAudio, TransitionPhase, TransitionState,
    VitrineConfig, VitrineError,
};
use vitrine_loader::{FileFetcher, Fetcher, SceneDecoder, ScriptHandle, ScriptedFetcher};
use vitrine_scene::{ActiveViewport, ManualClock};
use vitrine_shared::constants::{INTRO_REST, LOAD_ERROR_MESSAGE};
use vitrine_shared::{LifecycleSignal, RevealTarget, SignalReceiver, Vec3};

const SCENE: &[u8] = br#"{ "asset": { "version": "2.0" }, "nodes": [ { "name": "graces" } ] }"#;

struct Harness {
    session: PortfolioSession<ScriptedFetcher, RecordingAudio, ManualClock>,
    script: ScriptHandle,
    audio: RecordingAudio,
    clock: ManualClock,
    signals: SignalReceiver,
}

impl Harness {
    fn new() -> Self {
        let mut config = VitrineConfig::default();
        config.assets.primary = "primary.glb".into();
        config.assets.fallback = "mirror.glb".into();

        let (fetcher, script) = ScriptedFetcher::new();
        let audio = RecordingAudio::new();
        let clock = ManualClock::new();
        let mut session =
            PortfolioSession::headless(config, fetcher, SceneDecoder::default(), audio.clone(), clock.clone());
        let signals = session.signals();
        session.start();
        session.tick();
        Self { session, script, audio, clock, signals }
    }

    /// Advances the clock by `ms` and runs one tick.
    fn step(&mut self, ms: u64) {
        self.clock.advance(Duration::from_millis(ms));
        self.session.tick();
    }

    /// Runs ticks of `frame_ms` until `total_ms` has passed.
    fn run(&mut self, total_ms: u64, frame_ms: u64) {
        let mut elapsed = 0;
        while elapsed < total_ms {
            self.step(frame_ms);
            elapsed += frame_ms;
        }
    }

    fn load_fully(&mut self) {
        for loaded in [0, 25, 60, 100] {
            self.script.progress(loaded, 100);
            self.step(16);
        }
        self.script.complete(SCENE.to_vec());
        self.step(16);
    }
}

fn assert_transitioned_once<F: Fetcher>(session: &PortfolioSession<F, RecordingAudio, ManualClock>) {
    assert_eq!(session.state(), TransitionState::Interactive);
    assert_eq!(session.intros_started(), 1);
}

#[test]
fn test_progress_then_confirm_reaches_interactive() {
    let mut h = Harness::new();

    for loaded in [0, 25, 60, 100] {
        h.script.progress(loaded, 100);
        h.step(16);
        assert_eq!(h.session.state(), TransitionState::LoadingVideoPlaying);
    }

    // The transport's 100 % counts once the payload decodes.
    h.script.complete(SCENE.to_vec());
    h.step(16);
    assert_eq!(h.session.state(), TransitionState::AwaitingUserConfirm);
    assert!(h.session.scene().is_loaded());

    let percents: Vec<f32> = h
        .signals
        .drain()
        .into_iter()
        .filter_map(|s| match s {
            LifecycleSignal::Progress(p) => Some(p),
            _ => None,
        })
        .collect();
    assert_eq!(percents, vec![0.0, 25.0, 60.0, 100.0]);

    assert_eq!(
        h.session.confirm(ConfirmAction::Continue),
        Some(TransitionState::Transitioning(TransitionPhase::FadeOut))
    );
    h.step(799);
    assert_eq!(h.session.state(), TransitionState::Transitioning(TransitionPhase::FadeOut));
    h.step(1);
    assert_transitioned_once(&h.session);

    // More frames never start a second intro.
    h.run(1000, 16);
    assert_transitioned_once(&h.session);
}

#[test]
fn test_intro_settles_and_reveals() {
    let mut h = Harness::new();
    h.load_fully();
    h.session.confirm(ConfirmAction::Continue);
    h.step(800);
    let _ = h.signals.drain();

    h.run(3600, 50);

    assert!(h.session.is_intro_finished());
    assert_eq!(h.session.scene().cameras().primary.position, INTRO_REST);
    let emitted = h.signals.drain();
    let tail: Vec<_> = emitted.iter().rev().take(3).rev().cloned().collect();
    assert_eq!(
        tail,
        vec![
            LifecycleSignal::IntroFinished,
            LifecycleSignal::Reveal(RevealTarget::Header),
            LifecycleSignal::Reveal(RevealTarget::Lead),
        ]
    );
}

#[test]
fn test_start_experience_glitches_before_fading() {
    let mut h = Harness::new();
    h.load_fully();

    assert_eq!(
        h.session.confirm(ConfirmAction::StartExperience),
        Some(TransitionState::Transitioning(TransitionPhase::Glitch))
    );
    h.run(2990, 10);
    assert_eq!(h.session.state(), TransitionState::Transitioning(TransitionPhase::Glitch));
    h.step(10);
    assert_eq!(h.session.state(), TransitionState::Transitioning(TransitionPhase::FadeOut));
    h.step(800);
    assert_transitioned_once(&h.session);
}

#[test]
fn test_primary_and_fallback_failure_is_terminal() {
    let mut h = Harness::new();

    h.script.progress(30, 100);
    h.script.fail("connection reset");
    h.step(16);
    assert_eq!(h.script.requests(), vec!["primary.glb", "mirror.glb"]);
    assert_eq!(h.session.state(), TransitionState::LoadingVideoPlaying);

    h.script.fail("404");
    h.step(16);
    assert_eq!(h.session.state(), TransitionState::Failed);
    assert!(h.signals.drain().contains(&LifecycleSignal::ProgressFailed {
        message: LOAD_ERROR_MESSAGE.into(),
        color: "#ff4444".into(),
    }));

    // Frozen: no third request, no confirm, no intro.
    assert_eq!(h.session.confirm(ConfirmAction::Continue), None);
    h.run(5000, 100);
    assert_eq!(h.script.request_count(), 2);
    assert_eq!(h.session.state(), TransitionState::Failed);
    assert_eq!(h.session.intros_started(), 0);
}

#[test]
fn test_undecodable_primary_holds_continue_until_fallback_decodes() {
    let mut h = Harness::new();

    h.script.progress(100, 100);
    h.script.complete(b"corrupt".to_vec());
    h.step(16);
    assert_eq!(h.session.state(), TransitionState::LoadingVideoPlaying);
    assert_eq!(h.script.request_count(), 2);
    assert!(!h.signals.drain().contains(&LifecycleSignal::ShowContinue));

    h.script.complete(SCENE.to_vec());
    h.step(16);
    assert!(h.session.scene().is_loaded());
    assert_eq!(h.session.state(), TransitionState::AwaitingUserConfirm);
    assert!(h.signals.drain().contains(&LifecycleSignal::ShowContinue));
}

#[test]
fn test_confirm_before_decode_cannot_outrun_terminal_failure() {
    let mut h = Harness::new();

    h.script.progress(100, 100);
    h.script.complete(b"corrupt".to_vec());
    h.step(16);

    assert_eq!(h.session.confirm(ConfirmAction::Continue), None);
    h.run(800, 16);
    assert_eq!(h.session.state(), TransitionState::LoadingVideoPlaying);

    h.script.fail("404");
    h.step(16);
    assert_eq!(h.session.state(), TransitionState::Failed);
    assert!(!h.session.scene().is_loaded());
    assert_eq!(h.session.intros_started(), 0);
    let emitted = h.signals.drain();
    assert!(emitted.iter().any(|s| matches!(s, LifecycleSignal::Error { .. })));
    assert!(emitted.contains(&LifecycleSignal::ProgressFailed {
        message: LOAD_ERROR_MESSAGE.into(),
        color: "#ff4444".into(),
    }));
}

#[test]
fn test_showcase_selection_keeps_one_clip_and_flies_detail_camera() {
    let mut h = Harness::new();
    h.load_fully();

    h.session.select("aglaea").unwrap();
    h.run(400, 16);
    h.session.select("thalia").unwrap();
    assert_eq!(h.audio.live_count(), 1);
    assert_eq!(h.session.audio().current().map(|r| r.ends_with("vinbat.mp3")), Some(true));

    h.run(2000, 16);
    assert_eq!(h.session.scene().cameras().detail.position, Vec3::new(3.6, 3.3, 2.7));
    assert!(h.session.scene().animator().is_idle());

    let emitted = h.signals.drain();
    assert!(emitted.contains(&LifecycleSignal::SetActiveCharacter { id: "thalia".into() }));
    assert!(matches!(h.session.select("nobody"), Err(VitrineError::UnknownCharacter(_))));
    assert_eq!(h.session.showcase().active().map(|c| c.id.as_str()), Some("thalia"));
}

#[test]
fn test_both_confirm_actions_mute_media_at_once() {
    for action in [ConfirmAction::Continue, ConfirmAction::StartExperience] {
        let mut h = Harness::new();
        h.load_fully();
        h.session.select("sh").unwrap();
        assert_eq!(h.audio.live_count(), 1);
        let _ = h.signals.drain();

        h.session.confirm(action);
        assert_eq!(h.audio.live_count(), 0, "{action:?}");
        assert_eq!(h.audio.mutes(), 1, "{action:?}");
        assert_eq!(h.session.audio().current(), None);
        assert_eq!(h.signals.drain().first(), Some(&LifecycleSignal::MuteAllMedia));

        // The rest of the transition does not mute again.
        h.run(4000, 50);
        assert_transitioned_once(&h.session);
        assert_eq!(h.audio.mutes(), 1, "{action:?}");
    }
}

#[test]
fn test_signal_burst_never_loses_terminal_error() {
    let mut h = Harness::new();

    for loaded in 0..300 {
        h.script.progress(loaded, 1000);
    }
    h.step(16);
    h.script.fail("connection reset");
    h.step(16);
    h.script.fail("404");
    h.step(16);

    assert_eq!(h.session.state(), TransitionState::Failed);
    let emitted = h.signals.drain();
    assert!(emitted.len() > 300);
    assert!(emitted.iter().any(|s| matches!(s, LifecycleSignal::Error { .. })));
}

#[test]
fn test_visibility_switches_rendered_viewport() {
    let mut h = Harness::new();

    h.session.observe_visibility(0.5);
    h.step(16);
    h.step(16);
    h.session.observe_visibility(0.0);
    h.step(16);

    let scene = h.session.scene();
    assert_eq!(scene.frames_rendered(ActiveViewport::Detail), 2);
    // The harness ran one frame before the switch.
    assert_eq!(scene.frames_rendered(ActiveViewport::Primary), 2);
}

#[test]
fn test_file_transport_falls_back_to_local_mirror() {
    let id = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mirror = std::env::temp_dir().join(format!("vitrine_mirror_{id}.gltf"));
    std::fs::write(&mirror, SCENE).unwrap();

    let mut config = VitrineConfig::default();
    config.assets.primary = "file:///definitely/not/here.glb".into();
    config.assets.fallback = mirror.display().to_string();

    let clock = ManualClock::new();
    let mut session = PortfolioSession::headless(
        config,
        FileFetcher::new(16),
        SceneDecoder::default(),
        RecordingAudio::new(),
        clock.clone(),
    );
    session.start();
    for _ in 0..100 {
        clock.advance(Duration::from_millis(16));
        session.tick();
        if session.scene().is_loaded() {
            break;
        }
    }

    assert!(session.scene().is_loaded());
    assert_eq!(session.loader().attempts_issued(), 2);
    assert_eq!(session.state(), TransitionState::AwaitingUserConfirm);

    std::fs::remove_file(&mirror).ok();
}
