//! # Portfolio Session
//!
//! The one object that owns the whole experience: loader, transition
//! controller, scene session, render loop, audio slot and showcase. Hosts
//! construct one per page (tests construct one per test) and call
//! [`PortfolioSession::tick`] once per refresh.
//!
//! ## Tick Order
//!
//! ```text
//! 1. Drain the loader      → progress / scene / failure into the controller
//! 2. Fire due timers       → glitch, fade, interactive
//! 3. Run one render frame  → tweens, mixer, active viewport, parallax
//! 4. Intro settled?        → IntroFinished + reveal header and lead
//! ```

use vitrine_loader::{
    AssetLoader, DecoderModule, DecoderModuleError, Fetcher, LoadEvent, LoadRequest, SceneDecoder,
};
use vitrine_scene::{
    CameraId, Clock, FrameReport, RenderLoop, SceneSession, StopHandle, TweenHandle, TweenHandles,
    TweenPurpose, ViewportDims,
};
use vitrine_shared::{LifecycleSignal, RevealTarget, SignalBus, SignalReceiver, SignalSender, Vec2};

use crate::audio::{AudioBackend, AudioSlot};
use crate::config::{AssetsConfig, VitrineConfig};
use crate::error::{MediaError, VitrineResult};
use crate::showcase::Showcase;
use crate::transition::{ConfirmAction, TransitionController, TransitionState, TransitionTiming};

/// Loads the Draco module named by `assets`.
///
/// A missing module is not fatal: uncompressed payloads still decode, and
/// compressed ones fail through the loader's normal error path.
///
/// # Errors
///
/// Returns an error if the module exists but cannot be read.
pub fn open_decoder(assets: &AssetsConfig) -> VitrineResult<SceneDecoder> {
    match DecoderModule::load(&assets.decoder_path, assets.decoder_kind.into()) {
        Ok(module) => Ok(SceneDecoder::new(Some(module))),
        Err(DecoderModuleError::NotFound(path)) => {
            tracing::warn!("No decoder module at {}; compressed scenes will fail", path.display());
            Ok(SceneDecoder::default())
        }
        Err(error) => Err(error.into()),
    }
}

/// The whole landing experience.
pub struct PortfolioSession<F: Fetcher, A: AudioBackend, C: Clock> {
    config: VitrineConfig,
    loader: AssetLoader<F>,
    controller: TransitionController,
    scene: SceneSession,
    frames: RenderLoop<C>,
    audio: AudioSlot<A>,
    showcase: Showcase,
    bus: SignalBus,
    signals: SignalSender,
    intro: Option<TweenHandle>,
    intros_started: u32,
    intro_finished: bool,
}

impl<F: Fetcher, A: AudioBackend, C: Clock> PortfolioSession<F, A, C> {
    /// Wires a session. Nothing is fetched until [`Self::start`].
    #[must_use]
    pub fn new(
        config: VitrineConfig,
        fetcher: F,
        decoder: SceneDecoder,
        audio: A,
        clock: C,
        scene: SceneSession,
    ) -> Self {
        let bus = SignalBus::default();
        let signals = bus.sender();
        Self {
            loader: AssetLoader::new(fetcher, decoder, config.assets.loader_config()),
            controller: TransitionController::new(TransitionTiming::from(&config.timing), bus.sender()),
            scene,
            frames: RenderLoop::new(clock),
            audio: AudioSlot::new(audio),
            showcase: Showcase::from_config(&config.characters),
            bus,
            signals,
            intro: None,
            intros_started: 0,
            intro_finished: false,
            config,
        }
    }

    /// A session rendering into null renderers.
    #[must_use]
    pub fn headless(config: VitrineConfig, fetcher: F, decoder: SceneDecoder, audio: A, clock: C) -> Self {
        let scene = SceneSession::headless(config.viewport.gate());
        Self::new(config, fetcher, decoder, audio, clock, scene)
    }

    /// Starts fetching the scene payload.
    pub fn start(&mut self) {
        let request = LoadRequest::new(&self.config.assets.primary, &self.config.assets.fallback);
        let now = self.frames.clock().now();
        self.loader.load(request, now);
    }

    /// Reports how the loading video's autoplay went.
    pub fn report_autoplay(&mut self, result: Result<(), MediaError>) {
        self.controller.on_autoplay(result);
    }

    /// The visitor used the "enable sound" prompt.
    pub fn enable_sound(&mut self) -> bool {
        self.controller.enable_sound()
    }

    /// The visitor left the loading screen.
    ///
    /// Whichever action was used, the interaction clip stops here, before
    /// any glitch or fade.
    pub fn confirm(&mut self, action: ConfirmAction) -> Option<TransitionState> {
        let now = self.frames.clock().now();
        let entered = self.controller.confirm(action, now)?;
        self.audio.silence();
        self.on_state(entered);
        Some(entered)
    }

    /// Runs one refresh. Returns `None` once the render loop is stopped.
    pub fn tick(&mut self) -> Option<FrameReport> {
        if !self.frames.is_running() {
            return None;
        }
        let now = self.frames.clock().now();

        for event in self.loader.poll(now) {
            match event {
                LoadEvent::Progress(progress) => {
                    self.controller.on_progress(progress);
                }
                LoadEvent::Success(scene) => self.scene.enter_scene(scene),
                LoadEvent::Failure(error) => {
                    self.controller.on_load_failure(&error);
                }
            }
        }

        for entered in self.controller.advance(now) {
            self.on_state(entered);
        }

        let report = self.frames.tick(&mut self.scene)?;
        let intro_settled = report
            .settled
            .iter()
            .any(|settled| settled.purpose == TweenPurpose::Intro && Some(settled.handle) == self.intro);
        if intro_settled {
            self.finish_intro();
        }
        Some(report)
    }

    /// Selects a showcase character: focus the detail camera, swap the
    /// content, and play its clip in place of whatever was playing.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` is not in the showcase.
    pub fn select(&mut self, id: &str) -> VitrineResult<TweenHandles> {
        let character = self.showcase.select(id)?.clone();
        self.audio.stop();

        self.signals.emit(LifecycleSignal::SetActiveCharacter {
            id: character.id.clone(),
        });
        self.signals.emit(LifecycleSignal::ShowContent {
            id: character.id.clone(),
            template: character.template.clone(),
        });
        let handles = self.scene.animate(
            CameraId::Detail,
            &character.target,
            self.config.timing.focus(),
            TweenPurpose::Focus,
        );
        // Media errors are recoverable; the selection stands without sound.
        let _ = self.audio.play(&character.audio);
        Ok(handles)
    }

    /// Applies new viewport sizes.
    pub fn resize(&mut self, dims: ViewportDims) {
        self.scene.resize(dims);
    }

    /// Feeds the detail section's visibility ratio.
    pub fn observe_visibility(&mut self, ratio: f32) -> bool {
        self.scene.observe_visibility(ratio)
    }

    /// Feeds a pointer position in client pixels.
    pub fn pointer_moved(&mut self, client_x: f32, client_y: f32, width: f32, height: f32) {
        self.scene
            .set_pointer(Vec2::normalized_pointer(client_x, client_y, width, height));
    }

    /// Receiver for presentation signals.
    #[must_use]
    pub fn signals(&self) -> SignalReceiver {
        self.bus.receiver()
    }

    /// Handle that stops the render loop.
    #[must_use]
    pub fn stop_handle(&self) -> StopHandle {
        self.frames.stop_handle()
    }

    /// Current transition state.
    #[must_use]
    pub fn state(&self) -> TransitionState {
        self.controller.state()
    }

    /// The transition controller.
    #[must_use]
    pub fn controller(&self) -> &TransitionController {
        &self.controller
    }

    /// The scene session.
    #[must_use]
    pub fn scene(&self) -> &SceneSession {
        &self.scene
    }

    /// The asset loader.
    #[must_use]
    pub fn loader(&self) -> &AssetLoader<F> {
        &self.loader
    }

    /// The audio slot.
    #[must_use]
    pub fn audio(&self) -> &AudioSlot<A> {
        &self.audio
    }

    /// The showcase table.
    #[must_use]
    pub fn showcase(&self) -> &Showcase {
        &self.showcase
    }

    /// The render loop.
    #[must_use]
    pub fn render_loop(&self) -> &RenderLoop<C> {
        &self.frames
    }

    /// The configuration the session was built with.
    #[must_use]
    pub fn config(&self) -> &VitrineConfig {
        &self.config
    }

    /// How many intro animations were started (0 or 1).
    #[must_use]
    pub fn intros_started(&self) -> u32 {
        self.intros_started
    }

    /// True once the intro camera settled.
    #[must_use]
    pub fn is_intro_finished(&self) -> bool {
        self.intro_finished
    }

    fn on_state(&mut self, entered: TransitionState) {
        if entered == TransitionState::Interactive && self.intros_started == 0 {
            let handles = self.scene.start_intro(self.config.timing.intro());
            self.intro = handles.position;
            self.intros_started += 1;
        }
    }

    fn finish_intro(&mut self) {
        self.intro = None;
        self.intro_finished = true;
        tracing::info!("Intro settled; revealing header and lead");
        self.signals.emit(LifecycleSignal::IntroFinished);
        self.signals.emit(LifecycleSignal::Reveal(RevealTarget::Header));
        self.signals.emit(LifecycleSignal::Reveal(RevealTarget::Lead));
    }
}
