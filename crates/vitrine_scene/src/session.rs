//! Scene Session
//!
//! One scene graph, two camera/viewport pairs, two renderers. Only the
//! active viewport is drawn; which one is active follows the visibility of
//! the detail section.

use std::time::Duration;

use vitrine_loader::SceneGraph;
use vitrine_shared::constants::{INTRO_REST, INTRO_START, MAX_PIXEL_RATIO, SUN_LIGHT_POSITION};
use vitrine_shared::{Vec2, Vec3, VISIBILITY_CUTOFF};

use crate::animation::{CameraAnimator, CameraTarget, Settled, TweenHandles, TweenPurpose};
use crate::camera::{CameraId, CameraPair, CameraUniform};
use crate::mixer::Mixer;
use crate::parallax::Parallax;

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, Copy)]
pub struct RenderFrame<'a> {
    /// The loaded scene, if any.
    pub scene: Option<&'a SceneGraph>,
    /// Camera of the viewport being drawn.
    pub camera: CameraUniform,
    /// Sun light position.
    pub sun_light: Vec3,
    /// Fill light position (moved by parallax).
    pub fill_light: Vec3,
    /// Model rotation about Y from the idle spin.
    pub model_spin: f32,
}

/// A drawing backend for one viewport.
pub trait Renderer {
    /// Sets the output size in CSS pixels.
    fn set_size(&mut self, width: u32, height: u32);
    /// Sets the device pixel ratio.
    fn set_pixel_ratio(&mut self, ratio: f32);
    /// Draws one frame.
    fn render(&mut self, frame: &RenderFrame<'_>);
}

/// A renderer that draws nothing and remembers what it was told.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct NullRenderer {
    /// Frames drawn.
    pub frames: u64,
    /// Output size.
    pub size: (u32, u32),
    /// Pixel ratio.
    pub pixel_ratio: f32,
}

impl Renderer for NullRenderer {
    fn set_size(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    fn set_pixel_ratio(&mut self, ratio: f32) {
        self.pixel_ratio = ratio;
    }

    fn render(&mut self, _frame: &RenderFrame<'_>) {
        self.frames += 1;
    }
}

/// Which viewport is drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ActiveViewport {
    /// The hero viewport.
    #[default]
    Primary,
    /// The detail viewport.
    Detail,
}

impl ActiveViewport {
    /// Camera belonging to this viewport.
    #[must_use]
    pub const fn camera(self) -> CameraId {
        match self {
            Self::Primary => CameraId::Primary,
            Self::Detail => CameraId::Detail,
        }
    }
}

/// Visibility hysteresis for the detail section.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisibilityGate {
    enter: f32,
    exit: f32,
    active: ActiveViewport,
}

impl VisibilityGate {
    /// Creates a gate. `exit` is capped at `enter`.
    #[must_use]
    pub fn new(enter: f32, exit: f32) -> Self {
        Self {
            enter,
            exit: exit.min(enter),
            active: ActiveViewport::Primary,
        }
    }

    /// Feeds one visibility ratio. Returns true if the active viewport changed.
    pub fn observe(&mut self, ratio: f32) -> bool {
        let next = match self.active {
            ActiveViewport::Primary if ratio > self.enter => ActiveViewport::Detail,
            ActiveViewport::Detail if ratio <= self.exit => ActiveViewport::Primary,
            current => current,
        };
        let changed = next != self.active;
        self.active = next;
        changed
    }

    /// The viewport currently drawn.
    #[must_use]
    pub fn active(&self) -> ActiveViewport {
        self.active
    }
}

impl Default for VisibilityGate {
    fn default() -> Self {
        Self::new(VISIBILITY_CUTOFF, VISIBILITY_CUTOFF)
    }
}

/// Sizes of both viewports.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportDims {
    /// Primary viewport size.
    pub primary: (u32, u32),
    /// Detail viewport size.
    pub detail: (u32, u32),
    /// Display's device pixel ratio (capped before use).
    pub device_pixel_ratio: f32,
}

/// The scene session.
pub struct SceneSession {
    cameras: CameraPair,
    animator: CameraAnimator,
    mixer: Option<Mixer>,
    parallax: Parallax,
    pointer: Vec2,
    gate: VisibilityGate,
    primary_renderer: Box<dyn Renderer>,
    detail_renderer: Box<dyn Renderer>,
    scene: Option<SceneGraph>,
    dims: Option<ViewportDims>,
    frames: [u64; 2],
}

impl SceneSession {
    /// Creates a session with the given renderers.
    #[must_use]
    pub fn new(primary: Box<dyn Renderer>, detail: Box<dyn Renderer>, gate: VisibilityGate) -> Self {
        Self {
            cameras: CameraPair::new(),
            animator: CameraAnimator::new(),
            mixer: None,
            parallax: Parallax::new(),
            pointer: Vec2::ZERO,
            gate,
            primary_renderer: primary,
            detail_renderer: detail,
            scene: None,
            dims: None,
            frames: [0; 2],
        }
    }

    /// A session drawing into [`NullRenderer`]s.
    #[must_use]
    pub fn headless(gate: VisibilityGate) -> Self {
        Self::new(Box::<NullRenderer>::default(), Box::<NullRenderer>::default(), gate)
    }

    /// Attaches the decoded scene and its mixer.
    pub fn enter_scene(&mut self, scene: SceneGraph) {
        let mixer = Mixer::for_scene(&scene);
        tracing::info!(
            "Entering scene: {} nodes, {}",
            scene.nodes.len(),
            if scene.has_clips() { "clip playback" } else { "idle spin" }
        );
        self.mixer = Some(mixer);
        self.scene = Some(scene);
    }

    /// True once a scene is attached.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.scene.is_some()
    }

    /// The attached scene.
    #[must_use]
    pub fn scene(&self) -> Option<&SceneGraph> {
        self.scene.as_ref()
    }

    /// Applies viewport sizes to both cameras and both renderers.
    ///
    /// Idempotent. In-flight tweens are untouched.
    pub fn resize(&mut self, dims: ViewportDims) {
        let ratio = dims.device_pixel_ratio.min(MAX_PIXEL_RATIO);
        let (pw, ph) = dims.primary;
        let (dw, dh) = dims.detail;

        self.cameras.primary.set_viewport(pw, ph);
        self.cameras.detail.set_viewport(dw, dh);
        self.primary_renderer.set_size(pw, ph);
        self.primary_renderer.set_pixel_ratio(ratio);
        self.detail_renderer.set_size(dw, dh);
        self.detail_renderer.set_pixel_ratio(ratio);
        self.dims = Some(dims);
    }

    /// Last applied viewport sizes.
    #[must_use]
    pub fn dims(&self) -> Option<ViewportDims> {
        self.dims
    }

    /// Feeds the detail section's visibility ratio.
    pub fn observe_visibility(&mut self, ratio: f32) -> bool {
        let changed = self.gate.observe(ratio);
        if changed {
            tracing::debug!("Active viewport -> {:?} (ratio {ratio})", self.gate.active());
        }
        changed
    }

    /// The viewport drawn each tick.
    #[must_use]
    pub fn active_viewport(&self) -> ActiveViewport {
        self.gate.active()
    }

    /// Records the normalized pointer position.
    pub fn set_pointer(&mut self, pointer: Vec2) {
        self.pointer = pointer;
    }

    /// Current normalized pointer position.
    #[must_use]
    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    /// Starts a camera tween, replacing any on the same (camera, property).
    pub fn animate(
        &mut self,
        camera: CameraId,
        target: &CameraTarget,
        duration: Duration,
        purpose: TweenPurpose,
    ) -> TweenHandles {
        self.animator.animate(&self.cameras, camera, target, duration, purpose)
    }

    /// Snaps the primary camera far above the scene and flies it in.
    pub fn start_intro(&mut self, duration: Duration) -> TweenHandles {
        self.cameras.primary.position = INTRO_START;
        let target = CameraTarget {
            position: Some(INTRO_REST.into()),
            rotation: None,
        };
        self.animate(CameraId::Primary, &target, duration, TweenPurpose::Intro)
    }

    /// Advances camera tweens.
    pub fn advance_tweens(&mut self, dt: Duration) -> Vec<Settled> {
        self.animator.advance(&mut self.cameras, dt)
    }

    /// Advances the model mixer, if a scene is attached.
    pub fn advance_mixer(&mut self, dt: Duration) {
        if let Some(mixer) = self.mixer.as_mut() {
            mixer.advance(dt);
        }
    }

    /// Draws the active viewport only.
    pub fn render(&mut self) -> ActiveViewport {
        let viewport = self.gate.active();
        let (camera, renderer, slot) = match viewport {
            ActiveViewport::Primary => (
                self.cameras.primary.uniform(self.parallax.rig),
                &mut self.primary_renderer,
                0,
            ),
            ActiveViewport::Detail => (
                self.cameras.detail.uniform(Vec3::ZERO),
                &mut self.detail_renderer,
                1,
            ),
        };
        let frame = RenderFrame {
            scene: self.scene.as_ref(),
            camera,
            sun_light: SUN_LIGHT_POSITION,
            fill_light: self.parallax.fill_light,
            model_spin: self.mixer.as_ref().map_or(0.0, Mixer::spin_angle),
        };
        renderer.render(&frame);
        self.frames[slot] += 1;
        viewport
    }

    /// Eases the parallax toward the current pointer.
    pub fn apply_parallax(&mut self, dt: Duration) {
        self.parallax.apply(self.pointer, dt.as_secs_f32());
    }

    /// Both cameras.
    #[must_use]
    pub fn cameras(&self) -> &CameraPair {
        &self.cameras
    }

    /// The camera animator.
    #[must_use]
    pub fn animator(&self) -> &CameraAnimator {
        &self.animator
    }

    /// Parallax state.
    #[must_use]
    pub fn parallax(&self) -> &Parallax {
        &self.parallax
    }

    /// The model mixer, once a scene is attached.
    #[must_use]
    pub fn mixer(&self) -> Option<&Mixer> {
        self.mixer.as_ref()
    }

    /// Frames drawn into `viewport`.
    #[must_use]
    pub fn frames_rendered(&self, viewport: ActiveViewport) -> u64 {
        match viewport {
            ActiveViewport::Primary => self.frames[0],
            ActiveViewport::Detail => self.frames[1],
        }
    }
}
