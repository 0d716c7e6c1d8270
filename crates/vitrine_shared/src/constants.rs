//! # Experience Constants
//!
//! The fixed delays, scene placements and asset locations of the landing
//! experience. Runtime configuration defaults to these values.

use std::time::Duration;

use crate::math::Vec3;

// =============================================================================
// TRANSITION TIMING
// =============================================================================

/// Glitch effect played before the fade when "start experience" is chosen.
pub const GLITCH_DURATION: Duration = Duration::from_millis(3000);

/// Fade-out of the loading surface.
pub const FADE_OUT_DURATION: Duration = Duration::from_millis(800);

/// Delay between un-hiding the main content and starting its slide-in.
pub const REVEAL_DELAY: Duration = Duration::from_millis(100);

/// Fade/slide-in of the main content.
pub const REVEAL_DURATION: Duration = Duration::from_millis(800);

// =============================================================================
// CAMERA ANIMATION
// =============================================================================

/// One-shot intro fly-in of the primary camera.
pub const INTRO_DURATION: Duration = Duration::from_millis(3500);

/// Focus fly-to of the detail camera when a character is selected.
pub const FOCUS_DURATION: Duration = Duration::from_millis(1800);

/// Intro start: far above the scene.
pub const INTRO_START: Vec3 = Vec3::new(0.0, 5000.0, 2.7);

/// Intro resting position.
pub const INTRO_REST: Vec3 = Vec3::new(0.0, 2.4, 8.8);

/// Idle spin period for models shipped without animation clips.
pub const IDLE_SPIN_PERIOD: Duration = Duration::from_millis(5000);

// =============================================================================
// SCENE LAYOUT
// =============================================================================

/// Vertical field of view shared by both cameras (degrees).
pub const CAMERA_FOV_DEGREES: f32 = 35.0;

/// Near clip plane.
pub const CAMERA_NEAR: f32 = 1.0;

/// Far clip plane.
pub const CAMERA_FAR: f32 = 100.0;

/// Primary camera initial position (inside the parallax rig).
pub const PRIMARY_CAMERA_POSITION: Vec3 = Vec3::new(19.0, 1.54, -0.1);

/// Detail camera initial position.
pub const DETAIL_CAMERA_POSITION: Vec3 = Vec3::new(1.9, 2.7, 2.7);

/// Detail camera initial rotation.
pub const DETAIL_CAMERA_ROTATION: Vec3 = Vec3::new(0.0, 1.1, 0.0);

/// Sun (directional) light position.
pub const SUN_LIGHT_POSITION: Vec3 = Vec3::new(-200.0, 0.0, -200.0);

/// Fill (point) light resting position.
pub const FILL_LIGHT_POSITION: Vec3 = Vec3::new(0.0, 3.0, 0.0);

/// Device pixel ratio ceiling for both renderers.
pub const MAX_PIXEL_RATIO: f32 = 1.0;

/// Visibility ratio of the detail section above which the detail viewport renders.
pub const VISIBILITY_CUTOFF: f32 = 0.05;

// =============================================================================
// ASSETS
// =============================================================================

/// Primary scene payload location.
pub const PRIMARY_MODEL_URL: &str =
    "https://github.com/NONAME-OP/glb/releases/download/untagged-c4b11e042fa9012007ab/graces-draco2.glb";

/// Mirror of the primary payload.
pub const FALLBACK_MODEL_URL: &str =
    "https://github.com/NONAME-OP/glb/releases/download/untagged-c4b11e042fa9012007ab/graces-draco2.glb";

/// Where the Draco decoder module lives.
pub const DRACO_DECODER_PATH: &str = "/draco/";

/// Shown when both sources failed.
pub const LOAD_ERROR_MESSAGE: &str = "Error loading 3D model. Please refresh the page.";

/// Progress indicator color once the load has failed.
pub const ERROR_PROGRESS_COLOR: &str = "#ff4444";
