//! # VITRINE Scene
//!
//! The 3D side of the experience, without a GPU:
//! - Two camera/viewport pairs sharing one scene graph
//! - Quadratic in/out camera tweens, one per (camera, property)
//! - Clip mixer (or idle spin) for the loaded model
//! - Damped pointer parallax
//! - The frame driver that sequences all of the above
//!
//! ## Frame Order
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │ tick(dt): tweens → mixer → render(active) → parallax   │
//! └────────────────────────────────────────────────────────┘
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod animation;
pub mod camera;
pub mod clock;
pub mod mixer;
pub mod parallax;
pub mod render_loop;
pub mod session;

pub use animation::{
    CameraAnimator, CameraProperty, CameraTarget, PartialVec3, Settled, TweenHandle,
    TweenHandles, TweenPurpose,
};
pub use camera::{Camera, CameraId, CameraPair, CameraUniform};
pub use clock::{Clock, ManualClock, SystemClock};
pub use mixer::{ClipState, Mixer};
pub use parallax::Parallax;
pub use render_loop::{FrameReport, RenderLoop, RenderLoopStats, StopHandle};
pub use session::{
    ActiveViewport, NullRenderer, RenderFrame, Renderer, SceneSession, ViewportDims,
    VisibilityGate,
};
