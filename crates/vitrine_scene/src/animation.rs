//! Camera tweens.
//!
//! RULE: at most one live tween per (camera, property). Starting a new one
//! replaces the old one on the spot; tweens never queue and never stack.
//!
//! Completion is reported as [`Settled`] notices from [`CameraAnimator::advance`]
//! so callers can sequence follow-up work (the intro reveal) on them.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use vitrine_shared::Vec3;

use crate::camera::{CameraId, CameraPair};

/// Quadratic ease-in-out over `t` in `[0, 1]`: slow start, fast middle, slow end.
#[must_use]
pub fn quadratic_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        let u = -2.0 * t + 2.0;
        1.0 - u * u / 2.0
    }
}

/// Which camera property a tween drives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CameraProperty {
    /// Camera position.
    Position,
    /// Camera Euler rotation.
    Rotation,
}

/// A vector target where omitted axes keep their current value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialVec3 {
    /// X target, if any.
    pub x: Option<f32>,
    /// Y target, if any.
    pub y: Option<f32>,
    /// Z target, if any.
    pub z: Option<f32>,
}

impl PartialVec3 {
    /// Fills omitted axes from `current`.
    #[must_use]
    pub fn resolve(self, current: Vec3) -> Vec3 {
        Vec3::new(
            self.x.unwrap_or(current.x),
            self.y.unwrap_or(current.y),
            self.z.unwrap_or(current.z),
        )
    }
}

impl From<Vec3> for PartialVec3 {
    fn from(v: Vec3) -> Self {
        Self {
            x: Some(v.x),
            y: Some(v.y),
            z: Some(v.z),
        }
    }
}

/// Where to move a camera.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraTarget {
    /// Position target.
    pub position: Option<PartialVec3>,
    /// Rotation target.
    pub rotation: Option<PartialVec3>,
}

/// Why a tween was started; echoed back when it settles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TweenPurpose {
    /// The one-shot intro fly-in.
    Intro,
    /// A showcase focus fly-to.
    Focus,
    /// Anything else.
    Manual,
}

/// Identifies one started tween.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TweenHandle(pub u64);

/// Handles of the tweens started by one [`CameraAnimator::animate`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TweenHandles {
    /// Position tween, if a position target was given.
    pub position: Option<TweenHandle>,
    /// Rotation tween, if a rotation target was given.
    pub rotation: Option<TweenHandle>,
}

/// A tween that reached its target during [`CameraAnimator::advance`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settled {
    /// The finished tween.
    pub handle: TweenHandle,
    /// Camera it drove.
    pub camera: CameraId,
    /// Property it drove.
    pub property: CameraProperty,
    /// Why it was started.
    pub purpose: TweenPurpose,
}

/// A single interpolation from `start` to `target`.
#[derive(Debug, Clone)]
struct Tween {
    start: Vec3,
    target: Vec3,
    /// Seconds elapsed.
    elapsed: f32,
    /// Seconds total.
    duration: f32,
}

impl Tween {
    /// Advances by `dt` seconds. Returns the value and whether it is finished.
    fn advance(&mut self, dt: f32) -> (Vec3, bool) {
        if self.duration <= 0.0 {
            return (self.target, true);
        }
        self.elapsed = (self.elapsed + dt.max(0.0)).min(self.duration);
        let progress = self.elapsed / self.duration;
        if progress >= 1.0 {
            return (self.target, true);
        }
        (self.start.lerp(self.target, quadratic_in_out(progress)), false)
    }
}

#[derive(Debug, Clone)]
struct ActiveTween {
    handle: TweenHandle,
    purpose: TweenPurpose,
    tween: Tween,
}

/// Owns every live camera tween.
#[derive(Debug, Default)]
pub struct CameraAnimator {
    active: BTreeMap<(CameraId, CameraProperty), ActiveTween>,
    next_handle: u64,
    started: u64,
    replaced: u64,
}

impl CameraAnimator {
    /// Creates an idle animator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts tweening `camera` towards `target` over `duration`.
    ///
    /// Start values are the camera's current values, so replacing a tween
    /// mid-flight continues from wherever the camera is.
    pub fn animate(
        &mut self,
        cameras: &CameraPair,
        camera: CameraId,
        target: &CameraTarget,
        duration: Duration,
        purpose: TweenPurpose,
    ) -> TweenHandles {
        let current = cameras.get(camera);
        let position = target.position.map(|goal| {
            self.start(camera, CameraProperty::Position, current.position, goal.resolve(current.position), duration, purpose)
        });
        let rotation = target.rotation.map(|goal| {
            self.start(camera, CameraProperty::Rotation, current.rotation, goal.resolve(current.rotation), duration, purpose)
        });
        TweenHandles { position, rotation }
    }

    fn start(
        &mut self,
        camera: CameraId,
        property: CameraProperty,
        from: Vec3,
        to: Vec3,
        duration: Duration,
        purpose: TweenPurpose,
    ) -> TweenHandle {
        self.next_handle += 1;
        let handle = TweenHandle(self.next_handle);
        let tween = Tween {
            start: from,
            target: to,
            elapsed: 0.0,
            duration: duration.as_secs_f32(),
        };
        self.started += 1;
        if let Some(previous) = self.active.insert((camera, property), ActiveTween { handle, purpose, tween }) {
            self.replaced += 1;
            tracing::debug!("{camera:?} {property:?} tween {:?} replaced by {handle:?}", previous.handle);
        }
        handle
    }

    /// Advances every tween by `dt`, writing values into `cameras`.
    ///
    /// Finished tweens are removed and reported.
    pub fn advance(&mut self, cameras: &mut CameraPair, dt: Duration) -> Vec<Settled> {
        let dt = dt.as_secs_f32();
        let mut settled = Vec::new();

        self.active.retain(|&(camera, property), active| {
            let (value, done) = active.tween.advance(dt);
            let target = cameras.get_mut(camera);
            match property {
                CameraProperty::Position => target.position = value,
                CameraProperty::Rotation => target.rotation = value,
            }
            if done {
                settled.push(Settled {
                    handle: active.handle,
                    camera,
                    property,
                    purpose: active.purpose,
                });
            }
            !done
        });

        settled
    }

    /// Drops the tween on (`camera`, `property`), leaving the camera where it is.
    pub fn cancel(&mut self, camera: CameraId, property: CameraProperty) -> bool {
        self.active.remove(&(camera, property)).is_some()
    }

    /// The live tween on (`camera`, `property`).
    #[must_use]
    pub fn active_for(&self, camera: CameraId, property: CameraProperty) -> Option<TweenHandle> {
        self.active.get(&(camera, property)).map(|a| a.handle)
    }

    /// Number of live tweens.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// True if nothing is animating.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.active.is_empty()
    }

    /// Tweens started over the animator's lifetime.
    #[must_use]
    pub fn started_total(&self) -> u64 {
        self.started
    }

    /// Tweens that were replaced before finishing.
    #[must_use]
    pub fn replaced_total(&self) -> u64 {
        self.replaced
    }
}
