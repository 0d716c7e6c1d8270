//! Pointer parallax.
//!
//! Each value eases toward a pointer-derived target:
//!
//! ```text
//! value += (target - value) * min(gain * dt, 1)
//! ```
//!
//! | value       | target      | gain |
//! |-------------|-------------|------|
//! | fill.x      | 8 * px      | 2    |
//! | fill.y      | 2 - 9 * py  | 1    |
//! | rig.x       | px / 3      | 2    |
//! | rig.z       | -py / 3     | 2    |

use vitrine_shared::constants::FILL_LIGHT_POSITION;
use vitrine_shared::{Vec2, Vec3};

/// Damped parallax state for the fill light and the primary camera rig.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Parallax {
    /// Fill light position.
    pub fill_light: Vec3,
    /// Camera rig offset.
    pub rig: Vec3,
}

impl Default for Parallax {
    fn default() -> Self {
        Self {
            fill_light: FILL_LIGHT_POSITION,
            rig: Vec3::ZERO,
        }
    }
}

impl Parallax {
    /// Creates a parallax at rest.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Eases toward the targets for `pointer` over `dt` seconds.
    pub fn apply(&mut self, pointer: Vec2, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        self.fill_light.x = damp(self.fill_light.x, pointer.x * 8.0, 2.0, dt);
        self.fill_light.y = damp(self.fill_light.y, 2.0 - pointer.y * 9.0, 1.0, dt);
        self.rig.x = damp(self.rig.x, pointer.x / 3.0, 2.0, dt);
        self.rig.z = damp(self.rig.z, -pointer.y / 3.0, 2.0, dt);
    }
}

/// One damping step. The blend factor is clamped so long frames never overshoot.
#[must_use]
pub fn damp(value: f32, target: f32, gain: f32, dt: f32) -> f32 {
    value + (target - value) * (gain * dt).clamp(0.0, 1.0)
}
