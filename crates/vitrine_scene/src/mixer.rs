//! Animation mixer for the loaded model.
//!
//! A model that ships clips plays all of them, looping. A model without
//! clips spins about Y instead, one turn per [`IDLE_SPIN_PERIOD`].

use std::f32::consts::TAU;
use std::time::Duration;

use vitrine_loader::SceneGraph;
use vitrine_shared::constants::IDLE_SPIN_PERIOD;

/// Playback position of one looping clip.
#[derive(Clone, Debug, PartialEq)]
pub struct ClipState {
    /// Clip name.
    pub name: String,
    /// Clip length in seconds.
    pub duration_secs: f32,
    /// Current time within the clip.
    pub time_secs: f32,
}

/// Drives the model's animation each tick.
#[derive(Clone, Debug, PartialEq)]
pub enum Mixer {
    /// Every embedded clip, playing concurrently.
    Clips(Vec<ClipState>),
    /// Linear spin about Y for clip-less models.
    Spin {
        /// Time into the current turn.
        elapsed_secs: f32,
        /// Length of one full turn.
        period_secs: f32,
    },
}

impl Mixer {
    /// Picks clip playback or the idle spin for `scene`.
    #[must_use]
    pub fn for_scene(scene: &SceneGraph) -> Self {
        if scene.has_clips() {
            Self::Clips(
                scene
                    .clips
                    .iter()
                    .map(|clip| ClipState {
                        name: clip.name.clone(),
                        duration_secs: clip.duration_secs,
                        time_secs: 0.0,
                    })
                    .collect(),
            )
        } else {
            Self::spin(IDLE_SPIN_PERIOD)
        }
    }

    /// An idle spin with the given period.
    #[must_use]
    pub fn spin(period: Duration) -> Self {
        Self::Spin {
            elapsed_secs: 0.0,
            period_secs: period.as_secs_f32(),
        }
    }

    /// Advances playback by `dt`, wrapping at clip and turn boundaries.
    pub fn advance(&mut self, dt: Duration) {
        let dt = dt.as_secs_f32();
        if dt <= 0.0 {
            return;
        }
        match self {
            Self::Clips(clips) => {
                for clip in clips {
                    clip.time_secs = wrap(clip.time_secs + dt, clip.duration_secs);
                }
            }
            Self::Spin { elapsed_secs, period_secs } => {
                *elapsed_secs = wrap(*elapsed_secs + dt, *period_secs);
            }
        }
    }

    /// Model rotation about Y in radians, in `[0, 2π)`. Zero while clips play.
    #[must_use]
    pub fn spin_angle(&self) -> f32 {
        match self {
            Self::Clips(_) => 0.0,
            Self::Spin { elapsed_secs, period_secs } if *period_secs > 0.0 => {
                TAU * (*elapsed_secs / *period_secs)
            }
            Self::Spin { .. } => 0.0,
        }
    }

    /// Clip playback states (empty while spinning).
    #[must_use]
    pub fn clips(&self) -> &[ClipState] {
        match self {
            Self::Clips(clips) => clips,
            Self::Spin { .. } => &[],
        }
    }
}

fn wrap(time: f32, length: f32) -> f32 {
    if length > 0.0 {
        time.rem_euclid(length)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_loader::AnimationClip;

    #[test]
    fn test_clipless_scene_spins() {
        let mut mixer = Mixer::for_scene(&SceneGraph::default());
        mixer.advance(Duration::from_millis(1250));
        assert!((mixer.spin_angle() - TAU / 4.0).abs() < 1e-4);

        // One full turn later the angle repeats.
        mixer.advance(Duration::from_millis(5000));
        assert!((mixer.spin_angle() - TAU / 4.0).abs() < 1e-3);
    }

    #[test]
    fn test_clips_loop() {
        let scene = SceneGraph {
            clips: vec![AnimationClip { name: "idle".into(), duration_secs: 2.0 }],
            ..SceneGraph::default()
        };
        let mut mixer = Mixer::for_scene(&scene);
        mixer.advance(Duration::from_millis(2500));

        assert_eq!(mixer.spin_angle(), 0.0);
        assert!((mixer.clips()[0].time_secs - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_zero_delta_is_a_no_op() {
        let mut mixer = Mixer::spin(IDLE_SPIN_PERIOD);
        mixer.advance(Duration::from_millis(700));
        let before = mixer.clone();
        mixer.advance(Duration::ZERO);
        assert_eq!(mixer, before);
    }
}
