//! Interaction audio.
//!
//! RULE: at most one interaction clip is live. Starting a clip stops and
//! rewinds the previous one first, synchronously.

use std::collections::BTreeSet;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::MediaError;

/// Identifies a clip started by an [`AudioBackend`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AudioHandle(pub u64);

/// A media playback backend keyed by resource identifier.
pub trait AudioBackend {
    /// Starts `resource` from the beginning.
    ///
    /// # Errors
    ///
    /// Returns an error if playback cannot start.
    fn play(&mut self, resource: &str) -> Result<AudioHandle, MediaError>;

    /// Pauses `handle` and rewinds it to the start.
    fn stop(&mut self, handle: AudioHandle);

    /// Hard-mutes everything the backend knows about.
    fn mute_all(&mut self);
}

/// The single "currently playing" slot.
pub struct AudioSlot<B: AudioBackend> {
    backend: B,
    current: Option<(AudioHandle, String)>,
}

impl<B: AudioBackend> AudioSlot<B> {
    /// Creates an empty slot.
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            current: None,
        }
    }

    /// Stops whatever is playing, then starts `resource`.
    ///
    /// # Errors
    ///
    /// Returns the backend's error; the slot is left empty.
    pub fn play(&mut self, resource: &str) -> Result<AudioHandle, MediaError> {
        self.stop();
        match self.backend.play(resource) {
            Ok(handle) => {
                tracing::debug!("Playing {resource} as {handle:?}");
                self.current = Some((handle, resource.to_owned()));
                Ok(handle)
            }
            Err(error) => {
                tracing::warn!("{error}");
                Err(error)
            }
        }
    }

    /// Stops the current clip, if any.
    pub fn stop(&mut self) {
        if let Some((handle, _)) = self.current.take() {
            self.backend.stop(handle);
        }
    }

    /// Stops the current clip and mutes all media.
    pub fn silence(&mut self) {
        self.stop();
        self.backend.mute_all();
    }

    /// Resource currently playing.
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.current.as_ref().map(|(_, resource)| resource.as_str())
    }

    /// The backend.
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }
}

/// Call log of a [`RecordingAudio`].
#[derive(Debug, Default)]
pub struct AudioLog {
    /// Resources in play order.
    pub played: Vec<String>,
    /// Handles currently playing.
    pub live: BTreeSet<AudioHandle>,
    /// Number of `mute_all` calls.
    pub mutes: u32,
    /// Resources that fail to play.
    pub broken: BTreeSet<String>,
    next: u64,
}

/// A backend that plays nothing and records everything.
///
/// Clones share one log, so a host can keep a handle after moving the
/// backend into a session.
#[derive(Clone, Debug, Default)]
pub struct RecordingAudio {
    log: Arc<Mutex<AudioLog>>,
}

impl RecordingAudio {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every future `play(resource)` fail.
    pub fn break_resource(&self, resource: impl Into<String>) {
        self.log.lock().broken.insert(resource.into());
    }

    /// Number of clips currently playing.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.log.lock().live.len()
    }

    /// Resources played so far.
    #[must_use]
    pub fn played(&self) -> Vec<String> {
        self.log.lock().played.clone()
    }

    /// Number of hard mutes.
    #[must_use]
    pub fn mutes(&self) -> u32 {
        self.log.lock().mutes
    }
}

impl AudioBackend for RecordingAudio {
    fn play(&mut self, resource: &str) -> Result<AudioHandle, MediaError> {
        let mut log = self.log.lock();
        if log.broken.contains(resource) {
            return Err(MediaError::Playback {
                resource: resource.to_owned(),
                reason: "unsupported source".to_owned(),
            });
        }
        log.next += 1;
        let handle = AudioHandle(log.next);
        log.played.push(resource.to_owned());
        log.live.insert(handle);
        tracing::debug!("Audio {handle:?} playing {resource}");
        Ok(handle)
    }

    fn stop(&mut self, handle: AudioHandle) {
        self.log.lock().live.remove(&handle);
    }

    fn mute_all(&mut self) {
        let mut log = self.log.lock();
        log.live.clear();
        log.mutes += 1;
    }
}
