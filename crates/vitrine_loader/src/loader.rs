//! The loader state machine.
//!
//! ```text
//! Idle ──load()──> Fetching(primary) ──fail──> Fetching(fallback) ──fail──> Failure
//!                        │                            │
//!                        └──── complete + decode ─────┴──> Success
//! ```
//!
//! The retry budget is exactly one. A request that starts with its fallback
//! already spent gets no retry at all.
//!
//! 100 % means "decoded": a transport sample at full size is held back, and
//! the final 100 % is reported only once the payload decodes, immediately
//! before [`LoadEvent::Success`]. The reported percentage never moves
//! backwards within a request, even when the fallback announces a different
//! size.

use std::time::Duration;

use crate::decoder::SceneDecoder;
use crate::error::LoadError;
use crate::fetch::{FetchTicket, FetchUpdate, FetchUpdateKind, Fetcher};
use crate::request::{LoadProgress, LoadRequest};
use crate::SceneGraph;

/// Loader configuration.
#[derive(Clone, Debug)]
pub struct LoaderConfig {
    /// An attempt with no transport report for this long fails as a network failure.
    pub request_timeout: Duration,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Events emitted by the loader.
#[derive(Clone, Debug, PartialEq)]
pub enum LoadEvent {
    /// Transfer progress. `bytes_loaded` never decreases within an attempt
    /// and the percentage never decreases within a request. A complete
    /// sample is only reported for a decoded payload.
    Progress(LoadProgress),
    /// The payload decoded. Terminal.
    Success(SceneGraph),
    /// Both sources failed, or the only allowed source did. Terminal.
    Failure(LoadError),
}

/// The attempt currently in flight.
#[derive(Debug)]
struct Attempt {
    ticket: FetchTicket,
    url: String,
    last_activity: Duration,
    progress: LoadProgress,
}

/// Fetches and decodes one scene payload with a single fallback retry.
pub struct AssetLoader<F: Fetcher> {
    fetcher: F,
    decoder: SceneDecoder,
    config: LoaderConfig,
    request: Option<LoadRequest>,
    attempt: Option<Attempt>,
    /// Last progress reported for the current request.
    reported: Option<LoadProgress>,
    next_ticket: u64,
    attempts_issued: u32,
}

impl<F: Fetcher> AssetLoader<F> {
    /// Creates an idle loader.
    #[must_use]
    pub fn new(fetcher: F, decoder: SceneDecoder, config: LoaderConfig) -> Self {
        Self {
            fetcher,
            decoder,
            config,
            request: None,
            attempt: None,
            reported: None,
            next_ticket: 0,
            attempts_issued: 0,
        }
    }

    /// Starts loading `request`. Any request still in flight is abandoned.
    pub fn load(&mut self, request: LoadRequest, now: Duration) {
        if let Some(previous) = self.request.take() {
            tracing::warn!("Abandoning in-flight load of {}", previous.current_url());
        }
        self.reported = None;
        let url = request.current_url().to_owned();
        self.request = Some(request);
        self.issue(url, now);
    }

    /// True while a request is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.request.is_some()
    }

    /// The request in flight, if any.
    #[must_use]
    pub fn request(&self) -> Option<&LoadRequest> {
        self.request.as_ref()
    }

    /// Fetch attempts issued over the loader's lifetime.
    #[must_use]
    pub fn attempts_issued(&self) -> u32 {
        self.attempts_issued
    }

    /// The transport.
    #[must_use]
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Mutable access to the transport.
    pub fn fetcher_mut(&mut self) -> &mut F {
        &mut self.fetcher
    }

    /// Drains the transport and advances the state machine.
    ///
    /// Call once per frame. Returns the events produced, in order.
    pub fn poll(&mut self, now: Duration) -> Vec<LoadEvent> {
        let mut events = Vec::new();

        for update in self.fetcher.poll() {
            self.handle_update(update, now, &mut events);
        }

        let timed_out = self.attempt.as_ref().filter(|attempt| {
            now.saturating_sub(attempt.last_activity) > self.config.request_timeout
        });
        if let Some(attempt) = timed_out {
            let error = LoadError::Network {
                url: attempt.url.clone(),
                reason: format!("timed out after {:?}", self.config.request_timeout),
            };
            self.fail(error, now, &mut events);
        }

        events
    }

    fn issue(&mut self, url: String, now: Duration) {
        self.next_ticket += 1;
        let ticket = FetchTicket(self.next_ticket);
        self.attempts_issued += 1;
        tracing::info!("Fetching scene payload from {url} (attempt {})", self.attempts_issued);
        self.fetcher.fetch(ticket, &url);
        self.attempt = Some(Attempt {
            ticket,
            url,
            last_activity: now,
            progress: LoadProgress::default(),
        });
    }

    fn handle_update(&mut self, update: FetchUpdate, now: Duration, events: &mut Vec<LoadEvent>) {
        let Some(attempt) = self.attempt.as_mut().filter(|a| a.ticket == update.ticket) else {
            tracing::debug!("Dropping stale transport report for {:?}", update.ticket);
            return;
        };
        attempt.last_activity = now;

        match update.kind {
            FetchUpdateKind::Progress { loaded, total } => {
                let loaded = loaded.max(attempt.progress.bytes_loaded);
                attempt.progress = LoadProgress::new(loaded, total);
                let progress = attempt.progress;
                if progress.is_complete() {
                    tracing::trace!("Holding back {progress:?} until the payload decodes");
                    return;
                }
                self.report(progress, events);
            }
            FetchUpdateKind::Complete(payload) => {
                let url = attempt.url.clone();
                let size = payload.len() as u64;

                match self.decoder.decode(&payload) {
                    Ok(graph) => {
                        tracing::info!(
                            "Scene payload decoded from {url}: {} nodes, {} clips",
                            graph.nodes.len(),
                            graph.clips.len()
                        );
                        self.report(LoadProgress::new(size, size), events);
                        self.finish();
                        events.push(LoadEvent::Success(graph));
                    }
                    Err(source) => self.fail(LoadError::Decode { url, source }, now, events),
                }
            }
            FetchUpdateKind::Failed(reason) => {
                let url = attempt.url.clone();
                self.fail(LoadError::Network { url, reason }, now, events);
            }
        }
    }

    /// Emits `progress` unless it repeats the last report or would move the
    /// percentage backwards.
    fn report(&mut self, progress: LoadProgress, events: &mut Vec<LoadEvent>) {
        if let Some(last) = self.reported {
            if last == progress || progress.percent() < last.percent() {
                return;
            }
        }
        self.reported = Some(progress);
        events.push(LoadEvent::Progress(progress));
    }

    fn fail(&mut self, error: LoadError, now: Duration, events: &mut Vec<LoadEvent>) {
        self.attempt = None;
        let Some(request) = self.request.as_mut() else {
            return;
        };

        if request.switch_to_fallback() {
            tracing::warn!("{error}; retrying once against {}", request.fallback_url);
            let url = request.fallback_url.clone();
            self.issue(url, now);
        } else {
            tracing::error!("{error}; no retries left");
            self.finish();
            events.push(LoadEvent::Failure(error));
        }
    }

    fn finish(&mut self) {
        self.attempt = None;
        self.request = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::{ScriptHandle, ScriptedFetcher};

    const SCENE: &[u8] = br#"{ "asset": { "version": "2.0" }, "nodes": [ { "name": "graces" } ] }"#;

    fn loader() -> (AssetLoader<ScriptedFetcher>, ScriptHandle) {
        let (fetcher, handle) = ScriptedFetcher::new();
        let loader = AssetLoader::new(fetcher, SceneDecoder::default(), LoaderConfig::default());
        (loader, handle)
    }

    fn ms(ms: u64) -> Duration {
        Duration::from_millis(ms)
    }

    #[test]
    fn test_progress_is_monotonic_and_clamped() {
        let (mut loader, script) = loader();
        loader.load(LoadRequest::new("primary", "fallback"), ms(0));

        script.progress(10, 100);
        script.progress(5, 100); // transport regression
        script.progress(40, 100);
        script.progress(250, 100); // misreported total, held back
        let events = loader.poll(ms(16));

        let mut last = 0;
        for event in &events {
            let LoadEvent::Progress(p) = event else { panic!("unexpected {event:?}") };
            assert!(p.bytes_loaded >= last);
            assert!((0.0..100.0).contains(&p.percent()));
            last = p.bytes_loaded;
        }
        assert_eq!(last, 40);
    }

    #[test]
    fn test_success_emits_full_progress_then_graph() {
        let (mut loader, script) = loader();
        loader.load(LoadRequest::new("primary", "fallback"), ms(0));

        script.progress(20, SCENE.len() as u64);
        script.complete(SCENE.to_vec());
        let events = loader.poll(ms(16));

        assert_eq!(events.len(), 3);
        assert!(matches!(events[1], LoadEvent::Progress(p) if p.is_complete()));
        let LoadEvent::Success(graph) = &events[2] else { panic!("expected success") };
        assert_eq!(graph.nodes[0].name, "graces");
        assert!(!loader.is_loading());
    }

    #[test]
    fn test_primary_failure_retries_fallback_exactly_once() {
        let (mut loader, script) = loader();
        loader.load(LoadRequest::new("primary", "fallback"), ms(0));

        script.fail("connection reset");
        assert!(loader.poll(ms(16)).is_empty());
        assert_eq!(script.requests(), vec!["primary", "fallback"]);
        assert!(loader.request().unwrap().attempted_fallback);

        script.fail("connection reset");
        let events = loader.poll(ms(32));
        assert!(matches!(events.as_slice(), [LoadEvent::Failure(e)] if e.url() == "fallback"));

        // Terminal: nothing further is requested or reported.
        assert_eq!(script.request_count(), 2);
        script.fail("late");
        assert!(loader.poll(ms(48)).is_empty());
        assert_eq!(script.request_count(), 2);
    }

    #[test]
    fn test_decode_failure_uses_fallback() {
        let (mut loader, script) = loader();
        loader.load(LoadRequest::new("primary", "fallback"), ms(0));

        script.progress(7, 7);
        script.complete(b"garbage".to_vec());
        let events = loader.poll(ms(16));
        // A payload that does not decode never reports 100 %.
        assert!(events.is_empty());
        assert_eq!(script.request_count(), 2);

        script.complete(SCENE.to_vec());
        let events = loader.poll(ms(32));
        assert!(matches!(events.last(), Some(LoadEvent::Success(_))));
    }

    #[test]
    fn test_request_already_on_fallback_gets_no_retry() {
        let (mut loader, script) = loader();
        let mut request = LoadRequest::new("primary", "fallback");
        request.attempted_fallback = true;
        loader.load(request, ms(0));

        script.fail("404");
        let events = loader.poll(ms(16));
        assert!(matches!(events.as_slice(), [LoadEvent::Failure(LoadError::Network { .. })]));
        assert_eq!(script.requests(), vec!["fallback"]);
    }

    #[test]
    fn test_stalled_attempt_times_out() {
        let (fetcher, script) = ScriptedFetcher::new();
        let config = LoaderConfig { request_timeout: ms(1000) };
        let mut loader = AssetLoader::new(fetcher, SceneDecoder::default(), config);
        loader.load(LoadRequest::new("primary", "fallback"), ms(0));

        assert!(loader.poll(ms(900)).is_empty());
        assert!(loader.poll(ms(1100)).is_empty());
        assert_eq!(script.requests(), vec!["primary", "fallback"]);

        let events = loader.poll(ms(2200));
        assert!(matches!(events.as_slice(), [LoadEvent::Failure(e)] if e.is_network()));
    }

    #[test]
    fn test_fallback_progress_never_rewinds() {
        let (mut loader, script) = loader();
        loader.load(LoadRequest::new("primary", "fallback"), ms(0));

        script.progress(60, 100);
        script.fail("dropped");
        loader.poll(ms(16));

        script.progress(30, 100);
        script.progress(80, 100);
        let events = loader.poll(ms(32));
        assert_eq!(events, vec![LoadEvent::Progress(LoadProgress::new(80, 100))]);
    }

    #[test]
    fn test_fallback_with_larger_total_never_rewinds_percent() {
        let (mut loader, script) = loader();
        loader.load(LoadRequest::new("primary", "fallback"), ms(0));

        script.progress(60, 100);
        script.fail("dropped");
        loader.poll(ms(16));

        script.progress(80, 200);
        script.progress(150, 200);
        let events = loader.poll(ms(32));
        assert_eq!(events, vec![LoadEvent::Progress(LoadProgress::new(150, 200))]);

        script.complete(SCENE.to_vec());
        let events = loader.poll(ms(48));
        assert!(matches!(events[0], LoadEvent::Progress(p) if p.is_complete()));
        assert!(matches!(events[1], LoadEvent::Success(_)));
    }
}
