//! Fetch transport seam.
//!
//! The loader issues requests through [`Fetcher::fetch`] and collects
//! everything the transport has produced through [`Fetcher::poll`]. Nothing
//! here blocks the frame: a transport makes progress between polls.

use std::collections::VecDeque;
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;

/// Identifies one fetch attempt. Updates carrying an old ticket are stale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FetchTicket(pub u64);

/// What a transport reports for one attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchUpdateKind {
    /// Bytes received so far and the announced size (`0` if unknown).
    Progress {
        /// Bytes received so far.
        loaded: u64,
        /// Announced size.
        total: u64,
    },
    /// The whole payload.
    Complete(Vec<u8>),
    /// The attempt failed.
    Failed(String),
}

/// One transport report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchUpdate {
    /// Attempt the report belongs to.
    pub ticket: FetchTicket,
    /// The report.
    pub kind: FetchUpdateKind,
}

/// Transport used by the loader.
pub trait Fetcher {
    /// Starts fetching `url`; all reports for it carry `ticket`.
    fn fetch(&mut self, ticket: FetchTicket, url: &str);

    /// Drains the reports produced since the last poll.
    fn poll(&mut self) -> Vec<FetchUpdate>;
}

// =============================================================================
// FILE TRANSPORT
// =============================================================================

/// An in-flight file read.
struct PendingRead {
    ticket: FetchTicket,
    file: File,
    total: u64,
    data: Vec<u8>,
}

/// Serves `file://` URLs and plain paths from disk, one chunk per poll.
///
/// Remote schemes are reported as failures; hosts that need HTTP plug in
/// their own [`Fetcher`].
pub struct FileFetcher {
    chunk_size: usize,
    pending: VecDeque<PendingRead>,
    ready: Vec<FetchUpdate>,
}

impl FileFetcher {
    /// Default read size per poll.
    pub const DEFAULT_CHUNK_SIZE: usize = 256 * 1024;

    /// Creates a file transport reading `chunk_size` bytes per poll.
    #[must_use]
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            pending: VecDeque::new(),
            ready: Vec::new(),
        }
    }

    /// Maps a URL to a local path, or `None` for remote schemes.
    fn local_path(url: &str) -> Option<PathBuf> {
        if let Some(path) = url.strip_prefix("file://") {
            return Some(PathBuf::from(path));
        }
        if url.contains("://") {
            return None;
        }
        Some(PathBuf::from(url))
    }

    /// Reads the next chunk of `read`. Returns the update and whether the read is done.
    fn step(&self, read: &mut PendingRead) -> (FetchUpdate, bool) {
        let mut chunk = vec![0_u8; self.chunk_size];
        match read.file.read(&mut chunk) {
            Ok(0) => {
                let data = std::mem::take(&mut read.data);
                let update = FetchUpdate {
                    ticket: read.ticket,
                    kind: FetchUpdateKind::Complete(data),
                };
                (update, true)
            }
            Ok(n) => {
                read.data.extend_from_slice(&chunk[..n]);
                let update = FetchUpdate {
                    ticket: read.ticket,
                    kind: FetchUpdateKind::Progress {
                        loaded: read.data.len() as u64,
                        total: read.total,
                    },
                };
                (update, false)
            }
            Err(e) => {
                let update = FetchUpdate {
                    ticket: read.ticket,
                    kind: FetchUpdateKind::Failed(e.to_string()),
                };
                (update, true)
            }
        }
    }
}

impl Default for FileFetcher {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CHUNK_SIZE)
    }
}

impl Fetcher for FileFetcher {
    fn fetch(&mut self, ticket: FetchTicket, url: &str) {
        let Some(path) = Self::local_path(url) else {
            self.ready.push(FetchUpdate {
                ticket,
                kind: FetchUpdateKind::Failed(format!("unsupported scheme in {url}")),
            });
            return;
        };

        let opened = File::open(&path).and_then(|file| {
            let total = file.metadata()?.len();
            Ok((file, total))
        });
        match opened {
            Ok((file, total)) => {
                let capacity = usize::try_from(total).unwrap_or(0);
                self.pending.push_back(PendingRead {
                    ticket,
                    file,
                    total,
                    data: Vec::with_capacity(capacity),
                });
            }
            Err(e) => self.ready.push(FetchUpdate {
                ticket,
                kind: FetchUpdateKind::Failed(format!("{}: {e}", path.display())),
            }),
        }
    }

    fn poll(&mut self) -> Vec<FetchUpdate> {
        let mut updates = std::mem::take(&mut self.ready);
        let mut still_pending = VecDeque::with_capacity(self.pending.len());
        while let Some(mut read) = self.pending.pop_front() {
            let (update, done) = self.step(&mut read);
            updates.push(update);
            if !done {
                still_pending.push_back(read);
            }
        }
        self.pending = still_pending;
        updates
    }
}

// =============================================================================
// SCRIPTED TRANSPORT
// =============================================================================

#[derive(Default)]
struct Script {
    requests: Vec<(FetchTicket, String)>,
    queued: Vec<FetchUpdate>,
}

/// A transport whose reports are pushed by the host through a [`ScriptHandle`].
///
/// Used to drive the loader from tests and from hosts whose network stack
/// lives outside Rust (the page calls back into the handle).
#[derive(Default)]
pub struct ScriptedFetcher {
    script: Arc<Mutex<Script>>,
}

impl ScriptedFetcher {
    /// Creates a transport and the handle that drives it.
    #[must_use]
    pub fn new() -> (Self, ScriptHandle) {
        let script = Arc::new(Mutex::new(Script::default()));
        let handle = ScriptHandle {
            script: Arc::clone(&script),
        };
        (Self { script }, handle)
    }
}

impl Fetcher for ScriptedFetcher {
    fn fetch(&mut self, ticket: FetchTicket, url: &str) {
        self.script.lock().requests.push((ticket, url.to_owned()));
    }

    fn poll(&mut self) -> Vec<FetchUpdate> {
        std::mem::take(&mut self.script.lock().queued)
    }
}

/// Host side of a [`ScriptedFetcher`]; reports target the latest request.
#[derive(Clone)]
pub struct ScriptHandle {
    script: Arc<Mutex<Script>>,
}

impl ScriptHandle {
    /// URLs requested so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.script
            .lock()
            .requests
            .iter()
            .map(|(_, url)| url.clone())
            .collect()
    }

    /// Number of requests issued so far.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.script.lock().requests.len()
    }

    fn push(&self, kind: FetchUpdateKind) {
        let mut script = self.script.lock();
        if let Some(&(ticket, _)) = script.requests.last() {
            script.queued.push(FetchUpdate { ticket, kind });
        }
    }

    /// Reports progress on the latest request.
    pub fn progress(&self, loaded: u64, total: u64) {
        self.push(FetchUpdateKind::Progress { loaded, total });
    }

    /// Completes the latest request with `payload`.
    pub fn complete(&self, payload: Vec<u8>) {
        self.push(FetchUpdateKind::Complete(payload));
    }

    /// Fails the latest request.
    pub fn fail(&self, reason: impl Into<String>) {
        self.push(FetchUpdateKind::Failed(reason.into()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_payload(len: usize) -> PathBuf {
        let id = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let path = std::env::temp_dir().join(format!("vitrine_fetch_{id}.bin"));
        std::fs::write(&path, vec![7_u8; len]).unwrap();
        path
    }

    #[test]
    fn test_file_fetcher_reports_chunks_then_completes() {
        let path = temp_payload(10);
        let mut fetcher = FileFetcher::new(4);
        fetcher.fetch(FetchTicket(1), &format!("file://{}", path.display()));

        let mut loaded = Vec::new();
        let mut payload = None;
        for _ in 0..10 {
            for update in fetcher.poll() {
                match update.kind {
                    FetchUpdateKind::Progress { loaded: l, total } => {
                        assert_eq!(total, 10);
                        loaded.push(l);
                    }
                    FetchUpdateKind::Complete(bytes) => payload = Some(bytes),
                    FetchUpdateKind::Failed(reason) => panic!("unexpected failure: {reason}"),
                }
            }
        }

        assert_eq!(loaded, vec![4, 8, 10]);
        assert_eq!(payload.map(|p| p.len()), Some(10));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_file_fetcher_rejects_remote_scheme() {
        let mut fetcher = FileFetcher::default();
        fetcher.fetch(FetchTicket(3), "https://example.com/model.glb");

        let updates = fetcher.poll();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].ticket, FetchTicket(3));
        assert!(matches!(updates[0].kind, FetchUpdateKind::Failed(_)));
    }

    #[test]
    fn test_file_fetcher_missing_file_fails() {
        let mut fetcher = FileFetcher::default();
        fetcher.fetch(FetchTicket(1), "/definitely/not/here.glb");
        assert!(matches!(
            fetcher.poll()[0].kind,
            FetchUpdateKind::Failed(_)
        ));
    }

    #[test]
    fn test_scripted_fetcher_targets_latest_request() {
        let (mut fetcher, handle) = ScriptedFetcher::new();
        fetcher.fetch(FetchTicket(1), "primary");
        fetcher.fetch(FetchTicket(2), "fallback");
        handle.progress(5, 10);

        let updates = fetcher.poll();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].ticket, FetchTicket(2));
        assert_eq!(handle.requests(), vec!["primary", "fallback"]);
        assert!(fetcher.poll().is_empty());
    }
}
