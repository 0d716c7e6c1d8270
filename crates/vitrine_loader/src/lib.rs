//! # VITRINE Loader
//!
//! Fetches the compressed scene payload from a primary location, falls back
//! to a mirror exactly once, and decodes the result into a [`SceneGraph`].
//!
//! ## Pipeline
//!
//! ```text
//! load(request) ─> Fetcher::fetch(primary)
//!                       │
//!        poll() ◄───────┘  Progress* ─> Complete(bytes) ─> decode ─> Success
//!                       │
//!                       └─ Failed ─> fetch(fallback) ─> ... ─> Failure (terminal)
//! ```
//!
//! The loader is sans-IO: a [`Fetcher`] does the transport, the host drains
//! it through [`AssetLoader::poll`] once per frame.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod decoder;
pub mod error;
pub mod fetch;
pub mod loader;
pub mod request;

pub use decoder::{AnimationClip, DecoderFlavor, DecoderModule, SceneDecoder, SceneGraph, SceneNode};
pub use error::{DecodeError, DecoderModuleError, LoadError, LoadResult};
pub use fetch::{FetchTicket, FetchUpdate, FetchUpdateKind, Fetcher, FileFetcher, ScriptHandle, ScriptedFetcher};
pub use loader::{AssetLoader, LoadEvent, LoaderConfig};
pub use request::{LoadProgress, LoadRequest};
