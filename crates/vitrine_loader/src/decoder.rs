//! glTF / GLB payload decoder.
//!
//! ## Container Reference
//!
//! ```text
//! GLB File Structure:
//! ├── "glTF" (4 bytes) - Magic number
//! ├── Version (4 bytes) - Container version (2)
//! ├── JSON chunk - Scene description
//! └── BIN chunk - Geometry / animation buffers (optional)
//! ```
//!
//! Geometry compressed with `KHR_draco_mesh_compression` needs the external
//! Draco module. It is located once at startup and shared by every request
//! through an `Arc`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use gltf::json;

use crate::error::{DecodeError, DecoderModuleError};

/// GLB magic number.
const GLB_MAGIC: [u8; 4] = *b"glTF";

/// The Draco geometry compression extension.
pub const DRACO_EXTENSION: &str = "KHR_draco_mesh_compression";

/// Which build of the Draco module to load.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DecoderFlavor {
    /// The JavaScript build (`draco_decoder.js`).
    #[default]
    Js,
    /// The WebAssembly build (`draco_decoder.wasm`).
    Wasm,
}

impl DecoderFlavor {
    /// File name of the module inside the decoder directory.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Js => "draco_decoder.js",
            Self::Wasm => "draco_decoder.wasm",
        }
    }
}

/// The external Draco decompression module, loaded once.
///
/// The module image is held, not executed: this crate decodes the glTF
/// structure only. A loaded module acts as the presence check that lets
/// Draco-compressed payloads through; only its size is read, and an
/// empty file does not count.
#[derive(Debug)]
pub struct DecoderModule {
    path: PathBuf,
    flavor: DecoderFlavor,
    code: Vec<u8>,
}

impl DecoderModule {
    /// Loads the module from `path`.
    ///
    /// `path` may name the module file itself or the directory holding it.
    ///
    /// # Errors
    ///
    /// Returns an error if the module is missing or unreadable.
    pub fn load(path: impl AsRef<Path>, flavor: DecoderFlavor) -> Result<Arc<Self>, DecoderModuleError> {
        let path = path.as_ref();
        let file = if path.is_dir() {
            path.join(flavor.file_name())
        } else {
            path.to_path_buf()
        };
        if !file.is_file() {
            return Err(DecoderModuleError::NotFound(file));
        }
        let code = std::fs::read(&file).map_err(|source| DecoderModuleError::Io {
            path: file.clone(),
            source,
        })?;
        tracing::info!("Decoder module loaded: {} ({} bytes)", file.display(), code.len());
        Ok(Arc::new(Self {
            path: file,
            flavor,
            code,
        }))
    }

    /// Wraps a module already held in memory (hosts that bundle it).
    #[must_use]
    pub fn from_bytes(name: impl Into<PathBuf>, flavor: DecoderFlavor, code: Vec<u8>) -> Arc<Self> {
        Arc::new(Self {
            path: name.into(),
            flavor,
            code,
        })
    }

    /// Where the module came from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Module flavor.
    #[must_use]
    pub fn flavor(&self) -> DecoderFlavor {
        self.flavor
    }

    /// Module size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.code.len()
    }

    /// True if the module file was empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }
}

/// One node of the decoded scene.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SceneNode {
    /// Authored name, or `node_<index>`.
    pub name: String,
    /// Mesh drawn by this node.
    pub mesh: Option<usize>,
}

/// An embedded animation clip.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationClip {
    /// Authored name, or `clip_<index>`.
    pub name: String,
    /// Length in seconds (latest keyframe of any sampler).
    pub duration_secs: f32,
}

/// The decoded scene graph handed to the scene session.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneGraph {
    /// Scene nodes in document order.
    pub nodes: Vec<SceneNode>,
    /// Number of meshes.
    pub mesh_count: usize,
    /// Geometry is Draco-compressed.
    pub compressed: bool,
    /// Embedded animation clips.
    pub clips: Vec<AnimationClip>,
}

impl SceneGraph {
    /// True if the scene ships its own animation.
    #[must_use]
    pub fn has_clips(&self) -> bool {
        !self.clips.is_empty()
    }
}

/// Turns fetched bytes into a [`SceneGraph`].
#[derive(Clone, Debug, Default)]
pub struct SceneDecoder {
    module: Option<Arc<DecoderModule>>,
}

impl SceneDecoder {
    /// Creates a decoder sharing `module`. `None` rejects compressed payloads.
    #[must_use]
    pub fn new(module: Option<Arc<DecoderModule>>) -> Self {
        Self { module }
    }

    /// The shared decoder module, if any.
    #[must_use]
    pub fn module(&self) -> Option<&Arc<DecoderModule>> {
        self.module.as_ref()
    }

    /// Decodes a GLB container or a bare glTF JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error for empty or malformed payloads, and for compressed
    /// payloads when no non-empty decoder module is loaded.
    pub fn decode(&self, bytes: &[u8]) -> Result<SceneGraph, DecodeError> {
        if bytes.is_empty() {
            return Err(DecodeError::EmptyPayload);
        }

        let root = if bytes.starts_with(&GLB_MAGIC) {
            let glb = gltf::Glb::from_slice(bytes).map_err(|e| DecodeError::Malformed(e.to_string()))?;
            json::Root::from_slice(&glb.json)
        } else {
            json::Root::from_slice(bytes)
        }
        .map_err(|e| DecodeError::Malformed(e.to_string()))?;

        let compressed = root
            .extensions_used
            .iter()
            .chain(root.extensions_required.iter())
            .any(|ext| ext == DRACO_EXTENSION);
        let usable_module = self.module.as_ref().is_some_and(|m| !m.is_empty());
        if compressed && !usable_module {
            return Err(DecodeError::DecoderUnavailable {
                extension: DRACO_EXTENSION.to_owned(),
            });
        }

        let nodes = root
            .nodes
            .iter()
            .enumerate()
            .map(|(i, node)| SceneNode {
                name: node.name.clone().unwrap_or_else(|| format!("node_{i}")),
                mesh: node.mesh.map(|m| m.value()),
            })
            .collect();

        let clips = root
            .animations
            .iter()
            .enumerate()
            .map(|(i, animation)| AnimationClip {
                name: animation.name.clone().unwrap_or_else(|| format!("clip_{i}")),
                duration_secs: animation
                    .samplers
                    .iter()
                    .filter_map(|sampler| root.accessors.get(sampler.input.value()))
                    .filter_map(accessor_upper_bound)
                    .fold(0.0_f32, f32::max),
            })
            .collect();

        Ok(SceneGraph {
            nodes,
            mesh_count: root.meshes.len(),
            compressed,
            clips,
        })
    }
}

/// First component of an accessor's `max` bound.
#[allow(clippy::cast_possible_truncation)]
fn accessor_upper_bound(accessor: &json::Accessor) -> Option<f32> {
    let max = accessor.max.as_ref()?;
    let first = match max.as_array() {
        Some(values) => values.first()?.as_f64()?,
        None => max.as_f64()?,
    };
    Some(first as f32)
}
