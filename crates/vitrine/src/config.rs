//! # Runtime Configuration
//!
//! Loaded once at startup from TOML. Every field defaults to the shipped
//! experience, so an empty file (or no file) is a valid configuration.
//!
//! ```toml
//! [assets]
//! primary = "file:///srv/models/graces.glb"
//! fallback = "file:///mnt/mirror/graces.glb"
//! decoder_path = "/draco/"
//!
//! [viewport]
//! enter_cutoff = 0.05
//! exit_cutoff = 0.05
//!
//! [timing]
//! glitch_ms = 3000
//!
//! [[characters]]
//! id = "aglaea"
//! audio = "kk.mp3"
//! position = { x = 1.0, y = 0.5, z = 1.9 }
//! rotation = { y = -0.1 }
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use vitrine_loader::{DecoderFlavor, LoaderConfig};
use vitrine_scene::{CameraTarget, PartialVec3, VisibilityGate};
use vitrine_shared::constants::{
    DRACO_DECODER_PATH, FALLBACK_MODEL_URL, PRIMARY_MODEL_URL, VISIBILITY_CUTOFF,
};
use vitrine_shared::{
    Vec3, FADE_OUT_DURATION, FOCUS_DURATION, GLITCH_DURATION, INTRO_DURATION, REVEAL_DELAY,
    REVEAL_DURATION,
};

use crate::error::{ConfigError, ConfigResult};

/// Which Draco module build to load.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecoderKind {
    /// JavaScript build.
    #[default]
    Js,
    /// WebAssembly build.
    Wasm,
}

impl From<DecoderKind> for DecoderFlavor {
    fn from(kind: DecoderKind) -> Self {
        match kind {
            DecoderKind::Js => Self::Js,
            DecoderKind::Wasm => Self::Wasm,
        }
    }
}

/// `[assets]`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Primary scene payload location.
    pub primary: String,
    /// Mirror tried once if the primary fails.
    pub fallback: String,
    /// Directory (or file) of the Draco decoder module.
    pub decoder_path: PathBuf,
    /// Decoder module build.
    pub decoder_kind: DecoderKind,
    /// A fetch silent for this long fails.
    pub request_timeout_ms: u64,
    /// Bytes per progress step of the file transport.
    pub chunk_size: usize,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            primary: PRIMARY_MODEL_URL.to_owned(),
            fallback: FALLBACK_MODEL_URL.to_owned(),
            decoder_path: PathBuf::from(DRACO_DECODER_PATH),
            decoder_kind: DecoderKind::Js,
            request_timeout_ms: 30_000,
            chunk_size: 256 * 1024,
        }
    }
}

impl AssetsConfig {
    /// Loader settings derived from this section.
    #[must_use]
    pub fn loader_config(&self) -> LoaderConfig {
        LoaderConfig {
            request_timeout: Duration::from_millis(self.request_timeout_ms),
        }
    }
}

/// `[viewport]`
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Visibility ratio above which the detail viewport renders.
    pub enter_cutoff: f32,
    /// Visibility ratio at or below which the primary viewport renders again.
    pub exit_cutoff: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            enter_cutoff: VISIBILITY_CUTOFF,
            exit_cutoff: VISIBILITY_CUTOFF,
        }
    }
}

impl ViewportConfig {
    /// Visibility gate for these cutoffs.
    #[must_use]
    pub fn gate(&self) -> VisibilityGate {
        VisibilityGate::new(self.enter_cutoff, self.exit_cutoff)
    }
}

/// `[timing]`, in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Glitch effect before the fade ("start experience" only).
    pub glitch_ms: u64,
    /// Loading surface fade-out.
    pub fade_out_ms: u64,
    /// Delay before the main content slides in.
    pub reveal_delay_ms: u64,
    /// Main content slide-in.
    pub reveal_duration_ms: u64,
    /// Intro camera fly-in.
    pub intro_ms: u64,
    /// Showcase focus fly-to.
    pub focus_ms: u64,
}

#[allow(clippy::cast_possible_truncation)]
const fn millis(duration: Duration) -> u64 {
    duration.as_millis() as u64
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            glitch_ms: millis(GLITCH_DURATION),
            fade_out_ms: millis(FADE_OUT_DURATION),
            reveal_delay_ms: millis(REVEAL_DELAY),
            reveal_duration_ms: millis(REVEAL_DURATION),
            intro_ms: millis(INTRO_DURATION),
            focus_ms: millis(FOCUS_DURATION),
        }
    }
}

impl TimingConfig {
    /// Glitch duration.
    #[must_use]
    pub fn glitch(&self) -> Duration {
        Duration::from_millis(self.glitch_ms)
    }

    /// Fade-out duration.
    #[must_use]
    pub fn fade_out(&self) -> Duration {
        Duration::from_millis(self.fade_out_ms)
    }

    /// Reveal delay.
    #[must_use]
    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms)
    }

    /// Reveal duration.
    #[must_use]
    pub fn reveal_duration(&self) -> Duration {
        Duration::from_millis(self.reveal_duration_ms)
    }

    /// Intro duration.
    #[must_use]
    pub fn intro(&self) -> Duration {
        Duration::from_millis(self.intro_ms)
    }

    /// Focus duration.
    #[must_use]
    pub fn focus(&self) -> Duration {
        Duration::from_millis(self.focus_ms)
    }
}

/// One `[[characters]]` entry.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterConfig {
    /// Identifier used by the page's navigation.
    pub id: String,
    /// Detail camera position target.
    pub position: Option<PartialVec3>,
    /// Detail camera rotation target.
    pub rotation: Option<PartialVec3>,
    /// Audio resource played on selection.
    pub audio: String,
    /// Content template shown on selection. Empty means the id.
    pub template: String,
}

impl CharacterConfig {
    fn new(id: &str, position: Vec3, rotation: PartialVec3, audio: &str) -> Self {
        Self {
            id: id.to_owned(),
            position: Some(position.into()),
            rotation: Some(rotation),
            audio: format!("https://github.com/user-attachments/files/{audio}"),
            template: id.to_owned(),
        }
    }

    /// Camera target of this entry.
    #[must_use]
    pub fn target(&self) -> CameraTarget {
        CameraTarget {
            position: self.position,
            rotation: self.rotation,
        }
    }

    /// Template shown on selection.
    #[must_use]
    pub fn template(&self) -> &str {
        if self.template.is_empty() {
            &self.id
        } else {
            &self.template
        }
    }

    /// The shipped showcase.
    #[must_use]
    pub fn defaults() -> Vec<Self> {
        let level = |y: f32| PartialVec3::from(Vec3::new(0.0, y, 0.0));
        vec![
            Self::new("aglaea", Vec3::new(1.0, 0.5, 1.9), level(-0.1), "23751350/kk.mp3"),
            Self::new("thalia", Vec3::new(3.6, 3.3, 2.7), level(-0.1), "23751376/vinbat.mp3"),
            Self::new("euphre", Vec3::new(-2.4, 0.4, -0.4), level(-0.1), "23751366/josi.mp3"),
            Self::new(
                "SAI",
                Vec3::new(-0.010_925, -0.000_001, 5.4181),
                PartialVec3 { y: Some(0.0), ..PartialVec3::default() },
                "23751303/zzz.mp3",
            ),
            Self::new("KI", Vec3::new(-4.05, 0.5, 2.5), level(0.0), "23751360/s.mp3"),
            Self::new("RAN", Vec3::new(-0.4, 4.4, 1.0), level(0.0), "23751362/ssk.mp3"),
            Self::new("sh", Vec3::new(2.0, 1.5, 3.0), level(-0.1), "23751382/luffy.mp3"),
        ]
    }
}

/// The whole runtime configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VitrineConfig {
    /// Asset locations and transport settings.
    pub assets: AssetsConfig,
    /// Viewport switching.
    pub viewport: ViewportConfig,
    /// Fixed delays.
    pub timing: TimingConfig,
    /// Showcase table.
    pub characters: Vec<CharacterConfig>,
}

impl Default for VitrineConfig {
    fn default() -> Self {
        Self {
            assets: AssetsConfig::default(),
            viewport: ViewportConfig::default(),
            timing: TimingConfig::default(),
            characters: CharacterConfig::defaults(),
        }
    }
}

impl VitrineConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document does not parse or fails validation.
    pub fn from_toml_str(source: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, does not parse or fails
    /// validation.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        tracing::info!("Config loaded from {}", path.display());
        Ok(config)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first bad value.
    pub fn validate(&self) -> ConfigResult<()> {
        let invalid = |message: String| Err(ConfigError::Invalid(message));

        if self.assets.primary.trim().is_empty() {
            return invalid("assets.primary is empty".into());
        }
        if self.assets.fallback.trim().is_empty() {
            return invalid("assets.fallback is empty".into());
        }
        if self.assets.request_timeout_ms == 0 {
            return invalid("assets.request_timeout_ms must be positive".into());
        }
        if self.assets.chunk_size == 0 {
            return invalid("assets.chunk_size must be positive".into());
        }

        let ViewportConfig { enter_cutoff, exit_cutoff } = self.viewport;
        for (name, value) in [("enter_cutoff", enter_cutoff), ("exit_cutoff", exit_cutoff)] {
            if !(0.0..=1.0).contains(&value) {
                return invalid(format!("viewport.{name} must be within [0, 1], got {value}"));
            }
        }
        if exit_cutoff > enter_cutoff {
            return invalid(format!(
                "viewport.exit_cutoff ({exit_cutoff}) exceeds enter_cutoff ({enter_cutoff})"
            ));
        }

        let t = &self.timing;
        for (name, value) in [
            ("glitch_ms", t.glitch_ms),
            ("fade_out_ms", t.fade_out_ms),
            ("reveal_duration_ms", t.reveal_duration_ms),
            ("intro_ms", t.intro_ms),
            ("focus_ms", t.focus_ms),
        ] {
            if value == 0 {
                return invalid(format!("timing.{name} must be positive"));
            }
        }

        let mut seen = HashSet::new();
        for character in &self.characters {
            if character.id.is_empty() {
                return invalid("characters: empty id".into());
            }
            if !seen.insert(character.id.as_str()) {
                return invalid(format!("characters: duplicate id {:?}", character.id));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_the_shipped_experience() {
        let config = VitrineConfig::from_toml_str("").unwrap();
        assert_eq!(config, VitrineConfig::default());
        assert_eq!(config.timing.glitch(), GLITCH_DURATION);
        assert_eq!(config.characters.len(), 7);
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let config = VitrineConfig::from_toml_str(
            r#"
            [assets]
            primary = "file:///tmp/a.glb"
            decoder_kind = "wasm"

            [timing]
            fade_out_ms = 400
            "#,
        )
        .unwrap();

        assert_eq!(config.assets.primary, "file:///tmp/a.glb");
        assert_eq!(config.assets.fallback, FALLBACK_MODEL_URL);
        assert_eq!(DecoderFlavor::from(config.assets.decoder_kind), DecoderFlavor::Wasm);
        assert_eq!(config.timing.fade_out(), Duration::from_millis(400));
        assert_eq!(config.timing.intro(), INTRO_DURATION);
    }

    #[test]
    fn test_character_table_from_toml() {
        let config = VitrineConfig::from_toml_str(
            r#"
            [[characters]]
            id = "nova"
            audio = "nova.mp3"
            position = { x = 1.0, y = 2.0, z = 3.0 }
            rotation = { y = 0.25 }
            "#,
        )
        .unwrap();

        let nova = &config.characters[0];
        assert_eq!(config.characters.len(), 1);
        assert_eq!(nova.template(), "nova");
        let rotation = nova.target().rotation.unwrap();
        assert_eq!(rotation.y, Some(0.25));
        assert_eq!(rotation.x, None);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let cases = [
            "[viewport]\nenter_cutoff = 0.05\nexit_cutoff = 0.2",
            "[assets]\nfallback = \"\"",
            "[timing]\nfade_out_ms = 0",
            "[[characters]]\nid = \"a\"\n[[characters]]\nid = \"a\"",
        ];
        for case in cases {
            let err = VitrineConfig::from_toml_str(case).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "{case}: {err}");
        }
    }

    #[test]
    fn test_syntax_error_is_a_parse_error() {
        let err = VitrineConfig::from_toml_str("[assets\nprimary = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = VitrineConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
