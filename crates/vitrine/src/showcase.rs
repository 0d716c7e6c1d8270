//! Showcase table.
//!
//! Maps a character identifier to the detail camera target, the audio clip
//! and the content template shown when it is selected.

use vitrine_scene::CameraTarget;

use crate::config::CharacterConfig;
use crate::error::{VitrineError, VitrineResult};

/// One selectable character.
#[derive(Clone, Debug, PartialEq)]
pub struct Character {
    /// Identifier.
    pub id: String,
    /// Where the detail camera flies.
    pub target: CameraTarget,
    /// Audio resource.
    pub audio: String,
    /// Content template.
    pub template: String,
}

impl From<&CharacterConfig> for Character {
    fn from(config: &CharacterConfig) -> Self {
        Self {
            id: config.id.clone(),
            target: config.target(),
            audio: config.audio.clone(),
            template: config.template().to_owned(),
        }
    }
}

/// All characters plus the current selection.
#[derive(Clone, Debug, Default)]
pub struct Showcase {
    characters: Vec<Character>,
    active: Option<usize>,
}

impl Showcase {
    /// Builds the table from config entries.
    #[must_use]
    pub fn from_config(entries: &[CharacterConfig]) -> Self {
        Self {
            characters: entries.iter().map(Character::from).collect(),
            active: None,
        }
    }

    /// Looks up a character.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Character> {
        self.characters.iter().find(|c| c.id == id)
    }

    /// Identifiers in table order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.characters.iter().map(|c| c.id.as_str())
    }

    /// Number of characters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.characters.len()
    }

    /// True if the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    /// Marks `id` active and returns its entry.
    ///
    /// # Errors
    ///
    /// Returns [`VitrineError::UnknownCharacter`] if `id` is not in the table.
    /// The previous selection is kept.
    pub fn select(&mut self, id: &str) -> VitrineResult<&Character> {
        let index = self
            .characters
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| VitrineError::UnknownCharacter(id.to_owned()))?;
        self.active = Some(index);
        Ok(&self.characters[index])
    }

    /// The selected character.
    #[must_use]
    pub fn active(&self) -> Option<&Character> {
        self.active.map(|index| &self.characters[index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let showcase = Showcase::from_config(&CharacterConfig::defaults());
        let ids: Vec<_> = showcase.ids().collect();
        assert_eq!(ids, ["aglaea", "thalia", "euphre", "SAI", "KI", "RAN", "sh"]);

        // SAI only turns the camera about Y.
        let rotation = showcase.get("SAI").unwrap().target.rotation.unwrap();
        assert_eq!((rotation.x, rotation.y, rotation.z), (None, Some(0.0), None));
        assert!(showcase.get("sh").unwrap().audio.ends_with("luffy.mp3"));
    }

    #[test]
    fn test_select_unknown_keeps_previous() {
        let mut showcase = Showcase::from_config(&CharacterConfig::defaults());
        showcase.select("thalia").unwrap();

        let err = showcase.select("nobody").unwrap_err();
        assert!(matches!(err, VitrineError::UnknownCharacter(id) if id == "nobody"));
        assert_eq!(showcase.active().map(|c| c.id.as_str()), Some("thalia"));
    }
}
