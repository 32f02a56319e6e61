/// The ordered list of parts that makes up one service.
use super::part::ContentPart;
use super::wire;
use crate::common::{Error, Result};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

/// Default theme text of a new presentation.
pub const DEFAULT_THEME: &str = "Dit is het thema";

/// A service presentation: a theme and an ordered list of content parts.
///
/// Part order is presentation order and is preserved through serialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    pub theme: String,
    parts: Vec<ContentPart>,
}

impl Default for Presentation {
    fn default() -> Self {
        Self {
            theme: DEFAULT_THEME.to_string(),
            parts: Vec::new(),
        }
    }
}

impl Presentation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parts in presentation order.
    #[inline]
    pub fn parts(&self) -> &[ContentPart] {
        &self.parts
    }

    /// Append a part and return its id.
    pub fn add_part(&mut self, part: impl Into<ContentPart>) -> Uuid {
        let part = part.into();
        let id = part.id();
        self.parts.push(part);
        id
    }

    /// Builder-style variant of [`Presentation::add_part`].
    pub fn with_part(mut self, part: impl Into<ContentPart>) -> Self {
        self.add_part(part);
        self
    }

    pub fn part(&self, id: Uuid) -> Option<&ContentPart> {
        self.parts.iter().find(|p| p.id() == id)
    }

    pub fn part_mut(&mut self, id: Uuid) -> Option<&mut ContentPart> {
        self.parts.iter_mut().find(|p| p.id() == id)
    }

    /// Remove a part, returning it if it was present.
    pub fn remove_part(&mut self, id: Uuid) -> Option<ContentPart> {
        let idx = self.parts.iter().position(|p| p.id() == id)?;
        Some(self.parts.remove(idx))
    }

    /// Move a part to `new_index`, clamped to the end of the list.
    pub fn move_part(&mut self, id: Uuid, new_index: usize) -> Result<()> {
        let idx = self
            .parts
            .iter()
            .position(|p| p.id() == id)
            .ok_or_else(|| Error::ComponentNotFound(format!("part {}", id)))?;
        let part = self.parts.remove(idx);
        let new_index = new_index.min(self.parts.len());
        self.parts.insert(new_index, part);
        Ok(())
    }

    /// Encode as `{"Theme": ..., "Parts": [...]}`.
    ///
    /// Serializes straight from the structs so every part keeps its `Type`
    /// discriminator in first position.
    pub fn to_json(&self) -> Result<String> {
        #[derive(Serialize)]
        #[serde(rename_all = "PascalCase")]
        struct Wire<'a> {
            theme: &'a str,
            parts: &'a [ContentPart],
        }

        Ok(serde_json::to_string(&Wire {
            theme: &self.theme,
            parts: &self.parts,
        })?)
    }

    /// Decode from the format written by [`Presentation::to_json`].
    pub fn from_json(json: &str) -> Result<Self> {
        let mut root: Value = serde_json::from_str(json)?;
        let theme = match root.get("Theme") {
            Some(Value::String(theme)) => theme.clone(),
            _ => DEFAULT_THEME.to_string(),
        };
        let parts = root.get_mut("Parts").map(Value::take).unwrap_or(Value::Null);
        let parts = wire::decode_parts(parts)?;
        Ok(Self { theme, parts })
    }
}
