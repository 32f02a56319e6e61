/// Placeholder values and the per-slide placeholder set.
use serde::{Deserialize, Serialize};

/// One styled value that replaces a placeholder token.
///
/// Each value becomes its own run in the output paragraph. The only style
/// override a value can carry is superscript, which the document tree renders
/// by raising the run's baseline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderValue {
    /// Text inserted in place of the token
    pub text: String,
    /// Whether the inserted run is raised as superscript
    #[serde(default)]
    pub superscript: bool,
}

impl PlaceholderValue {
    /// Create a plain value.
    #[inline]
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            superscript: false,
        }
    }

    /// Create a superscript value.
    #[inline]
    pub fn superscript(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            superscript: true,
        }
    }
}

/// Mapping from placeholder name to an ordered list of values.
///
/// Names compare case-insensitively, the same way tokens are matched in run
/// text. Entries keep the order in which they were first inserted so that
/// substitution passes are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceholderSet {
    entries: Vec<(String, Vec<PlaceholderValue>)>,
}

impl PlaceholderSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the values for `name`, replacing any previous values.
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<PlaceholderValue>) {
        let name = name.into();
        match self.position(&name) {
            Some(idx) => self.entries[idx].1 = values,
            None => self.entries.push((name, values)),
        }
    }

    /// Set `name` to a single plain value.
    pub fn insert_text(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.insert(name, vec![PlaceholderValue::plain(text)]);
    }

    /// Builder-style variant of [`PlaceholderSet::insert_text`].
    pub fn with_text(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert_text(name, text);
        self
    }

    /// Builder-style variant of [`PlaceholderSet::insert`].
    pub fn with_values(mut self, name: impl Into<String>, values: Vec<PlaceholderValue>) -> Self {
        self.insert(name, values);
        self
    }

    /// Values for `name`, if present.
    pub fn get(&self, name: &str) -> Option<&[PlaceholderValue]> {
        self.position(name).map(|idx| self.entries[idx].1.as_slice())
    }

    /// Concatenated text of all values for `name`, or an empty string.
    pub fn text(&self, name: &str) -> String {
        self.get(name)
            .map(|values| values.iter().map(|v| v.text.as_str()).collect())
            .unwrap_or_default()
    }

    /// Whether `name` is present.
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Number of placeholder names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set has no names.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(name, values)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[PlaceholderValue])> {
        self.entries
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|(existing, _)| existing.eq_ignore_ascii_case(name))
    }
}
