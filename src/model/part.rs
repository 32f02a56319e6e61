/// Content parts of a service presentation.
///
/// Each part is a struct with named fields. The placeholder map a part
/// contributes to its slides is a projection of those fields built on demand,
/// so the fields stay the single source of truth for both serialization and
/// expansion.
use super::value::PlaceholderSet;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Placeholder names used in the template slides.
///
/// Existing templates are written in Dutch, so the tokens are too:
/// `{{Titel}}`, `{{Liedtekst}}` and so on.
pub mod names {
    pub const TITLE: &str = "Titel";
    pub const SUBTITLE: &str = "Ondertitel";
    pub const LYRICS: &str = "Liedtekst";
    pub const FIRST_GOAL: &str = "EersteDoel";
    pub const SECOND_GOAL: &str = "TweedeDoel";
    pub const READER: &str = "Bijbellezer";
    pub const PASSAGE: &str = "Bijbelgedeelte";
    pub const BIBLE_TEXT: &str = "Bijbeltekst";
    pub const PRESENTER: &str = "Koffermomenter";
}

/// Fixed title shown on the trust and greeting slide.
pub const TRUST_AND_GREETING_TITLE: &str = "vertrouwen & groet";

/// One semantic unit of a service that expands into one or more slides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "Type")]
pub enum ContentPart {
    Song(Song),
    Collection(Collection),
    Prayer(Prayer),
    BibleReading(BibleReading),
    TrustAndGreeting(TrustAndGreeting),
    ChildrenMoment(ChildrenMoment),
}

impl ContentPart {
    /// Discriminator names accepted on the wire.
    pub const TYPE_NAMES: [&'static str; 6] = [
        "Song",
        "Collection",
        "Prayer",
        "BibleReading",
        "TrustAndGreeting",
        "ChildrenMoment",
    ];

    /// Stable identifier of the part.
    pub fn id(&self) -> Uuid {
        match self {
            ContentPart::Song(p) => p.id,
            ContentPart::Collection(p) => p.id,
            ContentPart::Prayer(p) => p.id,
            ContentPart::BibleReading(p) => p.id,
            ContentPart::TrustAndGreeting(p) => p.id,
            ContentPart::ChildrenMoment(p) => p.id,
        }
    }

    /// Wire discriminator of this variant.
    pub fn type_name(&self) -> &'static str {
        match self {
            ContentPart::Song(_) => "Song",
            ContentPart::Collection(_) => "Collection",
            ContentPart::Prayer(_) => "Prayer",
            ContentPart::BibleReading(_) => "BibleReading",
            ContentPart::TrustAndGreeting(_) => "TrustAndGreeting",
            ContentPart::ChildrenMoment(_) => "ChildrenMoment",
        }
    }

    /// Placeholders backed by the part's own fields.
    pub fn placeholders(&self) -> PlaceholderSet {
        match self {
            ContentPart::Song(p) => p.placeholders(),
            ContentPart::Collection(p) => p.placeholders(),
            ContentPart::Prayer(_) => PlaceholderSet::new(),
            ContentPart::BibleReading(p) => p.placeholders(),
            ContentPart::TrustAndGreeting(_) => TrustAndGreeting::placeholders(),
            ContentPart::ChildrenMoment(p) => p.placeholders(),
        }
    }
}

/// A sung song: announcement followed by subtitled lyrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Song {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    /// Lyrics with verses separated by a blank line
    #[serde(default)]
    pub lyrics: String,
    #[serde(default)]
    pub use_subtitle: bool,
}

impl Song {
    pub fn new(title: impl Into<String>, lyrics: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            subtitle: String::new(),
            lyrics: lyrics.into(),
            use_subtitle: false,
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = subtitle.into();
        self
    }

    fn placeholders(&self) -> PlaceholderSet {
        PlaceholderSet::new()
            .with_text(names::TITLE, &self.title)
            .with_text(names::SUBTITLE, &self.subtitle)
            .with_text(names::LYRICS, &self.lyrics)
    }
}

/// Offering announcement with one or two goals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Collection {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(default)]
    pub first_goal: String,
    /// Empty when the collection has a single goal
    #[serde(default)]
    pub second_goal: String,
}

impl Collection {
    pub fn new(first_goal: impl Into<String>, second_goal: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            first_goal: first_goal.into(),
            second_goal: second_goal.into(),
        }
    }

    #[inline]
    pub fn has_two_goals(&self) -> bool {
        !self.second_goal.is_empty()
    }

    fn placeholders(&self) -> PlaceholderSet {
        PlaceholderSet::new()
            .with_text(names::FIRST_GOAL, &self.first_goal)
            .with_text(names::SECOND_GOAL, &self.second_goal)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Prayer {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
}

impl Prayer {
    pub fn new() -> Self {
        Self { id: Uuid::new_v4() }
    }
}

impl Default for Prayer {
    fn default() -> Self {
        Self::new()
    }
}

/// A Bible reading: announcement plus the paginated passage.
///
/// Chapter and verse bounds are optional while the part is being edited;
/// expansion rejects a reading that still lacks any of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BibleReading {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(default)]
    pub reader: String,
    /// Dutch book name, e.g. `Johannes`
    #[serde(default)]
    pub book: String,
    #[serde(default)]
    pub chapter: Option<u32>,
    #[serde(default)]
    pub start_verse: Option<u32>,
    #[serde(default)]
    pub end_verse: Option<u32>,
}

impl BibleReading {
    pub fn new(reader: impl Into<String>, book: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            reader: reader.into(),
            book: book.into(),
            chapter: None,
            start_verse: None,
            end_verse: None,
        }
    }

    pub fn with_passage(mut self, chapter: u32, start_verse: u32, end_verse: u32) -> Self {
        self.chapter = Some(chapter);
        self.start_verse = Some(start_verse);
        self.end_verse = Some(end_verse);
        self
    }

    /// Human readable reference, e.g. `Johannes 3 : 16 - 18`.
    ///
    /// Unset bounds render as empty strings.
    pub fn reference(&self) -> String {
        fn show(n: Option<u32>) -> String {
            n.map(|n| n.to_string()).unwrap_or_default()
        }
        format!(
            "{} {} : {} - {}",
            self.book,
            show(self.chapter),
            show(self.start_verse),
            show(self.end_verse)
        )
    }

    fn placeholders(&self) -> PlaceholderSet {
        PlaceholderSet::new()
            .with_text(names::READER, &self.reader)
            .with_text(names::PASSAGE, self.reference())
    }
}

/// The fixed "trust and greeting" slide; it has no editable fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TrustAndGreeting {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
}

impl TrustAndGreeting {
    pub fn new() -> Self {
        Self { id: Uuid::new_v4() }
    }

    fn placeholders() -> PlaceholderSet {
        PlaceholderSet::new().with_text(names::TITLE, TRUST_AND_GREETING_TITLE)
    }
}

impl Default for TrustAndGreeting {
    fn default() -> Self {
        Self::new()
    }
}

/// Children's moment, announced with the name of its presenter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChildrenMoment {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(default)]
    pub presenter: String,
}

impl ChildrenMoment {
    pub fn new(presenter: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            presenter: presenter.into(),
        }
    }

    fn placeholders(&self) -> PlaceholderSet {
        PlaceholderSet::new().with_text(names::PRESENTER, &self.presenter)
    }
}

macro_rules! impl_from_variant {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for ContentPart {
                fn from(part: $variant) -> Self {
                    ContentPart::$variant(part)
                }
            }
        )*
    };
}

impl_from_variant!(
    Song,
    Collection,
    Prayer,
    BibleReading,
    TrustAndGreeting,
    ChildrenMoment,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_song_placeholders_follow_fields() {
        let mut song = Song::new("Amazing Grace", "verse one");
        song.title = "Amazing Grace (2)".to_string();

        let set = ContentPart::from(song).placeholders();
        assert_eq!(set.text(names::TITLE), "Amazing Grace (2)");
        assert_eq!(set.text(names::LYRICS), "verse one");
    }

    #[test]
    fn test_song_fills_dutch_template_tokens() {
        use crate::document::memory::{MemoryParagraph, MemoryRun};
        use crate::substitute::substitute;

        let set = ContentPart::from(Song::new("Psalm 23", "")).placeholders();
        let mut paragraph = MemoryParagraph::new(vec![MemoryRun::new("{{Titel}} {{ondertitel}}")]);

        assert_eq!(substitute(&mut paragraph, &set), 2);
        assert_eq!(paragraph.runs[0].text, "Psalm 23");
        assert_eq!(paragraph.runs.len(), 2);
    }

    #[test]
    fn test_reading_reference() {
        let reading = BibleReading::new("Anna", "Johannes").with_passage(3, 16, 18);
        assert_eq!(reading.reference(), "Johannes 3 : 16 - 18");
    }

    #[test]
    fn test_trust_and_greeting_is_constant() {
        let set = ContentPart::from(TrustAndGreeting::new()).placeholders();
        assert_eq!(set.text(names::TITLE), TRUST_AND_GREETING_TITLE);
    }

    #[test]
    fn test_type_names_match_variants() {
        let parts: Vec<ContentPart> = vec![
            Song::new("", "").into(),
            Collection::new("", "").into(),
            Prayer::new().into(),
            BibleReading::new("", "").into(),
            TrustAndGreeting::new().into(),
            ChildrenMoment::new("").into(),
        ];
        let names: Vec<&str> = parts.iter().map(ContentPart::type_name).collect();
        assert_eq!(names, ContentPart::TYPE_NAMES);
    }
}
