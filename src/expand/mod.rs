//! Content expansion: content parts to slide descriptors.
//!
//! Every part expands into a lazy, finite sequence of [`SlideDescriptor`]s in
//! presentation order. Expansion is a pure function of the part state (and of
//! the verse provider for Bible readings), so calling [`expand`] again
//! restarts the sequence from the beginning.
//!
//! # Example
//!
//! ```rust
//! use servicedeck::bible::StaticVerseProvider;
//! use servicedeck::expand::{ExpandContext, expand};
//! use servicedeck::model::{ContentPart, LayoutKey, Song};
//!
//! let verses = StaticVerseProvider::new();
//! let ctx = ExpandContext::new(&verses);
//! let part = ContentPart::from(Song::new("Psalm 23", "couplet 1\n\ncouplet 2"));
//!
//! let layouts: Vec<LayoutKey> = expand(&part, ctx)?
//!     .map(|slide| slide.map(|s| s.layout))
//!     .collect::<Result<_, _>>()?;
//! assert_eq!(layouts.len(), 5);
//! # Ok::<(), servicedeck::Error>(())
//! ```

// Submodule declarations
pub mod reading;
pub mod song;

// Re-exports
pub use reading::{DEFAULT_READING_BUDGET, paginate};
pub use song::lyric_pages;

use crate::bible::VerseProvider;
use crate::common::Result;
use crate::model::{Collection, ContentPart, LayoutKey, PlaceholderSet};
use std::iter;

/// One slide to generate: the template to clone and the values to fill in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideDescriptor {
    pub layout: LayoutKey,
    pub placeholders: PlaceholderSet,
}

impl SlideDescriptor {
    #[inline]
    pub fn new(layout: LayoutKey, placeholders: PlaceholderSet) -> Self {
        Self {
            layout,
            placeholders,
        }
    }
}

/// Lazy slide sequence of one part.
pub type Slides<'a> = Box<dyn Iterator<Item = Result<SlideDescriptor>> + 'a>;

/// Inputs of expansion besides the part itself.
#[derive(Clone, Copy)]
pub struct ExpandContext<'a> {
    /// Whether the slides are shown before the service starts
    pub prior_to_service: bool,
    /// Character budget of one Bible text slide
    pub reading_budget: usize,
    /// Verse source for Bible readings
    pub verses: &'a dyn VerseProvider,
}

impl<'a> ExpandContext<'a> {
    pub fn new(verses: &'a dyn VerseProvider) -> Self {
        Self {
            prior_to_service: false,
            reading_budget: DEFAULT_READING_BUDGET,
            verses,
        }
    }

    pub fn with_prior_to_service(mut self, prior: bool) -> Self {
        self.prior_to_service = prior;
        self
    }

    pub fn with_reading_budget(mut self, budget: usize) -> Self {
        self.reading_budget = budget;
        self
    }
}

/// Layout of a collection slide.
///
/// | goals | during service       | prior to service          |
/// |-------|----------------------|---------------------------|
/// | one   | `CollectionOneGoal`  | `CollectionOneGoalPrior`  |
/// | two   | `CollectionTwoGoals` | `CollectionTwoGoalsPrior` |
pub fn collection_layout(collection: &Collection, prior_to_service: bool) -> LayoutKey {
    match (collection.has_two_goals(), prior_to_service) {
        (false, false) => LayoutKey::CollectionOneGoal,
        (false, true) => LayoutKey::CollectionOneGoalPrior,
        (true, false) => LayoutKey::CollectionTwoGoals,
        (true, true) => LayoutKey::CollectionTwoGoalsPrior,
    }
}

fn single(layout: LayoutKey, placeholders: PlaceholderSet) -> Slides<'static> {
    Box::new(iter::once(Ok(SlideDescriptor::new(layout, placeholders))))
}

/// Expand one part.
///
/// Configuration problems (an incomplete Bible reading) are reported here,
/// before any slide of the part exists. Failures that happen while the
/// sequence is pulled, such as a verse fetch error, are yielded as an `Err`
/// item after which the sequence ends.
pub fn expand<'a>(part: &ContentPart, ctx: ExpandContext<'a>) -> Result<Slides<'a>> {
    log::debug!("expanding {} part {}", part.type_name(), part.id());

    let slides: Slides<'a> = match part {
        ContentPart::Song(song) => song::expand(song),
        ContentPart::Collection(collection) => single(
            collection_layout(collection, ctx.prior_to_service),
            part.placeholders(),
        ),
        ContentPart::Prayer(_) => single(LayoutKey::Prayer, part.placeholders()),
        ContentPart::TrustAndGreeting(_) => {
            single(LayoutKey::PurpleWithTitle, part.placeholders())
        },
        ContentPart::ChildrenMoment(_) => single(LayoutKey::ChildrenMoment, part.placeholders()),
        ContentPart::BibleReading(reading) => {
            Box::new(reading::ReadingSlides::new(reading, ctx)?)
        },
    };

    Ok(slides)
}

/// Expand a list of parts into one flat sequence, in part order.
///
/// A part that fails to expand contributes a single `Err` item.
pub fn expand_all<'a>(
    parts: &'a [ContentPart],
    ctx: ExpandContext<'a>,
) -> impl Iterator<Item = Result<SlideDescriptor>> + 'a {
    parts.iter().flat_map(move |part| match expand(part, ctx) {
        Ok(slides) => slides,
        Err(e) => Box::new(iter::once(Err(e))) as Slides<'a>,
    })
}
