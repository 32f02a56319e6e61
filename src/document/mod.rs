//! Document tree abstraction.
//!
//! The generator only needs a narrow view of a slide deck: slides made of
//! paragraphs, paragraphs made of styled runs, and a way to clone a template
//! slide into the output. Backends implement these traits:
//!
//! - [`memory::MemoryDeck`]: plain in-memory tree
//! - `ooxml::PptxDeck` (feature `pptx`): DrawingML slides of a `.pptx` package
//!
//! # Template binding
//!
//! Template slides are bound to [`LayoutKey`]s either by name (the slide's
//! name equals the layout's canonical name) or by position (the Nth slide is
//! bound to the Nth layout in [`LayoutKey::ALL`]). Keyed binding is the
//! default; positional binding serves templates without slide names.

// Submodule declarations
pub mod memory;

use crate::common::{Error, Result};
use crate::model::LayoutKey;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Baseline offset of a superscript run, in thousandths of a percent of the
/// font height (DrawingML `baseline` units).
pub const SUPERSCRIPT_BASELINE: i32 = 30_000;

/// Default identifier base; the first generated slide gets `base + 1`.
pub const DEFAULT_SLIDE_ID_BASE: u32 = 256;

/// Range of valid slide identifiers (`ST_SlideId` in PresentationML).
pub const SLIDE_ID_RANGE: std::ops::RangeInclusive<u32> = 256..=2_147_483_647;

/// The identifier after `last`.
///
/// Fails with [`Error::Configuration`] when it falls outside
/// [`SLIDE_ID_RANGE`], which also covers `u32` overflow.
pub fn next_slide_id(last: u32) -> Result<u32> {
    last.checked_add(1)
        .filter(|id| SLIDE_ID_RANGE.contains(id))
        .ok_or_else(|| {
            Error::Configuration(format!(
                "slide identifier after {} is outside {}..={}",
                last,
                SLIDE_ID_RANGE.start(),
                SLIDE_ID_RANGE.end()
            ))
        })
}

/// A contiguous span of text sharing one style.
pub trait TextRun {
    /// Text of the run.
    fn text(&self) -> &str;

    /// A new run with this run's style and the given text.
    fn fork(&self, text: &str) -> Self
    where
        Self: Sized;

    /// Raise the run to superscript (or reset it to the normal baseline).
    fn set_superscript(&mut self, superscript: bool);

    /// Whether this item is paragraph markup (properties, line breaks,
    /// fields) rather than a text run. Markup is never dropped.
    fn is_markup(&self) -> bool {
        false
    }
}

/// An ordered sequence of runs forming one paragraph.
pub trait RunParagraph {
    type Run: TextRun;

    /// Runs in order.
    fn runs(&self) -> &[Self::Run];

    /// Take the runs out, leaving the paragraph empty.
    fn take_runs(&mut self) -> Vec<Self::Run>;

    /// Replace the paragraph's runs.
    fn set_runs(&mut self, runs: Vec<Self::Run>);

    /// Concatenated text of all runs.
    fn text(&self) -> String {
        self.runs().iter().map(TextRun::text).collect()
    }
}

/// A slide whose paragraphs can be rewritten.
pub trait SlideTree {
    type Paragraph: RunParagraph;

    /// All paragraphs of the slide, in document order.
    fn paragraphs_mut(&mut self) -> impl Iterator<Item = &mut Self::Paragraph>;
}

/// An output slide freshly cloned from a template.
pub struct ClonedSlide<'a, S> {
    /// Identifier allocated for the new slide
    pub id: u32,
    pub slide: &'a mut S,
}

/// Clones template slides into an output document.
///
/// Clones are appended to the output in request order; identifiers increase
/// monotonically. Implementations own their identifier allocation.
pub trait SlideCloner {
    type Slide: SlideTree;

    /// Template slide bound to `layout`.
    ///
    /// Fails with [`Error::LayoutBinding`] when no slide is bound.
    fn template(&self, layout: LayoutKey) -> Result<&Self::Slide>;

    /// Append a copy of the template bound to `layout` to the output.
    fn clone_into_output(&mut self, layout: LayoutKey) -> Result<ClonedSlide<'_, Self::Slide>>;
}

/// How template slides are matched to layouts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum TemplateBinding {
    /// Slide name equals the layout's canonical name
    #[default]
    Keyed,
    /// Nth template slide is bound to the Nth layout in canonical order
    Positional,
}

impl TemplateBinding {
    /// Bind named template slides to layouts.
    ///
    /// Under keyed binding, slides with an unknown name are skipped and the
    /// first slide wins when two share a name. Under positional binding,
    /// surplus slides are skipped. Both cases are logged.
    pub fn bind<T>(self, slides: Vec<(String, T)>) -> BTreeMap<LayoutKey, T> {
        let mut bound = BTreeMap::new();

        match self {
            TemplateBinding::Keyed => {
                for (name, slide) in slides {
                    match name.parse::<LayoutKey>() {
                        Ok(layout) if bound.contains_key(&layout) => {
                            log::warn!("template slide '{}' is bound twice; keeping the first", name);
                        },
                        Ok(layout) => {
                            bound.insert(layout, slide);
                        },
                        Err(_) => log::warn!("template slide '{}' matches no layout", name),
                    }
                }
            },
            TemplateBinding::Positional => {
                let surplus = slides.len().saturating_sub(LayoutKey::ALL.len());
                if surplus > 0 {
                    log::warn!("{} template slides beyond the last layout are ignored", surplus);
                }
                for (layout, (_, slide)) in LayoutKey::ALL.into_iter().zip(slides) {
                    bound.insert(layout, slide);
                }
            },
        }

        log::debug!("bound {} of {} layouts", bound.len(), LayoutKey::ALL.len());
        bound
    }
}

/// Look up a bound template, failing with [`Error::LayoutBinding`].
pub(crate) fn bound<T>(templates: &BTreeMap<LayoutKey, T>, layout: LayoutKey) -> Result<&T> {
    templates
        .get(&layout)
        .ok_or_else(|| Error::LayoutBinding(layout.name().to_string()))
}
