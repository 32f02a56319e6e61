//! Build driver: content parts in, filled-in slides out.
//!
//! For every part, in order, the driver pulls the part's slide descriptors,
//! clones the template slide of each descriptor into the output and
//! substitutes the descriptor's placeholders into every paragraph of the
//! clone. The first error aborts the build; slides cloned before it stay in
//! the output document, which the caller should discard.
//!
//! # Example
//!
//! ```rust
//! use servicedeck::bible::StaticVerseProvider;
//! use servicedeck::build::{BuildOptions, build};
//! use servicedeck::document::memory::{MemoryDeck, MemoryParagraph, MemoryRun, MemorySlide};
//! use servicedeck::document::TemplateBinding;
//! use servicedeck::model::{ContentPart, Prayer};
//!
//! let templates = vec![MemorySlide::new(
//!     "Prayer",
//!     vec![MemoryParagraph::new(vec![MemoryRun::new("Gebed")])],
//! )];
//! let mut deck = MemoryDeck::new(templates, TemplateBinding::Keyed);
//! let parts = vec![ContentPart::from(Prayer::new())];
//!
//! let count = build(&parts, &mut deck, &StaticVerseProvider::new(), &BuildOptions::new())?;
//! assert_eq!(count, 1);
//! # Ok::<(), servicedeck::Error>(())
//! ```

use crate::bible::VerseProvider;
use crate::common::Result;
use crate::document::{DEFAULT_SLIDE_ID_BASE, SlideCloner, TemplateBinding};
use crate::expand::{DEFAULT_READING_BUDGET, ExpandContext, expand};
use crate::substitute::substitute_slide;
use serde::Deserialize;

/// Options of one build.
///
/// # Examples
///
/// ```rust
/// use servicedeck::build::BuildOptions;
/// use servicedeck::document::TemplateBinding;
///
/// let options = BuildOptions::new()
///     .with_prior_to_service(true)
///     .with_binding(TemplateBinding::Positional);
///
/// let from_config: BuildOptions = serde_json::from_str(r#"{"reading_budget": 300}"#)?;
/// assert_eq!(from_config.reading_budget, 300);
/// assert!(!from_config.prior_to_service);
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BuildOptions {
    /// Whether the slides are shown before the service starts
    pub prior_to_service: bool,
    /// Character budget of one Bible text slide
    pub reading_budget: usize,
    /// How template slides are matched to layouts
    pub binding: TemplateBinding,
    /// Identifier base; the first generated slide gets `first_slide_id + 1`
    pub first_slide_id: u32,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            prior_to_service: false,
            reading_budget: DEFAULT_READING_BUDGET,
            binding: TemplateBinding::Keyed,
            first_slide_id: DEFAULT_SLIDE_ID_BASE,
        }
    }
}

impl BuildOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_prior_to_service(mut self, prior: bool) -> Self {
        self.prior_to_service = prior;
        self
    }

    /// Set the character budget of a Bible text slide.
    #[inline]
    pub fn with_reading_budget(mut self, budget: usize) -> Self {
        self.reading_budget = budget;
        self
    }

    #[inline]
    pub fn with_binding(mut self, binding: TemplateBinding) -> Self {
        self.binding = binding;
        self
    }

    #[inline]
    pub fn with_first_slide_id(mut self, id: u32) -> Self {
        self.first_slide_id = id;
        self
    }

    /// Expansion context for these options.
    pub fn context<'a>(&self, verses: &'a dyn VerseProvider) -> ExpandContext<'a> {
        ExpandContext::new(verses)
            .with_prior_to_service(self.prior_to_service)
            .with_reading_budget(self.reading_budget)
    }
}

/// Generate the slides of `parts` into `cloner`.
///
/// Returns the number of slides generated.
pub fn build<C: SlideCloner>(
    parts: &[crate::model::ContentPart],
    cloner: &mut C,
    verses: &dyn VerseProvider,
    options: &BuildOptions,
) -> Result<usize> {
    log::info!(
        "building {} parts{}",
        parts.len(),
        if options.prior_to_service { " (prior to service)" } else { "" }
    );

    let ctx = options.context(verses);
    let mut generated = 0;

    for part in parts {
        for descriptor in expand(part, ctx)? {
            let descriptor = descriptor?;
            let cloned = cloner.clone_into_output(descriptor.layout)?;
            let replaced = substitute_slide(cloned.slide, &descriptor.placeholders);
            log::debug!(
                "slide {} from {}: {} placeholder(s) replaced",
                cloned.id,
                descriptor.layout,
                replaced
            );
            generated += 1;
        }
    }

    log::info!("generated {} slides", generated);
    Ok(generated)
}

/// Build a presentation into a copy of a `.pptx` template.
///
/// Returns the bytes of the finished package.
#[cfg(feature = "pptx")]
pub fn build_pptx(
    template: &[u8],
    presentation: &crate::model::Presentation,
    verses: &dyn VerseProvider,
    options: &BuildOptions,
) -> Result<Vec<u8>> {
    let mut deck = crate::ooxml::PptxDeck::from_bytes(template, options.binding)?
        .with_id_base(options.first_slide_id);
    build(presentation.parts(), &mut deck, verses, options)?;
    deck.finish()
}
