/// Plain in-memory document tree.
use super::{
    ClonedSlide, DEFAULT_SLIDE_ID_BASE, RunParagraph, SUPERSCRIPT_BASELINE, SlideCloner, SlideTree,
    TemplateBinding, TextRun, bound, next_slide_id,
};
use crate::common::Result;
use crate::model::LayoutKey;
use std::collections::BTreeMap;

/// Character formatting of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStyle {
    pub bold: bool,
    pub italic: bool,
    pub font: Option<String>,
    /// Font size in hundredths of a point
    pub size: Option<u32>,
    /// Baseline offset; see [`SUPERSCRIPT_BASELINE`]
    pub baseline: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryRun {
    pub text: String,
    pub style: RunStyle,
}

impl MemoryRun {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: RunStyle::default(),
        }
    }

    pub fn styled(text: impl Into<String>, style: RunStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

impl TextRun for MemoryRun {
    fn text(&self) -> &str {
        &self.text
    }

    fn fork(&self, text: &str) -> Self {
        Self {
            text: text.to_string(),
            style: self.style.clone(),
        }
    }

    fn set_superscript(&mut self, superscript: bool) {
        self.style.baseline = if superscript { SUPERSCRIPT_BASELINE } else { 0 };
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryParagraph {
    pub runs: Vec<MemoryRun>,
}

impl MemoryParagraph {
    pub fn new(runs: Vec<MemoryRun>) -> Self {
        Self { runs }
    }
}

impl RunParagraph for MemoryParagraph {
    type Run = MemoryRun;

    fn runs(&self) -> &[MemoryRun] {
        &self.runs
    }

    fn take_runs(&mut self) -> Vec<MemoryRun> {
        std::mem::take(&mut self.runs)
    }

    fn set_runs(&mut self, runs: Vec<MemoryRun>) {
        self.runs = runs;
    }
}

/// A named slide; the name drives keyed template binding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemorySlide {
    pub name: String,
    pub paragraphs: Vec<MemoryParagraph>,
}

impl MemorySlide {
    pub fn new(name: impl Into<String>, paragraphs: Vec<MemoryParagraph>) -> Self {
        Self {
            name: name.into(),
            paragraphs,
        }
    }

    /// Text of every paragraph, one entry per paragraph.
    pub fn texts(&self) -> Vec<String> {
        self.paragraphs.iter().map(RunParagraph::text).collect()
    }
}

impl SlideTree for MemorySlide {
    type Paragraph = MemoryParagraph;

    fn paragraphs_mut(&mut self) -> impl Iterator<Item = &mut MemoryParagraph> {
        self.paragraphs.iter_mut()
    }
}

/// A generated slide together with its identifier and layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSlide {
    pub id: u32,
    pub layout: LayoutKey,
    pub slide: MemorySlide,
}

/// In-memory deck: bound template slides plus the generated output.
#[derive(Debug, Clone)]
pub struct MemoryDeck {
    templates: BTreeMap<LayoutKey, MemorySlide>,
    output: Vec<OutputSlide>,
    last_id: u32,
}

impl MemoryDeck {
    /// Create a deck from template slides.
    pub fn new(templates: Vec<MemorySlide>, binding: TemplateBinding) -> Self {
        let named = templates
            .into_iter()
            .map(|slide| (slide.name.clone(), slide))
            .collect();

        Self {
            templates: binding.bind(named),
            output: Vec::new(),
            last_id: DEFAULT_SLIDE_ID_BASE,
        }
    }

    /// Start identifiers after `base` instead of the default.
    pub fn with_id_base(mut self, base: u32) -> Self {
        self.last_id = base;
        self
    }

    /// Generated slides in output order.
    pub fn slides(&self) -> &[OutputSlide] {
        &self.output
    }

    pub fn into_slides(self) -> Vec<OutputSlide> {
        self.output
    }
}

impl SlideCloner for MemoryDeck {
    type Slide = MemorySlide;

    fn template(&self, layout: LayoutKey) -> Result<&MemorySlide> {
        bound(&self.templates, layout)
    }

    fn clone_into_output(&mut self, layout: LayoutKey) -> Result<ClonedSlide<'_, MemorySlide>> {
        let slide = self.template(layout)?.clone();
        self.last_id = next_slide_id(self.last_id)?;
        self.output.push(OutputSlide {
            id: self.last_id,
            layout,
            slide,
        });

        let id = self.last_id;
        let last = self.output.len() - 1;
        Ok(ClonedSlide {
            id,
            slide: &mut self.output[last].slide,
        })
    }
}
