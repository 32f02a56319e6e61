//! Office Open XML presentation backend.
//!
//! Reads a template `.pptx`, clones its slides and writes the generated
//! package. Only the parts of the package the generator touches are parsed:
//!
//! - `ppt/presentation.xml`: the slide list
//! - `ppt/_rels/presentation.xml.rels` and slide relationship parts
//! - `[Content_Types].xml`
//! - slide parts, down to DrawingML paragraphs and runs
//!
//! All other parts are copied through unchanged.

// Submodule declarations
pub mod constants;
pub mod escape;
pub mod package;
pub mod rels;
pub mod slide;
pub mod uri;
mod xml;

// Re-exports
pub use escape::{escape_xml, unescape_xml};
pub use package::PptxDeck;
pub use rels::{ContentTypes, Relationship};
pub use slide::{DrawingParagraph, DrawingRun, RunProps, SlideXml};
