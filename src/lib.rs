//! Servicedeck - slide decks for church services, generated from a template
//!
//! A service is described as an ordered list of content parts (songs, Bible
//! readings, prayers, collections, ...). Each part expands into a sequence of
//! slide descriptors; every descriptor names a template slide and the values
//! to fill into its `{{Placeholder}}` tokens. The build driver clones the
//! template slides into the output and substitutes the tokens, keeping the
//! formatting of the template runs.
//!
//! # Features
//!
//! - **Content model**: tagged parts with a stable JSON wire format
//! - **Expansion**: lyric captions paginated by blank lines, Bible text
//!   paginated by a character budget with superscript verse numbers
//! - **Run substitution**: tokens split over differently styled runs are
//!   replaced in place
//! - **PPTX backend** (feature `pptx`, on by default): reads a `.pptx`
//!   template and writes the generated presentation
//!
//! # Example - Building a presentation
//!
//! ```no_run
//! use servicedeck::bible::StaticVerseProvider;
//! use servicedeck::build::{BuildOptions, build_pptx};
//! use servicedeck::model::{Presentation, Prayer, Song};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let presentation = Presentation::new()
//!     .with_part(Song::new("Psalm 23", "De Heer is mijn herder\n\nMij ontbreekt niets"))
//!     .with_part(Prayer::new());
//!
//! let template = std::fs::read("template.pptx")?;
//! let output = build_pptx(
//!     &template,
//!     &presentation,
//!     &StaticVerseProvider::new(),
//!     &BuildOptions::new(),
//! )?;
//! std::fs::write("service.pptx", output)?;
//! # Ok(())
//! # }
//! ```

pub mod bible;
pub mod build;
pub mod common;
pub mod document;
pub mod expand;
pub mod model;
pub mod substitute;

/// Office Open XML presentation backend
#[cfg(feature = "pptx")]
pub mod ooxml;

pub use common::{Error, Result};
