//! Verse text source.
//!
//! Bible readings pull their text through a [`VerseProvider`]. Fetching is a
//! blocking request/response call owned entirely by the provider, including
//! any timeout or retry policy; the expander only sees the result.

// Submodule declarations
pub mod books;

// Re-exports
pub use books::{book_code, book_names};

use crate::common::{Error, Result};
use std::collections::HashMap;

/// One numbered verse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verse {
    pub number: u32,
    pub text: String,
}

impl Verse {
    pub fn new(number: u32, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
        }
    }
}

/// Source of verse text.
pub trait VerseProvider {
    /// Fetch verses `start..=end` of `chapter` in the book identified by
    /// `book_code` (USFM), in verse order.
    ///
    /// Implementations fail with [`Error::ExternalFetch`] when the source is
    /// unreachable, times out, or lacks a requested verse.
    fn fetch(&self, book_code: &str, chapter: u32, start: u32, end: u32) -> Result<Vec<Verse>>;
}

impl<P: VerseProvider + ?Sized> VerseProvider for &P {
    fn fetch(&self, book_code: &str, chapter: u32, start: u32, end: u32) -> Result<Vec<Verse>> {
        (**self).fetch(book_code, chapter, start, end)
    }
}

/// In-memory verse table, keyed by book code and chapter.
///
/// Useful for offline builds with pre-downloaded text and for tests.
#[derive(Debug, Clone, Default)]
pub struct StaticVerseProvider {
    chapters: HashMap<(String, u32), HashMap<u32, String>>,
}

impl StaticVerseProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one verse.
    pub fn insert(&mut self, book_code: &str, chapter: u32, number: u32, text: impl Into<String>) {
        self.chapters
            .entry((book_code.to_string(), chapter))
            .or_default()
            .insert(number, text.into());
    }

    /// Builder-style variant of [`StaticVerseProvider::insert`].
    pub fn with_verse(
        mut self,
        book_code: &str,
        chapter: u32,
        number: u32,
        text: impl Into<String>,
    ) -> Self {
        self.insert(book_code, chapter, number, text);
        self
    }
}

impl VerseProvider for StaticVerseProvider {
    fn fetch(&self, book_code: &str, chapter: u32, start: u32, end: u32) -> Result<Vec<Verse>> {
        let verses = self
            .chapters
            .get(&(book_code.to_string(), chapter))
            .ok_or_else(|| Error::ExternalFetch(format!("{} {} not available", book_code, chapter)))?;

        (start..=end)
            .map(|number| {
                verses
                    .get(&number)
                    .map(|text| Verse::new(number, text.clone()))
                    .ok_or_else(|| {
                        Error::ExternalFetch(format!(
                            "verse {}.{}.{} not found",
                            book_code, chapter, number
                        ))
                    })
            })
            .collect()
    }
}
