/// Bible reading expansion and verse pagination.
use super::{ExpandContext, SlideDescriptor};
use crate::bible::{Verse, VerseProvider, book_code};
use crate::common::{Error, Result};
use crate::model::{BibleReading, LayoutKey, PlaceholderSet, PlaceholderValue, names};

/// Default character budget of one reading slide.
pub const DEFAULT_READING_BUDGET: usize = 425;

const SENTENCE_SEPARATOR: &str = ". ";

/// Greedy pagination of verses under a character budget.
///
/// Verses are taken in order and split into sentences on `". "`. A sentence
/// is charged its length in characters, plus the length of the verse number
/// for the first sentence of a verse. When the charge would push the running
/// total past the budget, the current page is closed before the sentence is
/// added; an empty page is never closed, so a sentence longer than the whole
/// budget still gets a page of its own. Sentences are never split or
/// reordered.
///
/// The verse number precedes its first sentence as a superscript value.
/// Sentence values keep their separator (`". "` between sentences, a space
/// after the last one) so adjacent runs read as continuous text; the final
/// value of each page is trimmed at the end.
pub fn paginate(verses: &[Verse], budget: usize) -> Vec<Vec<PlaceholderValue>> {
    let mut pages = Vec::new();
    let mut current: Vec<PlaceholderValue> = Vec::new();
    let mut used = 0usize;

    for verse in verses {
        if verse.text.is_empty() {
            log::warn!("verse {} has no text", verse.number);
        }

        let label = verse.number.to_string();
        let sentences: Vec<&str> = verse.text.split(SENTENCE_SEPARATOR).collect();
        let last = sentences.len() - 1;

        for (i, sentence) in sentences.iter().enumerate() {
            let mut charge = sentence.chars().count();
            if i == 0 {
                charge += label.chars().count();
            }

            if used + charge > budget && !current.is_empty() {
                pages.push(close_page(std::mem::take(&mut current)));
                used = 0;
            }

            if i == 0 {
                current.push(PlaceholderValue::superscript(label.as_str()));
            }
            let separator = if i == last { " " } else { SENTENCE_SEPARATOR };
            current.push(PlaceholderValue::plain(format!("{}{}", sentence, separator)));
            used += charge;
        }
    }

    if !current.is_empty() {
        pages.push(close_page(current));
    }

    pages
}

fn close_page(mut page: Vec<PlaceholderValue>) -> Vec<PlaceholderValue> {
    if let Some(last) = page.last_mut() {
        let trimmed = last.text.trim_end().len();
        last.text.truncate(trimmed);
    }
    page
}

/// Validated passage bounds of a reading.
#[derive(Debug, Clone, Copy)]
struct Passage {
    book_code: &'static str,
    chapter: u32,
    start: u32,
    end: u32,
}

fn validate(reading: &BibleReading) -> Result<Passage> {
    let (Some(chapter), Some(start), Some(end)) =
        (reading.chapter, reading.start_verse, reading.end_verse)
    else {
        return Err(Error::Configuration(format!(
            "Bible reading '{}' needs a chapter, start verse and end verse",
            reading.reference()
        )));
    };

    if start == 0 || start > end {
        return Err(Error::Configuration(format!(
            "Bible reading '{}' has an invalid verse range",
            reading.reference()
        )));
    }

    let book_code = book_code(&reading.book).ok_or_else(|| {
        Error::Configuration(format!("unknown Bible book '{}'", reading.book))
    })?;

    Ok(Passage {
        book_code,
        chapter,
        start,
        end,
    })
}

enum State {
    Announcement,
    Fetch,
    Pages(std::vec::IntoIter<Vec<PlaceholderValue>>),
    Done,
}

/// Lazy slide sequence of one reading.
///
/// The verse fetch happens when the first reading slide is pulled, after the
/// announcement has been yielded.
pub(super) struct ReadingSlides<'a> {
    passage: Passage,
    base: PlaceholderSet,
    verses: &'a dyn VerseProvider,
    budget: usize,
    state: State,
}

impl<'a> ReadingSlides<'a> {
    /// Fails with [`Error::Configuration`] before any slide exists when the
    /// reading is incomplete.
    pub(super) fn new(reading: &BibleReading, ctx: ExpandContext<'a>) -> Result<Self> {
        let passage = validate(reading)?;
        let base = PlaceholderSet::new()
            .with_text(names::READER, &reading.reader)
            .with_text(names::PASSAGE, reading.reference());

        Ok(Self {
            passage,
            base,
            verses: ctx.verses,
            budget: ctx.reading_budget,
            state: State::Announcement,
        })
    }

    fn fetch_pages(&self) -> Result<Vec<Vec<PlaceholderValue>>> {
        let Passage {
            book_code,
            chapter,
            start,
            end,
        } = self.passage;

        let verses = self.verses.fetch(book_code, chapter, start, end)?;
        if verses.is_empty() {
            return Err(Error::ExternalFetch(format!(
                "no verses returned for {}.{}.{}-{}",
                book_code, chapter, start, end
            )));
        }
        log::debug!(
            "fetched {} verses for {}.{}.{}-{}",
            verses.len(),
            book_code,
            chapter,
            start,
            end
        );

        Ok(paginate(&verses, self.budget))
    }
}

impl Iterator for ReadingSlides<'_> {
    type Item = Result<SlideDescriptor>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match &mut self.state {
                State::Announcement => {
                    self.state = State::Fetch;
                    return Some(Ok(SlideDescriptor::new(
                        LayoutKey::BibleReadingAnnouncement,
                        self.base.clone(),
                    )));
                },
                State::Fetch => match self.fetch_pages() {
                    Ok(pages) => self.state = State::Pages(pages.into_iter()),
                    Err(e) => {
                        self.state = State::Done;
                        return Some(Err(e));
                    },
                },
                State::Pages(pages) => match pages.next() {
                    Some(values) => {
                        let placeholders = self.base.clone().with_values(names::BIBLE_TEXT, values);
                        return Some(Ok(SlideDescriptor::new(LayoutKey::BibleText, placeholders)));
                    },
                    None => self.state = State::Done,
                },
                State::Done => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(page: &[PlaceholderValue]) -> Vec<(&str, bool)> {
        page.iter().map(|v| (v.text.as_str(), v.superscript)).collect()
    }

    #[test]
    fn test_short_passage_fits_one_page() {
        let verses = vec![
            Verse::new(1, "In het begin schiep God de hemel en de aarde."),
            Verse::new(2, "De aarde was nog woest en doods. Duisternis lag over de oervloed."),
        ];

        let pages = paginate(&verses, DEFAULT_READING_BUDGET);
        assert_eq!(pages.len(), 1);
        assert_eq!(
            texts(&pages[0]),
            vec![
                ("1", true),
                ("In het begin schiep God de hemel en de aarde. ", false),
                ("2", true),
                ("De aarde was nog woest en doods. ", false),
                ("Duisternis lag over de oervloed.", false),
            ]
        );
    }

    #[test]
    fn test_oversized_sentence_stays_whole() {
        let long = "x".repeat(600);
        let pages = paginate(&[Verse::new(7, long.clone())], DEFAULT_READING_BUDGET);

        assert_eq!(pages.len(), 1);
        assert_eq!(texts(&pages[0]), vec![("7", true), (long.as_str(), false)]);
    }

    #[test]
    fn test_overflow_starts_new_page_before_sentence() {
        // 1 + 8 = 9 fits a budget of 10; the second verse would need 1 + 8 more.
        let verses = vec![Verse::new(1, "aaaaaaaa"), Verse::new(2, "bbbbbbbb")];
        let pages = paginate(&verses, 10);

        assert_eq!(pages.len(), 2);
        assert_eq!(texts(&pages[0]), vec![("1", true), ("aaaaaaaa", false)]);
        assert_eq!(texts(&pages[1]), vec![("2", true), ("bbbbbbbb", false)]);
    }

    #[test]
    fn test_verse_label_charged_once() {
        // Label "12" costs 2 only for the first sentence: 2 + 4 + 4 = 10 fits exactly.
        let verses = vec![Verse::new(12, "aaaa. bbbb")];
        let pages = paginate(&verses, 10);
        assert_eq!(pages.len(), 1);

        // With a budget of 9 the second sentence moves to a page without a label.
        let pages = paginate(&verses, 9);
        assert_eq!(pages.len(), 2);
        assert_eq!(texts(&pages[1]), vec![("bbbb", false)]);
    }

    #[test]
    fn test_no_verses_no_pages() {
        assert!(paginate(&[], DEFAULT_READING_BUDGET).is_empty());
    }
}
