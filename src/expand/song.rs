/// Song expansion: announcement, blank caption, one caption per lyric
/// paragraph, blank caption.
use super::{SlideDescriptor, Slides};
use crate::model::{LayoutKey, PlaceholderSet, Song, names};
use std::iter;

/// Split lyrics into caption pages.
///
/// Lyrics are trimmed and split on blank lines. Every paragraph is trimmed;
/// a paragraph that still began with a line break before trimming (three or
/// more newlines in a row in the input) gets an empty page in front of it, so
/// the caption stays blank for one slide before that paragraph is shown.
pub fn lyric_pages(lyrics: &str) -> Vec<String> {
    let normalized;
    let lyrics = if lyrics.contains('\r') {
        normalized = lyrics.replace("\r\n", "\n");
        normalized.as_str()
    } else {
        lyrics
    };

    let mut pages = Vec::new();
    for paragraph in lyrics.trim().split("\n\n") {
        if paragraph.starts_with('\n') {
            pages.push(String::new());
        }
        pages.push(paragraph.trim().to_string());
    }
    pages
}

fn caption(text: impl Into<String>) -> SlideDescriptor {
    SlideDescriptor::new(
        LayoutKey::Subtitles,
        PlaceholderSet::new().with_text(names::LYRICS, text),
    )
}

pub(super) fn expand(song: &Song) -> Slides<'static> {
    let announcement = SlideDescriptor::new(
        LayoutKey::SongAnnouncementOverlay,
        PlaceholderSet::new()
            .with_text(names::TITLE, &song.title)
            .with_text(names::SUBTITLE, &song.subtitle),
    );

    let slides = iter::once(announcement)
        .chain(iter::once(caption("")))
        .chain(lyric_pages(&song.lyrics).into_iter().map(caption))
        .chain(iter::once(caption("")))
        .map(Ok);

    Box::new(slides)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pages_split_on_blank_lines() {
        assert_eq!(lyric_pages("a\nb\n\nc\n"), vec!["a\nb", "c"]);
    }

    #[test]
    fn test_leading_break_inserts_blank_page() {
        assert_eq!(lyric_pages("a\n\n\nb"), vec!["a", "", "b"]);
    }

    #[test]
    fn test_crlf_lyrics() {
        assert_eq!(lyric_pages("a\r\n\r\nb"), vec!["a", "b"]);
    }

    #[test]
    fn test_empty_lyrics_yield_one_empty_page() {
        assert_eq!(lyric_pages("  \n "), vec![""]);
    }
}
