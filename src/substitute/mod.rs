//! Placeholder substitution over styled runs.
//!
//! Template text carries tokens of the form `{{Name}}`. Editors routinely split
//! such a token over several runs (spell checking, a stray formatting change
//! on one brace), so tokens are matched against the concatenated text of the
//! whole paragraph rather than run by run.
//!
//! For each placeholder name the engine:
//!
//! 1. concatenates the run texts and finds every case-insensitive match of
//!    the token, once, before any edit;
//! 2. keeps every run that no match touches exactly as it is;
//! 3. splits every run a match touches into the unmatched text before the
//!    match, the replacement values, and the unmatched text after it. Only the
//!    run holding the first character of a match receives the values; each
//!    value becomes a new run with that run's style plus the value's own
//!    override (superscript);
//! 4. drops the empty fragments this produces, along with any empty text
//!    run lying inside a match.
//!
//! An empty value list deletes the token. Because matches are computed up
//! front, a value that itself contains the token is never matched again.
//!
//! # Example
//!
//! ```rust
//! use servicedeck::document::RunParagraph;
//! use servicedeck::document::memory::{MemoryParagraph, MemoryRun};
//! use servicedeck::model::PlaceholderSet;
//! use servicedeck::substitute::substitute;
//!
//! let mut paragraph = MemoryParagraph::new(vec![
//!     MemoryRun::new("Lied: {{Ti"),
//!     MemoryRun::new("tle}}!"),
//! ]);
//! let placeholders = PlaceholderSet::new().with_text("Title", "Psalm 23");
//!
//! assert_eq!(substitute(&mut paragraph, &placeholders), 1);
//! assert_eq!(paragraph.text(), "Lied: Psalm 23!");
//! ```

use crate::document::{RunParagraph, SlideTree, TextRun};
use crate::model::{PlaceholderSet, PlaceholderValue};
use regex::Regex;
use std::ops::Range;

/// The literal token for a placeholder name.
#[inline]
pub fn token(name: &str) -> String {
    format!("{{{{{}}}}}", name)
}

/// Case-insensitive matcher for the token of `name`.
pub fn token_pattern(name: &str) -> Regex {
    let pattern = format!("(?i){}", regex::escape(&token(name)));
    // An escaped literal always compiles.
    Regex::new(&pattern).unwrap_or_else(|_| unreachable!("escaped literal pattern: {}", pattern))
}

/// Byte ranges of every token match in the concatenated run text.
fn find_matches<R: TextRun>(runs: &[R], pattern: &Regex) -> Vec<Range<usize>> {
    let combined: String = runs.iter().map(TextRun::text).collect();
    pattern.find_iter(&combined).map(|m| m.range()).collect()
}

fn push_fragment<R: TextRun>(out: &mut Vec<R>, run: &R, text: &str) {
    if !text.is_empty() {
        out.push(run.fork(text));
    }
}

fn push_values<R: TextRun>(out: &mut Vec<R>, run: &R, values: &[PlaceholderValue]) {
    for value in values.iter().filter(|v| !v.text.is_empty()) {
        let mut inserted = run.fork(&value.text);
        if value.superscript {
            inserted.set_superscript(true);
        }
        out.push(inserted);
    }
}

/// Replace every occurrence of `pattern` in `runs` with `values`.
///
/// Returns the rewritten runs and the number of matches replaced.
pub fn replace_in_runs<R: TextRun>(
    runs: Vec<R>,
    pattern: &Regex,
    values: &[PlaceholderValue],
) -> (Vec<R>, usize) {
    let matches = find_matches(&runs, pattern);
    if matches.is_empty() {
        return (runs, 0);
    }

    let mut out = Vec::with_capacity(runs.len() + matches.len() * values.len());
    let mut offset = 0;

    for run in runs {
        let len = run.text().len();
        let (start, end) = (offset, offset + len);
        offset = end;

        let mut hits = matches
            .iter()
            .filter(|m| m.start < end && start < m.end)
            .peekable();

        if len == 0 {
            let inside = matches.iter().any(|m| m.start < start && start < m.end);
            if !inside || run.is_markup() {
                out.push(run);
            }
            continue;
        }

        if hits.peek().is_none() {
            out.push(run);
            continue;
        }

        let text = run.text();
        let mut cursor = start;
        for hit in hits {
            if hit.start > cursor {
                push_fragment(&mut out, &run, &text[cursor - start..hit.start - start]);
            }
            if hit.start >= start {
                push_values(&mut out, &run, values);
            }
            cursor = cursor.max(hit.end.min(end));
        }
        if cursor < end {
            push_fragment(&mut out, &run, &text[cursor - start..]);
        }
    }

    (out, matches.len())
}

/// Substitute every placeholder of `placeholders` in one paragraph.
///
/// Names are processed in the set's order. Returns the number of tokens
/// replaced; a name whose token does not occur is a no-op.
pub fn substitute<P: RunParagraph>(paragraph: &mut P, placeholders: &PlaceholderSet) -> usize {
    let mut replaced = 0;

    for (name, values) in placeholders.iter() {
        let pattern = token_pattern(name);
        if find_matches(paragraph.runs(), &pattern).is_empty() {
            continue;
        }

        let (runs, count) = replace_in_runs(paragraph.take_runs(), &pattern, values);
        paragraph.set_runs(runs);
        log::debug!("replaced {} occurrence(s) of {}", count, token(name));
        replaced += count;
    }

    replaced
}

/// Substitute placeholders in every paragraph of a slide.
pub fn substitute_slide<S: SlideTree>(slide: &mut S, placeholders: &PlaceholderSet) -> usize {
    slide
        .paragraphs_mut()
        .map(|paragraph| substitute(paragraph, placeholders))
        .sum()
}
