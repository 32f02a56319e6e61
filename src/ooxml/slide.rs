//! Editable view of a slide part.
//!
//! A slide is kept as its original XML, cut into segments: raw markup that is
//! written back byte for byte, and DrawingML paragraphs (`<a:p>`) whose
//! children are parsed into runs. Only text runs (`<a:r>`) are interpreted.
//! Everything else inside a paragraph (properties, breaks, fields) is kept as
//! opaque markup and exposes no text, so substitution leaves it where it is.

use crate::common::{Error, Result};
use crate::document::{RunParagraph, SUPERSCRIPT_BASELINE, SlideTree, TextRun};
use crate::ooxml::escape::{escape_xml, unescape_xml};
use crate::ooxml::xml::{attribute, offset, prefix_of, qualified, raw_attributes};
use quick_xml::Reader;
use quick_xml::events::Event;

/// Character properties of a run (`<a:rPr>`).
///
/// Attribute values are kept escaped, exactly as they were read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunProps {
    pub attrs: Vec<(String, String)>,
    /// Inner markup (fills, fonts, hyperlinks)
    pub body: Option<String>,
}

impl RunProps {
    /// Raw value of an attribute.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(key, _)| key == name) {
            Some(entry) => entry.1 = value,
            None => self.attrs.push((name.to_string(), value)),
        }
    }

    pub fn remove(&mut self, name: &str) {
        self.attrs.retain(|(key, _)| key != name);
    }

    fn is_empty(&self) -> bool {
        self.attrs.is_empty() && self.body.is_none()
    }

    fn write(&self, prefix: &str, tag: &str, out: &mut String) {
        let name = qualified(prefix, tag);
        out.push('<');
        out.push_str(&name);
        for (key, value) in &self.attrs {
            out.push_str(&format!(r#" {}="{}""#, key, value));
        }
        match &self.body {
            Some(body) => {
                out.push('>');
                out.push_str(body);
                out.push_str(&format!("</{}>", name));
            },
            None => out.push_str("/>"),
        }
    }
}

/// A paragraph child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawingRun {
    /// A text run (`<a:r>`) with unescaped text
    Text {
        prefix: String,
        props: RunProps,
        text: String,
    },
    /// Any other child, kept verbatim
    Opaque(String),
}

impl DrawingRun {
    /// A text run with no character properties.
    pub fn text(prefix: impl Into<String>, text: impl Into<String>) -> Self {
        DrawingRun::Text {
            prefix: prefix.into(),
            props: RunProps::default(),
            text: text.into(),
        }
    }

    /// Character properties of a text run.
    pub fn props(&self) -> Option<&RunProps> {
        match self {
            DrawingRun::Text { props, .. } => Some(props),
            DrawingRun::Opaque(_) => None,
        }
    }

    /// Serialize the run. Line feeds become `<a:br>` elements carrying the
    /// run's properties.
    fn write(&self, out: &mut String) {
        match self {
            DrawingRun::Text {
                prefix,
                props,
                text,
            } => {
                let run = qualified(prefix, "r");
                let t = qualified(prefix, "t");
                for (i, line) in text.split('\n').enumerate() {
                    if i > 0 {
                        let br = qualified(prefix, "br");
                        if props.is_empty() {
                            out.push_str(&format!("<{}/>", br));
                        } else {
                            out.push_str(&format!("<{}>", br));
                            props.write(prefix, "rPr", out);
                            out.push_str(&format!("</{}>", br));
                        }
                    }
                    if line.is_empty() && i > 0 {
                        continue;
                    }
                    out.push_str(&format!("<{}>", run));
                    if !props.is_empty() {
                        props.write(prefix, "rPr", out);
                    }
                    out.push_str(&format!("<{}>{}</{}>", t, escape_xml(line), t));
                    out.push_str(&format!("</{}>", run));
                }
            },
            DrawingRun::Opaque(xml) => out.push_str(xml),
        }
    }
}

impl TextRun for DrawingRun {
    fn text(&self) -> &str {
        match self {
            DrawingRun::Text { text, .. } => text,
            DrawingRun::Opaque(_) => "",
        }
    }

    fn fork(&self, text: &str) -> Self {
        match self {
            DrawingRun::Text { prefix, props, .. } => DrawingRun::Text {
                prefix: prefix.clone(),
                props: props.clone(),
                text: text.to_string(),
            },
            DrawingRun::Opaque(_) => DrawingRun::text("a", text),
        }
    }

    fn set_superscript(&mut self, superscript: bool) {
        if let DrawingRun::Text { props, .. } = self {
            if superscript {
                props.set("baseline", SUPERSCRIPT_BASELINE.to_string());
            } else {
                props.remove("baseline");
            }
        }
    }

    fn is_markup(&self) -> bool {
        matches!(self, DrawingRun::Opaque(_))
    }
}

/// A DrawingML paragraph (`<a:p>`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawingParagraph {
    /// Start tag, verbatim
    open: String,
    items: Vec<DrawingRun>,
    /// End tag, verbatim
    close: String,
}

impl DrawingParagraph {
    /// Parse one `<a:p>...</a:p>` element.
    pub fn parse(src: &str) -> Result<Self> {
        let mut reader = Reader::from_str(src);

        let open = match reader.read_event()? {
            Event::Start(_) => src[..offset(&reader)].to_string(),
            _ => return Err(Error::XmlError("expected paragraph start tag".to_string())),
        };

        let mut items = Vec::new();
        loop {
            let before = offset(&reader);
            match reader.read_event()? {
                Event::Start(e) => {
                    let is_run = e.local_name().as_ref() == b"r";
                    reader.read_to_end(e.name())?;
                    let child = &src[before..offset(&reader)];
                    items.push(if is_run {
                        parse_run(child)?
                    } else {
                        DrawingRun::Opaque(child.to_string())
                    });
                },
                Event::End(_) => {
                    return Ok(Self {
                        open,
                        items,
                        close: src[before..offset(&reader)].to_string(),
                    });
                },
                Event::Eof => return Err(Error::XmlError("unclosed paragraph".to_string())),
                _ => items.push(DrawingRun::Opaque(src[before..offset(&reader)].to_string())),
            }
        }
    }

    pub fn items(&self) -> &[DrawingRun] {
        &self.items
    }

    fn write(&self, out: &mut String) {
        out.push_str(&self.open);
        for item in &self.items {
            item.write(out);
        }
        out.push_str(&self.close);
    }
}

impl RunParagraph for DrawingParagraph {
    type Run = DrawingRun;

    fn runs(&self) -> &[DrawingRun] {
        &self.items
    }

    fn take_runs(&mut self) -> Vec<DrawingRun> {
        std::mem::take(&mut self.items)
    }

    fn set_runs(&mut self, runs: Vec<DrawingRun>) {
        self.items = runs;
    }
}

/// Parse one `<a:r>...</a:r>` element.
fn parse_run(src: &str) -> Result<DrawingRun> {
    let mut reader = Reader::from_str(src);

    let mut prefix = String::new();
    let mut props = RunProps::default();
    let mut text = String::new();

    loop {
        let before = offset(&reader);
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"r" => prefix = prefix_of(&e)?,
                b"rPr" => {
                    props.attrs = raw_attributes(&e)?;
                    let inner = offset(&reader);
                    reader.read_to_end(e.name())?;
                    props.body = Some(inner_markup(src, inner, offset(&reader)).to_string());
                },
                b"t" => {
                    let inner = offset(&reader);
                    reader.read_to_end(e.name())?;
                    text.push_str(&unescape_xml(inner_markup(src, inner, offset(&reader))));
                },
                _ => {
                    // Unknown run children carry no text; keep the run's text only.
                    log::debug!("dropping run child {:?}", &src[before..offset(&reader)]);
                    reader.read_to_end(e.name())?;
                },
            },
            Event::Empty(e) => {
                if e.local_name().as_ref() == b"rPr" {
                    props.attrs = raw_attributes(&e)?;
                }
            },
            Event::Eof => break,
            _ => {},
        }
    }

    Ok(DrawingRun::Text {
        prefix,
        props,
        text,
    })
}

/// Markup between the end of a start tag and the start of its end tag.
fn inner_markup(src: &str, inner_start: usize, element_end: usize) -> &str {
    let element = &src[inner_start..element_end];
    match element.rfind("</") {
        Some(close) => &element[..close],
        None => element,
    }
}

/// A slide segment.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Raw(String),
    Paragraph(DrawingParagraph),
}

/// Parsed slide part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideXml {
    /// `name` attribute of `<p:cSld>`
    name: Option<String>,
    segments: Vec<Segment>,
}

impl SlideXml {
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);

        let mut name = None;
        let mut segments = Vec::new();
        let mut raw_start = 0;

        loop {
            let before = offset(&reader);
            match reader.read_event()? {
                Event::Start(e) if e.local_name().as_ref() == b"p" => {
                    reader.read_to_end(e.name())?;
                    let end = offset(&reader);
                    if raw_start < before {
                        segments.push(Segment::Raw(xml[raw_start..before].to_string()));
                    }
                    segments.push(Segment::Paragraph(DrawingParagraph::parse(&xml[before..end])?));
                    raw_start = end;
                },
                Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"cSld" => {
                    name = attribute(&e, b"name")?;
                },
                Event::Eof => break,
                _ => {},
            }
        }

        if raw_start < xml.len() {
            segments.push(Segment::Raw(xml[raw_start..].to_string()));
        }

        Ok(Self { name, segments })
    }

    /// Slide name, empty when the slide has none.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    pub fn paragraphs(&self) -> impl Iterator<Item = &DrawingParagraph> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Paragraph(paragraph) => Some(paragraph),
            Segment::Raw(_) => None,
        })
    }

    /// Text of every paragraph, one entry per paragraph.
    pub fn texts(&self) -> Vec<String> {
        self.paragraphs().map(RunParagraph::text).collect()
    }

    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Raw(raw) => out.push_str(raw),
                Segment::Paragraph(paragraph) => paragraph.write(&mut out),
            }
        }
        out
    }
}

impl SlideTree for SlideXml {
    type Paragraph = DrawingParagraph;

    fn paragraphs_mut(&mut self) -> impl Iterator<Item = &mut DrawingParagraph> {
        self.segments.iter_mut().filter_map(|segment| match segment {
            Segment::Paragraph(paragraph) => Some(paragraph),
            Segment::Raw(_) => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PlaceholderSet, PlaceholderValue};
    use crate::substitute::substitute_slide;
    use pretty_assertions::assert_eq;

    const SLIDE: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld name="Subtitles"><p:spTree><p:sp><p:txBody><a:bodyPr/><a:p><a:pPr algn="ctr"/><a:r><a:rPr lang="nl-NL" b="1"><a:solidFill><a:srgbClr val="FFFFFF"/></a:solidFill></a:rPr><a:t>{{Ti</a:t></a:r><a:r><a:rPr lang="nl-NL" i="1"/><a:t>tle}} &amp; meer</a:t></a:r><a:endParaRPr lang="nl-NL"/></a:p><a:p><a:r><a:t>{{Lyrics}}</a:t></a:r></a:p></p:txBody></p:sp></p:spTree></p:cSld></p:sld>"#;

    #[test]
    fn test_parse_keeps_markup() {
        let slide = SlideXml::parse(SLIDE).unwrap();
        assert_eq!(slide.name(), "Subtitles");
        assert_eq!(slide.texts(), vec!["{{Title}} & meer", "{{Lyrics}}"]);

        let first = slide.paragraphs().next().unwrap();
        assert!(matches!(&first.items()[0], DrawingRun::Opaque(x) if x == r#"<a:pPr algn="ctr"/>"#));
        assert_eq!(first.items()[1].props().unwrap().get("b"), Some("1"));
    }

    #[test]
    fn test_untouched_slide_writes_equivalent_xml() {
        let slide = SlideXml::parse(SLIDE).unwrap();
        let reparsed = SlideXml::parse(&slide.to_xml()).unwrap();
        assert_eq!(reparsed, slide);
    }

    #[test]
    fn test_substitution_rewrites_runs() {
        let mut slide = SlideXml::parse(SLIDE).unwrap();
        let placeholders = PlaceholderSet::new()
            .with_text("Title", "Psalm <23>")
            .with_values(
                "Lyrics",
                vec![PlaceholderValue::superscript("1"), PlaceholderValue::plain("De Heer is mijn herder")],
            );

        assert_eq!(substitute_slide(&mut slide, &placeholders), 2);
        let xml = slide.to_xml();

        assert!(xml.contains(r#"<a:rPr lang="nl-NL" b="1"><a:solidFill><a:srgbClr val="FFFFFF"/></a:solidFill></a:rPr><a:t>Psalm &lt;23&gt;</a:t>"#));
        assert!(xml.contains(r#"<a:rPr lang="nl-NL" i="1"/><a:t> &amp; meer</a:t>"#));
        assert!(xml.contains(r#"<a:r><a:rPr baseline="30000"/><a:t>1</a:t></a:r>"#));
        assert!(!xml.contains("{{"));
        assert!(xml.contains(r#"<a:endParaRPr lang="nl-NL"/>"#));

        let reparsed = SlideXml::parse(&xml).unwrap();
        assert_eq!(reparsed.texts(), vec!["Psalm <23> & meer", "1De Heer is mijn herder"]);
    }

    #[test]
    fn test_line_feed_becomes_break() {
        let mut slide = SlideXml::parse(SLIDE).unwrap();
        let placeholders = PlaceholderSet::new().with_text("Lyrics", "regel een\nregel twee");
        substitute_slide(&mut slide, &placeholders);

        let xml = slide.to_xml();
        assert!(xml.contains("<a:r><a:t>regel een</a:t></a:r><a:br/><a:r><a:t>regel twee</a:t></a:r>"));
    }

    #[test]
    fn test_markup_inside_token_survives_empty_runs_do_not() {
        let mut paragraph = DrawingParagraph::parse(
            "<a:p><a:r><a:t>{{Ti</a:t></a:r><a:r><a:t></a:t></a:r><a:br/><a:r><a:t>tel}}</a:t></a:r></a:p>",
        )
        .unwrap();
        let placeholders = PlaceholderSet::new().with_text("Titel", "X");

        assert_eq!(crate::substitute::substitute(&mut paragraph, &placeholders), 1);

        let mut xml = String::new();
        paragraph.write(&mut xml);
        assert_eq!(xml, "<a:p><a:r><a:t>X</a:t></a:r><a:br/></a:p>");
    }

    #[test]
    fn test_unclosed_paragraph_is_an_error() {
        assert!(DrawingParagraph::parse("<a:p><a:r><a:t>x</a:t></a:r>").is_err());
    }
}
