//! Presentation package backed by a template `.pptx`.
//!
//! Opening a template reads every ZIP entry, binds the template slides
//! (listed in `<p:sldIdLst>`) to layouts and detaches them from the package:
//! the template slides, their relationship parts, their notes slides and the
//! matching content type overrides are not written to the output. Cloning a
//! slide copies its XML and relationships (minus the notes slide link) into a
//! fresh `ppt/slides/slideN.xml` part. [`PptxDeck::finish`] writes the
//! package with the generated slides in clone order.
//!
//! # Example
//!
//! ```rust,no_run
//! use servicedeck::document::{SlideCloner, TemplateBinding};
//! use servicedeck::model::LayoutKey;
//! use servicedeck::ooxml::PptxDeck;
//!
//! let template = std::fs::read("template.pptx")?;
//! let mut deck = PptxDeck::from_bytes(&template, TemplateBinding::Keyed)?;
//! deck.clone_into_output(LayoutKey::Welcome)?;
//! std::fs::write("service.pptx", deck.finish()?)?;
//! # Ok::<(), servicedeck::Error>(())
//! ```

use crate::common::{Error, Result};
use crate::document::{
    ClonedSlide, DEFAULT_SLIDE_ID_BASE, SlideCloner, TemplateBinding, bound, next_slide_id,
};
use crate::model::LayoutKey;
use crate::ooxml::constants::{XML_DECLARATION, content_type, part_name, relationship_type};
use crate::ooxml::rels::{
    ContentTypes, Relationship, next_rel_id, parse_relationships, write_relationships,
};
use crate::ooxml::slide::SlideXml;
use crate::ooxml::uri;
use crate::ooxml::xml::{offset, prefix_of, qualified};
use quick_xml::Reader;
use quick_xml::events::Event;
use std::collections::{BTreeMap, HashSet};
use std::io::{Cursor, Read, Write};
use zip::ZipArchive;
use zip::write::{SimpleFileOptions, ZipWriter};

/// A template slide: its XML and its relationships.
#[derive(Debug, Clone)]
struct TemplateSlide {
    xml: SlideXml,
    rels: Vec<Relationship>,
}

/// A generated slide waiting to be written.
#[derive(Debug)]
struct GeneratedSlide {
    id: u32,
    rel_id: String,
    part: String,
    xml: SlideXml,
    rels: Vec<Relationship>,
}

/// `presentation.xml` split around the slide list.
#[derive(Debug)]
struct PresentationXml {
    head: String,
    tail: String,
    /// Prefix of the PresentationML namespace
    prefix: String,
}

impl PresentationXml {
    fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        let mut fallback = None;

        loop {
            let before = offset(&reader);
            match reader.read_event()? {
                Event::Start(e) if e.local_name().as_ref() == b"sldIdLst" => {
                    let prefix = prefix_of(&e)?;
                    reader.read_to_end(e.name())?;
                    return Ok(Self {
                        head: xml[..before].to_string(),
                        tail: xml[offset(&reader)..].to_string(),
                        prefix,
                    });
                },
                Event::Empty(e) if e.local_name().as_ref() == b"sldIdLst" => {
                    return Ok(Self {
                        head: xml[..before].to_string(),
                        tail: xml[offset(&reader)..].to_string(),
                        prefix: prefix_of(&e)?,
                    });
                },
                // The slide list precedes the slide size; insert it there when absent.
                Event::Start(e) | Event::Empty(e)
                    if e.local_name().as_ref() == b"sldSz" && fallback.is_none() =>
                {
                    fallback = Some((before, prefix_of(&e)?));
                },
                Event::Eof => break,
                _ => {},
            }
        }

        match fallback {
            Some((at, prefix)) => Ok(Self {
                head: xml[..at].to_string(),
                tail: xml[at..].to_string(),
                prefix,
            }),
            None => Err(Error::InvalidFormat(
                "presentation.xml has neither a slide list nor a slide size".to_string(),
            )),
        }
    }

    fn to_xml(&self, slides: &[GeneratedSlide]) -> String {
        let list = qualified(&self.prefix, "sldIdLst");
        let entry = qualified(&self.prefix, "sldId");

        let mut xml = String::with_capacity(self.head.len() + self.tail.len() + slides.len() * 48);
        xml.push_str(&self.head);
        if slides.is_empty() {
            xml.push_str(&format!("<{}/>", list));
        } else {
            xml.push_str(&format!("<{}>", list));
            for slide in slides {
                xml.push_str(&format!(r#"<{} id="{}" r:id="{}"/>"#, entry, slide.id, slide.rel_id));
            }
            xml.push_str(&format!("</{}>", list));
        }
        xml.push_str(&self.tail);
        xml
    }
}

/// Slide references of `<p:sldIdLst>` as (id, relationship id).
fn slide_list(xml: &str) -> Result<Vec<(u32, String)>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut slides = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"sldId" => {
                let mut id = None;
                let mut rel_id = None;
                for attr in e.attributes() {
                    let attr = attr?;
                    let value = std::str::from_utf8(&attr.value)?;
                    match (attr.key.prefix().is_some(), attr.key.local_name().as_ref()) {
                        (false, b"id") => id = value.parse::<u32>().ok(),
                        (true, b"id") => rel_id = Some(value.to_string()),
                        _ => {},
                    }
                }
                match (id, rel_id) {
                    (Some(id), Some(rel_id)) => slides.push((id, rel_id)),
                    _ => log::warn!("skipping malformed slide reference"),
                }
            },
            Event::Eof => break,
            _ => {},
        }
    }

    Ok(slides)
}

/// A presentation package under construction.
#[derive(Debug)]
pub struct PptxDeck {
    /// Package parts kept from the template, in archive order
    parts: Vec<(String, Vec<u8>)>,
    presentation: PresentationXml,
    presentation_rels: Vec<Relationship>,
    content_types: ContentTypes,
    templates: BTreeMap<LayoutKey, TemplateSlide>,
    output: Vec<GeneratedSlide>,
    last_id: u32,
    next_rel: u32,
    next_part: u32,
}

impl PptxDeck {
    /// Open a template package.
    pub fn from_bytes(bytes: &[u8], binding: TemplateBinding) -> Result<Self> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;

        let mut parts = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let mut entry = archive.by_index(i)?;
            if entry.is_dir() {
                continue;
            }
            let mut data = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut data)?;
            parts.push((entry.name().to_string(), data));
        }
        log::debug!("read {} package parts", parts.len());

        let text = |name: &str| -> Result<String> {
            let (_, data) = parts
                .iter()
                .find(|(part, _)| part == name)
                .ok_or_else(|| Error::ComponentNotFound(name.to_string()))?;
            Ok(std::str::from_utf8(data)?.to_string())
        };

        let presentation_xml = text(part_name::PRESENTATION)?;
        let presentation = PresentationXml::parse(&presentation_xml)?;
        let mut presentation_rels = parse_relationships(&text(part_name::PRESENTATION_RELS)?)?;
        let mut content_types = ContentTypes::parse(&text(part_name::CONTENT_TYPES)?)?;

        let pres_dir = uri::base_dir(part_name::PRESENTATION);
        let mut detached: HashSet<String> = HashSet::new();
        let mut named = Vec::new();

        for (_, rel_id) in slide_list(&presentation_xml)? {
            let rel = presentation_rels
                .iter()
                .find(|r| r.id == rel_id)
                .ok_or_else(|| Error::ComponentNotFound(format!("slide relationship {}", rel_id)))?;
            let part = uri::resolve(pres_dir, &rel.target);
            let rels_part = uri::rels_part(&part);

            let xml = SlideXml::parse(&text(&part)?)?;
            let rels = match text(&rels_part) {
                Ok(rels_xml) => parse_relationships(&rels_xml)?,
                Err(Error::ComponentNotFound(_)) => Vec::new(),
                Err(e) => return Err(e),
            };

            for notes in rels.iter().filter(|r| r.rel_type == relationship_type::NOTES_SLIDE) {
                let notes_part = uri::resolve(uri::base_dir(&part), &notes.target);
                detached.insert(uri::rels_part(&notes_part));
                detached.insert(notes_part);
            }
            detached.insert(part);
            detached.insert(rels_part);

            named.push((xml.name().to_string(), TemplateSlide { xml, rels }));
        }

        let template_count = named.len();
        let templates = binding.bind(named);
        log::info!(
            "template has {} slides, {} bound to layouts",
            template_count,
            templates.len()
        );

        presentation_rels.retain(|r| r.rel_type != relationship_type::SLIDE);
        for part in &detached {
            content_types.remove_override(&uri::absolute(part));
        }
        parts.retain(|(name, _)| !detached.contains(name));

        let next_rel = next_rel_id(&presentation_rels);
        Ok(Self {
            parts,
            presentation,
            presentation_rels,
            content_types,
            templates,
            output: Vec::new(),
            last_id: DEFAULT_SLIDE_ID_BASE,
            next_rel,
            next_part: 1,
        })
    }

    /// Start slide identifiers after `base` instead of the default.
    pub fn with_id_base(mut self, base: u32) -> Self {
        self.last_id = base;
        self
    }

    /// Number of generated slides.
    pub fn len(&self) -> usize {
        self.output.len()
    }

    pub fn is_empty(&self) -> bool {
        self.output.is_empty()
    }

    /// Generated slides as (identifier, slide) in output order.
    pub fn slides(&self) -> impl Iterator<Item = (u32, &SlideXml)> {
        self.output.iter().map(|slide| (slide.id, &slide.xml))
    }

    fn allocate_part(&mut self) -> String {
        loop {
            let part = format!("{}/slide{}.xml", part_name::SLIDE_DIR, self.next_part);
            self.next_part += 1;
            if !self.parts.iter().any(|(name, _)| *name == part) {
                return part;
            }
        }
    }

    /// Write the finished package.
    pub fn finish(mut self) -> Result<Vec<u8>> {
        let pres_dir = uri::base_dir(part_name::PRESENTATION);
        for slide in &self.output {
            let target = slide
                .part
                .strip_prefix(pres_dir)
                .map_or(slide.part.as_str(), |t| t.trim_start_matches('/'));
            self.presentation_rels
                .push(Relationship::new(&slide.rel_id, relationship_type::SLIDE, target));
            self.content_types
                .add_override(uri::absolute(&slide.part), content_type::PML_SLIDE);
        }

        let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

        for (name, data) in &self.parts {
            writer.start_file(name.as_str(), options)?;
            match name.as_str() {
                part_name::CONTENT_TYPES => writer.write_all(self.content_types.to_xml().as_bytes())?,
                part_name::PRESENTATION => {
                    writer.write_all(self.presentation.to_xml(&self.output).as_bytes())?
                },
                part_name::PRESENTATION_RELS => {
                    writer.write_all(write_relationships(&self.presentation_rels).as_bytes())?
                },
                _ => writer.write_all(data)?,
            }
        }

        for slide in &self.output {
            writer.start_file(slide.part.as_str(), options)?;
            writer.write_all(slide.xml.to_xml().as_bytes())?;

            writer.start_file(uri::rels_part(&slide.part), options)?;
            writer.write_all(write_relationships(&slide.rels).as_bytes())?;
        }

        let cursor = writer.finish()?;
        log::info!("wrote package with {} slides", self.output.len());
        Ok(cursor.into_inner())
    }
}

impl SlideCloner for PptxDeck {
    type Slide = SlideXml;

    fn template(&self, layout: LayoutKey) -> Result<&SlideXml> {
        bound(&self.templates, layout).map(|template| &template.xml)
    }

    fn clone_into_output(&mut self, layout: LayoutKey) -> Result<ClonedSlide<'_, SlideXml>> {
        let template = bound(&self.templates, layout)?.clone();
        self.last_id = next_slide_id(self.last_id)?;
        let part = self.allocate_part();

        let rel_id = format!("rId{}", self.next_rel);
        self.next_rel += 1;

        let rels = template
            .rels
            .into_iter()
            .filter(|r| r.rel_type != relationship_type::NOTES_SLIDE)
            .collect();

        log::debug!("cloning {} into {} as slide {}", layout, part, self.last_id);
        self.output.push(GeneratedSlide {
            id: self.last_id,
            rel_id,
            part,
            xml: template.xml,
            rels,
        });

        let id = self.last_id;
        let last = self.output.len() - 1;
        Ok(ClonedSlide {
            id,
            slide: &mut self.output[last].xml,
        })
    }
}

/// A minimal presentation package with one named slide per entry.
#[cfg(test)]
pub(crate) fn minimal_package(slides: &[(&str, &str)]) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    let mut types = ContentTypes::default();
    types.defaults.push(("xml".to_string(), "application/xml".to_string()));
    types
        .defaults
        .push(("rels".to_string(), content_type::OPC_RELATIONSHIPS.to_string()));

    let mut pres_rels = vec![Relationship::new(
        "rId1",
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster",
        "slideMasters/slideMaster1.xml",
    )];
    let mut list = String::new();

    for (i, (name, body)) in slides.iter().enumerate() {
        let n = i + 1;
        let rel_id = format!("rId{}", n + 1);
        pres_rels.push(Relationship::new(&rel_id, relationship_type::SLIDE, format!("slides/slide{}.xml", n)));
        list.push_str(&format!(r#"<p:sldId id="{}" r:id="{}"/>"#, DEFAULT_SLIDE_ID_BASE as usize + n, rel_id));
        types.add_override(format!("/ppt/slides/slide{}.xml", n), content_type::PML_SLIDE);
        types.add_override(
            format!("/ppt/notesSlides/notesSlide{}.xml", n),
            "application/vnd.openxmlformats-officedocument.presentationml.notesSlide+xml",
        );

        writer.start_file(format!("ppt/slides/slide{}.xml", n), options)?;
        writer.write_all(
            format!(
                r#"{}<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld name="{}"><p:spTree><p:sp><p:txBody><a:bodyPr/>{}</p:txBody></p:sp></p:spTree></p:cSld></p:sld>"#,
                XML_DECLARATION, name, body
            )
            .as_bytes(),
        )?;

        writer.start_file(format!("ppt/slides/_rels/slide{}.xml.rels", n), options)?;
        writer.write_all(
            write_relationships(&[
                Relationship::new(
                    "rId1",
                    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout",
                    "../slideLayouts/slideLayout1.xml",
                ),
                Relationship::new(
                    "rId2",
                    relationship_type::NOTES_SLIDE,
                    format!("../notesSlides/notesSlide{}.xml", n),
                ),
            ])
            .as_bytes(),
        )?;

        writer.start_file(format!("ppt/notesSlides/notesSlide{}.xml", n), options)?;
        writer.write_all(b"<p:notes/>")?;
    }

    types.add_override("/ppt/presentation.xml", "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml");

    writer.start_file(part_name::CONTENT_TYPES, options)?;
    writer.write_all(types.to_xml().as_bytes())?;

    writer.start_file(part_name::PRESENTATION, options)?;
    writer.write_all(
        format!(
            r#"{}<p:presentation xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst><p:sldIdLst>{}</p:sldIdLst><p:sldSz cx="12192000" cy="6858000"/></p:presentation>"#,
            XML_DECLARATION, list
        )
        .as_bytes(),
    )?;

    writer.start_file(part_name::PRESENTATION_RELS, options)?;
    writer.write_all(write_relationships(&pres_rels).as_bytes())?;

    Ok(writer.finish()?.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{RunParagraph, SlideTree};
    use crate::model::PlaceholderSet;
    use crate::substitute::substitute_slide;
    use pretty_assertions::assert_eq;

    fn template() -> Vec<u8> {
        minimal_package(&[
            ("Prayer", "<a:p><a:r><a:t>Gebed</a:t></a:r></a:p>"),
            ("Subtitles", "<a:p><a:r><a:t>{{Subtitle}}</a:t></a:r></a:p><a:p><a:r><a:t>{{Lyrics}}</a:t></a:r></a:p>"),
        ])
        .unwrap()
    }

    fn read_part(package: &[u8], name: &str) -> Option<String> {
        let mut archive = ZipArchive::new(Cursor::new(package)).unwrap();
        let mut entry = archive.by_name(name).ok()?;
        let mut text = String::new();
        entry.read_to_string(&mut text).unwrap();
        Some(text)
    }

    #[test]
    fn test_open_binds_by_name() {
        let deck = PptxDeck::from_bytes(&template(), TemplateBinding::Keyed).unwrap();
        assert_eq!(deck.template(LayoutKey::Prayer).unwrap().texts(), vec!["Gebed"]);
        assert!(matches!(
            deck.template(LayoutKey::Welcome),
            Err(Error::LayoutBinding(_))
        ));
        assert!(deck.is_empty());
    }

    #[test]
    fn test_open_binds_by_position() {
        let deck = PptxDeck::from_bytes(&template(), TemplateBinding::Positional).unwrap();
        assert_eq!(deck.template(LayoutKey::WelcomePrior).unwrap().name(), "Prayer");
        assert_eq!(deck.template(LayoutKey::LiturgyPrior).unwrap().name(), "Subtitles");
    }

    #[test]
    fn test_finish_writes_only_generated_slides() {
        let mut deck = PptxDeck::from_bytes(&template(), TemplateBinding::Keyed).unwrap();

        let cloned = deck.clone_into_output(LayoutKey::Subtitles).unwrap();
        assert_eq!(cloned.id, 257);
        let placeholders = PlaceholderSet::new()
            .with_text("Subtitle", "Psalm 23")
            .with_text("Lyrics", "De Heer is mijn herder");
        assert_eq!(substitute_slide(cloned.slide, &placeholders), 2);

        assert_eq!(deck.clone_into_output(LayoutKey::Prayer).unwrap().id, 258);
        let package = deck.finish().unwrap();

        let presentation = read_part(&package, "ppt/presentation.xml").unwrap();
        assert!(presentation.contains(r#"<p:sldIdLst><p:sldId id="257" r:id="rId2"/><p:sldId id="258" r:id="rId3"/></p:sldIdLst>"#));

        let first = read_part(&package, "ppt/slides/slide1.xml").unwrap();
        assert_eq!(
            SlideXml::parse(&first).unwrap().texts(),
            vec!["Psalm 23", "De Heer is mijn herder"]
        );
        let second = read_part(&package, "ppt/slides/slide2.xml").unwrap();
        assert_eq!(SlideXml::parse(&second).unwrap().texts(), vec!["Gebed"]);

        let rels = parse_relationships(&read_part(&package, "ppt/slides/_rels/slide1.xml.rels").unwrap()).unwrap();
        assert_eq!(rels.len(), 1);
        assert!(rels.iter().all(|r| r.rel_type != relationship_type::NOTES_SLIDE));

        assert!(read_part(&package, "ppt/notesSlides/notesSlide1.xml").is_none());
        let types = read_part(&package, "[Content_Types].xml").unwrap();
        assert!(!types.contains("notesSlide"));
        assert!(types.contains("/ppt/slides/slide2.xml"));
    }

    #[test]
    fn test_template_stays_pristine_between_clones() {
        let mut deck = PptxDeck::from_bytes(&template(), TemplateBinding::Keyed).unwrap();
        let cloned = deck.clone_into_output(LayoutKey::Subtitles).unwrap();
        for paragraph in cloned.slide.paragraphs_mut() {
            paragraph.take_runs();
        }
        let again = deck.clone_into_output(LayoutKey::Subtitles).unwrap();
        assert_eq!(again.slide.texts(), vec!["{{Subtitle}}", "{{Lyrics}}"]);
    }

    #[test]
    fn test_empty_output_writes_empty_slide_list() {
        let deck = PptxDeck::from_bytes(&template(), TemplateBinding::Keyed).unwrap();
        let package = deck.finish().unwrap();
        let presentation = read_part(&package, "ppt/presentation.xml").unwrap();
        assert!(presentation.contains("<p:sldIdLst/>"));
        assert!(read_part(&package, "ppt/slides/slide1.xml").is_none());
    }

    #[test]
    fn test_missing_presentation_part() {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer.start_file("[Content_Types].xml", SimpleFileOptions::default()).unwrap();
        writer.write_all(b"<Types/>").unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        assert!(matches!(
            PptxDeck::from_bytes(&bytes, TemplateBinding::Keyed),
            Err(Error::ComponentNotFound(_))
        ));
    }
}
