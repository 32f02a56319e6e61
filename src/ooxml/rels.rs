//! Relationship parts and the content type stream.

use crate::common::Result;
use crate::ooxml::constants::{XML_DECLARATION, namespace};
use crate::ooxml::escape::escape_xml;
use crate::ooxml::xml::attribute;
use quick_xml::Reader;
use quick_xml::events::Event;

/// One `<Relationship>` of a `.rels` part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
    /// `External` for hyperlinks and other out-of-package targets
    pub target_mode: Option<String>,
}

impl Relationship {
    pub fn new(id: impl Into<String>, rel_type: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            rel_type: rel_type.into(),
            target: target.into(),
            target_mode: None,
        }
    }

    #[inline]
    pub fn is_external(&self) -> bool {
        self.target_mode.as_deref() == Some("External")
    }
}

/// Parse the relationships of a `.rels` part.
pub fn parse_relationships(xml: &str) -> Result<Vec<Relationship>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut rels = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                rels.push(Relationship {
                    id: attribute(&e, b"Id")?.unwrap_or_default(),
                    rel_type: attribute(&e, b"Type")?.unwrap_or_default(),
                    target: attribute(&e, b"Target")?.unwrap_or_default(),
                    target_mode: attribute(&e, b"TargetMode")?,
                });
            },
            Event::Eof => break,
            _ => {},
        }
    }

    Ok(rels)
}

/// Serialize relationships into a `.rels` part.
pub fn write_relationships(rels: &[Relationship]) -> String {
    let mut xml = String::with_capacity(128 + rels.len() * 160);
    xml.push_str(XML_DECLARATION);
    xml.push_str(&format!(r#"<Relationships xmlns="{}">"#, namespace::OPC_RELATIONSHIPS));

    for rel in rels {
        xml.push_str(&format!(
            r#"<Relationship Id="{}" Type="{}" Target="{}""#,
            escape_xml(&rel.id),
            escape_xml(&rel.rel_type),
            escape_xml(&rel.target)
        ));
        if let Some(mode) = &rel.target_mode {
            xml.push_str(&format!(r#" TargetMode="{}""#, escape_xml(mode)));
        }
        xml.push_str("/>");
    }

    xml.push_str("</Relationships>");
    xml
}

/// Next free `rIdN` identifier.
pub fn next_rel_id(rels: &[Relationship]) -> u32 {
    rels.iter()
        .filter_map(|r| r.id.strip_prefix("rId")?.parse::<u32>().ok())
        .max()
        .unwrap_or(0)
        + 1
}

/// The `[Content_Types].xml` stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentTypes {
    /// (extension, content type)
    pub defaults: Vec<(String, String)>,
    /// (absolute part name, content type)
    pub overrides: Vec<(String, String)>,
}

impl ContentTypes {
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut types = ContentTypes::default();
        loop {
            match reader.read_event()? {
                Event::Start(e) | Event::Empty(e) => match e.local_name().as_ref() {
                    b"Default" => types.defaults.push((
                        attribute(&e, b"Extension")?.unwrap_or_default(),
                        attribute(&e, b"ContentType")?.unwrap_or_default(),
                    )),
                    b"Override" => types.overrides.push((
                        attribute(&e, b"PartName")?.unwrap_or_default(),
                        attribute(&e, b"ContentType")?.unwrap_or_default(),
                    )),
                    _ => {},
                },
                Event::Eof => break,
                _ => {},
            }
        }

        Ok(types)
    }

    /// Drop the override of a part (absolute name, case-insensitive).
    pub fn remove_override(&mut self, part_name: &str) {
        self.overrides
            .retain(|(name, _)| !name.eq_ignore_ascii_case(part_name));
    }

    pub fn add_override(&mut self, part_name: impl Into<String>, content_type: impl Into<String>) {
        self.overrides.push((part_name.into(), content_type.into()));
    }

    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(256 + self.overrides.len() * 160);
        xml.push_str(XML_DECLARATION);
        xml.push_str(&format!(r#"<Types xmlns="{}">"#, namespace::OPC_CONTENT_TYPES));

        for (extension, content_type) in &self.defaults {
            xml.push_str(&format!(
                r#"<Default Extension="{}" ContentType="{}"/>"#,
                escape_xml(extension),
                escape_xml(content_type)
            ));
        }
        for (part_name, content_type) in &self.overrides {
            xml.push_str(&format!(
                r#"<Override PartName="{}" ContentType="{}"/>"#,
                escape_xml(part_name),
                escape_xml(content_type)
            ));
        }

        xml.push_str("</Types>");
        xml
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide1.xml"/>
  <Relationship Id="rId9" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="https://example.org/?a=1&amp;b=2" TargetMode="External"/>
</Relationships>"#;

    #[test]
    fn test_parse_relationships() {
        let rels = parse_relationships(RELS).unwrap();
        assert_eq!(rels.len(), 2);
        assert_eq!(rels[0].target, "slides/slide1.xml");
        assert!(rels[1].is_external());
        assert_eq!(rels[1].target, "https://example.org/?a=1&b=2");
        assert_eq!(next_rel_id(&rels), 10);
    }

    #[test]
    fn test_relationships_survive_rewrite() {
        let rels = parse_relationships(RELS).unwrap();
        let reparsed = parse_relationships(&write_relationships(&rels)).unwrap();
        assert_eq!(reparsed, rels);
    }

    #[test]
    fn test_content_type_overrides() {
        let xml = r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/><Override PartName="/ppt/slides/slide1.xml" ContentType="x"/></Types>"#;
        let mut types = ContentTypes::parse(xml).unwrap();
        assert_eq!(types.defaults.len(), 1);

        types.remove_override("/PPT/slides/slide1.xml");
        types.add_override("/ppt/slides/slide2.xml", "y");
        assert_eq!(
            types.overrides,
            vec![("/ppt/slides/slide2.xml".to_string(), "y".to_string())]
        );
    }
}
