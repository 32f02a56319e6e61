//! End-to-end build against an in-memory `.pptx` template.
#![cfg(feature = "pptx")]

use pretty_assertions::assert_eq;
use servicedeck::Error;
use servicedeck::bible::StaticVerseProvider;
use servicedeck::build::{BuildOptions, build_pptx};
use servicedeck::document::TemplateBinding;
use servicedeck::model::{BibleReading, Presentation, Prayer, Song};
use servicedeck::ooxml::SlideXml;
use servicedeck::ooxml::rels::parse_relationships;
use std::io::{Cursor, Read, Write};
use zip::ZipArchive;
use zip::write::{SimpleFileOptions, ZipWriter};

const SLIDE_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
const NOTES_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/notesSlide";

fn slide_xml(name: &str, paragraphs: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld name="{}"><p:spTree><p:sp><p:txBody><a:bodyPr/>{}</p:txBody></p:sp></p:spTree></p:cSld></p:sld>"#,
        name, paragraphs
    )
}

/// Template with the three layouts a song, a prayer and a reading need,
/// in a deliberately scrambled order.
fn template() -> Vec<u8> {
    let slides = [
        ("Prayer", r#"<a:p><a:r><a:rPr lang="nl-NL"/><a:t>Laten we bidden</a:t></a:r></a:p>"#),
        (
            "SongAnnouncementOverlay",
            r#"<a:p><a:r><a:rPr lang="nl-NL" b="1"/><a:t>{{Ti</a:t></a:r><a:r><a:rPr lang="nl-NL"/><a:t>tel}}</a:t></a:r></a:p><a:p><a:r><a:t>{{Ondertitel}}</a:t></a:r></a:p>"#,
        ),
        ("Subtitles", r#"<a:p><a:r><a:rPr lang="nl-NL" sz="2800"/><a:t>{{Liedtekst}}</a:t></a:r></a:p>"#),
        (
            "BibleReadingAnnouncement",
            r#"<a:p><a:r><a:t>{{Bijbellezer}}</a:t></a:r></a:p><a:p><a:r><a:t>{{Bijbelgedeelte}}</a:t></a:r></a:p>"#,
        ),
        ("BibleText", r#"<a:p><a:r><a:rPr lang="nl-NL"/><a:t>{{Bijbeltekst}}</a:t></a:r></a:p>"#),
    ];

    let options = SimpleFileOptions::default();
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

    let mut overrides = String::new();
    let mut rels = String::new();
    let mut list = String::new();
    for (i, (name, body)) in slides.iter().enumerate() {
        let n = i + 1;
        overrides.push_str(&format!(
            r#"<Override PartName="/ppt/slides/slide{n}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/><Override PartName="/ppt/notesSlides/notesSlide{n}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.notesSlide+xml"/>"#
        ));
        rels.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="{}" Target="slides/slide{}.xml"/>"#,
            n + 10,
            SLIDE_REL,
            n
        ));
        list.push_str(&format!(r#"<p:sldId id="{}" r:id="rId{}"/>"#, 300 + n, n + 10));

        writer.start_file(format!("ppt/slides/slide{}.xml", n), options).unwrap();
        writer.write_all(slide_xml(name, body).as_bytes()).unwrap();

        writer
            .start_file(format!("ppt/slides/_rels/slide{}.xml.rels", n), options)
            .unwrap();
        writer
            .write_all(
                format!(
                    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout" Target="../slideLayouts/slideLayout1.xml"/><Relationship Id="rId2" Type="{}" Target="../notesSlides/notesSlide{}.xml"/></Relationships>"#,
                    NOTES_REL, n
                )
                .as_bytes(),
            )
            .unwrap();

        writer
            .start_file(format!("ppt/notesSlides/notesSlide{}.xml", n), options)
            .unwrap();
        writer.write_all(b"<p:notes/>").unwrap();
    }

    writer.start_file("[Content_Types].xml", options).unwrap();
    writer
        .write_all(
            format!(
                r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/>{}</Types>"#,
                overrides
            )
            .as_bytes(),
        )
        .unwrap();

    writer.start_file("ppt/presentation.xml", options).unwrap();
    writer
        .write_all(
            format!(
                r#"<p:presentation xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst><p:sldIdLst>{}</p:sldIdLst><p:sldSz cx="12192000" cy="6858000"/></p:presentation>"#,
                list
            )
            .as_bytes(),
        )
        .unwrap();

    writer.start_file("ppt/_rels/presentation.xml.rels", options).unwrap();
    writer
        .write_all(
            format!(
                r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster" Target="slideMasters/slideMaster1.xml"/>{}</Relationships>"#,
                rels
            )
            .as_bytes(),
        )
        .unwrap();

    writer.finish().unwrap().into_inner()
}

struct Package(ZipArchive<Cursor<Vec<u8>>>);

impl Package {
    fn open(bytes: Vec<u8>) -> Self {
        Package(ZipArchive::new(Cursor::new(bytes)).unwrap())
    }

    fn part(&mut self, name: &str) -> Option<String> {
        let mut entry = self.0.by_name(name).ok()?;
        let mut text = String::new();
        entry.read_to_string(&mut text).unwrap();
        Some(text)
    }

    fn slide_texts(&mut self, n: usize) -> Vec<String> {
        let xml = self.part(&format!("ppt/slides/slide{}.xml", n)).unwrap();
        SlideXml::parse(&xml).unwrap().texts()
    }
}

#[test]
fn song_and_prayer_produce_six_slides() {
    let _ = env_logger::builder().is_test(true).try_init();

    let presentation = Presentation::new()
        .with_part(Song::new("Psalm 23", "L1\n\nL2").with_subtitle("Vers 1 en 2"))
        .with_part(Prayer::new());

    let output = build_pptx(
        &template(),
        &presentation,
        &StaticVerseProvider::new(),
        &BuildOptions::new(),
    )
    .unwrap();
    let mut package = Package::open(output);

    let presentation_xml = package.part("ppt/presentation.xml").unwrap();
    let expected_list: String = (0..6)
        .map(|i| format!(r#"<p:sldId id="{}" r:id="rId{}"/>"#, 257 + i, 2 + i))
        .collect();
    assert!(presentation_xml.contains(&format!("<p:sldIdLst>{}</p:sldIdLst>", expected_list)));

    assert_eq!(package.slide_texts(1), vec!["Psalm 23", "Vers 1 en 2"]);
    assert_eq!(package.slide_texts(2), vec![""]);
    assert_eq!(package.slide_texts(3), vec!["L1"]);
    assert_eq!(package.slide_texts(4), vec!["L2"]);
    assert_eq!(package.slide_texts(5), vec![""]);
    assert_eq!(package.slide_texts(6), vec!["Laten we bidden"]);
    assert!(package.part("ppt/slides/slide7.xml").is_none());

    // The split title keeps the bold formatting of the run holding "{{".
    let announcement = package.part("ppt/slides/slide1.xml").unwrap();
    assert!(announcement.contains(r#"<a:rPr lang="nl-NL" b="1"/><a:t>Psalm 23</a:t>"#));

    let rels = parse_relationships(&package.part("ppt/_rels/presentation.xml.rels").unwrap()).unwrap();
    let slide_targets: Vec<&str> = rels
        .iter()
        .filter(|r| r.rel_type == SLIDE_REL)
        .map(|r| r.target.as_str())
        .collect();
    assert_eq!(
        slide_targets,
        (1..=6).map(|n| format!("slides/slide{}.xml", n)).collect::<Vec<_>>()
    );

    let slide_rels = parse_relationships(&package.part("ppt/slides/_rels/slide3.xml.rels").unwrap()).unwrap();
    assert!(slide_rels.iter().all(|r| r.rel_type != NOTES_REL));
    assert!(package.part("ppt/notesSlides/notesSlide1.xml").is_none());

    let types = package.part("[Content_Types].xml").unwrap();
    assert!(types.contains(r#"PartName="/ppt/slides/slide6.xml""#));
    assert!(!types.contains("notesSlide"));
}

#[test]
fn reading_writes_superscript_verse_numbers() {
    let presentation = Presentation::new().with_part(
        BibleReading::new("Anne", "Psalmen").with_passage(23, 1, 2),
    );
    let verses = StaticVerseProvider::new()
        .with_verse("PSA", 23, 1, "De HEER is mijn herder, het ontbreekt mij aan niets.")
        .with_verse("PSA", 23, 2, "Hij laat mij rusten in groene weiden.");

    let output = build_pptx(&template(), &presentation, &verses, &BuildOptions::new()).unwrap();
    let mut package = Package::open(output);

    assert_eq!(package.slide_texts(1), vec!["Anne", "Psalmen 23 : 1 - 2"]);
    let text = package.part("ppt/slides/slide2.xml").unwrap();
    assert!(text.contains(r#"<a:rPr lang="nl-NL" baseline="30000"/><a:t>1</a:t>"#));
    assert!(text.contains(r#"<a:rPr lang="nl-NL" baseline="30000"/><a:t>2</a:t>"#));
    assert!(package.part("ppt/slides/slide3.xml").is_none());
}

#[test]
fn positional_binding_follows_template_order() {
    let presentation = Presentation::new().with_part(Prayer::new());
    let options = BuildOptions::new().with_binding(TemplateBinding::Positional);

    // Under positional binding the Prayer layout (11th) has no template slide.
    let result = build_pptx(&template(), &presentation, &StaticVerseProvider::new(), &options);
    assert!(matches!(result, Err(Error::LayoutBinding(ref name)) if name == "Prayer"));
}

#[test]
fn first_slide_id_is_configurable() {
    let presentation = Presentation::new().with_part(Prayer::new());
    let options = BuildOptions::new().with_first_slide_id(1000);

    let output = build_pptx(&template(), &presentation, &StaticVerseProvider::new(), &options).unwrap();
    let presentation_xml = Package::open(output).part("ppt/presentation.xml").unwrap();
    assert!(presentation_xml.contains(r#"<p:sldId id="1001" r:id="rId2"/>"#));
}

#[test]
fn out_of_range_first_slide_id_is_rejected() {
    let presentation = Presentation::new().with_part(Prayer::new());

    for base in [2_147_483_647, u32::MAX] {
        let options = BuildOptions::new().with_first_slide_id(base);
        let result = build_pptx(&template(), &presentation, &StaticVerseProvider::new(), &options);
        assert!(matches!(result, Err(Error::Configuration(_))));
    }
}
