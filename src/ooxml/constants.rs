//! Constant values of the Open Packaging Convention used by presentation packages.

/// Content type URIs (like MIME-types) that specify a part's format
pub mod content_type {
    pub const PML_SLIDE: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";
    pub const OPC_RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";
}

/// XML namespace URIs
pub mod namespace {
    /// OPC relationships namespace
    pub const OPC_RELATIONSHIPS: &str =
        "http://schemas.openxmlformats.org/package/2006/relationships";

    /// OPC content types namespace
    pub const OPC_CONTENT_TYPES: &str =
        "http://schemas.openxmlformats.org/package/2006/content-types";
}

/// Relationship type URIs
pub mod relationship_type {
    pub const SLIDE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
    pub const NOTES_SLIDE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/notesSlide";
}

/// Well-known part names
pub mod part_name {
    pub const CONTENT_TYPES: &str = "[Content_Types].xml";
    pub const PRESENTATION: &str = "ppt/presentation.xml";
    pub const PRESENTATION_RELS: &str = "ppt/_rels/presentation.xml.rels";
    pub const SLIDE_DIR: &str = "ppt/slides";
}

/// XML declaration written at the top of regenerated parts
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
