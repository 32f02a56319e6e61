//! Small helpers over quick-xml events.

use crate::common::Result;
use crate::ooxml::escape::unescape_xml;
use quick_xml::Reader;
use quick_xml::events::BytesStart;

/// Attributes of a start tag as (qualified name, raw escaped value) pairs.
pub(crate) fn raw_attributes(e: &BytesStart<'_>) -> Result<Vec<(String, String)>> {
    let mut attrs = Vec::new();
    for attr in e.attributes() {
        let attr = attr?;
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let value = std::str::from_utf8(&attr.value)?;
        attrs.push((key.to_string(), value.to_string()));
    }
    Ok(attrs)
}

/// Unescaped value of the attribute whose local name is `name`.
pub(crate) fn attribute(e: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.local_name().as_ref() == name {
            return Ok(Some(unescape_xml(std::str::from_utf8(&attr.value)?)));
        }
    }
    Ok(None)
}

/// Namespace prefix of a qualified tag name (`a` for `a:p`), empty when absent.
pub(crate) fn prefix_of(e: &BytesStart<'_>) -> Result<String> {
    let qname = e.name();
    let name = std::str::from_utf8(qname.as_ref())?;
    Ok(name.split_once(':').map_or("", |(prefix, _)| prefix).to_string())
}

/// Qualified name built from a prefix and a local name.
pub(crate) fn qualified(prefix: &str, local: &str) -> String {
    if prefix.is_empty() {
        local.to_string()
    } else {
        format!("{}:{}", prefix, local)
    }
}

/// Current reader offset into the source string.
#[inline]
pub(crate) fn offset(reader: &Reader<&[u8]>) -> usize {
    reader.buffer_position() as usize
}
