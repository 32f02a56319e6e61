use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

// Static initialization: automaton is built only once, thread-safe
static XML_ESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::new(["&", "<", ">", "\"", "'"])
        .unwrap_or_else(|e| unreachable!("fixed escape patterns: {}", e))
});

// Named and numeric references are decoded in a single pass so that an
// escaped ampersand never starts a second reference.
static XML_REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(?:#([0-9]+)|#x([0-9a-fA-F]+)|(amp|lt|gt|quot|apos));")
        .unwrap_or_else(|e| unreachable!("fixed reference pattern: {}", e))
});

/// Escape XML special characters.
///
/// # Examples
///
/// ```
/// use servicedeck::ooxml::escape_xml;
/// assert_eq!(escape_xml("a & b"), "a &amp; b");
/// assert_eq!(escape_xml("<\"x\">"), "&lt;&quot;x&quot;&gt;");
/// ```
#[inline]
pub fn escape_xml(s: &str) -> String {
    XML_ESCAPER.replace_all(s, &["&amp;", "&lt;", "&gt;", "&quot;", "&apos;"])
}

/// Unescape XML character and entity references.
///
/// Decodes the five predefined entities plus decimal and hexadecimal
/// character references. Unknown or malformed references are left unchanged.
///
/// # Examples
///
/// ```
/// use servicedeck::ooxml::unescape_xml;
/// assert_eq!(unescape_xml("&lt;a &amp; b&gt;"), "<a & b>");
/// assert_eq!(unescape_xml("Ezechi&#235;l"), "Ezechiël");
/// assert_eq!(unescape_xml("&amp;lt;"), "&lt;");
/// assert_eq!(unescape_xml("&invalid;"), "&invalid;");
/// ```
pub fn unescape_xml(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }

    XML_REFERENCE
        .replace_all(s, |caps: &Captures| {
            let decoded = if let Some(dec) = caps.get(1) {
                dec.as_str().parse::<u32>().ok().and_then(char::from_u32)
            } else if let Some(hex) = caps.get(2) {
                u32::from_str_radix(hex.as_str(), 16).ok().and_then(char::from_u32)
            } else {
                match caps.get(3).map(|m| m.as_str()) {
                    Some("amp") => Some('&'),
                    Some("lt") => Some('<'),
                    Some("gt") => Some('>'),
                    Some("quot") => Some('"'),
                    Some("apos") => Some('\''),
                    _ => None,
                }
            };

            match decoded {
                Some(c) => c.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}
