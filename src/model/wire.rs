/// JSON encoding of content parts.
///
/// A part is a flat object whose first field is the `Type` discriminator,
/// followed by the variant's own fields in PascalCase. Decoding checks the
/// discriminator before handing the object to serde so an unknown type is
/// reported as [`Error::UnsupportedVariant`] rather than a generic JSON error.
use super::part::ContentPart;
use crate::common::{Error, Result};
use serde_json::Value;

/// Encode a part as a JSON value.
pub fn encode_part(part: &ContentPart) -> Result<Value> {
    Ok(serde_json::to_value(part)?)
}

/// Decode a part from a JSON value.
pub fn decode_part(value: Value) -> Result<ContentPart> {
    let type_name = match value.get("Type") {
        Some(Value::String(name)) => name.as_str(),
        Some(other) => return Err(Error::UnsupportedVariant(other.to_string())),
        None => return Err(Error::UnsupportedVariant(String::new())),
    };

    if !ContentPart::TYPE_NAMES.contains(&type_name) {
        return Err(Error::UnsupportedVariant(type_name.to_string()));
    }

    Ok(serde_json::from_value(value)?)
}

/// Encode a part as a JSON string.
pub fn to_json(part: &ContentPart) -> Result<String> {
    Ok(serde_json::to_string(part)?)
}

/// Decode a part from a JSON string.
pub fn from_json(json: &str) -> Result<ContentPart> {
    decode_part(serde_json::from_str(json)?)
}

/// Decode an array of parts; the first bad element aborts the whole decode.
pub fn decode_parts(value: Value) -> Result<Vec<ContentPart>> {
    match value {
        Value::Array(items) => items.into_iter().map(decode_part).collect(),
        Value::Null => Ok(Vec::new()),
        other => Err(Error::Json(format!("expected an array of parts, got {}", other))),
    }
}
