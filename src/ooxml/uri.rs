//! Part name arithmetic.
//!
//! Part names are stored the way ZIP entries name them: no leading slash,
//! forward slashes only (`ppt/slides/slide1.xml`).

/// Directory of a part name (`ppt/slides` for `ppt/slides/slide1.xml`).
pub fn base_dir(part: &str) -> &str {
    part.rfind('/').map_or("", |i| &part[..i])
}

/// File name of a part name.
pub fn file_name(part: &str) -> &str {
    part.rfind('/').map_or(part, |i| &part[i + 1..])
}

/// Relationships part of a part (`ppt/slides/_rels/slide1.xml.rels`).
pub fn rels_part(part: &str) -> String {
    let dir = base_dir(part);
    if dir.is_empty() {
        format!("_rels/{}.rels", file_name(part))
    } else {
        format!("{}/_rels/{}.rels", dir, file_name(part))
    }
}

/// Resolve a relationship target against the directory of its source part.
///
/// Absolute targets (`/ppt/slides/slide1.xml`) are taken from the package
/// root.
pub fn resolve(base: &str, target: &str) -> String {
    let joined = if let Some(absolute) = target.strip_prefix('/') {
        absolute.to_string()
    } else if base.is_empty() {
        target.to_string()
    } else {
        format!("{}/{}", base, target)
    };
    normalize(&joined)
}

/// Resolve "." and ".." segments.
fn normalize(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();

    for part in path.split('/') {
        match part {
            "" | "." => {},
            ".." => {
                parts.pop();
            },
            _ => parts.push(part),
        }
    }

    parts.join("/")
}

/// Part name as written in `[Content_Types].xml` overrides.
pub fn absolute(part: &str) -> String {
    format!("/{}", part)
}
