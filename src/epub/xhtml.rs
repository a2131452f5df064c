//! HTML to XHTML conversion for chapter documents.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Void elements written by the HTML serializer without a closing slash.
///
/// Quoted attribute values are matched whole, since the serializer leaves
/// `>` inside them unescaped.
static VOID_ELEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)<(area|base|br|col|embed|hr|img|input|link|meta|source|track|wbr)\b((?:[^>"']|"[^"]*"|'[^']*')*?)\s*/?>"#,
    )
    .expect("VOID_ELEMENT regex")
});

/// Named character references.
static NAMED_ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&([A-Za-z][A-Za-z0-9]*);").expect("NAMED_ENTITY regex"));

/// Escape text for XML content and attribute values.
#[must_use]
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Make serialized HTML well-formed XML.
///
/// Void elements are self-closed. Named entities outside XML's predefined
/// five become numeric references; unknown names are escaped literally.
#[must_use]
pub fn to_xhtml(html: &str) -> String {
    let closed = VOID_ELEMENT.replace_all(html, "<$1$2/>");
    NAMED_ENTITY
        .replace_all(&closed, |caps: &Captures| {
            let name = &caps[1];
            match name {
                "amp" | "lt" | "gt" | "quot" | "apos" => caps[0].to_string(),
                _ => match code_point(name) {
                    Some(cp) => format!("&#{cp};"),
                    None => format!("&amp;{name};"),
                },
            }
        })
        .into_owned()
}

fn code_point(name: &str) -> Option<u32> {
    let cp = match name {
        "nbsp" => 160,
        "copy" => 169,
        "reg" => 174,
        "deg" => 176,
        "middot" => 183,
        "laquo" => 171,
        "raquo" => 187,
        "ndash" => 8211,
        "mdash" => 8212,
        "lsquo" => 8216,
        "rsquo" => 8217,
        "ldquo" => 8220,
        "rdquo" => 8221,
        "bull" => 8226,
        "hellip" => 8230,
        "trade" => 8482,
        _ => return None,
    };
    Some(cp)
}
