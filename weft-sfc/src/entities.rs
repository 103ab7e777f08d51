//! Character reference decoding for text content.

use std::borrow::Cow;

use quick_xml::escape::{resolve_html5_entity, unescape_with};

// longest HTML5 entity name is 31 bytes plus `&` and `;`
const MAX_REFERENCE_LEN: usize = 40;

/// Decode named HTML5 entities and numeric character references.
///
/// References that are unknown or never terminated by `;` are kept as
/// written, so `Tom & Jerry &amp; co` decodes to `Tom & Jerry & co`.
pub fn decode(raw: &str) -> Cow<'_, str> {
    if !raw.contains('&') {
        return Cow::Borrowed(raw);
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let candidate = &rest[amp..];
        match reference_len(candidate) {
            Some(len) => match unescape_with(&candidate[..len], resolve_html5_entity) {
                Ok(decoded) => {
                    out.push_str(&decoded);
                    rest = &candidate[len..];
                }
                Err(err) => {
                    tracing::trace!(reference = &candidate[..len], %err, "kept unknown reference");
                    out.push('&');
                    rest = &candidate[1..];
                }
            },
            None => {
                out.push('&');
                rest = &candidate[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// Length of `&name;` at the start of `s`, including both delimiters.
fn reference_len(s: &str) -> Option<usize> {
    let body = s.get(1..)?;
    for (i, ch) in body.char_indices() {
        if i + 2 > MAX_REFERENCE_LEN {
            return None;
        }
        match ch {
            ';' if i > 0 => return Some(i + 2),
            c if c.is_ascii_alphanumeric() || c == '#' => {}
            _ => return None,
        }
    }
    None
}
