//! Locates the stylesheet a document associates with itself.
//!
//! This is a tolerant substring scan for `<?xml-stylesheet ... ?>`, not an
//! XML parser. Only double-quoted `href` values are recognised.

const PI_OPEN: &str = "<?xml-stylesheet";
const PI_CLOSE: &str = "?>";
const HREF_ATTR: &str = "href=\"";

/// Return the `href` of the first `xml-stylesheet` instruction that has one
///
/// An instruction without a closing `?>` ends the scan. Instructions
/// lacking an `href` are skipped in favour of later ones.
pub fn extract_stylesheet_href(xml: &str) -> Option<&str> {
    let mut start = 0;

    while let Some(offset) = xml[start..].find(PI_OPEN) {
        start += offset;

        let close = xml[start..].find(PI_CLOSE)?;
        let end = start + close + PI_CLOSE.len();
        let instruction = &xml[start..end];

        if let Some(href) = href_value(instruction) {
            return Some(href);
        }

        start = end;
    }

    None
}

/// The value of `href="..."` inside a single instruction body
fn href_value(instruction: &str) -> Option<&str> {
    let value_start = instruction.find(HREF_ATTR)? + HREF_ATTR.len();
    let rest = &instruction[value_start..];
    let value_len = rest.find('"')?;
    Some(&rest[..value_len])
}
