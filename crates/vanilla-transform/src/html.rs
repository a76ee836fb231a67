//! Small helpers for working on raw markup.

use std::sync::LazyLock;

use regex::Regex;

static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)([a-z_:][-a-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
        .expect("Invalid attribute regex")
});

/// Escape the five HTML-reserved characters.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 8);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Value of a quoted attribute in a single opening tag.
///
/// Attribute names compare case-insensitively.
pub fn attr<'t>(tag: &'t str, name: &str) -> Option<&'t str> {
    ATTR_RE.captures_iter(tag).find_map(|cap| {
        if !cap[1].eq_ignore_ascii_case(name) {
            return None;
        }
        cap.get(2).or_else(|| cap.get(3)).map(|m| m.as_str())
    })
}

/// Find the end (exclusive) of the element whose opening tag starts at `start`.
///
/// Nested elements with the same tag name are counted, so the match is the
/// closing tag that balances the opening one.
pub fn find_element_end(html: &str, start: usize, tag: &str) -> Option<usize> {
    let pattern = format!(r"(?i)<(/?){}\b[^>]*>", regex::escape(tag));
    let re = Regex::new(&pattern).ok()?;

    let mut depth = 0usize;
    for cap in re.captures_iter(&html[start..]) {
        let whole = cap.get(0)?;
        if cap[1].is_empty() {
            depth += 1;
        } else {
            depth = depth.checked_sub(1)?;
            if depth == 0 {
                return Some(start + whole.end());
            }
        }
    }
    None
}
