//! Removal of the framework runtime from rendered documents.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::html::attr;

/// Framework-internal asset namespace.
pub const FRAMEWORK_PREFIX: &str = "/_next/";

static SCRIPT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b([^>]*)>.*?</script\s*>").expect("Invalid script regex")
});

static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<link\b[^>]*>\s*").expect("Invalid link regex"));

/// Remove executable scripts and framework asset links.
///
/// Scripts typed `application/ld+json` or `application/json` are data and stay.
/// Running this on its own output changes nothing.
pub fn strip_runtime(html: &str) -> String {
    let html = SCRIPT_RE.replace_all(html, |cap: &Captures| {
        if is_data_script(&cap[1]) {
            cap[0].to_string()
        } else {
            String::new()
        }
    });

    LINK_RE
        .replace_all(&html, |cap: &Captures| {
            let tag = &cap[0];
            if is_framework_link(tag) || is_script_preload(tag) {
                String::new()
            } else {
                tag.to_string()
            }
        })
        .into_owned()
}

/// Remove every `<link rel="stylesheet">`, leaving room for the exported stylesheet.
pub fn strip_stylesheets(html: &str) -> String {
    LINK_RE
        .replace_all(html, |cap: &Captures| {
            let tag = &cap[0];
            let is_stylesheet = attr(tag, "rel").is_some_and(|rel| {
                rel.split_whitespace()
                    .any(|r| r.eq_ignore_ascii_case("stylesheet"))
            });
            if is_stylesheet {
                String::new()
            } else {
                tag.to_string()
            }
        })
        .into_owned()
}

fn is_data_script(attrs: &str) -> bool {
    attr(attrs, "type").is_some_and(|t| {
        let t = t.trim();
        t.eq_ignore_ascii_case("application/ld+json") || t.eq_ignore_ascii_case("application/json")
    })
}

fn is_framework_link(tag: &str) -> bool {
    attr(tag, "href").is_some_and(|href| href.starts_with(FRAMEWORK_PREFIX))
}

fn is_script_preload(tag: &str) -> bool {
    let preload = attr(tag, "rel").is_some_and(|rel| rel.eq_ignore_ascii_case("preload"));
    let script = attr(tag, "as").is_some_and(|a| a.eq_ignore_ascii_case("script"));
    preload && script
}
