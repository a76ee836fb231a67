//! Asset injection and root-relative URL rewriting.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::route::Route;

/// File name of the exported stylesheet inside `assets/`.
pub const STYLESHEET: &str = "styles.css";

/// File name of the runtime script inside `assets/`.
pub const SCRIPT: &str = "app.js";

static ROOT_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\b(href|src)=(?:"/([^"]*)"|'/([^']*)')"#).expect("Invalid root URL regex")
});

/// Link the exported stylesheet and runtime script.
///
/// The tags go right before `</head>`, or at the very start when there is no head.
pub fn inject_assets(html: &str, route: &Route) -> String {
    let assets = route.asset_rel();
    let tags = format!(
        r#"<link rel="stylesheet" href="{assets}{STYLESHEET}"><script defer src="{assets}{SCRIPT}"></script>"#
    );

    match html.find("</head>") {
        Some(pos) => {
            let mut out = String::with_capacity(html.len() + tags.len());
            out.push_str(&html[..pos]);
            out.push_str(&tags);
            out.push_str(&html[pos..]);
            out
        }
        None => format!("{tags}{html}"),
    }
}

/// Rewrite every root-relative `href`/`src` so the page works from any directory.
///
/// Protocol-relative (`//host`) and already-relative URLs are left alone, and the
/// original quote style is kept.
pub fn rewrite_root_relative(html: &str, route: &Route) -> String {
    let root_rel = route.root_rel();
    let home = route.home_href();

    ROOT_URL_RE
        .replace_all(html, |cap: &Captures| {
            let attr = &cap[1];
            let (quote, rest) = match (cap.get(2), cap.get(3)) {
                (Some(rest), _) => ('"', rest.as_str()),
                (None, Some(rest)) => ('\'', rest.as_str()),
                (None, None) => return cap[0].to_string(),
            };

            if rest.starts_with('/') {
                return cap[0].to_string();
            }

            // A bare "/" would otherwise become an empty href at depth 0.
            if rest.is_empty() {
                return format!("{attr}={quote}{home}{quote}");
            }

            format!("{attr}={quote}{root_rel}{rest}{quote}")
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn root() -> Route {
        Route::page("index.html")
    }

    fn nested() -> Route {
        Route::page("about/index.html")
    }

    #[test]
    fn injects_before_head_close() {
        let out = inject_assets("<html><head><title>x</title></head><body></body></html>", &nested());

        assert_eq!(
            out,
            r#"<html><head><title>x</title><link rel="stylesheet" href="../assets/styles.css"><script defer src="../assets/app.js"></script></head><body></body></html>"#
        );
    }

    #[test]
    fn prepends_without_head() {
        let out = inject_assets("<p>fragment</p>", &root());

        assert!(out.starts_with(r#"<link rel="stylesheet" href="assets/styles.css">"#));
        assert!(out.ends_with("<p>fragment</p>"));
    }

    #[test]
    fn rewrites_home_by_depth() {
        assert_eq!(rewrite_root_relative(r#"<a href="/">"#, &root()), r#"<a href="./">"#);
        assert_eq!(rewrite_root_relative(r#"<a href="/">"#, &nested()), r#"<a href="../">"#);
    }

    #[test]
    fn rewrites_framework_assets() {
        assert_eq!(
            rewrite_root_relative(r#"<img src="/_next/static/x.js">"#, &nested()),
            r#"<img src="../_next/static/x.js">"#
        );
    }

    #[test]
    fn rewrites_pages_keeping_remainder() {
        assert_eq!(
            rewrite_root_relative(r#"<a href="/about/">"#, &root()),
            r#"<a href="about/">"#
        );
        assert_eq!(
            rewrite_root_relative(r#"<a href="/faq/#billing">"#, &nested()),
            r#"<a href="../faq/#billing">"#
        );
    }

    #[test]
    fn keeps_quote_style() {
        assert_eq!(
            rewrite_root_relative(r#"<a href='/contact/' data-x="1">"#, &nested()),
            r#"<a href='../contact/' data-x="1">"#
        );
    }

    #[test]
    fn leaves_other_urls_alone() {
        let html = concat!(
            r#"<script src="//cdn.example.com/a.js"></script>"#,
            r#"<a href="https://example.com/">x</a>"#,
            r#"<a href="contact/">y</a>"#,
            r##"<a href="#top">z</a>"##,
        );

        assert_eq!(rewrite_root_relative(html, &nested()), html);
    }

    #[test]
    fn rewrites_href_and_src_independently() {
        let html = r#"<a href="/reviews/"><img src="/images/logo.png" alt=""></a>"#;

        assert_eq!(
            rewrite_root_relative(html, &nested()),
            r#"<a href="../reviews/"><img src="../images/logo.png" alt=""></a>"#
        );
    }
}
