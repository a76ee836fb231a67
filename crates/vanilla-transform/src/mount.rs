//! Mount points that the runtime script renders into.

/// Id of the container the cookie consent banner attaches to.
pub const COOKIE_BANNER_ROOT: &str = "cookie-banner-root";

/// Make sure the cookie banner container exists.
///
/// It goes right before the last `</body>`, or at the end of a document without one.
pub fn ensure_mount_points(html: &str) -> String {
    if html.contains(&format!(r#"id="{COOKIE_BANNER_ROOT}""#)) {
        return html.to_string();
    }

    let mount = format!(r#"<div id="{COOKIE_BANNER_ROOT}"></div>"#);
    match html.rfind("</body>") {
        Some(pos) => {
            let mut out = String::with_capacity(html.len() + mount.len());
            out.push_str(&html[..pos]);
            out.push_str(&mount);
            out.push_str(&html[pos..]);
            out
        }
        None => format!("{html}{mount}"),
    }
}
