//! Native service select and mailto form for the contact page.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::html::{attr, escape_html};
use crate::traits::{PagePatcher, PatchContext, PatchError};

/// Options of the native service select, in display order.
pub const SERVICE_OPTIONS: [&str; 5] = [
    "Pest Control",
    "Wildlife Removal",
    "Inspection / Estimate",
    "Prevention / Maintenance",
    "Other",
];

/// Address the contact form is mailed to by default.
pub const DEFAULT_EMAIL: &str = "hello@greenshield.local";

/// The "Service Needed" field, up to the label of the next field.
static SERVICE_FIELD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?s)<div class="space-y-2"><label[^>]*>Service Needed</label>.*?(<div class="space-y-2"><label)"#,
    )
    .expect("Invalid service field regex")
});

static FORM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<form\b([^>]*)>").expect("Invalid form regex"));

const SELF_HREF: &str = r#"href="/contact/""#;

/// Class list of the contact form.
const CONTACT_FORM_CLASS: &str = "space-y-6";

/// Swaps the custom select for a native one and marks the form for mailto submission.
#[derive(Debug, Clone)]
pub struct ContactPatcher {
    email: String,
}

impl ContactPatcher {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }
}

impl Default for ContactPatcher {
    fn default() -> Self {
        Self::new(DEFAULT_EMAIL)
    }
}

impl PagePatcher for ContactPatcher {
    fn name(&self) -> &'static str {
        "contact"
    }

    fn section(&self) -> &'static str {
        "contact"
    }

    fn patch(&self, html: &str, ctx: &PatchContext<'_>) -> Result<String, PatchError> {
        let field = SERVICE_FIELD_RE
            .captures(html)
            .and_then(|cap| Some((cap.get(0)?.start(), cap.get(1)?.start())));
        let form = contact_form(html, field.map(|(start, _)| start));

        if field.is_none() && form.is_none() {
            return Err(PatchError::MarkerNotFound {
                patcher: "contact",
                marker: "Service Needed field".to_string(),
            });
        }

        let mut edits = Vec::with_capacity(2);

        match field {
            Some((start, end)) => {
                let select = ctx
                    .templates
                    .render(
                        "service_field.html",
                        minijinja::context! { options => SERVICE_OPTIONS },
                    )
                    .map_err(|e| PatchError::Render {
                        patcher: "contact",
                        message: e.to_string(),
                    })?;
                edits.push((start, end, select));
            }
            None => tracing::warn!(
                "No Service Needed field on {}, keeping the original control",
                ctx.route.output.display()
            ),
        }

        match form {
            Some((start, end, attrs)) if !attrs.contains("data-mailto-form") => {
                let tag = format!(
                    r#"<form{} data-mailto-form data-mailto-email="{}">"#,
                    attrs,
                    escape_html(&self.email)
                );
                edits.push((start, end, tag));
            }
            Some(_) => {}
            None => tracing::warn!(
                "No contact form on {}, mailto submission is not wired",
                ctx.route.output.display()
            ),
        }

        // Splice later regions first so earlier offsets stay valid.
        edits.sort_by_key(|(start, _, _)| std::cmp::Reverse(*start));

        let mut out = html.to_string();
        for (start, end, replacement) in edits {
            out.replace_range(start..end, &replacement);
        }

        let self_href = format!(r#"href="{}contact/""#, ctx.route.root_rel());
        Ok(out.replace(SELF_HREF, &self_href))
    }
}

/// Opening tag of the contact form as `(start, end, attributes)`.
///
/// The form enclosing the service field wins; without the field, the first form
/// carrying the contact form class is used.
fn contact_form(html: &str, field_start: Option<usize>) -> Option<(usize, usize, &str)> {
    match field_start {
        Some(field_start) => FORM_RE
            .captures_iter(&html[..field_start])
            .last()
            .and_then(form_tag),
        None => FORM_RE
            .captures_iter(html)
            .find(|cap| {
                attr(&cap[0], "class").is_some_and(|class| class.contains(CONTACT_FORM_CLASS))
            })
            .and_then(form_tag),
    }
}

fn form_tag(cap: Captures<'_>) -> Option<(usize, usize, &str)> {
    let whole = cap.get(0)?;
    let attrs = cap.get(1)?;
    Some((whole.start(), whole.end(), attrs.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::Route;
    use crate::templates::Templates;
    use pretty_assertions::assert_eq;

    const PAGE: &str = concat!(
        r#"<main><form class="space-y-6">"#,
        r#"<div class="space-y-2"><label class="text-sm" for="phone">Phone</label><input id="phone" name="phone"/></div>"#,
        r#"<div class="space-y-2"><label class="text-sm" for=":r1:">Service Needed</label>"#,
        r#"<button type="button" role="combobox" aria-controls="radix-:r2:" aria-expanded="false" data-state="closed">"#,
        r#"<span style="pointer-events:none">Select a service</span></button>"#,
        r#"<select aria-hidden="true" tabindex="-1" style="position:absolute"><option value=""></option>"#,
        r#"<option value="pest">Pest Control</option></select></div>"#,
        r#"<div class="space-y-2"><label class="text-sm" for="message">Message</label><textarea name="message"></textarea></div>"#,
        r#"<button type="submit">Send</button></form>"#,
        r#"<a href="/contact/">Contact</a></main>"#,
    );

    fn patch(html: &str) -> Result<String, PatchError> {
        let route = Route::page("contact/index.html");
        let templates = Templates::new();
        let ctx = PatchContext {
            route: &route,
            templates: &templates,
        };
        ContactPatcher::new("office@example.com").patch(html, &ctx)
    }

    #[test]
    fn replaces_rich_select_with_native_select() {
        let out = patch(PAGE).unwrap();

        assert_eq!(out.matches("<select").count(), 1);
        assert_eq!(out.matches(r#"<select id="service" name="service""#).count(), 1);
        assert_eq!(out.matches("<option ").count(), 5);
        assert!(!out.contains("combobox"));
        assert!(!out.contains("Select a service"));
        assert!(!out.contains("aria-hidden"));
    }

    #[test]
    fn options_keep_order() {
        let out = patch(PAGE).unwrap();

        let options: Vec<&str> = out
            .split(r#"<option value=""#)
            .skip(1)
            .map(|rest| &rest[..rest.find('"').unwrap()])
            .collect();
        assert_eq!(options, SERVICE_OPTIONS.to_vec());
    }

    #[test]
    fn keeps_neighbouring_fields() {
        let out = patch(PAGE).unwrap();

        assert!(out.contains(r#"<input id="phone" name="phone"/>"#));
        assert!(out.contains(
            r#"</select></div><div class="space-y-2"><label class="text-sm" for="message">Message</label>"#
        ));
    }

    #[test]
    fn marks_form_for_mailto() {
        let out = patch(PAGE).unwrap();

        assert!(out.contains(
            r#"<form class="space-y-6" data-mailto-form data-mailto-email="office@example.com">"#
        ));
    }

    #[test]
    fn makes_self_link_relative() {
        let out = patch(PAGE).unwrap();

        assert!(out.contains(r#"<a href="../contact/">Contact</a>"#));
    }

    #[test]
    fn marks_form_enclosing_the_field() {
        let page = format!(
            r#"<header><form class="newsletter"><input name="email"/></form></header>{PAGE}"#
        );

        let out = patch(&page).unwrap();

        assert!(out.contains(r#"<form class="newsletter"><input"#));
        assert_eq!(out.matches("data-mailto-form").count(), 1);
        assert!(out.contains(r#"<form class="space-y-6" data-mailto-form"#));
    }

    #[test]
    fn swaps_select_without_form() {
        let page = PAGE
            .replace(r#"<form class="space-y-6">"#, "<div>")
            .replace("</form>", "</div>");

        let out = patch(&page).unwrap();

        assert_eq!(out.matches(r#"<select id="service" name="service""#).count(), 1);
        assert!(!out.contains("data-mailto-form"));
    }

    #[test]
    fn marks_form_without_field() {
        let page = PAGE.replace("Service Needed", "Service");

        let out = patch(&page).unwrap();

        assert!(out.contains("combobox"));
        assert!(out.contains(
            r#"<form class="space-y-6" data-mailto-form data-mailto-email="office@example.com">"#
        ));
    }

    #[test]
    fn missing_field_and_form_is_recoverable() {
        let page = PAGE
            .replace("Service Needed", "Service")
            .replace(r#"<form class="space-y-6">"#, "<div>");

        let result = patch(&page);

        assert!(matches!(result, Err(ref e) if e.is_recoverable()));
    }
}
