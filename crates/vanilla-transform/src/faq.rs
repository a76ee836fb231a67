//! Static FAQ topic browser with an embedded data payload.

use serde::Serialize;
use vanilla_data::{FaqTable, Topic, FAQ_TOPICS};

use crate::html::find_element_end;
use crate::templates::Templates;
use crate::traits::{PagePatcher, PatchContext, PatchError};

/// Opening of the FAQ section.
pub const SECTION_MARKER: &str = r#"<section id="faq-generator""#;

/// Hard-coded link fixed up relative to the route.
const COOKIE_POLICY_HREF: &str = r#"href="/cookie-policy/""#;

/// Replaces the interactive FAQ section with a static first topic plus the full table.
#[derive(Debug, Clone)]
pub struct FaqPatcher {
    table: FaqTable,
    topics: &'static [Topic],
}

#[derive(Serialize)]
struct TopicButton {
    id: &'static str,
    label: &'static str,
    active: bool,
}

#[derive(Serialize)]
struct SectionContext<'a> {
    topics: Vec<TopicButton>,
    active: &'a str,
    items: String,
    payload: String,
}

impl FaqPatcher {
    pub fn new(table: FaqTable) -> Self {
        Self {
            table,
            topics: FAQ_TOPICS,
        }
    }

    /// Topic active on page load.
    pub fn initial_topic(&self) -> Option<&'static str> {
        self.topics.first().map(|t| t.id)
    }

    /// Render the accordion items of one topic, in table order.
    pub fn render_topic(
        &self,
        templates: &Templates,
        topic_id: &str,
    ) -> Result<String, PatchError> {
        let items = self.table.get(topic_id).map(Vec::as_slice).unwrap_or(&[]);

        templates
            .render("faq_items.html", minijinja::context! { items => items })
            .map_err(render_error)
    }

    /// Serialized topic table for the client.
    pub fn payload(&self) -> Result<String, PatchError> {
        serde_json::to_string(&self.table).map_err(render_error)
    }
}

impl PagePatcher for FaqPatcher {
    fn name(&self) -> &'static str {
        "faq"
    }

    fn section(&self) -> &'static str {
        "faq"
    }

    fn patch(&self, html: &str, ctx: &PatchContext<'_>) -> Result<String, PatchError> {
        let missing = |marker: &str| PatchError::MarkerNotFound {
            patcher: "faq",
            marker: marker.to_string(),
        };

        let start = html.find(SECTION_MARKER).ok_or_else(|| missing(SECTION_MARKER))?;
        let end = find_element_end(html, start, "section").ok_or_else(|| missing("</section>"))?;

        let active = self.initial_topic().unwrap_or_default();
        let section = ctx
            .templates
            .render(
                "faq_section.html",
                SectionContext {
                    topics: self
                        .topics
                        .iter()
                        .map(|t| TopicButton {
                            id: t.id,
                            label: t.label,
                            active: t.id == active,
                        })
                        .collect(),
                    active,
                    items: self.render_topic(ctx.templates, active)?,
                    payload: self.payload()?,
                },
            )
            .map_err(render_error)?;

        let out = format!("{}{}{}", &html[..start], section, &html[end..]);
        let cookie_policy = format!(r#"href="{}cookie-policy/""#, ctx.route.root_rel());

        Ok(out.replace(COOKIE_POLICY_HREF, &cookie_policy))
    }
}

fn render_error(e: impl std::fmt::Display) -> PatchError {
    PatchError::Render {
        patcher: "faq",
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::Route;
    use pretty_assertions::assert_eq;
    use vanilla_data::FaqItem;

    const PAGE: &str = concat!(
        r#"<main><section class="hero"><h1>FAQ</h1></section>"#,
        r#"<section id="faq-generator" class="py-12"><div><section><p>nested</p></section>"#,
        r#"<button aria-controls="radix-1">Is it safe?</button></div></section>"#,
        r#"<p>See our <a href="/cookie-policy/">cookie policy</a>.</p></main>"#,
    );

    fn item(question: &str, answer: &str) -> FaqItem {
        FaqItem {
            question: question.to_string(),
            answer: answer.to_string(),
        }
    }

    fn table() -> FaqTable {
        let mut table = FaqTable::new();
        table.insert(
            "general".to_string(),
            vec![
                item("Do you offer inspections?", "Yes."),
                item("Are treatments <safe>?", "Kids & pets \"first\"."),
            ],
        );
        table.insert(
            "wildlife".to_string(),
            vec![item("Is removal humane?", "Always.")],
        );
        table.insert(
            "pest".to_string(),
            vec![
                item("Ants?", "Gone in a day."),
                item("Termites?", "Inspection first."),
                item("Wasps?", "Same week."),
            ],
        );
        table.insert("billing".to_string(), vec![]);
        table
    }

    fn unescape(text: &str) -> String {
        text.replace("&quot;", "\"")
            .replace("&#39;", "'")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&amp;", "&")
    }

    fn patch(html: &str) -> Result<String, PatchError> {
        let route = Route::page("faq/index.html");
        let templates = Templates::new();
        let ctx = PatchContext {
            route: &route,
            templates: &templates,
        };
        FaqPatcher::new(table()).patch(html, &ctx)
    }

    #[test]
    fn replaces_whole_section() {
        let out = patch(PAGE).unwrap();

        assert!(!out.contains("nested"));
        assert!(!out.contains("radix-1"));
        assert!(out.starts_with(r#"<main><section class="hero"><h1>FAQ</h1></section>"#));
        assert!(out.contains("</section><p>See our"));
        assert_eq!(out.matches(SECTION_MARKER).count(), 1);
    }

    #[test]
    fn renders_topic_buttons_with_first_active() {
        let out = patch(PAGE).unwrap();

        for topic in FAQ_TOPICS {
            assert!(out.contains(&format!(r#"data-faq-topic="{}""#, topic.id)));
        }
        assert!(out.contains("Billing &amp; Pricing"));
        assert_eq!(out.matches("bg-primary text-primary-foreground").count(), 1);
        let active = out.find("bg-primary text-primary-foreground").unwrap();
        assert!(out[active..].starts_with(
            r#"bg-primary text-primary-foreground hover:bg-primary/90" data-faq-topic="general""#
        ));
        assert!(out.contains(r#"data-faq-list data-faq-active="general""#));
    }

    #[test]
    fn renders_first_topic_collapsed() {
        let out = patch(PAGE).unwrap();

        assert_eq!(out.matches("data-faq-item").count(), 2);
        assert_eq!(out.matches(r#"aria-expanded="false""#).count(), 2);
        assert!(out.contains(r#"aria-controls="faq-0-content""#));
        assert!(out.contains(r#"<div id="faq-1-content" class="overflow-hidden text-sm transition-all" hidden>"#));
        assert!(out.contains("Are treatments &lt;safe&gt;?"));
        assert!(out.contains("Kids &amp; pets &quot;first&quot;."));
    }

    #[test]
    fn payload_round_trips() {
        let out = patch(PAGE).unwrap();

        let open = r#"<script type="application/json" id="faq-data">"#;
        let start = out.find(open).unwrap() + open.len();
        let end = start + out[start..].find("</script>").unwrap();
        let payload = &out[start..end];

        assert!(!payload.contains('<'));
        let parsed: FaqTable = serde_json::from_str(&unescape(payload)).unwrap();
        assert_eq!(parsed, table());
    }

    #[test]
    fn renders_any_topic_in_order() {
        let templates = Templates::new();
        let patcher = FaqPatcher::new(table());

        for (topic, items) in table() {
            let html = patcher.render_topic(&templates, &topic).unwrap();
            assert_eq!(html.matches("data-faq-item").count(), items.len());

            let mut cursor = 0;
            for item in &items {
                let found = html[cursor..].find(&crate::html::escape_html(&item.question));
                assert!(found.is_some(), "{} out of order", item.question);
                cursor += found.unwrap();
            }
        }
    }

    #[test]
    fn fixes_cookie_policy_link() {
        let out = patch(PAGE).unwrap();

        assert!(out.contains(r#"<a href="../cookie-policy/">cookie policy</a>"#));
        assert!(!out.contains(COOKIE_POLICY_HREF));
    }

    #[test]
    fn missing_section_is_recoverable() {
        let result = patch("<main><section id=\"other\"></section></main>");
        assert!(matches!(result, Err(ref e) if e.is_recoverable()));

        let result = patch(r#"<section id="faq-generator"><p>unterminated"#);
        assert!(matches!(result, Err(PatchError::MarkerNotFound { .. })));
    }
}
