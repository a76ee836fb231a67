//! Markup templates for the static replacements.
//!
//! Autoescaping is off; templates escape data explicitly with the `esc` filter so
//! the output matches the markup the rest of the page already uses.

use minijinja::{AutoEscape, Environment};
use serde::Serialize;

use crate::html::escape_html;

/// Template engine using minijinja.
pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    /// Create an engine with the built-in templates.
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.add_filter("esc", |value: String| escape_html(&value));

        env.add_template("review_card.html", REVIEW_CARD_TEMPLATE)
            .expect("Failed to add review card template");
        env.add_template("faq_items.html", FAQ_ITEMS_TEMPLATE)
            .expect("Failed to add FAQ items template");
        env.add_template("faq_section.html", FAQ_SECTION_TEMPLATE)
            .expect("Failed to add FAQ section template");
        env.add_template("service_field.html", SERVICE_FIELD_TEMPLATE)
            .expect("Failed to add service field template");

        Self { env }
    }

    /// Render a template with a serializable context.
    pub fn render<S: Serialize>(&self, name: &str, ctx: S) -> Result<String, minijinja::Error> {
        self.env.get_template(name)?.render(ctx)
    }
}

impl Default for Templates {
    fn default() -> Self {
        Self::new()
    }
}

const REVIEW_CARD_TEMPLATE: &str = r##"
  <div class="rounded-lg border bg-card text-card-foreground shadow-sm relative overflow-hidden transition-all hover:-translate-y-0.5 hover:shadow-lg" data-review-card>
    <div class="absolute left-0 top-0 bottom-0 w-1.5 {{ accent }}"></div>
    <div class="p-6 text-left">
      <div class="flex flex-col sm:flex-row sm:items-start sm:justify-between gap-4 sm:gap-6">
        <div class="flex items-start gap-3 min-w-0">
          <div class="relative flex h-10 w-10 shrink-0 overflow-hidden rounded-full">
            <div class="flex h-full w-full items-center justify-center rounded-full bg-muted font-semibold ring-1 ring-border/60">
              {{ initials | esc }}
            </div>
          </div>
          <div class="min-w-0">
            <p class="font-semibold truncate">{{ name | esc }}</p>
            <p class="mt-1 text-sm text-muted-foreground truncate">{{ label | esc }}</p>
          </div>
        </div>
        <div class="flex items-center gap-1 shrink-0">{% for filled in stars %}<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round" class="w-4 h-4 {% if filled %}fill-yellow-400 text-yellow-400{% else %}text-muted-foreground{% endif %}"><path d="M11.525 2.295a.53.53 0 0 1 .95 0l2.31 4.679a2.123 2.123 0 0 0 1.595 1.16l5.166.756a.53.53 0 0 1 .294.904l-3.736 3.638a2.123 2.123 0 0 0-.611 1.878l.882 5.14a.53.53 0 0 1-.771.56l-4.618-2.428a2.122 2.122 0 0 0-1.973 0L6.396 21.01a.53.53 0 0 1-.77-.56l.881-5.139a2.122 2.122 0 0 0-.611-1.879L2.16 9.795a.53.53 0 0 1 .294-.906l5.165-.755a2.122 2.122 0 0 0 1.597-1.16z"/></svg>{% endfor %}</div>
      </div>

      <div class="mt-4 relative rounded-2xl bg-secondary p-5">
        <p class="text-muted-foreground leading-relaxed text-left">
          "{{ comment | esc }}"
        </p>
      </div>
    </div>
  </div>"##;

const FAQ_ITEMS_TEMPLATE: &str = r##"{% for item in items %}
      <div class="border-b" data-faq-item>
        <h3 class="flex">
          <button type="button" class="flex flex-1 items-center justify-between py-4 font-medium transition-all hover:underline text-left text-lg" aria-expanded="false" aria-controls="faq-{{ loop.index0 }}-content">
            <span>{{ item.question | esc }}</span>
            <span class="ml-4 text-muted-foreground">+</span>
          </button>
        </h3>
        <div id="faq-{{ loop.index0 }}-content" class="overflow-hidden text-sm transition-all" hidden>
          <div class="pb-4 pt-0 text-muted-foreground text-base">{{ item.answer | esc }}</div>
        </div>
      </div>{% endfor %}"##;

const FAQ_SECTION_TEMPLATE: &str = r##"
<section id="faq-generator">
  <div class="container px-4 md:px-6">
    <div class="max-w-4xl mx-auto">
      <div class="text-center space-y-4 mb-12">
        <h2 class="text-3xl font-headline font-bold tracking-tighter sm:text-4xl">Get Instant Answers</h2>
        <p class="max-w-[700px] mx-auto text-muted-foreground md:text-lg">Select a topic to browse frequently asked questions.</p>
      </div>

      <div class="flex flex-wrap gap-2 justify-center mb-8" data-faq-topics>
        {% for topic in topics %}<button type="button" class="inline-flex items-center justify-center gap-2 whitespace-nowrap rounded-md text-sm font-medium ring-offset-background transition-colors focus-visible:outline-none focus-visible:ring-2 focus-visible:ring-ring focus-visible:ring-offset-2 disabled:pointer-events-none disabled:opacity-50 [&_svg]:pointer-events-none [&_svg]:size-4 [&_svg]:shrink-0 h-10 px-4 py-2 {% if topic.active %}bg-primary text-primary-foreground hover:bg-primary/90{% else %}border border-input bg-background hover:bg-accent hover:text-accent-foreground{% endif %}" data-faq-topic="{{ topic.id | esc }}">{{ topic.label | esc }}</button>{% endfor %}
      </div>

      <div class="min-h-[300px]">
        <div class="w-full" data-faq-list data-faq-active="{{ active | esc }}">
          {{ items }}
        </div>
      </div>
    </div>
  </div>
  <script type="application/json" id="faq-data">{{ payload | esc }}</script>
</section>"##;

const SERVICE_FIELD_TEMPLATE: &str = r##"<div class="space-y-2"><label class="text-sm font-medium leading-none peer-disabled:cursor-not-allowed peer-disabled:opacity-70" for="service">Service Needed</label><select id="service" name="service" class="flex h-10 w-full rounded-md border border-input bg-background px-3 py-2 text-sm ring-offset-background focus:outline-none focus:ring-2 focus:ring-ring focus:ring-offset-2">{% for option in options %}<option value="{{ option | esc }}">{{ option | esc }}</option>{% endfor %}</select></div>"##;
