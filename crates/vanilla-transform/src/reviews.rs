//! Static rendering of the reviews list.

use serde::Serialize;
use vanilla_data::Review;

use crate::traits::{PagePatcher, PatchContext, PatchError};

/// Class attribute of the list container.
pub const LIST_MARKER: &str = r#"class="mt-8 space-y-4""#;

/// Text inside the call-to-action card that closes the list.
pub const CTA_MARKER: &str = "Want results like these?";

/// Opening of the call-to-action card.
const CTA_CARD_START: &str = r#"<div class="rounded-lg border bg-card"#;

/// Accent bar classes, cycled by review index.
pub const ACCENTS: [&str; 3] = ["bg-primary", "bg-emerald-500", "bg-amber-500"];

const MAX_STARS: usize = 5;

/// Replaces the client-rendered reviews list with every review, pre-rendered.
#[derive(Debug, Clone, Default)]
pub struct ReviewsPatcher {
    reviews: Vec<Review>,
}

#[derive(Serialize)]
struct CardContext<'a> {
    accent: &'static str,
    initials: String,
    name: &'a str,
    label: &'a str,
    comment: &'a str,
    stars: Vec<bool>,
}

impl ReviewsPatcher {
    pub fn new(reviews: Vec<Review>) -> Self {
        Self { reviews }
    }

    fn render_cards(&self, ctx: &PatchContext<'_>) -> Result<String, PatchError> {
        let mut cards = Vec::with_capacity(self.reviews.len());

        for (index, review) in self.reviews.iter().enumerate() {
            let filled = filled_stars(review.rating);
            let card = ctx
                .templates
                .render(
                    "review_card.html",
                    CardContext {
                        accent: accent(index),
                        initials: initials(&review.name),
                        name: &review.name,
                        label: review.label(),
                        comment: review.comment.as_deref().unwrap_or(""),
                        stars: (0..MAX_STARS).map(|i| i < filled).collect(),
                    },
                )
                .map_err(|e| PatchError::Render {
                    patcher: "reviews",
                    message: e.to_string(),
                })?;
            cards.push(card);
        }

        Ok(cards.join("\n"))
    }
}

impl PagePatcher for ReviewsPatcher {
    fn name(&self) -> &'static str {
        "reviews"
    }

    fn section(&self) -> &'static str {
        "reviews"
    }

    fn patch(&self, html: &str, ctx: &PatchContext<'_>) -> Result<String, PatchError> {
        let missing = |marker: &str| PatchError::MarkerNotFound {
            patcher: "reviews",
            marker: marker.to_string(),
        };

        let marker = html.find(LIST_MARKER).ok_or_else(|| missing(LIST_MARKER))?;
        let container_start = html[..marker]
            .rfind("<div")
            .ok_or_else(|| missing("list container"))?;
        let list_open_end = html[container_start..]
            .find('>')
            .map(|i| container_start + i + 1)
            .ok_or_else(|| missing("list container"))?;

        let cta = html[marker..]
            .find(CTA_MARKER)
            .map(|i| marker + i)
            .ok_or_else(|| missing(CTA_MARKER))?;
        let cta_card_start = html[..cta]
            .rfind(CTA_CARD_START)
            .filter(|&start| start >= list_open_end)
            .ok_or_else(|| missing(CTA_CARD_START))?;

        let cards = self.render_cards(ctx)?;

        let mut out = String::with_capacity(html.len() + cards.len());
        out.push_str(&html[..list_open_end]);
        out.push_str(&cards);
        out.push('\n');
        out.push_str(&html[cta_card_start..]);
        Ok(out)
    }
}

/// Accent class for the review at `index`.
pub fn accent(index: usize) -> &'static str {
    ACCENTS[index % ACCENTS.len()]
}

/// Avatar fallback: first letters of the first two words, uppercased.
pub fn initials(name: &str) -> String {
    let mut words = name.split_whitespace();
    let first_letter = |word: &str| word.chars().next().into_iter().flat_map(char::to_uppercase);

    match (words.next(), words.next()) {
        (None, _) => "?".to_string(),
        (Some(first), None) => first_letter(first).collect(),
        (Some(first), Some(second)) => first_letter(first).chain(first_letter(second)).collect(),
    }
}

/// Filled stars for a rating: rounded, clamped to 0..=5, 5 when absent.
pub fn filled_stars(rating: Option<f64>) -> usize {
    let rating = rating.unwrap_or(MAX_STARS as f64).round();
    if rating.is_nan() {
        return 0;
    }
    rating.clamp(0.0, MAX_STARS as f64) as usize
}
