//! Data records rendered into the static pages.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A customer review shown on the reviews page.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Review {
    /// Reviewer name
    pub name: String,

    /// Service the review is about
    #[serde(default)]
    pub service: Option<String>,

    /// Where the reviewer lives; carried but not rendered
    #[serde(default)]
    pub location: Option<String>,

    /// Review text
    #[serde(default)]
    pub comment: Option<String>,

    /// Star rating, 0 to 5. Missing means 5.
    #[serde(default)]
    pub rating: Option<f64>,

    /// Avatar image reference
    #[serde(default, alias = "avatarId")]
    pub avatar: Option<String>,
}

impl Review {
    /// Label shown under the reviewer name: the service, or nothing.
    pub fn label(&self) -> &str {
        self.service.as_deref().unwrap_or("")
    }
}

/// One question/answer pair.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct FaqItem {
    pub question: String,
    pub answer: String,
}

/// FAQ entries keyed by topic id. Order within a topic is display order.
pub type FaqTable = BTreeMap<String, Vec<FaqItem>>;

/// A topic offered by the FAQ topic selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Topic {
    pub id: &'static str,
    pub label: &'static str,
}

/// Topics in selector order. The first one is active on page load.
pub const FAQ_TOPICS: &[Topic] = &[
    Topic {
        id: "general",
        label: "General Questions",
    },
    Topic {
        id: "wildlife",
        label: "Wildlife Removal",
    },
    Topic {
        id: "pest",
        label: "Pest Control",
    },
    Topic {
        id: "billing",
        label: "Billing & Pricing",
    },
];

/// All data the export needs.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct SiteData {
    #[serde(default)]
    pub reviews: Vec<Review>,

    #[serde(default)]
    pub faq: FaqTable,
}

impl SiteData {
    /// Give every selector topic an entry so the client never looks up a missing key.
    ///
    /// Returns the ids that had to be filled in.
    pub fn normalize_topics(&mut self) -> Vec<&'static str> {
        let mut filled = Vec::new();
        for topic in FAQ_TOPICS {
            if !self.faq.contains_key(topic.id) {
                tracing::warn!("FAQ table has no entry for topic '{}'", topic.id);
                self.faq.insert(topic.id.to_string(), Vec::new());
                filled.push(topic.id);
            }
        }
        filled
    }
}
