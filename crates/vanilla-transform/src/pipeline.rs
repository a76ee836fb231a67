//! The per-document transform pipeline.
//!
//! Stages run in a fixed order, each taking and returning the whole document:
//! runtime stripping, stylesheet removal, asset injection, URL rewriting, mount
//! points, then whichever page patchers apply to the route.

use vanilla_data::SiteData;

use crate::contact::ContactPatcher;
use crate::faq::FaqPatcher;
use crate::mount::ensure_mount_points;
use crate::reviews::ReviewsPatcher;
use crate::rewrite::{inject_assets, rewrite_root_relative};
use crate::route::Route;
use crate::strip::{strip_runtime, strip_stylesheets};
use crate::templates::Templates;
use crate::traits::{PagePatcher, PatchContext, PatchError};

/// Result of transforming one document.
#[derive(Debug)]
pub struct PageOutput {
    /// Transformed markup
    pub html: String,

    /// Patchers that could not find their markers and left the page as is
    pub degraded: Vec<PatchError>,
}

/// Ordered transform stages plus the page patchers.
pub struct Pipeline {
    templates: Templates,
    patchers: Vec<Box<dyn PagePatcher>>,
}

impl Pipeline {
    /// Create a pipeline with no page patchers.
    pub fn new() -> Self {
        Self {
            templates: Templates::new(),
            patchers: Vec::new(),
        }
    }

    /// Create a pipeline with the reviews, FAQ and contact patchers.
    pub fn for_site(data: &SiteData, contact_email: &str) -> Self {
        Self::new()
            .with_patcher(ReviewsPatcher::new(data.reviews.clone()))
            .with_patcher(FaqPatcher::new(data.faq.clone()))
            .with_patcher(ContactPatcher::new(contact_email))
    }

    /// Add a page patcher.
    pub fn with_patcher(mut self, patcher: impl PagePatcher + 'static) -> Self {
        self.patchers.push(Box::new(patcher));
        self
    }

    /// Names of the registered patchers.
    pub fn patchers(&self) -> Vec<&'static str> {
        self.patchers.iter().map(|p| p.name()).collect()
    }

    /// Transform one document.
    ///
    /// Missing patcher markers are collected in [`PageOutput::degraded`]; only
    /// template failures are returned as errors.
    pub fn run(&self, html: &str, route: &Route) -> Result<PageOutput, PatchError> {
        let html = strip_runtime(html);
        let html = strip_stylesheets(&html);
        let html = inject_assets(&html, route);
        let html = rewrite_root_relative(&html, route);
        let mut html = ensure_mount_points(&html);

        let ctx = PatchContext {
            route,
            templates: &self.templates,
        };
        let mut degraded = Vec::new();

        for patcher in self.patchers.iter().filter(|p| p.applies_to(route)) {
            match patcher.patch(&html, &ctx) {
                Ok(patched) => {
                    tracing::debug!(
                        "Applied {} patch to {}",
                        patcher.name(),
                        route.output.display()
                    );
                    html = patched;
                }
                Err(e) if e.is_recoverable() => {
                    tracing::warn!("Skipped patch for {}: {}", route.output.display(), e);
                    degraded.push(e);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(PageOutput { html, degraded })
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
