//! Trait definitions for page-specific patchers.

use crate::route::Route;
use crate::templates::Templates;

/// Context handed to a patcher.
pub struct PatchContext<'a> {
    /// Route being exported
    pub route: &'a Route,

    /// Shared template engine
    pub templates: &'a Templates,
}

/// Errors a patcher can report.
#[derive(Debug, thiserror::Error)]
pub enum PatchError {
    /// The page no longer has the markup the patcher anchors on.
    #[error("{patcher}: marker not found: {marker}")]
    MarkerNotFound {
        patcher: &'static str,
        marker: String,
    },

    #[error("{patcher}: failed to render template: {message}")]
    Render {
        patcher: &'static str,
        message: String,
    },
}

impl PatchError {
    /// Whether the page can ship unpatched.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, PatchError::MarkerNotFound { .. })
    }
}

/// A rewrite that only applies to one section of the site.
pub trait PagePatcher: Send + Sync {
    /// Patcher identifier (e.g., "reviews")
    fn name(&self) -> &'static str;

    /// First output directory of the pages this patcher handles
    fn section(&self) -> &'static str;

    /// Whether this patcher handles the route.
    fn applies_to(&self, route: &Route) -> bool {
        route.section() == Some(self.section())
    }

    /// Rewrite the document.
    ///
    /// A missing marker is reported as [`PatchError::MarkerNotFound`]; the caller
    /// keeps the document unchanged in that case.
    fn patch(&self, html: &str, ctx: &PatchContext<'_>) -> Result<String, PatchError>;
}
