//! Output routes and the relative-path prefixes derived from their depth.

use std::path::{Component, Path, PathBuf};

/// One page of the exported site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Rendered document, relative to the build-output root
    pub input: PathBuf,

    /// Transformed document, relative to the output root
    pub output: PathBuf,

    /// Number of directories between the site root and the output file
    pub depth: usize,
}

impl Route {
    /// Create a route; depth is derived from the output path.
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        let output = output.into();
        let depth = normal_components(&output).count().saturating_sub(1);

        Self {
            input: input.into(),
            output,
            depth,
        }
    }

    /// A route whose input and output paths are the same.
    pub fn page(path: &str) -> Self {
        Self::new(path, path)
    }

    /// Up-navigation prefix to the site root: empty at depth 0, `../` per level below.
    pub fn root_rel(&self) -> String {
        "../".repeat(self.depth)
    }

    /// Reference to the home page.
    pub fn home_href(&self) -> String {
        if self.depth == 0 {
            "./".to_string()
        } else {
            self.root_rel()
        }
    }

    /// Prefix of the exported `assets/` directory.
    pub fn asset_rel(&self) -> String {
        format!("{}assets/", self.root_rel())
    }

    /// First directory of the output path, if the page is nested.
    pub fn section(&self) -> Option<&str> {
        if self.depth == 0 {
            return None;
        }
        normal_components(&self.output)
            .next()
            .and_then(|c| c.to_str())
    }

    /// The pages of the exported site.
    pub fn defaults() -> Vec<Route> {
        [
            "index.html",
            "404.html",
            "about/index.html",
            "contact/index.html",
            "cookie-policy/index.html",
            "faq/index.html",
            "pest-control/index.html",
            "privacy-policy/index.html",
            "reviews/index.html",
            "terms-of-service/index.html",
            "wildlife-removal/index.html",
        ]
        .into_iter()
        .map(Route::page)
        .collect()
    }
}

fn normal_components(path: &Path) -> impl Iterator<Item = &std::ffi::OsStr> {
    path.components().filter_map(|c| match c {
        Component::Normal(part) => Some(part),
        _ => None,
    })
}
