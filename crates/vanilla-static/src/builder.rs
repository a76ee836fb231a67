//! Static export builder.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;

use vanilla_data::{DataError, DataSource, LiteralSources};
use vanilla_transform::contact::DEFAULT_EMAIL;
use vanilla_transform::rewrite::{SCRIPT, STYLESHEET};
use vanilla_transform::{Pipeline, Route};

use crate::assets::AssetPipeline;

/// Configuration for exporting a site.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Build-output root holding the rendered pages
    pub dist_dir: PathBuf,

    /// Output directory, removed and recreated on every build
    pub output_dir: PathBuf,

    /// Where review and FAQ data comes from
    pub data: DataSource,

    /// Pages to export
    pub routes: Vec<Route>,

    /// Address the contact form is mailed to
    pub contact_email: String,

    /// Runtime script to ship instead of the bundled one
    pub runtime_script: Option<PathBuf>,

    /// Minify the exported stylesheet
    pub minify_css: bool,

    /// Fail the build when a page patcher cannot find its markers
    pub strict_patches: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            dist_dir: PathBuf::from("dist"),
            output_dir: PathBuf::from("vanilla"),
            data: DataSource::Literals(LiteralSources::default()),
            routes: Route::defaults(),
            contact_email: DEFAULT_EMAIL.to_string(),
            runtime_script: None,
            minify_css: false,
            strict_patches: false,
        }
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of pages written
    pub pages: usize,

    /// Pages that shipped without a patch, with the reason
    pub degraded: Vec<String>,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that abort a build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Build output not found: {0}")]
    MissingInput(String),

    #[error("No stylesheet found in {0}")]
    MissingStylesheet(String),

    #[error("Failed to load site data: {0}")]
    Data(#[from] DataError),

    #[error("Failed to read: {0}")]
    ReadError(String),

    #[error("Failed to transform {path}: {message}")]
    TransformError { path: String, message: String },

    #[error("Failed to write output: {0}")]
    WriteError(String),

    #[error("Pages could not be patched: {0}")]
    Degraded(String),
}

/// Exports a server-rendered build as plain HTML, CSS and JS.
pub struct StaticBuilder {
    config: BuildConfig,
}

impl StaticBuilder {
    /// Create a new static builder.
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    /// Run the export.
    pub async fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();

        if !self.config.dist_dir.is_dir() {
            return Err(BuildError::MissingInput(
                self.config.dist_dir.display().to_string(),
            ));
        }

        self.reset_output()?;
        self.copy_public_assets()?;
        self.write_stylesheet()?;
        self.copy_media()?;

        let data = vanilla_data::load(&self.config.data)?;
        self.write_runtime_script()?;

        let pipeline = Pipeline::for_site(&data, &self.config.contact_email);

        // Routes share nothing mutable, so they are exported in parallel
        let results: Vec<Result<Vec<String>, BuildError>> = self
            .config
            .routes
            .par_iter()
            .map(|route| self.build_page(&pipeline, route))
            .collect();

        let mut pages = 0;
        let mut degraded = Vec::new();

        for result in results {
            degraded.extend(result?);
            pages += 1;
        }

        if self.config.strict_patches && !degraded.is_empty() {
            return Err(BuildError::Degraded(degraded.join("; ")));
        }

        let duration = start.elapsed();

        Ok(BuildResult {
            pages,
            degraded,
            duration_ms: duration.as_millis() as u64,
            output_dir: self.config.output_dir.clone(),
        })
    }

    /// Remove any previous output and recreate the directory skeleton.
    fn reset_output(&self) -> Result<(), BuildError> {
        let out = &self.config.output_dir;

        if out.exists() {
            fs::remove_dir_all(out)
                .map_err(|e| BuildError::WriteError(format!("{}: {}", out.display(), e)))?;
        }

        fs::create_dir_all(self.assets_dir()).map_err(|e| BuildError::WriteError(e.to_string()))
    }

    fn assets_dir(&self) -> PathBuf {
        self.config.output_dir.join("assets")
    }

    /// Copy `images/` and `icons/` to the output root.
    fn copy_public_assets(&self) -> Result<(), BuildError> {
        for dir in ["images", "icons"] {
            let src = self.config.dist_dir.join(dir);
            self.copy_optional_dir(&src, &self.config.output_dir.join(dir))?;
        }
        Ok(())
    }

    /// Copy the fonts and images the stylesheet references.
    fn copy_media(&self) -> Result<(), BuildError> {
        let media = self.config.dist_dir.join("_next").join("static").join("media");
        self.copy_optional_dir(&media, &self.assets_dir().join("media"))
    }

    fn copy_optional_dir(&self, src: &Path, dest: &Path) -> Result<(), BuildError> {
        if !src.is_dir() {
            tracing::warn!("Skipping missing directory {}", src.display());
            return Ok(());
        }

        let count = AssetPipeline::copy_dir(src, dest)
            .map_err(|e| BuildError::WriteError(format!("{}: {}", dest.display(), e)))?;
        tracing::debug!("Copied {} files from {}", count, src.display());
        Ok(())
    }

    /// Copy the compiled stylesheet with its media URLs made relative.
    fn write_stylesheet(&self) -> Result<(), BuildError> {
        let css_dir = self.config.dist_dir.join("_next").join("static").join("css");
        let source = AssetPipeline::first_stylesheet(&css_dir)
            .ok_or_else(|| BuildError::MissingStylesheet(css_dir.display().to_string()))?;

        let css = fs::read_to_string(&source)
            .map_err(|e| BuildError::ReadError(format!("{}: {}", source.display(), e)))?;
        let css = AssetPipeline::rewrite_css_urls(&css);

        let css = if self.config.minify_css {
            AssetPipeline::minify_css(&css).unwrap_or_else(|e| {
                tracing::warn!("Keeping unminified stylesheet: {}", e);
                css
            })
        } else {
            css
        };

        fs::write(self.assets_dir().join(STYLESHEET), css)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        tracing::info!("Copied stylesheet from {}", source.display());
        Ok(())
    }

    /// Write the runtime script, from the configured file or the bundled one.
    fn write_runtime_script(&self) -> Result<(), BuildError> {
        let js = match &self.config.runtime_script {
            Some(path) if path.is_file() => fs::read_to_string(path)
                .map_err(|e| BuildError::ReadError(format!("{}: {}", path.display(), e)))?,
            Some(path) => {
                tracing::warn!(
                    "Runtime script not found: {}, using bundled runtime",
                    path.display()
                );
                AssetPipeline::runtime_js().to_string()
            }
            None => AssetPipeline::runtime_js().to_string(),
        };

        fs::write(self.assets_dir().join(SCRIPT), js)
            .map_err(|e| BuildError::WriteError(e.to_string()))
    }

    /// Export a single page. Returns the degradations it shipped with.
    fn build_page(&self, pipeline: &Pipeline, route: &Route) -> Result<Vec<String>, BuildError> {
        let input = self.config.dist_dir.join(&route.input);
        let output = self.config.output_dir.join(&route.output);

        let html = fs::read_to_string(&input)
            .map_err(|e| BuildError::ReadError(format!("{}: {}", input.display(), e)))?;

        let page = pipeline
            .run(&html, route)
            .map_err(|e| BuildError::TransformError {
                path: route.output.display().to_string(),
                message: e.to_string(),
            })?;

        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent).map_err(|e| BuildError::WriteError(e.to_string()))?;
        }

        fs::write(&output, page.html).map_err(|e| BuildError::WriteError(e.to_string()))?;

        tracing::debug!("Wrote {}", output.display());

        Ok(page
            .degraded
            .iter()
            .map(|e| format!("{}: {}", route.output.display(), e))
            .collect())
    }
}
