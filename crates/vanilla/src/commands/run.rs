//! Export command.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Deserialize;
use vanilla_data::{DataSource, LiteralSources};
use vanilla_static::{BuildConfig, StaticBuilder};
use vanilla_transform::contact::DEFAULT_EMAIL;
use vanilla_transform::Route;

/// Configuration file structure (vanilla.toml).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    paths: PathsConfig,
    data: DataConfig,
    contact: ContactConfig,
    build: BuildSettings,
    routes: Option<Vec<RouteConfig>>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct PathsConfig {
    dist: String,
    output: String,
    runtime_script: Option<String>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            dist: "dist".to_string(),
            output: "vanilla".to_string(),
            runtime_script: None,
        }
    }
}

/// Data file, or the source literals used when no file is set.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DataConfig {
    file: Option<String>,
    reviews_source: Option<String>,
    reviews_export: Option<String>,
    faq_source: Option<String>,
    faq_const: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct ContactConfig {
    email: String,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            email: DEFAULT_EMAIL.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct BuildSettings {
    minify_css: bool,
    strict_patches: bool,
}

#[derive(Debug, Deserialize)]
struct RouteConfig {
    input: String,
    output: Option<String>,
}

impl DataConfig {
    fn source(self) -> DataSource {
        if let Some(file) = self.file {
            return DataSource::File(PathBuf::from(file));
        }

        let defaults = LiteralSources::default();
        DataSource::Literals(LiteralSources {
            reviews_source: self
                .reviews_source
                .map(PathBuf::from)
                .unwrap_or(defaults.reviews_source),
            reviews_export: self.reviews_export.unwrap_or(defaults.reviews_export),
            faq_source: self
                .faq_source
                .map(PathBuf::from)
                .unwrap_or(defaults.faq_source),
            faq_const: self.faq_const.unwrap_or(defaults.faq_const),
        })
    }
}

impl ConfigFile {
    fn into_build_config(self) -> BuildConfig {
        let routes = match self.routes {
            Some(routes) => routes
                .into_iter()
                .map(|r| {
                    let output = r.output.unwrap_or_else(|| r.input.clone());
                    Route::new(r.input, output)
                })
                .collect(),
            None => Route::defaults(),
        };

        BuildConfig {
            dist_dir: PathBuf::from(self.paths.dist),
            output_dir: PathBuf::from(self.paths.output),
            data: self.data.source(),
            routes,
            contact_email: self.contact.email,
            runtime_script: self.paths.runtime_script.map(PathBuf::from),
            minify_css: self.build.minify_css,
            strict_patches: self.build.strict_patches,
        }
    }
}

/// Load configuration if the file exists.
/// Returns an error if the config file exists but is malformed.
fn load_config(path: &Path) -> Result<ConfigFile> {
    if path.exists() {
        let content = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
        let config: ConfigFile = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path.display(), e))?;
        tracing::info!("Loaded config from {}", path.display());
        return Ok(config);
    }
    Ok(ConfigFile::default())
}

/// Run the export.
pub async fn run(config_path: &Path) -> Result<()> {
    tracing::info!("Exporting vanilla site...");

    let config = load_config(config_path)?.into_build_config();
    let result = StaticBuilder::new(config).build().await?;

    tracing::info!(
        "Exported {} pages in {}ms",
        result.pages,
        result.duration_ms
    );

    if !result.degraded.is_empty() {
        tracing::warn!(
            "{} pages shipped without a static replacement",
            result.degraded.len()
        );
        for entry in &result.degraded {
            tracing::warn!("  {}", entry);
        }
    }

    tracing::info!("Output: {}", result.output_dir.display());

    Ok(())
}
