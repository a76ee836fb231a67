//! Loading site data from a data file or from source literals.

use std::fs;
use std::path::{Path, PathBuf};

use crate::literal::{evaluate_literal, extract_export_array, extract_typed_object, LiteralError};
use crate::records::{FaqTable, Review, SiteData};

/// Where site data comes from.
#[derive(Debug, Clone)]
pub enum DataSource {
    /// A TOML, JSON or YAML file with `reviews` and `faq` tables.
    File(PathBuf),

    /// Literals embedded in application source files.
    Literals(LiteralSources),
}

/// Source files and names for literal extraction.
#[derive(Debug, Clone)]
pub struct LiteralSources {
    /// File holding `export const <reviews_export> = [...]`
    pub reviews_source: PathBuf,
    pub reviews_export: String,

    /// File holding `<faq_const>: ... = {...}`
    pub faq_source: PathBuf,
    pub faq_const: String,
}

impl Default for LiteralSources {
    fn default() -> Self {
        Self {
            reviews_source: PathBuf::from("src/lib/constants.ts"),
            reviews_export: "REVIEWS".to_string(),
            faq_source: PathBuf::from("src/components/faq-section.tsx"),
            faq_const: "faqsByTopic".to_string(),
        }
    }
}

/// Errors that can occur when loading site data.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("Failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("Unsupported data file format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid data in {path}: {message}")]
    Invalid { path: String, message: String },

    #[error("Literal error in {path}: {source}")]
    Literal {
        path: String,
        #[source]
        source: LiteralError,
    },
}

/// Load site data and fill in missing FAQ topics.
pub fn load(source: &DataSource) -> Result<SiteData, DataError> {
    let mut data = match source {
        DataSource::File(path) => load_data_file(path)?,
        DataSource::Literals(sources) => load_literals(sources)?,
    };

    data.normalize_topics();

    tracing::info!(
        "Loaded {} reviews and {} FAQ topics",
        data.reviews.len(),
        data.faq.len()
    );

    Ok(data)
}

/// Parse a data file, choosing the format by extension.
pub fn load_data_file(path: &Path) -> Result<SiteData, DataError> {
    let content = read(path)?;
    let invalid = |message: String| DataError::Invalid {
        path: path.display().to_string(),
        message,
    };

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    match ext {
        "toml" => toml::from_str(&content).map_err(|e| invalid(e.to_string())),
        "json" => serde_json::from_str(&content).map_err(|e| invalid(e.to_string())),
        "yaml" | "yml" => serde_yaml::from_str(&content).map_err(|e| invalid(e.to_string())),
        _ => Err(DataError::UnsupportedFormat(path.display().to_string())),
    }
}

/// Extract reviews and the FAQ table from application source.
pub fn load_literals(sources: &LiteralSources) -> Result<SiteData, DataError> {
    let reviews: Vec<Review> = literal_value(
        &sources.reviews_source,
        &sources.reviews_export,
        extract_export_array,
    )?;

    let faq: FaqTable =
        literal_value(&sources.faq_source, &sources.faq_const, extract_typed_object)?;

    Ok(SiteData { reviews, faq })
}

fn literal_value<T, F>(path: &Path, name: &str, extract: F) -> Result<T, DataError>
where
    T: serde::de::DeserializeOwned,
    F: for<'s> Fn(&'s str, &str) -> Result<&'s str, LiteralError>,
{
    let content = read(path)?;
    let literal_err = |source: LiteralError| DataError::Literal {
        path: path.display().to_string(),
        source,
    };

    let text = extract(&content, name).map_err(literal_err)?;
    let value = evaluate_literal(text, name).map_err(literal_err)?;

    serde_json::from_value(value).map_err(|e| DataError::Invalid {
        path: path.display().to_string(),
        message: format!("{name}: {e}"),
    })
}

fn read(path: &Path) -> Result<String, DataError> {
    fs::read_to_string(path).map_err(|e| DataError::Read {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn loads_toml_data_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("site-data.toml");
        fs::write(
            &path,
            r#"
[[reviews]]
name = "Sarah L."
service = "Wildlife Removal"
comment = "Great work"
rating = 4

[[reviews]]
name = "Mike R."

[[faq.general]]
question = "Do you offer inspections?"
answer = "Yes."

[[faq.general]]
question = "Are treatments safe?"
answer = "We prioritize eco-friendly solutions."
"#,
        )
        .unwrap();

        let data = load(&DataSource::File(path)).unwrap();

        assert_eq!(data.reviews.len(), 2);
        assert_eq!(data.reviews[0].rating, Some(4.0));
        assert_eq!(data.reviews[1].rating, None);
        assert_eq!(data.faq["general"][1].question, "Are treatments safe?");
        assert!(data.faq["pest"].is_empty());
    }

    #[test]
    fn loads_json_and_yaml_data_files() {
        let temp = tempdir().unwrap();

        let json = temp.path().join("data.json");
        fs::write(
            &json,
            r#"{"reviews": [{"name": "A"}], "faq": {"billing": [{"question": "Q", "answer": "A"}]}}"#,
        )
        .unwrap();
        let data = load_data_file(&json).unwrap();
        assert_eq!(data.reviews[0].name, "A");
        assert_eq!(data.faq["billing"].len(), 1);

        let yaml = temp.path().join("data.yml");
        fs::write(&yaml, "reviews:\n  - name: B\n    rating: 3\n").unwrap();
        let data = load_data_file(&yaml).unwrap();
        assert_eq!(data.reviews[0].rating, Some(3.0));
    }

    #[test]
    fn rejects_unknown_extension() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("data.ini");
        fs::write(&path, "reviews=").unwrap();

        let result = load_data_file(&path);

        assert!(matches!(result, Err(DataError::UnsupportedFormat(_))));
    }

    #[test]
    fn rejects_review_without_name() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("data.json");
        fs::write(&path, r#"{"reviews": [{"comment": "no name"}]}"#).unwrap();

        let result = load_data_file(&path);

        assert!(matches!(result, Err(DataError::Invalid { .. })));
    }

    #[test]
    fn loads_from_source_literals() {
        let temp = tempdir().unwrap();
        let constants = temp.path().join("constants.ts");
        let faq = temp.path().join("faq-section.tsx");

        fs::write(
            &constants,
            "export const REVIEWS = [\n  { name: 'Jane Doe', comment: 'Fast & friendly', avatarId: 'avatar-1' },\n];\n",
        )
        .unwrap();
        fs::write(
            &faq,
            "export function Faq() {\n  const faqsByTopic: Record<string, FaqItem[]> = {\n    general: [{ question: 'Q1', answer: 'A1' }],\n  };\n}\n",
        )
        .unwrap();

        let data = load(&DataSource::Literals(LiteralSources {
            reviews_source: constants,
            reviews_export: "REVIEWS".to_string(),
            faq_source: faq,
            faq_const: "faqsByTopic".to_string(),
        }))
        .unwrap();

        assert_eq!(data.reviews[0].name, "Jane Doe");
        assert_eq!(data.reviews[0].avatar.as_deref(), Some("avatar-1"));
        assert_eq!(data.faq["general"][0].answer, "A1");
        assert_eq!(data.faq.len(), 4);
    }

    #[test]
    fn missing_literal_is_an_error() {
        let temp = tempdir().unwrap();
        let constants = temp.path().join("constants.ts");
        fs::write(&constants, "export const PHONE = '555';\n").unwrap();

        let result = load_literals(&LiteralSources {
            reviews_source: constants,
            ..Default::default()
        });

        assert!(matches!(
            result,
            Err(DataError::Literal {
                source: LiteralError::NotFound(_),
                ..
            })
        ));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let result = load_data_file(Path::new("/nonexistent/site-data.toml"));

        assert!(matches!(result, Err(DataError::Read { .. })));
    }
}
