//! Front-matter splitting and schema validation.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::Kompetenz;

/// Fence line opening and closing a front-matter block.
const FENCE: &str = "---";

/// Document-level metadata.
///
/// All fields are required. Unknown keys in the YAML block are ignored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrontMatter {
    /// Document title.
    #[serde(deserialize_with = "scalar_string")]
    pub titel: String,
    /// Short description shown in listings and search.
    #[serde(deserialize_with = "scalar_string")]
    pub beschreibung: String,
    /// Grade level (e.g. `"5"`).
    #[serde(deserialize_with = "scalar_string")]
    pub schulstufe: String,
    /// Curriculum module.
    #[serde(deserialize_with = "scalar_string")]
    pub modul: String,
    /// Competency areas covered by the document.
    pub kompetenzen: Vec<Kompetenz>,
}

/// Error returned when a document's front-matter is absent or invalid.
#[derive(Debug, thiserror::Error)]
pub enum FrontMatterError {
    /// The document does not start with a `---` fence.
    #[error("document has no front-matter block")]
    Missing,
    /// The opening fence has no matching closing fence.
    #[error("front-matter block is not terminated")]
    Unterminated,
    /// The YAML is malformed or does not match the schema.
    #[error("invalid front-matter: {0}")]
    Invalid(#[from] serde_yaml::Error),
}

impl FrontMatter {
    /// Parse and validate a YAML front-matter block.
    ///
    /// # Errors
    ///
    /// Returns [`FrontMatterError::Invalid`] if the YAML is malformed, a
    /// required field is missing, or a competency symbol is unknown.
    pub fn from_yaml(yaml: &str) -> Result<Self, FrontMatterError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Split a document into validated front-matter and body.
    ///
    /// # Errors
    ///
    /// Returns an error if the document has no (or an unterminated)
    /// front-matter block, or the block fails validation.
    pub fn extract(document: &str) -> Result<(Self, &str), FrontMatterError> {
        let (yaml, body) = split_front_matter(document)?;
        Ok((Self::from_yaml(yaml)?, body))
    }
}

/// Split a document into its raw front-matter YAML and the remaining body.
///
/// The first line must be exactly `---` (a leading BOM is skipped). The
/// block ends at the next line that is exactly `---`. Both `\n` and `\r\n`
/// line endings are accepted.
///
/// # Errors
///
/// Returns [`FrontMatterError::Missing`] or [`FrontMatterError::Unterminated`].
pub fn split_front_matter(document: &str) -> Result<(&str, &str), FrontMatterError> {
    let document = document.strip_prefix('\u{feff}').unwrap_or(document);

    let (first, mut rest) = split_line(document);
    if first.trim_end() != FENCE {
        return Err(FrontMatterError::Missing);
    }

    let yaml_start = rest;
    let mut yaml_len = 0;
    loop {
        if rest.is_empty() {
            return Err(FrontMatterError::Unterminated);
        }
        let (line, next) = split_line(rest);
        if line.trim_end() == FENCE {
            return Ok((&yaml_start[..yaml_len], next));
        }
        yaml_len += rest.len() - next.len();
        rest = next;
    }
}

/// Split off the first line, returning `(line_without_newline, remainder)`.
fn split_line(text: &str) -> (&str, &str) {
    match text.find('\n') {
        Some(idx) => (text[..idx].trim_end_matches('\r'), &text[idx + 1..]),
        None => (text, ""),
    }
}

/// Deserialize a YAML scalar (string or number) into a `String`.
fn scalar_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct ScalarVisitor;

    impl Visitor<'_> for ScalarVisitor {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a string or number")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_owned())
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
            Ok(v.to_string())
        }
    }

    deserializer.deserialize_any(ScalarVisitor)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const VALID: &str = "---
titel: A
beschreibung: B
schulstufe: C
modul: D
kompetenzen:
  - T
---
# Body
";

    #[test]
    fn test_extract_valid_document() {
        let (meta, body) = FrontMatter::extract(VALID).unwrap();

        assert_eq!(
            meta,
            FrontMatter {
                titel: "A".to_owned(),
                beschreibung: "B".to_owned(),
                schulstufe: "C".to_owned(),
                modul: "D".to_owned(),
                kompetenzen: vec![Kompetenz::T],
            }
        );
        assert_eq!(body, "# Body\n");
    }

    #[test]
    fn test_missing_titel_fails() {
        let doc = "---\nbeschreibung: B\nschulstufe: C\nmodul: D\nkompetenzen: [T]\n---\nbody";
        let err = FrontMatter::extract(doc).unwrap_err();

        assert!(matches!(err, FrontMatterError::Invalid(_)));
        assert!(err.to_string().contains("titel"));
    }

    #[test]
    fn test_missing_kompetenzen_fails() {
        let doc = "---\ntitel: A\nbeschreibung: B\nschulstufe: C\nmodul: D\n---\n";
        assert!(FrontMatter::extract(doc).is_err());
    }

    #[test]
    fn test_unknown_kompetenz_fails() {
        let doc = "---\ntitel: A\nbeschreibung: B\nschulstufe: C\nmodul: D\nkompetenzen: [T, X]\n---\n";
        let err = FrontMatter::extract(doc).unwrap_err();
        assert!(matches!(err, FrontMatterError::Invalid(_)));
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let doc = "---\ntitel: A\nbeschreibung: B\nschulstufe: C\nmodul: D\nkompetenzen: []\nautor: X\n---\n";
        let (meta, _) = FrontMatter::extract(doc).unwrap();
        assert_eq!(meta.titel, "A");
        assert!(meta.kompetenzen.is_empty());
    }

    #[test]
    fn test_numeric_schulstufe_is_accepted() {
        let doc = "---\ntitel: A\nbeschreibung: B\nschulstufe: 5\nmodul: D\nkompetenzen: [G]\n---\n";
        let (meta, _) = FrontMatter::extract(doc).unwrap();
        assert_eq!(meta.schulstufe, "5");
    }

    #[test]
    fn test_list_for_string_field_fails() {
        let doc = "---\ntitel: [A]\nbeschreibung: B\nschulstufe: C\nmodul: D\nkompetenzen: [T]\n---\n";
        assert!(FrontMatter::extract(doc).is_err());
    }

    #[test]
    fn test_document_without_front_matter() {
        let err = FrontMatter::extract("# Just a heading\n").unwrap_err();
        assert!(matches!(err, FrontMatterError::Missing));
    }

    #[test]
    fn test_unterminated_block() {
        let err = split_front_matter("---\ntitel: A\n").unwrap_err();
        assert!(matches!(err, FrontMatterError::Unterminated));
    }

    #[test]
    fn test_split_crlf_and_bom() {
        let doc = "\u{feff}---\r\ntitel: A\r\n---\r\nbody";
        let (yaml, body) = split_front_matter(doc).unwrap();
        assert_eq!(yaml, "titel: A\r\n");
        assert_eq!(body, "body");
    }

    #[test]
    fn test_split_empty_block() {
        let (yaml, body) = split_front_matter("---\n---\nbody").unwrap();
        assert_eq!(yaml, "");
        assert_eq!(body, "body");
        assert!(FrontMatter::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_fence_inside_body_is_kept() {
        let doc = "---\ntitel: A\n---\nintro\n---\nmore";
        let (_, body) = split_front_matter(doc).unwrap();
        assert_eq!(body, "intro\n---\nmore");
    }
}
