//! Structured-metadata extraction from doc comments (spec §4.4).
//!
//! `@avalanche::begin … @avalanche::end` blocks embed a TOML document in a
//! `///`-commented span. This module locates that span, strips the comment
//! leaders, parses it, and flattens nested tables into dotted keys.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

use crate::error::{ReflectError, SourceLocation};

static BLOCK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)@avalanche::begin(.*?)@avalanche::end").expect("static regex is valid")
});

const REFLECT_MARKER: &str = "@reflect";

/// A scalar or homogeneous-list value carried by a metadata entry.
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    String(String),
    List(Vec<MetadataValue>),
}

/// Ordered flat map of metadata keys to values; order follows declaration
/// order in the source TOML (nested tables flattened by dotted key).
pub type Metadata = IndexMap<String, MetadataValue>;

/// Extracts metadata from a raw doc comment.
///
/// Returns `Ok(None)` when the declaration is not reflected at all (no
/// `@avalanche::begin/end` span and no bare `@reflect` marker). Returns
/// `Ok(Some(empty map))` for the bare-marker, no-metadata case.
pub fn extract_metadata(
    raw_comment: Option<&str>,
    location: &SourceLocation,
) -> Result<Option<Metadata>, ReflectError> {
    let Some(comment) = raw_comment else {
        return Ok(None);
    };

    let Some(captures) = BLOCK_RE.captures(comment) else {
        if comment.contains(REFLECT_MARKER) {
            trace!(%location, "bare @reflect marker, no metadata block");
            return Ok(Some(Metadata::new()));
        }
        return Ok(None);
    };

    let span = &captures[1];
    let toml_text = strip_comment_leaders(span);

    let table: toml::Table = toml::from_str(&toml_text).map_err(|e| ReflectError::MetadataParse {
        location: location.clone(),
        message: e.to_string(),
    })?;

    let mut flat = Metadata::new();
    flatten_table("", &table, &mut flat);
    trace!(%location, keys = flat.len(), "parsed metadata block");
    Ok(Some(flat))
}

fn strip_comment_leaders(span: &str) -> String {
    span.lines()
        .map(|line| line.trim().trim_start_matches("///").trim())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

fn flatten_table(prefix: &str, table: &toml::Table, out: &mut Metadata) {
    for (key, value) in table {
        let dotted = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            toml::Value::Table(nested) => flatten_table(&dotted, nested, out),
            other => {
                out.insert(dotted, to_metadata_value(other));
            }
        }
    }
}

fn to_metadata_value(value: &toml::Value) -> MetadataValue {
    match value {
        toml::Value::Integer(i) => MetadataValue::Int(*i),
        toml::Value::Float(f) => MetadataValue::Float(*f),
        toml::Value::Boolean(b) => MetadataValue::Bool(*b),
        toml::Value::String(s) => MetadataValue::String(s.clone()),
        toml::Value::Array(items) => {
            MetadataValue::List(items.iter().map(to_metadata_value).collect())
        }
        // Tables are flattened one level up; a table nested inside a list
        // has no terminal representation in the value sum-type and is
        // dropped (lists are terminal, per spec §4.4).
        toml::Value::Table(_) => MetadataValue::String(String::new()),
        toml::Value::Datetime(dt) => MetadataValue::String(dt.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn loc() -> SourceLocation {
        SourceLocation {
            file: "test.h".into(),
            line: 1,
            column: 1,
        }
    }

    #[test]
    fn no_comment_is_not_reflected() {
        assert_eq!(extract_metadata(None, &loc()).unwrap(), None);
    }

    #[test]
    fn comment_without_markers_is_not_reflected() {
        let comment = "/// Just a regular doc comment.";
        assert_eq!(extract_metadata(Some(comment), &loc()).unwrap(), None);
    }

    #[test]
    fn bare_reflect_marker_yields_empty_map() {
        let comment = "/// @reflect";
        let result = extract_metadata(Some(comment), &loc()).unwrap();
        assert_eq!(result, Some(Metadata::new()));
    }

    #[test]
    fn begin_end_block_parses_scalars_in_order() {
        let comment = "/// @avalanche::begin\n/// foo = 1\n/// bar = \"hi\"\n/// @avalanche::end";
        let result = extract_metadata(Some(comment), &loc()).unwrap().unwrap();
        let keys: Vec<&str> = result.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["foo", "bar"]);
        assert_eq!(result["foo"], MetadataValue::Int(1));
        assert_eq!(result["bar"], MetadataValue::String("hi".into()));
    }

    #[test]
    fn nested_tables_flatten_with_dotted_keys() {
        let comment = "/// @avalanche::begin\n/// [a]\n/// [a.b]\n/// c = 1\n/// @avalanche::end";
        let result = extract_metadata(Some(comment), &loc()).unwrap().unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result["a.b.c"], MetadataValue::Int(1));
    }

    #[test]
    fn list_values_are_terminal() {
        let comment = "/// @avalanche::begin\n/// xs = [1, 2, 3]\n/// @avalanche::end";
        let result = extract_metadata(Some(comment), &loc()).unwrap().unwrap();
        assert_eq!(
            result["xs"],
            MetadataValue::List(vec![
                MetadataValue::Int(1),
                MetadataValue::Int(2),
                MetadataValue::Int(3)
            ])
        );
    }

    #[test]
    fn malformed_block_is_a_fatal_parse_error() {
        let comment = "/// @avalanche::begin\n/// not valid toml ===\n/// @avalanche::end";
        let err = extract_metadata(Some(comment), &loc()).unwrap_err();
        assert!(matches!(err, ReflectError::MetadataParse { .. }));
    }

    #[test]
    fn missing_end_delimiter_is_simply_not_reflected() {
        let comment = "/// @avalanche::begin\n/// foo = 1";
        assert_eq!(extract_metadata(Some(comment), &loc()).unwrap(), None);
    }

    #[test]
    fn multi_key_block_with_realistic_formatting_parses() {
        let comment = indoc! {r#"
            /// @avalanche::begin
            /// display_name = "Point"
            /// version = 2
            /// tags = ["geometry", "core"]
            /// @avalanche::end
        "#};
        let result = extract_metadata(Some(comment), &loc()).unwrap().unwrap();
        assert_eq!(result["display_name"], MetadataValue::String("Point".into()));
        assert_eq!(result["version"], MetadataValue::Int(2));
        assert_eq!(
            result["tags"],
            MetadataValue::List(vec![
                MetadataValue::String("geometry".into()),
                MetadataValue::String("core".into())
            ])
        );
    }
}
