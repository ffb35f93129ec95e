//! YAML Parser
//!
//! Shared helpers for reading typed fields out of YAML values.

use crate::error::{ParseError, Result};
use serde_yaml::Value as YamlValue;

/// YAML parser utilities
pub struct YamlParser;

impl YamlParser {
    /// Parse YAML string into a YAML value
    pub fn parse(yaml_str: &str) -> Result<YamlValue> {
        serde_yaml::from_str(yaml_str).map_err(|e| ParseError::ParseError(e.to_string()))
    }

    /// Parse YAML containing several documents. Besides explicit `---`
    /// separators, a top-level `rule:` key starts a new document.
    pub fn parse_multi_document(yaml_str: &str) -> Result<Vec<YamlValue>> {
        use serde::Deserialize;

        let preprocessed = Self::preprocess_multi_document(yaml_str);
        let mut documents = Vec::new();

        for document in serde_yaml::Deserializer::from_str(&preprocessed) {
            let value = YamlValue::deserialize(document)
                .map_err(|e| ParseError::ParseError(e.to_string()))?;
            if !value.is_null() {
                documents.push(value);
            }
        }

        Ok(documents)
    }

    /// Insert `---` before every top-level `rule:` line that is not already
    /// preceded by a separator
    fn preprocess_multi_document(yaml_str: &str) -> String {
        let mut result = String::with_capacity(yaml_str.len() + 64);
        let mut seen_content = false;
        let mut recent_separator = false;

        for line in yaml_str.lines() {
            let trimmed = line.trim();
            let is_definition_start =
                !line.starts_with(' ') && !line.starts_with('\t') && trimmed.starts_with("rule:");

            if is_definition_start && seen_content && !recent_separator {
                result.push_str("---\n");
            }

            result.push_str(line);
            result.push('\n');

            if trimmed == "---" {
                recent_separator = true;
            } else if !trimmed.is_empty() && !trimmed.starts_with('#') {
                recent_separator = false;
                seen_content = true;
            }
        }

        result
    }

    /// Get a required string field from YAML object
    pub fn get_string(obj: &YamlValue, field: &str) -> Result<String> {
        let value = obj.get(field).ok_or_else(|| ParseError::missing(field))?;
        Self::scalar_string(value).ok_or_else(|| Self::mismatch(field, "string", value))
    }

    /// Get an optional string field from YAML object
    pub fn get_optional_string(obj: &YamlValue, field: &str) -> Option<String> {
        obj.get(field).and_then(Self::scalar_string)
    }

    /// Get a required small unsigned integer field
    pub fn get_u8(obj: &YamlValue, field: &str) -> Result<u8> {
        let value = obj.get(field).ok_or_else(|| ParseError::missing(field))?;
        let number = value
            .as_u64()
            .ok_or_else(|| Self::mismatch(field, "unsigned integer", value))?;
        u8::try_from(number).map_err(|_| ParseError::invalid(field, format!("{} is out of range", number)))
    }

    /// Get a required unsigned integer field
    pub fn get_usize(obj: &YamlValue, field: &str) -> Result<usize> {
        let value = obj.get(field).ok_or_else(|| ParseError::missing(field))?;
        value
            .as_u64()
            .map(|n| n as usize)
            .ok_or_else(|| Self::mismatch(field, "unsigned integer", value))
    }

    /// Get a required float field from YAML object
    pub fn get_f64(obj: &YamlValue, field: &str) -> Result<f64> {
        let value = obj.get(field).ok_or_else(|| ParseError::missing(field))?;
        value
            .as_f64()
            .ok_or_else(|| Self::mismatch(field, "number", value))
    }

    /// Get a required list of strings. A single scalar counts as a one-item list.
    pub fn get_string_list(obj: &YamlValue, field: &str) -> Result<Vec<String>> {
        let value = obj.get(field).ok_or_else(|| ParseError::missing(field))?;
        Self::string_list(field, value)
    }

    /// Read a scalar or a sequence of scalars as strings
    pub fn string_list(field: &str, value: &YamlValue) -> Result<Vec<String>> {
        match value {
            YamlValue::Null => Ok(Vec::new()),
            YamlValue::Sequence(items) => items
                .iter()
                .map(|item| {
                    Self::scalar_string(item).ok_or_else(|| Self::mismatch(field, "string", item))
                })
                .collect(),
            other => Self::scalar_string(other)
                .map(|s| vec![s])
                .ok_or_else(|| Self::mismatch(field, "string or sequence", other)),
        }
    }

    /// String keys of a YAML mapping
    fn get_keys(obj: &YamlValue) -> Vec<String> {
        obj.as_mapping()
            .map(|mapping| {
                mapping
                    .keys()
                    .filter_map(|k| k.as_str())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Reject keys outside `allowed`
    pub fn reject_unknown_fields(obj: &YamlValue, allowed: &[&str]) -> Result<()> {
        match Self::get_keys(obj).into_iter().find(|k| !allowed.contains(&k.as_str())) {
            Some(unknown) => Err(ParseError::UnknownField(unknown)),
            None => Ok(()),
        }
    }

    /// Short name of a YAML value's type, for error messages
    pub fn type_name(value: &YamlValue) -> &'static str {
        match value {
            YamlValue::Null => "null",
            YamlValue::Bool(_) => "bool",
            YamlValue::Number(_) => "number",
            YamlValue::String(_) => "string",
            YamlValue::Sequence(_) => "sequence",
            YamlValue::Mapping(_) => "mapping",
            YamlValue::Tagged(_) => "tagged value",
        }
    }

    /// Strings and numbers read as text; names like `2025` are common
    fn scalar_string(value: &YamlValue) -> Option<String> {
        match value {
            YamlValue::String(s) => Some(s.clone()),
            YamlValue::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    fn mismatch(field: &str, expected: &str, actual: &YamlValue) -> ParseError {
        ParseError::TypeMismatch {
            field: field.to_string(),
            expected: expected.to_string(),
            actual: Self::type_name(actual).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_getters() {
        let yaml = YamlParser::parse("id: r1\nseverity: 2\nmin: 40.5\nnames: [a, b]\nsingle: c").unwrap();
        assert_eq!(YamlParser::get_string(&yaml, "id").unwrap(), "r1");
        assert_eq!(YamlParser::get_u8(&yaml, "severity").unwrap(), 2);
        assert_eq!(YamlParser::get_f64(&yaml, "min").unwrap(), 40.5);
        assert_eq!(YamlParser::get_string_list(&yaml, "names").unwrap(), vec!["a", "b"]);
        assert_eq!(YamlParser::get_string_list(&yaml, "single").unwrap(), vec!["c"]);
        assert!(YamlParser::get_optional_string(&yaml, "missing").is_none());
    }

    #[test]
    fn test_type_mismatch_and_missing() {
        let yaml = YamlParser::parse("severity: high\nnames: {a: 1}").unwrap();
        let err = YamlParser::get_u8(&yaml, "severity").unwrap_err();
        assert!(matches!(err, ParseError::TypeMismatch { .. }));
        assert!(err.to_string().contains("expected unsigned integer, got string"));

        let err = YamlParser::get_string(&yaml, "id").unwrap_err();
        assert!(err.to_string().contains("Missing required field: id"));

        assert!(YamlParser::get_u8(&YamlParser::parse("n: 300").unwrap(), "n").is_err());
    }

    #[test]
    fn test_multi_document_auto_separator() {
        let yaml = "rule:\n  id: a\nrule:\n  id: b\n---\nrule:\n  id: c\n";
        let docs = YamlParser::parse_multi_document(yaml).unwrap();
        assert_eq!(docs.len(), 3);
        assert_eq!(
            YamlParser::get_string(docs[1].get("rule").unwrap(), "id").unwrap(),
            "b"
        );
    }

    #[test]
    fn test_reject_unknown_fields() {
        let yaml = YamlParser::parse("id: a\ncolour: red").unwrap();
        let err = YamlParser::reject_unknown_fields(&yaml, &["id"]).unwrap_err();
        assert!(err.to_string().contains("colour"));
    }
}
