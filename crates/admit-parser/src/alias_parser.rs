//! Alias table parser
//!
//! ```yaml
//! institutions:
//!   Hanguk University: [HKU, 한국대학교]
//! majors:
//!   Medicine:
//!     - 의예과
//!     - Pre-Med
//! subjects:
//!   Korean: 국어
//! ```

use crate::error::{ParseError, Result};
use crate::yaml_parser::YamlParser;
use admit_core::{AliasRegistry, AliasTable};
use serde_yaml::Value as YamlValue;
use tracing::debug;

const SECTIONS: [&str; 3] = ["institutions", "majors", "subjects"];

/// Alias registry parser
pub struct AliasParser;

impl AliasParser {
    /// Parse all three alias tables from one YAML document. Missing
    /// sections are empty tables.
    pub fn parse(yaml_str: &str) -> Result<AliasRegistry> {
        let yaml = YamlParser::parse(yaml_str)?;
        Self::parse_from_yaml(&yaml)
    }

    pub fn parse_from_yaml(yaml: &YamlValue) -> Result<AliasRegistry> {
        if yaml.is_null() {
            return Ok(AliasRegistry::default());
        }
        if !yaml.is_mapping() {
            return Err(ParseError::TypeMismatch {
                field: "aliases".to_string(),
                expected: "mapping".to_string(),
                actual: YamlParser::type_name(yaml).to_string(),
            });
        }
        YamlParser::reject_unknown_fields(yaml, &SECTIONS)?;

        let registry = AliasRegistry::default()
            .with_institutions(Self::parse_section(yaml, "institutions")?)
            .with_majors(Self::parse_section(yaml, "majors")?)
            .with_subjects(Self::parse_section(yaml, "subjects")?);

        debug!(
            "Parsed aliases: {} institutions, {} majors, {} subjects",
            registry.institutions.len(),
            registry.majors.len(),
            registry.subjects.len()
        );
        Ok(registry)
    }

    /// Parse a single `canonical: aliases` table
    pub fn parse_table(yaml_str: &str) -> Result<AliasTable> {
        let yaml = YamlParser::parse(yaml_str)?;
        Self::table_from_yaml("aliases", &yaml)
    }

    fn parse_section(yaml: &YamlValue, section: &str) -> Result<AliasTable> {
        match yaml.get(section) {
            None | Some(YamlValue::Null) => Ok(AliasTable::new()),
            Some(value) => Self::table_from_yaml(section, value),
        }
    }

    fn table_from_yaml(section: &str, value: &YamlValue) -> Result<AliasTable> {
        let mapping = value.as_mapping().ok_or_else(|| ParseError::TypeMismatch {
            field: section.to_string(),
            expected: "mapping".to_string(),
            actual: YamlParser::type_name(value).to_string(),
        })?;

        let mut table = AliasTable::new();
        for (key, aliases) in mapping {
            let canonical = match key {
                YamlValue::String(s) => s.trim().to_string(),
                YamlValue::Number(n) => n.to_string(),
                other => {
                    return Err(ParseError::TypeMismatch {
                        field: section.to_string(),
                        expected: "string key".to_string(),
                        actual: YamlParser::type_name(other).to_string(),
                    })
                }
            };
            if canonical.is_empty() {
                return Err(ParseError::invalid(section, "canonical name must not be empty"));
            }

            let field = format!("{}.{}", section, canonical);
            let aliases = YamlParser::string_list(&field, aliases)?;
            table.insert(canonical, aliases.into_iter().map(|a| a.trim().to_string()).filter(|a| !a.is_empty()));
        }
        Ok(table)
    }
}
