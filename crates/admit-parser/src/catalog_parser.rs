//! Rule catalog parser
//!
//! Accepts either a stream of `rule:` documents or a single document with
//! a `rules:` list. Catalog order is document order.

use crate::error::{ParseError, Result};
use crate::rule_parser::RuleParser;
use crate::yaml_parser::YamlParser;
use admit_core::DisqualificationRule;
use serde_yaml::Value as YamlValue;
use tracing::debug;

/// Rule catalog parser
pub struct CatalogParser;

impl CatalogParser {
    pub fn parse(yaml_str: &str) -> Result<Vec<DisqualificationRule>> {
        let documents = YamlParser::parse_multi_document(yaml_str)?;
        let mut rules = Vec::new();

        for (position, document) in documents.iter().enumerate() {
            if let Some(list) = document.get("rules") {
                let items = list.as_sequence().ok_or_else(|| ParseError::TypeMismatch {
                    field: "rules".to_string(),
                    expected: "sequence".to_string(),
                    actual: YamlParser::type_name(list).to_string(),
                })?;
                for item in items {
                    rules.push(Self::parse_item(item)?);
                }
            } else if document.get("rule").is_some() {
                rules.push(RuleParser::parse_from_yaml(document)?);
            } else {
                return Err(ParseError::ParseError(format!(
                    "document {} has neither a 'rule' nor a 'rules' key",
                    position + 1
                )));
            }
        }

        debug!("Parsed {} rules from {} documents", rules.len(), documents.len());
        Ok(rules)
    }

    /// A list item is either a bare rule body or wrapped in `rule:`
    fn parse_item(item: &YamlValue) -> Result<DisqualificationRule> {
        match item.get("rule") {
            Some(_) => RuleParser::parse_from_yaml(item),
            None => RuleParser::parse_rule_body(item),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rule_stream_without_separators() {
        let yaml = r#"
rule:
  id: english_floor
  severity: 2
  code: ENGLISH_MIN
  message: English too low
  when:
    grade_worse_than: { field: english, limit: 4 }
rule:
  id: arts_track
  severity: 1
  code: TRACK
  message: Arts track
  when:
    track_is: arts
"#;
        let rules = CatalogParser::parse(yaml).unwrap();
        let ids: Vec<&str> = rules.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["english_floor", "arts_track"]);
    }

    #[test]
    fn test_parse_rules_list() {
        let yaml = r#"
rules:
  - id: a
    severity: 2
    code: A
    message: a
    when:
      track_is: natural
  - rule:
      id: b
      severity: 1
      code: B
      message: b
      when:
        raw_score_below: { subject: Math, min: 50 }
"#;
        let rules = CatalogParser::parse(yaml).unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[1].code, "B");
    }

    #[test]
    fn test_empty_catalog_and_stray_document() {
        assert!(CatalogParser::parse("").unwrap().is_empty());
        let err = CatalogParser::parse("version: \"0.1\"\n").unwrap_err();
        assert!(err.to_string().contains("neither"));
    }
}
