//! Rule parser
//!
//! Parses YAML disqualification rules. The `when` block names exactly one
//! predicate; `all`, `any` and `not` nest further blocks.
//!
//! ```yaml
//! rule:
//!   id: english_floor
//!   severity: 2
//!   code: ENGLISH_MIN
//!   message: "English grade {english_grade} is below the minimum"
//!   scope:
//!     institutions: [Hanguk University]
//!   when:
//!     any:
//!       - grade_worse_than: { field: english, limit: 3 }
//!       - not:
//!           track_is: natural
//! ```

use crate::error::{ParseError, Result};
use crate::yaml_parser::YamlParser;
use admit_core::{DisqualificationRule, GradeField, Predicate, RuleScope, Severity, Track};
use serde_yaml::Value as YamlValue;

const RULE_FIELDS: [&str; 7] = ["id", "severity", "code", "message", "description", "scope", "when"];

/// Rule parser
pub struct RuleParser;

impl RuleParser {
    /// Parse a single `rule:` document
    pub fn parse(yaml_str: &str) -> Result<DisqualificationRule> {
        let yaml = YamlParser::parse(yaml_str)?;
        Self::parse_from_yaml(&yaml)
    }

    /// Parse from a document holding a `rule` key
    pub fn parse_from_yaml(yaml: &YamlValue) -> Result<DisqualificationRule> {
        let rule_obj = yaml.get("rule").ok_or_else(|| ParseError::missing("rule"))?;
        Self::parse_rule_body(rule_obj)
    }

    /// Parse the mapping under `rule:`
    pub fn parse_rule_body(rule_obj: &YamlValue) -> Result<DisqualificationRule> {
        YamlParser::reject_unknown_fields(rule_obj, &RULE_FIELDS)?;

        let id = YamlParser::get_string(rule_obj, "id")?;
        let severity = YamlParser::get_u8(rule_obj, "severity")?;
        let severity = Severity::try_from(severity)
            .map_err(|e| ParseError::invalid("severity", e.to_string()))?;
        let code = YamlParser::get_string(rule_obj, "code")?;
        let message = YamlParser::get_string(rule_obj, "message")?;
        let description = YamlParser::get_optional_string(rule_obj, "description");

        let scope = match rule_obj.get("scope") {
            None | Some(YamlValue::Null) => RuleScope::Universal,
            Some(scope) => Self::parse_scope(scope)?,
        };

        let when = rule_obj.get("when").ok_or_else(|| ParseError::missing("when"))?;
        let predicate = Self::parse_predicate(when)?;

        let mut rule = DisqualificationRule::new(id, predicate, severity, message, code).with_scope(scope);
        rule.description = description;
        Ok(rule)
    }

    /// `universal`, or a mapping with exactly one of `institutions`,
    /// `major_prefix`, `pattern`
    pub fn parse_scope(scope: &YamlValue) -> Result<RuleScope> {
        if scope.as_str().map(str::trim) == Some("universal") {
            return Ok(RuleScope::Universal);
        }
        let (kind, body) = Self::single_entry("scope", scope)?;
        match kind.as_str() {
            "universal" => Ok(RuleScope::Universal),
            "institutions" => Ok(RuleScope::Institutions {
                names: Self::non_empty_list(
                    "scope.institutions",
                    &YamlParser::string_list("scope.institutions", body)?,
                )?,
            }),
            "major_prefix" => Ok(RuleScope::MajorPrefix {
                prefixes: Self::non_empty_list(
                    "scope.major_prefix",
                    &YamlParser::string_list("scope.major_prefix", body)?,
                )?,
            }),
            "pattern" => body
                .as_str()
                .map(RuleScope::pattern)
                .ok_or_else(|| ParseError::TypeMismatch {
                    field: "scope.pattern".to_string(),
                    expected: "string".to_string(),
                    actual: YamlParser::type_name(body).to_string(),
                }),
            other => Err(ParseError::UnknownField(format!("scope.{}", other))),
        }
    }

    /// Parse one `when` block
    pub fn parse_predicate(when: &YamlValue) -> Result<Predicate> {
        let (kind, body) = Self::single_entry("when", when)?;
        match kind.as_str() {
            "grade_worse_than" => Ok(Predicate::GradeWorseThan {
                field: Self::parse_grade_field(body)?,
                limit: YamlParser::get_u8(body, "limit")?,
            }),
            "raw_score_below" => Ok(Predicate::RawScoreBelow {
                subject: YamlParser::get_string(body, "subject")?,
                min: YamlParser::get_f64(body, "min")?,
            }),
            "missing_required_subject" => {
                let any_of = match body.get("any_of") {
                    Some(list) => YamlParser::string_list("any_of", list)?,
                    None => YamlParser::string_list("missing_required_subject", body)?,
                };
                if any_of.is_empty() {
                    return Err(ParseError::invalid("any_of", "at least one subject is required"));
                }
                Ok(Predicate::MissingRequiredSubject { any_of })
            }
            "elective_level_collision" => Ok(Predicate::ElectiveLevelCollision {
                pool: Self::non_empty_list("pool", &YamlParser::get_string_list(body, "pool")?)?,
                level: YamlParser::get_string(body, "level")?,
            }),
            "category_missing_electives" => Ok(Predicate::CategoryMissingElectives {
                category: YamlParser::get_string(body, "category")?,
                majors: YamlParser::get_string_list(body, "majors")?,
                electives: YamlParser::get_string_list(body, "electives")?,
                min_count: match body.get("min_count") {
                    Some(_) => YamlParser::get_usize(body, "min_count")?,
                    None => 1,
                },
            }),
            "track_is" => {
                let label = body
                    .as_str()
                    .map(str::to_string)
                    .map_or_else(|| YamlParser::get_string(body, "track"), Ok)?;
                let track =
                    Track::parse(&label).map_err(|e| ParseError::invalid("track_is", e.to_string()))?;
                Ok(Predicate::TrackIs { track })
            }
            "all" => Ok(Predicate::all(Self::parse_predicate_list("all", body)?)),
            "any" => Ok(Predicate::any(Self::parse_predicate_list("any", body)?)),
            "not" => Ok(Predicate::negate(Self::parse_predicate(body)?)),
            other => Err(ParseError::UnknownPredicate(other.to_string())),
        }
    }

    fn parse_predicate_list(field: &str, body: &YamlValue) -> Result<Vec<Predicate>> {
        let items = body.as_sequence().ok_or_else(|| ParseError::TypeMismatch {
            field: field.to_string(),
            expected: "sequence".to_string(),
            actual: YamlParser::type_name(body).to_string(),
        })?;
        if items.is_empty() {
            return Err(ParseError::invalid(field, "needs at least one condition"));
        }
        items.iter().map(Self::parse_predicate).collect()
    }

    fn parse_grade_field(body: &YamlValue) -> Result<GradeField> {
        match YamlParser::get_string(body, "field")?.trim().to_lowercase().as_str() {
            "english" | "english_grade" => Ok(GradeField::English),
            "history" | "history_grade" => Ok(GradeField::History),
            other => Err(ParseError::invalid(
                "field",
                format!("unknown grade field '{}', expected english or history", other),
            )),
        }
    }

    fn non_empty_list(field: &str, list: &[String]) -> Result<Vec<String>> {
        if list.is_empty() {
            return Err(ParseError::invalid(field, "list must not be empty"));
        }
        Ok(list.to_vec())
    }

    /// The only (key, value) pair of a one-entry mapping
    fn single_entry<'a>(field: &str, value: &'a YamlValue) -> Result<(String, &'a YamlValue)> {
        let mapping = value.as_mapping().ok_or_else(|| ParseError::TypeMismatch {
            field: field.to_string(),
            expected: "mapping".to_string(),
            actual: YamlParser::type_name(value).to_string(),
        })?;
        let mut entries = mapping.iter();
        match (entries.next(), entries.next()) {
            (Some((key, body)), None) => key
                .as_str()
                .map(|k| (k.to_string(), body))
                .ok_or_else(|| ParseError::invalid(field, "key must be a string")),
            (None, _) => Err(ParseError::invalid(field, "is empty")),
            (Some(_), Some(_)) => Err(ParseError::invalid(
                field,
                format!(
                    "expected exactly one entry, found {}; combine conditions with all/any",
                    mapping.len()
                ),
            )),
        }
    }
}
