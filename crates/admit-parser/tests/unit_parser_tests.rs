//! Unit tests for the YAML parsers
//!
//! Covers alias tables, single rules, catalogs and the error paths a
//! hand-edited configuration is likely to hit.

use admit_core::{GradeField, Predicate, RuleScope, Severity, Track};
use admit_parser::*;

// =============================================================================
// Alias Parser Tests
// =============================================================================

#[test]
fn test_parse_alias_registry() -> anyhow::Result<()> {
    let yaml = r#"
institutions:
  Hanguk University: [HKU, 한국대학교, 한국대]
  Daehan University: 대한대
majors:
  Medicine:
    - 의예과
    - Pre-Med
  Law:
subjects:
  Korean: 국어
  Mathematics: [수학, Math]
"#;
    let registry = AliasParser::parse(yaml)?;

    assert_eq!(registry.institutions.len(), 2);
    assert_eq!(
        registry.institutions.aliases("Hanguk University").map(|a| a.len()),
        Some(3)
    );
    assert_eq!(
        registry.institutions.aliases("Daehan University"),
        Some(&["대한대".to_string()][..])
    );
    assert!(registry.majors.contains_canonical("Law"));
    assert_eq!(registry.subjects.len(), 2);
    Ok(())
}

#[test]
fn test_alias_registry_rejects_unknown_section() {
    let yaml = "institutions: {}\ncampuses:\n  Seoul: [SE]\n";
    let result = AliasParser::parse(yaml);
    assert!(matches!(result, Err(ParseError::UnknownField(ref f)) if f == "campuses"));
}

#[test]
fn test_alias_registry_empty_document() {
    let registry = AliasParser::parse("").unwrap();
    assert!(registry.institutions.is_empty());
    assert!(registry.majors.is_empty());
    assert!(registry.subjects.is_empty());
}

// =============================================================================
// Rule Parser Tests
// =============================================================================

#[test]
fn test_parse_universal_english_rule() {
    let yaml = r#"
version: "0.1"

rule:
  id: english_floor
  severity: 2
  code: ENGLISH_MIN
  message: "[{code}] English grade {english_grade} does not meet the minimum"
  when:
    grade_worse_than:
      field: english
      limit: 3
"#;
    let result = RuleParser::parse(yaml);
    assert!(result.is_ok(), "Failed to parse rule: {:?}", result.err());

    let rule = result.unwrap();
    assert_eq!(rule.id, "english_floor");
    assert_eq!(rule.code, "ENGLISH_MIN");
    assert!(rule.scope.is_universal());
    assert_eq!(
        rule.predicate,
        Predicate::GradeWorseThan {
            field: GradeField::English,
            limit: 3
        }
    );
}

#[test]
fn test_parse_rule_with_pattern_scope() {
    let yaml = r#"
rule:
  id: capital_history
  severity: 1
  code: HISTORY
  message: History grade {history_grade} is weak for {institution}
  scope:
    pattern: "^(Hanguk|Daehan)"
  when:
    grade_worse_than: { field: history, limit: 4 }
"#;
    let rule = RuleParser::parse(yaml).unwrap();
    assert_eq!(rule.severity, Severity::Advisory);
    assert_eq!(rule.scope, RuleScope::pattern("^(Hanguk|Daehan)"));
}

#[test]
fn test_parse_universal_scope_keyword() {
    let yaml = r#"
rule:
  id: arts
  severity: 2
  code: ARTS
  message: m
  scope: universal
  when:
    track_is: 예체능
"#;
    let rule = RuleParser::parse(yaml).unwrap();
    assert!(rule.scope.is_universal());
    assert_eq!(rule.predicate, Predicate::TrackIs { track: Track::Arts });
}

#[test]
fn test_parse_elective_collision() {
    let yaml = r#"
rule:
  id: same_level
  severity: 1
  code: LEVEL
  message: Two electives at level {level}
  when:
    elective_level_collision:
      pool: [Physics I, Chemistry I, Biology I, Earth Science I]
      level: I
"#;
    let rule = RuleParser::parse(yaml).unwrap();
    match rule.predicate {
        Predicate::ElectiveLevelCollision { pool, level } => {
            assert_eq!(pool.len(), 4);
            assert_eq!(level, "I");
        }
        other => panic!("unexpected predicate {:?}", other),
    }
}

#[test]
fn test_parse_rule_missing_when() {
    let yaml = "rule:\n  id: r\n  severity: 2\n  code: C\n  message: m\n";
    assert!(matches!(
        RuleParser::parse(yaml),
        Err(ParseError::MissingField { ref field }) if field == "when"
    ));
}

#[test]
fn test_parse_rule_unknown_field() {
    let yaml = "rule:\n  id: r\n  score: 50\n  severity: 2\n  code: C\n  message: m\n  when:\n    track_is: arts\n";
    assert!(matches!(
        RuleParser::parse(yaml),
        Err(ParseError::UnknownField(ref f)) if f == "score"
    ));
}

#[test]
fn test_parse_rule_unknown_track() {
    let yaml = "rule:\n  id: r\n  severity: 2\n  code: C\n  message: m\n  when:\n    track_is: engineering\n";
    let err = RuleParser::parse(yaml).unwrap_err();
    assert!(err.to_string().contains("track_is"));
}

#[test]
fn test_parse_rule_empty_any() {
    let yaml = "rule:\n  id: r\n  severity: 2\n  code: C\n  message: m\n  when:\n    any: []\n";
    assert!(RuleParser::parse(yaml).is_err());
}

// =============================================================================
// Catalog Parser Tests
// =============================================================================

#[test]
fn test_parse_catalog_with_separators() {
    let yaml = r#"
# Universal checks
rule:
  id: english_floor
  severity: 2
  code: ENGLISH_MIN
  message: English too low
  when:
    grade_worse_than: { field: english, limit: 3 }
---
rule:
  id: medicine_science
  severity: 2
  code: MED_SCIENCE
  message: Medicine requires a science subject
  scope:
    major_prefix: [Medicine, 의예]
  when:
    missing_required_subject:
      any_of: [Physics I, Chemistry I, Biology I]
"#;
    let rules = CatalogParser::parse(yaml).unwrap();
    assert_eq!(rules.len(), 2);
    assert_eq!(rules[0].id, "english_floor");
    assert_eq!(
        rules[1].scope,
        RuleScope::major_prefix(["Medicine", "의예"])
    );
    assert!(matches!(
        &rules[1].predicate,
        Predicate::MissingRequiredSubject { any_of } if any_of.len() == 3
    ));
}

#[test]
fn test_catalog_error_names_bad_rule_field() {
    let yaml = r#"
rules:
  - id: ok
    severity: 2
    code: OK
    message: fine
    when:
      track_is: natural
  - id: broken
    severity: high
    code: BROKEN
    message: bad severity
    when:
      track_is: natural
"#;
    let err = CatalogParser::parse(yaml).unwrap_err();
    assert!(matches!(err, ParseError::TypeMismatch { ref field, .. } if field == "severity"));
}
