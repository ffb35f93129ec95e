//! Eligibility rule engine
//!
//! Evaluates an immutable rule catalog against one (profile, target) pair
//! and reports the most severe violation. Evaluation is pure: a predicate
//! that fails on missing data is logged and counted as not triggered, and
//! never affects other rules or other targets.

mod catalog;
pub mod evaluator;
pub mod template;

pub use catalog::{CompiledRule, RuleCatalog};
pub use evaluator::EvalContext;

use crate::resolver::NameResolver;
use admit_core::{CandidateProfile, DisqualificationResult, Severity, TargetProgram};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Disqualification checker over a shared catalog
#[derive(Debug, Clone)]
pub struct RuleEngine {
    catalog: Arc<RuleCatalog>,
    resolver: Arc<NameResolver>,
}

impl RuleEngine {
    pub fn new(catalog: Arc<RuleCatalog>, resolver: Arc<NameResolver>) -> Self {
        Self { catalog, resolver }
    }

    pub fn catalog(&self) -> &RuleCatalog {
        &self.catalog
    }

    /// Evaluate every applicable rule. Rules below `threshold` never
    /// disqualify and are not reported.
    pub fn check(
        &self,
        profile: &CandidateProfile,
        target: &TargetProgram,
        threshold: Severity,
    ) -> DisqualificationResult {
        let ctx = EvalContext::new(profile, target, &self.resolver);
        let mut fired = Vec::new();
        let mut errors = Vec::new();

        for compiled in self.catalog.rules() {
            let rule = &compiled.rule;
            if !compiled.applies_to(&ctx) {
                continue;
            }
            match evaluator::evaluate_rule(rule, &ctx) {
                Ok(true) => {
                    debug!("Rule '{}' triggered for {} / {}", rule.id, target.institution, target.major);
                    if rule.severity >= threshold {
                        fired.push(rule);
                    }
                }
                Ok(false) => {}
                Err(e) => {
                    warn!("{} ({} / {})", e, target.institution, target.major);
                    errors.push(rule.id.clone());
                }
            }
        }

        // Stable: equal severities keep catalog order
        fired.sort_by(|a, b| b.severity.cmp(&a.severity));

        let Some(primary) = fired.first() else {
            return DisqualificationResult {
                errors,
                ..DisqualificationResult::eligible()
            };
        };

        let context = Self::template_context(&ctx, &primary.id, &primary.code);
        DisqualificationResult {
            disqualified: true,
            message: Some(template::render(&primary.message, &context)),
            code: Some(primary.code.clone()),
            triggered: fired.iter().map(|r| r.id.clone()).collect(),
            errors,
        }
    }

    /// Check every target of a profile, in order
    pub fn check_all(
        &self,
        profile: &CandidateProfile,
        threshold: Severity,
    ) -> Vec<DisqualificationResult> {
        profile
            .targets
            .iter()
            .map(|target| self.check(profile, target, threshold))
            .collect()
    }

    fn template_context<'a>(
        ctx: &EvalContext<'_>,
        rule_id: &str,
        code: &str,
    ) -> BTreeMap<&'a str, String> {
        let grade = |g: Option<u8>| g.map_or_else(|| "-".to_string(), |g| g.to_string());
        BTreeMap::from([
            ("institution", ctx.institution.clone()),
            ("major", ctx.target.major.clone()),
            ("track", ctx.profile.track.label().to_string()),
            ("english_grade", grade(ctx.profile.english_grade)),
            ("history_grade", grade(ctx.profile.history_grade)),
            ("code", code.to_string()),
            ("rule_id", rule_id.to_string()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolverConfig;
    use crate::error::RuntimeError;
    use admit_core::{AliasRegistry, AliasTable, DisqualificationRule, GradeField, Predicate, RuleScope, Track};

    fn resolver() -> Arc<NameResolver> {
        let registry = AliasRegistry::default().with_institutions(
            AliasTable::new()
                .with("Hanguk University", ["HKU"])
                .with("Daehan University", ["DHU"]),
        );
        Arc::new(NameResolver::new(&registry, ResolverConfig::default()).unwrap())
    }

    fn engine(rules: Vec<DisqualificationRule>) -> RuleEngine {
        RuleEngine::new(Arc::new(RuleCatalog::build(rules).unwrap()), resolver())
    }

    fn english_floor(id: &str, limit: u8, severity: Severity) -> DisqualificationRule {
        DisqualificationRule::new(
            id,
            Predicate::GradeWorseThan {
                field: GradeField::English,
                limit,
            },
            severity,
            "English grade {english_grade} exceeds the limit at {institution} [{code}]",
            format!("{}_CODE", id.to_uppercase()),
        )
    }

    #[test]
    fn test_eligible_profile() {
        let engine = engine(vec![english_floor("english", 4, Severity::Blocking)]);
        let profile = CandidateProfile::new(Track::Natural).with_english_grade(2);
        let result = engine.check(&profile, &TargetProgram::new("HKU", "Medicine"), Severity::Blocking);
        assert_eq!(result, DisqualificationResult::eligible());
    }

    #[test]
    fn test_primary_is_most_severe_and_message_is_rendered() {
        let engine = engine(vec![
            english_floor("advisory", 2, Severity::Advisory),
            english_floor("blocking", 3, Severity::Blocking),
        ]);
        let profile = CandidateProfile::new(Track::Natural).with_english_grade(4);
        let target = TargetProgram::new("hku", "Medicine");

        let strict = engine.check(&profile, &target, Severity::Blocking);
        assert!(strict.disqualified);
        assert_eq!(strict.triggered, vec!["blocking"]);
        assert_eq!(strict.code.as_deref(), Some("BLOCKING_CODE"));
        assert_eq!(
            strict.message.as_deref(),
            Some("English grade 4 exceeds the limit at Hanguk University [BLOCKING_CODE]")
        );

        let lenient = engine.check(&profile, &target, Severity::Advisory);
        assert_eq!(lenient.triggered, vec!["blocking", "advisory"]);
        assert_eq!(lenient.code.as_deref(), Some("BLOCKING_CODE"));
    }

    #[test]
    fn test_institution_scope_uses_aliases() {
        let engine = engine(vec![
            english_floor("top_tier", 2, Severity::Blocking).with_scope(RuleScope::institutions(["Hanguk University"])),
        ]);
        let profile = CandidateProfile::new(Track::Natural).with_english_grade(3);

        let hanguk = engine.check(&profile, &TargetProgram::new("HKU", "Law"), Severity::Blocking);
        assert!(hanguk.disqualified);
        let daehan = engine.check(&profile, &TargetProgram::new("DHU", "Law"), Severity::Blocking);
        assert!(!daehan.disqualified);
    }

    #[test]
    fn test_pattern_scope_is_case_insensitive() {
        let engine = engine(vec![
            english_floor("med", 1, Severity::Blocking).with_scope(RuleScope::pattern("^med")),
        ]);
        let profile = CandidateProfile::new(Track::Natural).with_english_grade(2);
        assert!(engine.check(&profile, &TargetProgram::new("DHU", "Medicine"), Severity::Blocking).disqualified);
        assert!(!engine.check(&profile, &TargetProgram::new("DHU", "Biomedicine"), Severity::Blocking).disqualified);
    }

    #[test]
    fn test_failing_predicate_is_isolated() {
        let history = DisqualificationRule::new(
            "history",
            Predicate::GradeWorseThan {
                field: GradeField::History,
                limit: 4,
            },
            Severity::Blocking,
            "history",
            "HISTORY",
        );
        let engine = engine(vec![history, english_floor("english", 3, Severity::Blocking)]);
        let profile = CandidateProfile::new(Track::Humanities).with_english_grade(5);

        let result = engine.check(&profile, &TargetProgram::new("HKU", "Law"), Severity::Blocking);
        assert!(result.disqualified);
        assert_eq!(result.triggered, vec!["english"]);
        assert_eq!(result.errors, vec!["history"]);

        let target = TargetProgram::new("HKU", "Law");
        let ctx = EvalContext::new(&profile, &target, &engine.resolver);
        let err = evaluator::evaluate_rule(&engine.catalog().rules()[0].rule, &ctx).unwrap_err();
        assert!(matches!(err, RuntimeError::RuleEvaluation { ref rule_id, .. } if rule_id == "history"));
        assert_eq!(
            err.to_string(),
            "Rule 'history' failed to evaluate: Field not found: history_grade"
        );
    }
}
