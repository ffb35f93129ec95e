//! Predicate evaluation

use crate::error::{Result, RuntimeError};
use crate::resolver::{AliasKind, NameResolver};
use admit_core::{
    CandidateProfile, DisqualificationRule, ExamScore, GradeField, Predicate, TargetProgram,
};
use std::collections::BTreeMap;

/// Everything a predicate may read for one (profile, target) pair. Subject
/// and major names are alias-resolved once up front.
pub struct EvalContext<'a> {
    pub profile: &'a CandidateProfile,
    pub target: &'a TargetProgram,
    pub institution: String,
    pub major: String,
    subjects: BTreeMap<String, &'a ExamScore>,
    resolver: &'a NameResolver,
}

impl<'a> EvalContext<'a> {
    pub fn new(
        profile: &'a CandidateProfile,
        target: &'a TargetProgram,
        resolver: &'a NameResolver,
    ) -> Self {
        let mut subjects = BTreeMap::new();
        for score in &profile.scores {
            subjects
                .entry(resolver.resolve(&score.subject, AliasKind::Subject))
                .or_insert(score);
        }
        Self {
            profile,
            target,
            institution: resolver.resolve(&target.institution, AliasKind::Institution),
            major: resolver.resolve(&target.major, AliasKind::Major),
            subjects,
            resolver,
        }
    }

    fn subject(&self, name: &str) -> Option<&'a ExamScore> {
        self.subjects
            .get(&self.resolver.resolve(name, AliasKind::Subject))
            .copied()
    }

    fn has_subject(&self, name: &str) -> bool {
        self.subject(name).is_some()
    }

    fn grade(&self, field: GradeField) -> Option<u8> {
        match field {
            GradeField::English => self.profile.english_grade,
            GradeField::History => self.profile.history_grade,
        }
    }

    /// Exact or prefix match of the target major against `prefix`, comparing
    /// both the raw and the alias-resolved spellings. Never a bare substring.
    pub fn major_has_prefix(&self, prefix: &str) -> bool {
        let normalize = |s: &str| self.resolver.normalize(s);
        let resolved_prefix = normalize(&self.resolver.resolve(prefix, AliasKind::Major));
        let raw_prefix = normalize(prefix);
        if resolved_prefix.is_empty() && raw_prefix.is_empty() {
            return false;
        }

        let resolved_major = normalize(&self.major);
        let raw_major = normalize(&self.target.major);
        [resolved_prefix, raw_prefix]
            .iter()
            .filter(|p| !p.is_empty())
            .any(|p| resolved_major.starts_with(p.as_str()) || raw_major.starts_with(p.as_str()))
    }

    /// Canonical institution equals the canonical form of any of `names`
    pub fn institution_in(&self, names: &[String]) -> bool {
        names
            .iter()
            .any(|name| self.resolver.resolve(name, AliasKind::Institution) == self.institution)
    }
}

/// Evaluate a rule's predicate; failures are reported as
/// `RuntimeError::RuleEvaluation` carrying the rule id
pub fn evaluate_rule(rule: &DisqualificationRule, ctx: &EvalContext<'_>) -> Result<bool> {
    evaluate(&rule.predicate, ctx).map_err(|e| RuntimeError::RuleEvaluation {
        rule_id: rule.id.clone(),
        message: e.to_string(),
    })
}

/// Evaluate a violation predicate. Missing profile data is an error, which
/// callers treat as "did not trigger".
pub fn evaluate(predicate: &Predicate, ctx: &EvalContext<'_>) -> Result<bool> {
    match predicate {
        Predicate::GradeWorseThan { field, limit } => {
            let grade = ctx
                .grade(*field)
                .ok_or_else(|| RuntimeError::FieldNotFound(field.name().to_string()))?;
            Ok(grade > *limit)
        }

        Predicate::RawScoreBelow { subject, min } => {
            let score = ctx
                .subject(subject)
                .ok_or_else(|| RuntimeError::FieldNotFound(format!("subject '{}'", subject)))?;
            if !score.raw_score.is_finite() {
                return Err(RuntimeError::InvalidValue(format!(
                    "raw score of '{}' is not a number",
                    subject
                )));
            }
            Ok(score.raw_score < *min)
        }

        Predicate::MissingRequiredSubject { any_of } => {
            Ok(!any_of.iter().any(|subject| ctx.has_subject(subject)))
        }

        Predicate::ElectiveLevelCollision { pool, level } => {
            let level = level.trim().to_lowercase();
            let pool: Vec<String> = pool
                .iter()
                .map(|s| ctx.resolver.resolve(s, AliasKind::Subject))
                .collect();
            let at_level = ctx
                .subjects
                .keys()
                .filter(|name| pool.contains(name))
                .filter(|name| {
                    name.split_whitespace()
                        .last()
                        .map_or(false, |token| token.to_lowercase() == level)
                })
                .count();
            Ok(at_level >= 2)
        }

        Predicate::CategoryMissingElectives {
            majors,
            electives,
            min_count,
            ..
        } => {
            if !majors.iter().any(|prefix| ctx.major_has_prefix(prefix)) {
                return Ok(false);
            }
            let mut taken: Vec<String> = electives
                .iter()
                .filter_map(|e| ctx.subject(e).map(|s| s.subject.clone()))
                .collect();
            taken.sort();
            taken.dedup();
            Ok(taken.len() < *min_count)
        }

        Predicate::TrackIs { track } => Ok(ctx.profile.track == *track),

        Predicate::All { all } => {
            for inner in all {
                if !evaluate(inner, ctx)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }

        Predicate::Any { any } => {
            for inner in any {
                if evaluate(inner, ctx)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }

        Predicate::Not { not } => Ok(!evaluate(not, ctx)?),
    }
}
