//! Compiled rule catalog

use super::evaluator::EvalContext;
use crate::error::{Result, RuntimeError};
use admit_core::{DisqualificationRule, Predicate, RuleScope};
use regex::{Regex, RegexBuilder};
use std::collections::BTreeSet;
use tracing::info;

/// A rule with its scope pattern compiled
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub rule: DisqualificationRule,
    pattern: Option<Regex>,
}

impl CompiledRule {
    /// Whether the rule is evaluated for this target at all
    pub fn applies_to(&self, ctx: &EvalContext<'_>) -> bool {
        match &self.rule.scope {
            RuleScope::Universal => true,
            RuleScope::Institutions { names } => ctx.institution_in(names),
            RuleScope::MajorPrefix { prefixes } => {
                prefixes.iter().any(|prefix| ctx.major_has_prefix(prefix))
            }
            RuleScope::Pattern { .. } => self
                .pattern
                .as_ref()
                .map_or(false, |re| re.is_match(&ctx.institution) || re.is_match(&ctx.target.major)),
        }
    }
}

/// Ordered, immutable set of disqualification rules. Catalog order breaks
/// ties between rules of equal severity.
#[derive(Debug, Clone, Default)]
pub struct RuleCatalog {
    rules: Vec<CompiledRule>,
}

impl RuleCatalog {
    /// Validate and compile `rules`. Duplicate ids, invalid scope patterns
    /// and empty predicate lists are rejected.
    pub fn build(rules: Vec<DisqualificationRule>) -> Result<Self> {
        let mut seen = BTreeSet::new();
        let mut compiled = Vec::with_capacity(rules.len());

        for rule in rules {
            if rule.id.trim().is_empty() {
                return Err(RuntimeError::config("rule catalog", "rule id must not be empty"));
            }
            if !seen.insert(rule.id.clone()) {
                return Err(RuntimeError::config(
                    "rule catalog",
                    format!("duplicate rule id '{}'", rule.id),
                ));
            }
            validate_predicate(&rule.id, &rule.predicate)?;

            let pattern = match &rule.scope {
                RuleScope::Pattern { pattern } => Some(
                    RegexBuilder::new(pattern)
                        .case_insensitive(true)
                        .build()
                        .map_err(|e| {
                            RuntimeError::config(
                                format!("rule '{}'", rule.id),
                                format!("invalid scope pattern: {}", e),
                            )
                        })?,
                ),
                _ => None,
            };
            compiled.push(CompiledRule { rule, pattern });
        }

        info!("Rule catalog built with {} rules", compiled.len());
        Ok(Self { rules: compiled })
    }

    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    pub fn get(&self, id: &str) -> Option<&DisqualificationRule> {
        self.rules.iter().map(|c| &c.rule).find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn validate_predicate(rule_id: &str, predicate: &Predicate) -> Result<()> {
    let invalid = |message: &str| {
        Err(RuntimeError::config(
            format!("rule '{}'", rule_id),
            format!("{}: {}", predicate.kind(), message),
        ))
    };

    match predicate {
        Predicate::All { all: inner } | Predicate::Any { any: inner } => {
            if inner.is_empty() {
                return invalid("needs at least one inner predicate");
            }
            inner.iter().try_for_each(|p| validate_predicate(rule_id, p))
        }
        Predicate::Not { not } => validate_predicate(rule_id, not),
        Predicate::MissingRequiredSubject { any_of } if any_of.is_empty() => {
            invalid("subject list is empty")
        }
        Predicate::ElectiveLevelCollision { pool, level } if pool.is_empty() || level.trim().is_empty() => {
            invalid("needs a subject pool and a level")
        }
        Predicate::CategoryMissingElectives {
            majors, electives, ..
        } if majors.is_empty() || electives.is_empty() => invalid("needs majors and electives"),
        Predicate::RawScoreBelow { min, .. } if !min.is_finite() => invalid("minimum must be a number"),
        _ => Ok(()),
    }
}
