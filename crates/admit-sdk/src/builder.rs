//! Builder pattern for AdmissionEngine

use crate::admission_engine::AdmissionEngine;
use crate::config::EngineConfig;
use crate::error::{Result, SdkError};
use admit_core::{AliasRegistry, DisqualificationRule, IndexTable, PercentileTable};
use admit_parser::{AliasParser, CatalogParser};
use admit_runtime::{
    CutoffResolver, NameResolver, PercentileCalculator, ProbabilityClassifier, ReferenceIndex,
    RuleCatalog, RuleEngine,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

/// Builder for AdmissionEngine
///
/// # Example
///
/// ```rust,ignore
/// use admit_sdk::{AdmissionEngineBuilder, EngineConfig};
///
/// let engine = AdmissionEngineBuilder::new()
///     .with_config(EngineConfig::from_yaml(config_yaml)?)
///     .add_alias_content(aliases_yaml)
///     .add_rule_content(rules_yaml)
///     .with_percentile_table(percentile_table)
///     .with_index_table(index_table)
///     .with_subject_weight("korean", 0.3)
///     .with_subject_weight("math", 0.3)
///     .build()?;
///
/// let assessment = engine.assess(&profile);
/// ```
pub struct AdmissionEngineBuilder {
    config: EngineConfig,
    aliases: AliasRegistry,
    alias_contents: Vec<String>,
    percentile_table: Option<PercentileTable>,
    index_table: Option<IndexTable>,
    rules: Vec<DisqualificationRule>,
    rule_contents: Vec<String>,
    subject_weights: BTreeMap<String, f64>,
}

impl AdmissionEngineBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            config: EngineConfig::new(),
            aliases: AliasRegistry::new(),
            alias_contents: Vec::new(),
            percentile_table: None,
            index_table: None,
            rules: Vec::new(),
            rule_contents: Vec::new(),
            subject_weights: BTreeMap::new(),
        }
    }

    /// Set engine configuration
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    // ========== Reference Data ==========

    /// Set the alias registry. YAML added with `add_alias_content` is
    /// merged on top of it.
    pub fn with_aliases(mut self, aliases: AliasRegistry) -> Self {
        self.aliases = aliases;
        self
    }

    /// Add alias tables as YAML content
    pub fn add_alias_content(mut self, content: impl Into<String>) -> Self {
        self.alias_contents.push(content.into());
        self
    }

    /// Set the wide percentile table used for cutoffs (required)
    pub fn with_percentile_table(mut self, table: PercentileTable) -> Self {
        self.percentile_table = Some(table);
        self
    }

    /// Set the keyed index table. Without one, every composite percentile
    /// comes from the fallback calculator.
    pub fn with_index_table(mut self, table: IndexTable) -> Self {
        self.index_table = Some(table);
        self
    }

    // ========== Rules ==========

    /// Add a rule definition
    pub fn add_rule(mut self, rule: DisqualificationRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Add multiple rule definitions
    pub fn add_rules(mut self, rules: Vec<DisqualificationRule>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Add a rule catalog as YAML content. Parsed rules follow the rules
    /// added directly, in content order.
    pub fn add_rule_content(mut self, content: impl Into<String>) -> Self {
        self.rule_contents.push(content.into());
        self
    }

    // ========== Fallback Weights ==========

    /// Set all subject weights (required)
    pub fn with_subject_weights(mut self, weights: BTreeMap<String, f64>) -> Self {
        self.subject_weights = weights;
        self
    }

    /// Set the weight of one canonical subject
    pub fn with_subject_weight(mut self, subject: impl Into<String>, weight: f64) -> Self {
        self.subject_weights.insert(subject.into(), weight);
        self
    }

    /// Build the admission engine
    pub fn build(self) -> Result<AdmissionEngine> {
        if self.subject_weights.is_empty() {
            return Err(SdkError::Config(
                "subject weights are required for the percentile fallback".to_string(),
            ));
        }
        let percentile_table = self
            .percentile_table
            .ok_or_else(|| SdkError::Config("a percentile table is required".to_string()))?;

        let mut aliases = self.aliases;
        for content in &self.alias_contents {
            aliases.merge(AliasParser::parse(content)?);
        }
        let resolver = Arc::new(NameResolver::new(&aliases, self.config.resolver.clone())?);

        let index = self
            .index_table
            .map(|table| ReferenceIndex::build(&table, self.config.index.columns.clone()))
            .transpose()?;

        let calculator =
            PercentileCalculator::new(self.subject_weights, self.config.fallback.clone())?;

        let cutoffs = CutoffResolver::new(
            Arc::new(percentile_table),
            Arc::clone(&resolver),
            self.config.cutoff.clone(),
        )?;

        let mut rules = self.rules;
        for content in &self.rule_contents {
            rules.extend(CatalogParser::parse(content)?);
        }
        let catalog = Arc::new(RuleCatalog::build(rules)?);
        let rule_engine = RuleEngine::new(catalog, Arc::clone(&resolver));

        let classifier = ProbabilityClassifier::new(self.config.classifier.clone())?;

        info!(
            "Admission engine built: {} rules, index {}, fallback over {} subjects",
            rule_engine.catalog().len(),
            index
                .as_ref()
                .map_or("disabled".to_string(), |i| format!("{:?}", i.mode())),
            calculator.weights().len()
        );

        Ok(AdmissionEngine::from_parts(
            self.config,
            resolver,
            index,
            calculator,
            cutoffs,
            rule_engine,
            classifier,
        ))
    }
}

impl Default for AdmissionEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
