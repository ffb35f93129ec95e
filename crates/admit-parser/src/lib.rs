//! Admit Parser - YAML parsers for admission reference data
//!
//! This crate converts YAML configuration into the core types:
//! - Alias tables for institutions, majors and subjects
//! - Disqualification rules and rule catalogs

pub mod alias_parser;
pub mod catalog_parser;
pub mod error;
pub mod rule_parser;
pub mod yaml_parser;

// Re-export main parser types
pub use alias_parser::AliasParser;
pub use catalog_parser::CatalogParser;
pub use error::{ParseError, Result};
pub use rule_parser::RuleParser;
pub use yaml_parser::YamlParser;
