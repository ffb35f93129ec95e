//! Disqualification rule definitions
//!
//! Rules are plain data: an applicability scope, a predicate drawn from a
//! closed set of checks, a severity and a message template. Evaluation
//! lives in the runtime crate.

mod definition;
mod predicate;
mod scope;

pub use definition::{DisqualificationRule, Severity};
pub use predicate::{GradeField, Predicate};
pub use scope::RuleScope;
