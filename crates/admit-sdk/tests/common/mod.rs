//! Common test utilities for SDK integration tests

#![allow(dead_code)]

use admit_sdk::{
    AdmissionEngine, AdmissionEngineBuilder, Assessment, CandidateProfile, Cell, EngineConfig,
    ExamScore, IndexTable, PercentileTable, ProgramAssessment, TargetProgram, Tier, Track,
};

pub const ALIASES: &str = include_str!("../fixtures/aliases.yaml");
pub const RULES: &str = include_str!("../fixtures/rules.yaml");
pub const ENGINE: &str = include_str!("../fixtures/engine.yaml");

pub const MEDICINE_COLUMN: &str = "Hanguk University Medicine natural";
pub const CS_COLUMN: &str = "Daehan University Computer Science natural";
pub const LAW_COLUMN: &str = "Hanguk University Law humanities";

/// Install a test subscriber once; `RUST_LOG` controls verbosity
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn column(values: [f64; 5]) -> Vec<Cell> {
    values.into_iter().map(Cell::from).collect()
}

/// Percentile axis 0/20/50/80/94 with three program columns
pub fn percentile_table() -> PercentileTable {
    let axis = column([0.0, 20.0, 50.0, 80.0, 94.0]);
    PercentileTable::new(axis)
        .with_column(MEDICINE_COLUMN, column([100.0, 90.0, 70.0, 50.0, 30.0]))
        .and_then(|t| t.with_column(CS_COLUMN, column([80.0, 70.0, 55.0, 40.0, 25.0])))
        .and_then(|t| t.with_column(LAW_COLUMN, column([95.0, 85.0, 65.0, 45.0, 25.0])))
        .expect("valid percentile table")
}

/// Index keyed by korean / math / inquiry1 / inquiry2 raw scores
pub fn index_table() -> IndexTable {
    let rows: [(f64, f64, f64, f64, &str, f64, f64, f64, f64); 4] = [
        (131.0, 137.0, 68.0, 65.0, "natural", 401.0, 98.5, 6750.0, 1.5),
        (125.0, 130.0, 64.0, 62.0, "natural", 381.0, 95.0, 22500.0, 5.0),
        (120.0, 120.0, 60.0, 60.0, "natural", 360.0, 88.0, 54000.0, 12.0),
        (131.0, 137.0, 68.0, 65.0, "humanities", 401.0, 97.0, 13500.0, 3.0),
    ];
    let mut table = IndexTable::new([
        "korean",
        "math",
        "inquiry1",
        "inquiry2",
        "category",
        "composite_score",
        "composite_percentile",
        "rank",
        "cumulative_percentile",
    ]);
    for (k, m, i1, i2, category, score, pct, rank, cum) in rows {
        table
            .push_row(vec![
                Cell::from(k),
                Cell::from(m),
                Cell::from(i1),
                Cell::from(i2),
                Cell::from(category),
                Cell::from(score),
                Cell::from(pct),
                Cell::from(rank),
                Cell::from(cum),
            ])
            .expect("row width matches");
    }
    table
}

/// Builder loaded with every fixture
pub fn builder() -> AdmissionEngineBuilder {
    AdmissionEngineBuilder::new()
        .with_config(EngineConfig::from_yaml(ENGINE).expect("valid engine config"))
        .add_alias_content(ALIASES)
        .add_rule_content(RULES)
        .with_percentile_table(percentile_table())
        .with_index_table(index_table())
        .with_subject_weight("korean", 0.3)
        .with_subject_weight("math", 0.3)
        .with_subject_weight("english", 0.2)
        .with_subject_weight("inquiry1", 0.2)
}

pub fn engine() -> AdmissionEngine {
    init_tracing();
    builder().build().expect("Failed to build engine")
}

/// Natural-track candidate with raw scores for all four index keys
pub fn indexed_candidate(korean: f64, math: f64, inquiry1: f64, inquiry2: f64) -> CandidateProfile {
    CandidateProfile::new(Track::Natural)
        .with_score(ExamScore::new("국어", korean))
        .with_score(ExamScore::new("수학", math))
        .with_score(ExamScore::new("inquiry1", inquiry1))
        .with_score(ExamScore::new("inquiry2", inquiry2))
}

pub fn target(institution: &str, major: &str) -> TargetProgram {
    TargetProgram::new(institution, major)
}

/// Assertion helpers for Assessment
pub trait AssessmentAssertions {
    fn program_at(&self, index: usize) -> &ProgramAssessment;
    fn assert_tier(&self, index: usize, expected: Tier);
    fn assert_disqualified(&self, index: usize, code: &str);
    fn assert_eligible(&self, index: usize);
}

impl AssessmentAssertions for Assessment {
    fn program_at(&self, index: usize) -> &ProgramAssessment {
        self.programs
            .get(index)
            .unwrap_or_else(|| panic!("no program at position {}", index))
    }

    fn assert_tier(&self, index: usize, expected: Tier) {
        let actual = self.program_at(index).tier();
        assert_eq!(actual, expected, "Expected tier {:?}, got {:?}", expected, actual);
    }

    fn assert_disqualified(&self, index: usize, code: &str) {
        let result = &self.program_at(index).disqualification;
        assert!(result.disqualified, "Expected disqualification, got {:?}", result);
        assert_eq!(result.code.as_deref(), Some(code));
    }

    fn assert_eligible(&self, index: usize) {
        let result = &self.program_at(index).disqualification;
        assert!(!result.disqualified, "Expected eligible, got {:?}", result);
    }
}
