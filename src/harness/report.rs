//! Harness results

use serde::Serialize;
use std::collections::BTreeMap;

use crate::harness::corpus::Difficulty;

/// Outcome of one graded query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CaseOutcome {
    Passed,
    Failed {
        expected: Vec<String>,
        got: Vec<String>,
    },
    NotImplemented,
    Errored { message: String },
}

impl CaseOutcome {
    /// Passed when every expected id was retrieved
    pub fn grade(expected: &[String], got: Vec<String>) -> Self {
        if expected.iter().all(|id| got.contains(id)) {
            CaseOutcome::Passed
        } else {
            CaseOutcome::Failed {
                expected: expected.to_vec(),
                got,
            }
        }
    }

    pub fn is_passed(&self) -> bool {
        matches!(self, CaseOutcome::Passed)
    }

    /// Failed or errored
    pub fn is_failure(&self) -> bool {
        matches!(self, CaseOutcome::Failed { .. } | CaseOutcome::Errored { .. })
    }

    /// Debug message for a failed or errored case
    pub fn failure_message(&self) -> Option<String> {
        match self {
            CaseOutcome::Failed { expected, got } => {
                Some(format!("Expected: {:?}\nGot: {:?}", expected, got))
            }
            CaseOutcome::Errored { message } => Some(message.clone()),
            CaseOutcome::Passed | CaseOutcome::NotImplemented => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CaseOutcome::Passed => "PASS",
            CaseOutcome::Failed { .. } => "FAIL",
            CaseOutcome::NotImplemented => "TODO",
            CaseOutcome::Errored { .. } => "ERROR",
        }
    }
}

/// One graded query with its outcome
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseReport {
    pub query: String,
    pub difficulty: Difficulty,
    pub outcome: CaseOutcome,
    /// Generated answer, for generation exercises
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
}

/// Passed / total for one difficulty
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub passed: usize,
    pub total: usize,
}

/// Results of one exercise run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HarnessReport {
    pub exercise: String,
    pub cases: Vec<CaseReport>,
}

impl HarnessReport {
    pub fn new(exercise: impl Into<String>, cases: Vec<CaseReport>) -> Self {
        Self {
            exercise: exercise.into(),
            cases,
        }
    }

    pub fn total(&self) -> usize {
        self.cases.len()
    }

    pub fn passed(&self) -> usize {
        self.count(|outcome| outcome.is_passed())
    }

    pub fn failed(&self) -> usize {
        self.count(|outcome| matches!(outcome, CaseOutcome::Failed { .. }))
    }

    pub fn errored(&self) -> usize {
        self.count(|outcome| matches!(outcome, CaseOutcome::Errored { .. }))
    }

    pub fn not_implemented(&self) -> usize {
        self.count(|outcome| matches!(outcome, CaseOutcome::NotImplemented))
    }

    /// True when nothing failed or errored
    pub fn is_success(&self) -> bool {
        !self.cases.iter().any(|case| case.outcome.is_failure())
    }

    /// Passed / total per difficulty, in difficulty order
    pub fn tally(&self) -> BTreeMap<Difficulty, Tally> {
        let mut tally: BTreeMap<Difficulty, Tally> = BTreeMap::new();
        for case in &self.cases {
            let entry = tally.entry(case.difficulty).or_default();
            entry.total += 1;
            if case.outcome.is_passed() {
                entry.passed += 1;
            }
        }
        tally
    }

    fn count(&self, predicate: impl Fn(&CaseOutcome) -> bool) -> usize {
        self.cases.iter().filter(|case| predicate(&case.outcome)).count()
    }
}
