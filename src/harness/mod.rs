//! Test harness
//!
//! Loads a corpus, runs an exercise over its graded queries, and reports
//! pass / fail / not-implemented per case.

pub mod corpus;
pub mod report;
pub mod runner;

pub use corpus::{Corpus, Difficulty, TestCase};
pub use report::{CaseOutcome, CaseReport, HarnessReport, Tally};
pub use runner::{HarnessRunner, DEFAULT_HARNESS_TOP_K};
