//! Terminal output for reports and answers

use colored::Colorize;

use crate::harness::{CaseOutcome, HarnessReport};
use crate::types::GenerationResult;
use crate::workshop::Exercise;

/// One line per case, a tally per difficulty, then the exercise note
pub fn print_report(exercise: Exercise, report: &HarnessReport, details: bool) {
    println!("\n{}", format!("=== {} ===", exercise.title()).bold().cyan());

    for case in &report.cases {
        let label = match &case.outcome {
            CaseOutcome::Passed => case.outcome.label().green(),
            CaseOutcome::Failed { .. } => case.outcome.label().red(),
            CaseOutcome::NotImplemented => case.outcome.label().yellow(),
            CaseOutcome::Errored { .. } => case.outcome.label().red().bold(),
        };
        println!("  [{}] ({}) {}", label, case.difficulty, truncate(&case.query, 60));

        if let Some(message) = case.outcome.failure_message() {
            for line in message.lines() {
                println!("         {}", line.dimmed());
            }
        }
        if details {
            if let Some(answer) = &case.answer {
                println!("         {} {}", "Answer:".bold(), truncate(answer, 200));
            }
        }
    }

    println!("\n{}:", "By difficulty".bold());
    for (difficulty, tally) in report.tally() {
        println!("  {:<8} {}/{}", difficulty.as_str(), tally.passed, tally.total);
    }

    let passed = report.passed().to_string().green();
    let failed = report.failed() + report.errored();
    let failed = if failed > 0 {
        failed.to_string().red()
    } else {
        failed.to_string().normal()
    };
    println!(
        "\n  {}: {} passed, {} failed, {} not implemented ({} total)",
        "Total".bold(),
        passed,
        failed,
        report.not_implemented(),
        report.total()
    );

    println!("\n{}", exercise.summary());
    println!();
}

/// Answer, sources, and whether the agent ran out of steps
pub fn print_answer(result: &GenerationResult, details: bool) {
    println!("\n{}", result.answer);

    if result.is_incomplete() {
        println!("\n{}", "(stopped at the step limit; answer may be partial)".yellow());
    }

    if !result.sources.is_empty() {
        println!("\n{} {}", "Sources:".bold(), result.sources.join(", "));
    }

    if details {
        if let Some(queries) = result.metadata.get("queries").and_then(|q| q.as_array()) {
            println!("{}", "Searches:".bold());
            for query in queries.iter().filter_map(|q| q.as_str()) {
                println!("  - {}", query);
            }
        }
    }
    println!();
}

fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        text.to_string()
    } else {
        let head: String = text.chars().take(limit).collect();
        format!("{}...", head)
    }
}
