//! Human-readable and JSON renderings of search results.

use std::fmt::Write as _;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::solver::{SearchReport, SearchSummary, Solution, SolverConfig};
use crate::towers::State;

/// Output format for results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    #[default]
    Human,
    Json,
}

/// Configuration announcement printed before the search
pub fn banner(config: &SolverConfig) -> String {
    format!(
        "Towers of Hanoi: {} disks, branch mode {}, seek mode {}\n\n",
        config.disks, config.branch_mode, config.seek_mode
    )
}

/// One solution: heading, then each state on its own line
pub fn format_solution(solution: &Solution) -> String {
    let mut out = format!("Solution #{}\n", solution.number);
    for state in &solution.history {
        let _ = writeln!(out, "{}", state);
    }
    out.push('\n');
    out
}

/// Closing totals
pub fn format_summary(summary: &SearchSummary) -> String {
    let mut out = String::new();
    if summary.solutions_found > 0 {
        out.push_str("Puzzle solved!\n");
    }
    let _ = writeln!(out, "Moves Evaluated: {}", moves_evaluated(summary));
    let _ = writeln!(out, "Solutions Found: {}", summary.solutions_found);
    if let Some(shortest) = summary.shortest_solution {
        let _ = writeln!(out, "Shortest Solution: {} moves", shortest);
    }
    let _ = writeln!(out, "Outcome: {}", summary.outcome);
    out.push_str("[finis]\n");
    out
}

/// Every node but the root stands for one evaluated move
fn moves_evaluated(summary: &SearchSummary) -> usize {
    summary.nodes_created.saturating_sub(1)
}

/// JSON document for a finished search
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport<'a> {
    config: &'a SolverConfig,
    #[serde(flatten)]
    summary: &'a SearchSummary,
    moves_evaluated: usize,
    solutions: Vec<SolutionOutput<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SolutionOutput<'a> {
    number: usize,
    found_at_node: usize,
    moves: usize,
    history: &'a [State],
    steps: Vec<StepOutput>,
}

/// A move with 1-based tower numbers
#[derive(Debug, Serialize)]
struct StepOutput {
    disk: u8,
    from: usize,
    to: usize,
}

/// Render a report as pretty-printed JSON
pub fn to_json(config: &SolverConfig, report: &SearchReport) -> Result<String> {
    let output = JsonReport {
        config,
        summary: &report.summary,
        moves_evaluated: moves_evaluated(&report.summary),
        solutions: report
            .solutions
            .iter()
            .map(|solution| SolutionOutput {
                number: solution.number,
                found_at_node: solution.found_at_node,
                moves: solution.moves(),
                history: &solution.history,
                steps: solution
                    .steps()
                    .into_iter()
                    .map(|step| StepOutput {
                        disk: step.disk,
                        from: step.from + 1,
                        to: step.to + 1,
                    })
                    .collect(),
            })
            .collect(),
    };
    serde_json::to_string_pretty(&output).context("serialize search report")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::{solve, BranchMode, SeekMode};

    fn one_disk() -> (SolverConfig, SearchReport) {
        let config = SolverConfig {
            disks: 1,
            ..Default::default()
        };
        let report = solve(&config).unwrap();
        (config, report)
    }

    #[test]
    fn test_banner() {
        let config = SolverConfig {
            disks: 3,
            branch_mode: BranchMode::Reverse,
            seek_mode: SeekMode::Exhaustive,
            ..Default::default()
        };
        assert_eq!(
            banner(&config),
            "Towers of Hanoi: 3 disks, branch mode reverse, seek mode exhaustive\n\n"
        );
    }

    #[test]
    fn test_human_output() {
        let (_, report) = one_disk();
        assert_eq!(
            format_solution(&report.solutions[0]),
            "Solution #1\n1-x-x\nx-x-1\n\n"
        );

        let summary = format_summary(&report.summary);
        assert!(summary.starts_with("Puzzle solved!\n"));
        assert!(summary.contains("Moves Evaluated: 1\n"));
        assert!(summary.contains("Solutions Found: 1\n"));
        assert!(summary.contains("Outcome: halted at first solution\n"));
        assert!(summary.ends_with("[finis]\n"));
    }

    #[test]
    fn test_json_output() {
        let (config, report) = one_disk();
        let json = to_json(&config, &report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["config"]["disks"], 1);
        assert_eq!(value["config"]["branchMode"], "standard");
        assert_eq!(value["config"]["seekMode"], "lazy");
        assert_eq!(value["outcome"], "halted");
        assert_eq!(value["nodesCreated"], 2);
        assert_eq!(value["movesEvaluated"], 1);
        assert_eq!(value["solutionsFound"], 1);
        assert_eq!(value["shortestSolution"], 1);
        assert_eq!(value["runawayWarning"], false);

        let solution = &value["solutions"][0];
        assert_eq!(solution["foundAtNode"], 2);
        assert_eq!(solution["moves"], 1);
        assert_eq!(solution["history"], serde_json::json!(["1-x-x", "x-x-1"]));
        assert_eq!(
            solution["steps"],
            serde_json::json!([{ "disk": 1, "from": 1, "to": 3 }])
        );
    }
}
