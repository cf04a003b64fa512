//! Exhaustive depth-first search over legal disk moves.
//!
//! The walker keeps the current root-to-node path on an explicit stack
//! rather than the call stack. The top entry is the node being expanded and
//! each entry below it is its parent. A node is popped once its brood is
//! empty, which is where a recursive walk would return to its parent, so the
//! order of node creation is the same as the recursive formulation.

use std::fmt;
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::movegen::{legal_moves, MoveCandidate};
use crate::towers::{Move, State, Towers, MAX_DISKS};

/// Creation ordinal of a search node; the root is 1
pub type NodeId = usize;

/// Which untried candidate to explore next
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BranchMode {
    /// First remaining candidate in generation order
    #[default]
    Standard,
    /// Last remaining candidate in generation order
    Reverse,
}

impl BranchMode {
    /// Lenient lookup by name; anything unrecognised selects `Standard`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "standard" => BranchMode::Standard,
            "reverse" => BranchMode::Reverse,
            other => {
                warn!(branch_mode = other, "unrecognised branch mode, using standard");
                BranchMode::Standard
            }
        }
    }

    /// Index of the candidate to explore next, skipping evaluated ones
    pub fn pick(self, brood: &[MoveCandidate]) -> Option<usize> {
        match self {
            BranchMode::Standard => brood.iter().position(|c| !c.is_evaluated()),
            BranchMode::Reverse => brood.iter().rposition(|c| !c.is_evaluated()),
        }
    }
}

impl fmt::Display for BranchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BranchMode::Standard => f.write_str("standard"),
            BranchMode::Reverse => f.write_str("reverse"),
        }
    }
}

/// Whether the search stops at the first solution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SeekMode {
    /// Halt the whole search at the first solution
    #[default]
    Lazy,
    /// Explore the entire cycle-free tree
    Exhaustive,
}

impl fmt::Display for SeekMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeekMode::Lazy => f.write_str("lazy"),
            SeekMode::Exhaustive => f.write_str("exhaustive"),
        }
    }
}

/// Configuration for one solve
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolverConfig {
    /// Number of disks
    pub disks: usize,
    pub branch_mode: BranchMode,
    pub seek_mode: SeekMode,
    /// Warn once this many nodes exist without a solution (0 disables)
    pub warn_after_nodes: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            disks: 4,
            branch_mode: BranchMode::Standard,
            seek_mode: SeekMode::Lazy,
            warn_after_nodes: 1000,
        }
    }
}

impl SolverConfig {
    pub fn validate(&self) -> Result<()> {
        if self.disks == 0 {
            bail!("disk count must be at least 1");
        }
        if self.disks > MAX_DISKS {
            bail!(
                "disk count {} exceeds the maximum of {} supported by the state encoding",
                self.disks,
                MAX_DISKS
            );
        }
        Ok(())
    }
}

/// Classification of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeStatus {
    /// Untried candidates remain
    Active,
    /// State equals the solved state
    SolvedLeaf,
    /// Created with no candidates
    DeadEnd,
    /// Every candidate has been explored
    Exhausted,
}

/// One point in the search tree
#[derive(Debug, Clone)]
pub struct SearchNode {
    pub id: NodeId,
    /// Disk moved to reach this state (`None` for the root)
    pub disk: Option<u8>,
    pub state: State,
    pub parent: Option<NodeId>,
    /// States from the root to this node inclusive
    pub history: Vec<State>,
    /// Candidates not yet explored
    pub brood: Vec<MoveCandidate>,
    solved: bool,
    had_candidates: bool,
}

impl SearchNode {
    pub fn status(&self) -> NodeStatus {
        if self.solved {
            NodeStatus::SolvedLeaf
        } else if !self.brood.is_empty() {
            NodeStatus::Active
        } else if self.had_candidates {
            NodeStatus::Exhausted
        } else {
            NodeStatus::DeadEnd
        }
    }

    /// Drop candidates whose subtrees have been explored
    fn prune(&mut self) {
        self.brood.retain(|c| !c.is_evaluated());
    }
}

/// A path from the initial state to the solved state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Solution {
    /// 1-based order in which solutions were found
    pub number: usize,
    /// Id of the solved node
    pub found_at_node: NodeId,
    pub history: Vec<State>,
}

impl Solution {
    pub fn moves(&self) -> usize {
        self.history.len().saturating_sub(1)
    }

    /// Decode the history into individual disk moves
    pub fn steps(&self) -> Vec<Move> {
        self.history
            .windows(2)
            .filter_map(|pair| Move::between(&pair[0], &pair[1]))
            .collect()
    }
}

/// How a search ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchOutcome {
    /// Lazy mode stopped at the first solution
    Halted,
    /// The cycle-free tree was fully explored
    Exhausted,
    /// Stopped early by an external interrupt
    Interrupted,
}

impl fmt::Display for SearchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchOutcome::Halted => f.write_str("halted at first solution"),
            SearchOutcome::Exhausted => f.write_str("search exhausted"),
            SearchOutcome::Interrupted => f.write_str("interrupted"),
        }
    }
}

/// Counters gathered over one search
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSummary {
    pub outcome: SearchOutcome,
    pub nodes_created: usize,
    pub solutions_found: usize,
    /// Move count of the shortest solution found
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shortest_solution: Option<usize>,
    /// Whether the no-solution node threshold was crossed
    pub runaway_warning: bool,
    pub elapsed_ms: u64,
}

/// Summary plus every solution found
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchReport {
    #[serde(flatten)]
    pub summary: SearchSummary,
    pub solutions: Vec<Solution>,
}

/// Owns the configuration and counters for a solve
pub struct Solver {
    config: SolverConfig,
    initial: State,
    solved: State,
    interrupt: Option<Arc<AtomicBool>>,
    nodes_created: usize,
    solutions_found: usize,
    shortest_solution: Option<usize>,
    runaway_warning: bool,
    /// History of every node created by the last run
    #[cfg(test)]
    created_histories: Vec<Vec<State>>,
}

impl Solver {
    pub fn new(config: SolverConfig) -> Result<Self> {
        config.validate()?;
        let initial = Towers::initial(config.disks).encode();
        let solved = Towers::solved(config.disks).encode();
        Ok(Self {
            config,
            initial,
            solved,
            interrupt: None,
            nodes_created: 0,
            solutions_found: 0,
            shortest_solution: None,
            runaway_warning: false,
            #[cfg(test)]
            created_histories: Vec::new(),
        })
    }

    /// Stop the search when `flag` becomes true
    pub fn with_interrupt(mut self, flag: Arc<AtomicBool>) -> Self {
        self.interrupt = Some(flag);
        self
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn initial_state(&self) -> &State {
        &self.initial
    }

    pub fn solved_state(&self) -> &State {
        &self.solved
    }

    /// Run the search, handing each solution to `on_solution` as it is found.
    pub fn run<F>(&mut self, mut on_solution: F) -> SearchSummary
    where
        F: FnMut(&Solution),
    {
        let start_time = Instant::now();
        self.nodes_created = 0;
        self.solutions_found = 0;
        self.shortest_solution = None;
        self.runaway_warning = false;
        #[cfg(test)]
        self.created_histories.clear();

        info!(
            disks = self.config.disks,
            branch_mode = %self.config.branch_mode,
            seek_mode = %self.config.seek_mode,
            "starting search"
        );
        if self.config.seek_mode == SeekMode::Exhaustive && self.config.disks > 3 {
            warn!(
                disks = self.config.disks,
                "exhaustive search over this many disks may not finish"
            );
        }

        let root = self.create_node(None, self.initial.clone(), None);
        let mut path = Vec::new();
        let outcome = match self.visit(root, &mut path, &mut on_solution) {
            ControlFlow::Break(()) => SearchOutcome::Halted,
            ControlFlow::Continue(()) => self.walk(&mut path, &mut on_solution),
        };

        let summary = SearchSummary {
            outcome,
            nodes_created: self.nodes_created,
            solutions_found: self.solutions_found,
            shortest_solution: self.shortest_solution,
            runaway_warning: self.runaway_warning,
            elapsed_ms: start_time.elapsed().as_millis() as u64,
        };
        info!(
            outcome = %summary.outcome,
            nodes_created = summary.nodes_created,
            solutions_found = summary.solutions_found,
            "search finished"
        );
        summary
    }

    /// Expand the node on top of `path` until the path is empty.
    fn walk<F>(&mut self, path: &mut Vec<SearchNode>, on_solution: &mut F) -> SearchOutcome
    where
        F: FnMut(&Solution),
    {
        while let Some(node) = path.last_mut() {
            node.prune();
            let Some(index) = self.config.branch_mode.pick(&node.brood) else {
                debug!(
                    node = node.id,
                    parent = ?node.parent,
                    status = ?node.status(),
                    "backtracking"
                );
                path.pop();
                continue;
            };

            if self.is_interrupted() {
                return SearchOutcome::Interrupted;
            }

            let candidate = &node.brood[index];
            let (disk, state) = (candidate.disk, candidate.state.clone());
            let child = self.create_node(Some(disk), state, Some(&*node));
            node.brood[index].child = Some(child.id);

            if self.visit(child, path, on_solution).is_break() {
                return SearchOutcome::Halted;
            }
        }
        SearchOutcome::Exhausted
    }

    /// Handle a freshly created node: report it if solved, descend into it
    /// if it has candidates, otherwise leave it behind.
    fn visit<F>(
        &mut self,
        node: SearchNode,
        path: &mut Vec<SearchNode>,
        on_solution: &mut F,
    ) -> ControlFlow<()>
    where
        F: FnMut(&Solution),
    {
        match node.status() {
            NodeStatus::SolvedLeaf => {
                self.solutions_found += 1;
                let solution = Solution {
                    number: self.solutions_found,
                    found_at_node: node.id,
                    history: node.history,
                };
                let moves = solution.moves();
                self.shortest_solution = Some(self.shortest_solution.map_or(moves, |s| s.min(moves)));
                info!(
                    solution = solution.number,
                    moves,
                    node = solution.found_at_node,
                    "solution found"
                );
                on_solution(&solution);

                if self.config.seek_mode == SeekMode::Lazy {
                    return ControlFlow::Break(());
                }
            }
            NodeStatus::Active => path.push(node),
            NodeStatus::DeadEnd | NodeStatus::Exhausted => {
                debug!(node = node.id, state = %node.state, "dead end");
            }
        }
        ControlFlow::Continue(())
    }

    fn create_node(&mut self, disk: Option<u8>, state: State, parent: Option<&SearchNode>) -> SearchNode {
        self.nodes_created += 1;
        let id = self.nodes_created;

        if id == self.config.warn_after_nodes && self.solutions_found == 0 {
            self.runaway_warning = true;
            warn!(
                nodes = id,
                branch_mode = %self.config.branch_mode,
                "no solution found yet; consider another branch mode"
            );
        }

        let history = match parent {
            Some(parent) => {
                let mut history = Vec::with_capacity(parent.history.len() + 1);
                history.extend_from_slice(&parent.history);
                history.push(state.clone());
                history
            }
            None => vec![state.clone()],
        };

        let solved = state == self.solved;
        let brood = if solved {
            Vec::new()
        } else {
            legal_moves(&state, disk, &history, &self.solved)
        };

        debug!(
            node = id,
            parent = ?parent.map(|p| p.id),
            disk = ?disk,
            state = %state,
            brood = ?brood.iter().map(|c| c.state.as_str()).collect::<Vec<_>>(),
            "created node"
        );

        #[cfg(test)]
        self.created_histories.push(history.clone());

        SearchNode {
            id,
            disk,
            had_candidates: !brood.is_empty(),
            state,
            parent: parent.map(|p| p.id),
            history,
            brood,
            solved,
        }
    }

    fn is_interrupted(&self) -> bool {
        self.interrupt
            .as_ref()
            .map_or(false, |flag| flag.load(Ordering::Relaxed))
    }
}

/// Solve with `config`, collecting every solution found.
pub fn solve(config: &SolverConfig) -> Result<SearchReport> {
    let mut solver = Solver::new(config.clone())?;
    let mut solutions = Vec::new();
    let summary = solver.run(|solution| solutions.push(solution.clone()));
    Ok(SearchReport { summary, solutions })
}
