//! Legal move generation for a search node.
//!
//! Candidates come out in (source, destination) order, towers one to three
//! for each. States already on the current path are dropped so a single
//! path never revisits a configuration, and a move that finishes the puzzle
//! replaces every other candidate.

use serde::Serialize;

use crate::solver::NodeId;
use crate::towers::{State, Towers, TOWER_COUNT};

/// One legal transition out of a node's state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveCandidate {
    /// Disk that moves
    pub disk: u8,
    /// State after the move
    pub state: State,
    /// Node created for this candidate, once evaluated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child: Option<NodeId>,
}

impl MoveCandidate {
    pub fn new(disk: u8, state: State) -> Self {
        Self {
            disk,
            state,
            child: None,
        }
    }

    pub fn is_evaluated(&self) -> bool {
        self.child.is_some()
    }
}

/// A disk may land on an empty tower or on a strictly larger disk
pub fn can_place(disk: u8, destination_top: Option<u8>) -> bool {
    destination_top.map_or(true, |top| disk < top)
}

/// Enumerate the moves available from `state`.
///
/// `last_disk` is the disk moved to reach `state`; it is not moved again
/// straight away. `history` is the path from the root to `state` inclusive.
pub fn legal_moves(
    state: &State,
    last_disk: Option<u8>,
    history: &[State],
    solved: &State,
) -> Vec<MoveCandidate> {
    let towers = Towers::decode(state);
    let mut candidates = Vec::new();

    for from in 0..TOWER_COUNT {
        let Some(disk) = towers.top(from) else {
            continue;
        };
        if Some(disk) == last_disk {
            continue;
        }

        for to in 0..TOWER_COUNT {
            // Moving onto itself fails here too: a disk is never smaller than itself
            if !can_place(disk, towers.top(to)) {
                continue;
            }
            let Some(next) = towers.with_move(from, to) else {
                continue;
            };
            let next_state = next.encode();
            if history.contains(&next_state) {
                continue;
            }
            candidates.push(MoveCandidate::new(disk, next_state));
        }
    }

    scan_for_solution(candidates, solved)
}

/// If any candidate reaches the solved state, keep only that one
pub fn scan_for_solution(mut candidates: Vec<MoveCandidate>, solved: &State) -> Vec<MoveCandidate> {
    match candidates.iter().position(|c| &c.state == solved) {
        Some(index) => vec![candidates.swap_remove(index)],
        None => candidates,
    }
}
