//! Tower configuration and its fixed-width text encoding.
//!
//! A state such as `x23-xx1-xxx` describes the three towers of a puzzle
//! with N disks. Each tower is written as exactly N characters: disk digits
//! smallest (top) first, left-padded with `x` for the empty slots. Towers
//! are joined with `-`. The encoding is the canonical key for a state, so
//! equal configurations always produce equal text.

use std::fmt;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Placeholder for an empty slot within a tower
pub const EMPTY_CHARACTER: char = 'x';

/// Separator between consecutive towers
pub const TOWER_DELIMITER: char = '-';

/// Number of towers in the puzzle
pub const TOWER_COUNT: usize = 3;

/// Largest disk count a single-digit encoding can represent
pub const MAX_DISKS: usize = 9;

/// One tower, top of stack first
pub type Tower = SmallVec<[u8; MAX_DISKS]>;

/// In-memory configuration of all three towers
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Towers {
    pub towers: [Tower; TOWER_COUNT],
}

impl Towers {
    /// All disks stacked on the first tower
    pub fn initial(disks: usize) -> Self {
        Self::stacked_on(0, disks)
    }

    /// All disks stacked on the last tower
    pub fn solved(disks: usize) -> Self {
        Self::stacked_on(TOWER_COUNT - 1, disks)
    }

    fn stacked_on(index: usize, disks: usize) -> Self {
        let mut towers = Self::default();
        towers.towers[index] = (1..=disks as u8).collect();
        towers
    }

    /// Disks of one tower, top first
    pub fn tower(&self, index: usize) -> &[u8] {
        &self.towers[index]
    }

    /// Top disk of a tower, if any
    pub fn top(&self, index: usize) -> Option<u8> {
        self.towers[index].first().copied()
    }

    /// Total number of disks across all towers
    pub fn disk_count(&self) -> usize {
        self.towers.iter().map(|t| t.len()).sum()
    }

    /// Clone with the top disk of `from` placed atop `to`.
    ///
    /// Legality is the caller's concern; this only returns `None` when the
    /// source tower is empty.
    pub fn with_move(&self, from: usize, to: usize) -> Option<Self> {
        let disk = self.top(from)?;
        let mut next = self.clone();
        next.towers[from].remove(0);
        next.towers[to].insert(0, disk);
        Some(next)
    }

    /// Check that every disk 1..=N appears exactly once and that each tower
    /// strictly increases from top to bottom.
    pub fn is_valid(&self, disks: usize) -> bool {
        let mut seen = [false; MAX_DISKS + 1];
        for tower in &self.towers {
            if tower.windows(2).any(|pair| pair[0] >= pair[1]) {
                return false;
            }
            for &disk in tower {
                let disk = disk as usize;
                if disk == 0 || disk > disks || seen[disk] {
                    return false;
                }
                seen[disk] = true;
            }
        }
        seen[1..=disks].iter().all(|&s| s)
    }

    /// Serialize into the fixed-width text form.
    ///
    /// The width of each tower is the total disk count, which equals N for
    /// every valid configuration.
    pub fn encode(&self) -> State {
        let width = self.disk_count();
        let mut text = String::with_capacity(TOWER_COUNT * (width + 1));
        for (index, tower) in self.towers.iter().enumerate() {
            if index > 0 {
                text.push(TOWER_DELIMITER);
            }
            for _ in tower.len()..width {
                text.push(EMPTY_CHARACTER);
            }
            for &disk in tower {
                text.push(char::from(b'0' + disk));
            }
        }
        State(text)
    }

    /// Read a state back into towers.
    pub fn decode(state: &State) -> Self {
        let width = state.disks();
        let bytes = state.0.as_bytes();
        let mut towers = Self::default();
        for (index, tower) in towers.towers.iter_mut().enumerate() {
            let start = index * (width + 1);
            tower.extend(
                bytes[start..start + width]
                    .iter()
                    .filter(|&&b| b != EMPTY_CHARACTER as u8)
                    .map(|&b| b - b'0'),
            );
        }
        towers
    }
}

/// Canonical text encoding of a tower configuration.
///
/// Values are only produced by [`Towers::encode`] or [`State::parse`], so a
/// `State` is always well-formed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct State(String);

impl State {
    /// Validate external text against the encoding for `disks` disks.
    pub fn parse(text: &str, disks: usize) -> Result<Self> {
        if disks == 0 || disks > MAX_DISKS {
            bail!("disk count must be between 1 and {}, got {}", MAX_DISKS, disks);
        }
        let expected = TOWER_COUNT * disks + (TOWER_COUNT - 1);
        if text.len() != expected {
            bail!(
                "state {:?} has length {}, expected {} for {} disks",
                text,
                text.len(),
                expected,
                disks
            );
        }

        let segments: Vec<&str> = text.split(TOWER_DELIMITER).collect();
        if segments.len() != TOWER_COUNT || segments.iter().any(|s| s.len() != disks) {
            bail!("state {:?} must be {} towers of {} slots", text, TOWER_COUNT, disks);
        }

        for segment in &segments {
            let mut in_disks = false;
            for c in segment.chars() {
                match c {
                    EMPTY_CHARACTER if in_disks => {
                        bail!("tower {:?} has padding below a disk", segment)
                    }
                    EMPTY_CHARACTER => {}
                    '1'..='9' => in_disks = true,
                    other => bail!("unexpected character {:?} in state {:?}", other, text),
                }
            }
        }

        let state = State(text.to_string());
        if !Towers::decode(&state).is_valid(disks) {
            bail!("state {:?} is not a legal arrangement of {} disks", text, disks);
        }
        Ok(state)
    }

    /// Disk count implied by the text width
    pub fn disks(&self) -> usize {
        (self.0.len() - (TOWER_COUNT - 1)) / TOWER_COUNT
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single disk transfer between towers (0-based tower indices)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub disk: u8,
    pub from: usize,
    pub to: usize,
}

impl Move {
    /// Recover the move that turns `before` into `after`, if exactly one does.
    pub fn between(before: &State, after: &State) -> Option<Move> {
        let prior = Towers::decode(before);
        let next = Towers::decode(after);
        let from = (0..TOWER_COUNT).find(|&i| prior.tower(i).len() == next.tower(i).len() + 1)?;
        let to = (0..TOWER_COUNT).find(|&i| prior.tower(i).len() + 1 == next.tower(i).len())?;
        let disk = prior.top(from)?;
        (prior.with_move(from, to)? == next).then_some(Move { disk, from, to })
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "move disk {} from tower {} to tower {}",
            self.disk,
            self.from + 1,
            self.to + 1
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn towers(one: &[u8], two: &[u8], three: &[u8]) -> Towers {
        Towers {
            towers: [one.into(), two.into(), three.into()],
        }
    }

    /// Every configuration of `disks` disks: each disk independently placed
    /// on one of the three towers, smaller disks above larger ones.
    fn all_configurations(disks: usize) -> Vec<Towers> {
        let total = TOWER_COUNT.pow(disks as u32);
        (0..total)
            .map(|mut code| {
                let mut config = Towers::default();
                for disk in 1..=disks as u8 {
                    config.towers[code % TOWER_COUNT].push(disk);
                    code /= TOWER_COUNT;
                }
                config
            })
            .collect()
    }

    #[test]
    fn test_initial_and_solved_encoding() {
        assert_eq!(Towers::initial(4).encode().as_str(), "1234-xxxx-xxxx");
        assert_eq!(Towers::solved(4).encode().as_str(), "xxxx-xxxx-1234");
        assert_eq!(Towers::initial(1).encode().as_str(), "1-x-x");
    }

    #[test]
    fn test_decode_pads_on_the_left() {
        let state = State::parse("x234-xxxx-xxx1", 4).unwrap();
        let decoded = Towers::decode(&state);
        assert_eq!(decoded, towers(&[2, 3, 4], &[], &[1]));
        assert_eq!(decoded.top(0), Some(2));
        assert_eq!(decoded.top(1), None);
        assert_eq!(state.disks(), 4);
    }

    #[test]
    fn test_round_trip_all_configurations() {
        for disks in 1..=4 {
            for config in all_configurations(disks) {
                assert!(config.is_valid(disks));
                let state = config.encode();
                assert_eq!(state.as_str().len(), 3 * disks + 2);
                assert_eq!(Towers::decode(&state), config);
                assert_eq!(State::parse(state.as_str(), disks).unwrap(), state);
            }
        }
    }

    #[test]
    fn test_is_valid_rejects_bad_stacks() {
        assert!(!towers(&[2, 1], &[], &[3]).is_valid(3));
        assert!(!towers(&[1, 2], &[2], &[3]).is_valid(3));
        assert!(!towers(&[1, 2], &[], &[]).is_valid(3));
        assert!(towers(&[2], &[1], &[3]).is_valid(3));
    }

    #[test]
    fn test_parse_rejects_malformed_text() {
        assert!(State::parse("123-xxx-xx", 3).is_err());
        assert!(State::parse("123+xxx-xxx", 3).is_err());
        assert!(State::parse("213-xxx-xxx", 3).is_err());
        assert!(State::parse("1x3-xxx-xx2", 3).is_err());
        assert!(State::parse("x13-xx1-xx2", 3).is_err());
        assert!(State::parse("1a3-xxx-xx2", 3).is_err());
        assert!(State::parse("x-x-x", 0).is_err());
    }

    #[test]
    fn test_with_move() {
        let start = Towers::initial(3);
        let moved = start.with_move(0, 2).unwrap();
        assert_eq!(moved.encode().as_str(), "x23-xxx-xx1");
        assert!(start.with_move(1, 2).is_none());
    }

    #[test]
    fn test_move_between_states() {
        let before = State::parse("x23-xxx-xx1", 3).unwrap();
        let after = State::parse("xx3-xx2-xx1", 3).unwrap();
        let step = Move::between(&before, &after).unwrap();
        assert_eq!(step, Move { disk: 2, from: 0, to: 1 });
        assert_eq!(step.to_string(), "move disk 2 from tower 1 to tower 2");

        // Two moves apart
        let start = State::parse("123-xxx-xxx", 3).unwrap();
        assert!(Move::between(&start, &after).is_none());
    }
}
