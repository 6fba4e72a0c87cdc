// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Weighted chord-progression sampling.
//!
//! A transition table maps each roman numeral to weighted successors. Walks
//! are a pure function of the table and an explicit random source.

use std::collections::BTreeMap;

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use tracing::debug;

use crate::error::{TheoryError, TheoryResult};
use crate::music::pitch::PitchClass;
use crate::music::roman::{self, ResolvedChord};
use crate::music::scale::ScaleType;

/// Functional harmony in a major key: tonic, predominant, dominant
const FUNCTIONAL: &[(&str, &[(&str, f64)])] = &[
    ("I", &[("IV", 3.0), ("V", 3.0), ("vi", 2.0), ("ii", 2.0), ("iii", 1.0)]),
    ("ii", &[("V", 5.0), ("vii0", 1.0), ("IV", 1.0)]),
    ("iii", &[("vi", 3.0), ("IV", 2.0)]),
    ("IV", &[("V", 3.0), ("I", 2.0), ("ii", 2.0), ("vii0", 1.0)]),
    ("V", &[("I", 5.0), ("vi", 2.0), ("IV", 1.0)]),
    ("vi", &[("ii", 3.0), ("IV", 3.0), ("V", 1.0)]),
    ("vii0", &[("I", 4.0), ("iii", 1.0)]),
];

/// Weighted numeral-to-numeral transitions
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionTable {
    transitions: BTreeMap<String, Vec<(String, f64)>>,
}

impl TransitionTable {
    /// The built-in functional-harmony table
    pub fn functional() -> Self {
        let rows = FUNCTIONAL
            .iter()
            .map(|(from, nexts)| {
                let nexts = nexts.iter().map(|(to, w)| (to.to_string(), *w)).collect();
                (from.to_string(), nexts)
            })
            .collect();
        Self::from_rows(&rows)
    }

    fn from_rows(rows: &BTreeMap<String, BTreeMap<String, f64>>) -> Self {
        let transitions = rows
            .iter()
            .map(|(from, nexts)| {
                let nexts = nexts.iter().map(|(to, w)| (to.clone(), *w)).collect();
                (from.clone(), nexts)
            })
            .collect();
        Self { transitions }
    }

    /// Build a table from `{ from: { to: weight } }`.
    ///
    /// Every symbol must be a known numeral, every target must have its own
    /// row, and every row needs a positive total weight.
    pub fn from_weights(weights: &BTreeMap<String, BTreeMap<String, f64>>) -> TheoryResult<Self> {
        if weights.is_empty() {
            return Err(TheoryError::InvalidProgression("table is empty".to_string()));
        }

        for (from, nexts) in weights {
            if !roman::is_known(from) {
                return Err(TheoryError::InvalidProgression(format!("unknown numeral '{from}'")));
            }
            for (to, weight) in nexts {
                if !roman::is_known(to) {
                    return Err(TheoryError::InvalidProgression(format!(
                        "unknown numeral '{to}' after '{from}'"
                    )));
                }
                if !weights.contains_key(to) {
                    return Err(TheoryError::InvalidProgression(format!(
                        "'{to}' has no transitions of its own"
                    )));
                }
                if !weight.is_finite() || *weight < 0.0 {
                    return Err(TheoryError::InvalidProgression(format!(
                        "weight {weight} for '{from}' -> '{to}'"
                    )));
                }
            }
            if nexts.values().sum::<f64>() <= 0.0 {
                return Err(TheoryError::InvalidProgression(format!(
                    "'{from}' has no weighted transitions"
                )));
            }
        }

        Ok(Self::from_rows(weights))
    }

    /// Symbols with outgoing transitions
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.transitions.keys().map(String::as_str)
    }

    /// Successors of `symbol` with their weights
    pub fn successors(&self, symbol: &str) -> Option<&[(String, f64)]> {
        self.transitions.get(symbol).map(Vec::as_slice)
    }

    /// Whether `from` can move to `to` with a positive weight
    pub fn allows(&self, from: &str, to: &str) -> bool {
        self.successors(from)
            .is_some_and(|nexts| nexts.iter().any(|(next, w)| next == to && *w > 0.0))
    }
}

impl Default for TransitionTable {
    fn default() -> Self {
        Self::functional()
    }
}

/// Walk `length` symbols through the table, starting at (and including)
/// `start`
pub fn sample<R: Rng + ?Sized>(
    table: &TransitionTable,
    start: &str,
    length: usize,
    rng: &mut R,
) -> TheoryResult<Vec<String>> {
    if length == 0 {
        return Ok(Vec::new());
    }
    if table.successors(start).is_none() {
        return Err(TheoryError::InvalidProgression(format!("'{start}' is not in the table")));
    }

    let mut walk = Vec::with_capacity(length);
    let mut current = start.to_string();
    walk.push(current.clone());

    while walk.len() < length {
        let nexts = table
            .successors(&current)
            .ok_or_else(|| TheoryError::InvalidProgression(format!("'{current}' is a dead end")))?;
        let dist = WeightedIndex::new(nexts.iter().map(|(_, w)| *w))
            .map_err(|e| TheoryError::InvalidProgression(format!("'{current}': {e}")))?;
        current = nexts[dist.sample(rng)].0.clone();
        walk.push(current.clone());
    }

    debug!(start, length, walk = ?walk, "sampled progression");
    Ok(walk)
}

/// Sample a progression and resolve it in a key
pub fn sample_chords<R: Rng + ?Sized>(
    table: &TransitionTable,
    start: &str,
    length: usize,
    key: PitchClass,
    octave: i8,
    scale_type: ScaleType,
    rng: &mut R,
) -> TheoryResult<Vec<ResolvedChord>> {
    let symbols = sample(table, start, length, rng)?;
    roman::resolve_sequence(&symbols, key, octave, scale_type)
}
