// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Arpeggio expansion.
//!
//! Turns a chord voicing (or any note set) into an ordered run of notes,
//! optionally spread over several octaves, with a fixed step duration.
//! Euclidean rhythms gate the run into notes and rests.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::music::element::{Element, Rest};
use crate::music::note::{Duration, Note};

/// Arpeggio pattern types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArpPattern {
    /// Play notes ascending
    #[default]
    Up,
    /// Play notes descending
    Down,
    /// Play up then down
    UpDown,
    /// Play down then up
    DownUp,
    /// Play in order notes were given
    Order,
}

impl ArpPattern {
    pub const ALL: [ArpPattern; 5] = [
        ArpPattern::Up,
        ArpPattern::Down,
        ArpPattern::UpDown,
        ArpPattern::DownUp,
        ArpPattern::Order,
    ];

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "up" => Some(ArpPattern::Up),
            "down" => Some(ArpPattern::Down),
            "updown" => Some(ArpPattern::UpDown),
            "downup" => Some(ArpPattern::DownUp),
            "order" | "asplayed" => Some(ArpPattern::Order),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ArpPattern::Up => "up",
            ArpPattern::Down => "down",
            ArpPattern::UpDown => "up-down",
            ArpPattern::DownUp => "down-up",
            ArpPattern::Order => "order",
        }
    }
}

impl fmt::Display for ArpPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Go back down without repeating either end, so a looped run doesn't
/// double the top or bottom note
fn bounce(ascending: Vec<Note>) -> Vec<Note> {
    if ascending.len() <= 2 {
        return ascending;
    }
    let inner: Vec<Note> = ascending[1..ascending.len() - 1].iter().rev().copied().collect();
    let mut run = ascending;
    run.extend(inner);
    run
}

/// Expand `notes` over `octaves` octaves (at least one) into a run ordered
/// by `pattern`, every note lasting `step`
pub fn expand(notes: &[Note], pattern: ArpPattern, octaves: u8, step: Duration) -> Vec<Note> {
    let mut sequence: Vec<Note> = (0..octaves.max(1))
        .flat_map(|offset| notes.iter().map(move |n| n.shift_octave(offset as i8)))
        .map(|n| n.with_duration(step))
        .collect();

    let run = match pattern {
        ArpPattern::Up => {
            sequence.sort_by_key(|n| n.absolute_semitone());
            sequence
        }
        ArpPattern::Down => {
            sequence.sort_by_key(|n| std::cmp::Reverse(n.absolute_semitone()));
            sequence
        }
        ArpPattern::UpDown => {
            sequence.sort_by_key(|n| n.absolute_semitone());
            bounce(sequence)
        }
        ArpPattern::DownUp => {
            sequence.sort_by_key(|n| std::cmp::Reverse(n.absolute_semitone()));
            bounce(sequence)
        }
        ArpPattern::Order => sequence,
    };
    trace!(%pattern, octaves, len = run.len(), "expanded arpeggio");
    run
}

/// Euclidean rhythm: `hits` onsets spread as evenly as possible over `steps`
pub fn euclidean(hits: usize, steps: usize) -> Vec<bool> {
    if steps == 0 {
        return vec![];
    }
    if hits >= steps {
        return vec![true; steps];
    }
    if hits == 0 {
        return vec![false; steps];
    }

    // Bjorklund's algorithm
    let mut pattern = vec![vec![true]; hits];
    let mut remainder = vec![vec![false]; steps - hits];

    while remainder.len() > 1 {
        let min_len = pattern.len().min(remainder.len());
        for i in 0..min_len {
            pattern[i].extend(remainder[i].clone());
        }
        let new_remainder: Vec<Vec<bool>> = if pattern.len() > min_len {
            pattern.drain(min_len..).collect()
        } else {
            remainder.drain(min_len..).collect()
        };
        remainder = new_remainder;
    }

    let mut result: Vec<bool> = pattern.into_iter().flatten().collect();
    for r in remainder {
        result.extend(r);
    }
    result
}

/// Lay an arpeggio run over a rhythm: each hit plays the next note of the
/// run (cycling), each miss is a rest of the same step
pub fn gate(run: &[Note], rhythm: &[bool], step: Duration) -> Vec<Element> {
    let mut next = run.iter().cycle();
    rhythm
        .iter()
        .map(|&hit| match (hit, run.is_empty()) {
            (true, false) => next
                .next()
                .map(|n| Element::Note(n.with_duration(step)))
                .unwrap_or(Element::Rest(Rest::new(step))),
            _ => Element::Rest(Rest::new(step)),
        })
        .collect()
}
