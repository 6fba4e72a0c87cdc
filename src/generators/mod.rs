// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Consumers of the theory core.
//!
//! Arpeggio expansion, weighted progression sampling, and a flat MIDI event
//! view of element sequences for players and exporters.

pub mod arpeggio;
pub mod progression;

use tracing::warn;

use crate::music::element::Element;
use crate::music::note::{Duration, MidiNote};

/// Default ticks per quarter note
pub const DEFAULT_PPQN: u32 = 24;

/// MIDI event produced from an element sequence
#[derive(Debug, Clone, PartialEq)]
pub struct MidiEvent {
    /// MIDI note number (0-127)
    pub note: MidiNote,
    /// Velocity (0-127)
    pub velocity: u8,
    /// Start time in ticks from the first element
    pub start_tick: u64,
    /// Duration in ticks
    pub duration_ticks: u64,
    /// MIDI channel (0-15)
    pub channel: u8,
}

impl MidiEvent {
    /// Create a new MIDI event
    pub fn new(note: MidiNote, velocity: u8, start_tick: u64, duration_ticks: u64) -> Self {
        Self {
            note,
            velocity,
            start_tick,
            duration_ticks,
            channel: 0,
        }
    }

    /// Set the channel for this event
    pub fn with_channel(mut self, channel: u8) -> Self {
        self.channel = channel;
        self
    }
}

/// Ticks for a duration at `ppqn` ticks per quarter note
pub fn duration_ticks(duration: Duration, ppqn: u32) -> u64 {
    (duration.value() * 4.0 * ppqn as f64).round() as u64
}

/// Lay elements end to end as MIDI events.
///
/// Chord tones start together; arpeggio notes and plain notes follow one
/// another. Each element advances time by its own duration. Notes outside
/// the MIDI range are skipped with a warning.
pub fn to_events(elements: &[Element], ppqn: u32) -> Vec<MidiEvent> {
    let mut events = Vec::new();
    let mut tick = 0u64;

    for element in elements {
        let simultaneous = matches!(element, Element::Chord(_));
        let mut offset = 0u64;
        for note in element.to_notes() {
            let length = duration_ticks(note.duration(), ppqn);
            match note.midi_number() {
                Some(number) => events.push(
                    MidiEvent::new(number, note.velocity(), tick + offset, length)
                        .with_channel(note.channel()),
                ),
                None => warn!(note = %note, "note outside MIDI range, skipped"),
            }
            if !simultaneous {
                offset += length;
            }
        }
        tick += duration_ticks(element.duration(), ppqn);
    }
    events
}
