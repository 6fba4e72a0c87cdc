// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Musical elements a renderer or exporter walks over.
//!
//! A closed set: a single note, a chord, a rest or an arpeggio. Each answers
//! its duration, a short text form and the notes it sounds.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::generators::arpeggio::{expand, ArpPattern};
use crate::music::chord::Chord;
use crate::music::note::{Duration, Note};

/// Silence of a given length
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rest {
    duration: Duration,
}

impl Rest {
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}

/// A chord voicing played one note at a time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arpeggio {
    chord: Chord,
    pattern: ArpPattern,
    octaves: u8,
    step: Duration,
}

impl Arpeggio {
    pub fn new(chord: Chord, pattern: ArpPattern, octaves: u8, step: Duration) -> Self {
        Self {
            chord,
            pattern,
            octaves: octaves.max(1),
            step,
        }
    }

    pub fn chord(&self) -> &Chord {
        &self.chord
    }

    pub fn pattern(&self) -> ArpPattern {
        self.pattern
    }

    pub fn octaves(&self) -> u8 {
        self.octaves
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    /// The run, in playing order
    pub fn notes(&self) -> Vec<Note> {
        expand(&self.chord.to_notes(), self.pattern, self.octaves, self.step)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Element {
    Note(Note),
    Chord(Chord),
    Rest(Rest),
    Arpeggio(Arpeggio),
}

impl Element {
    /// How long the element lasts. Chord tones sound together, so a chord
    /// lasts as long as its longest tone; an arpeggio lasts one step per note.
    pub fn duration(&self) -> Duration {
        match self {
            Element::Note(note) => note.duration(),
            Element::Chord(chord) => chord
                .to_notes()
                .iter()
                .map(|n| n.duration())
                .fold(Duration::ZERO, |longest, d| if d > longest { d } else { longest }),
            Element::Rest(rest) => rest.duration(),
            Element::Arpeggio(arp) => arp.step().times(arp.notes().len()),
        }
    }

    /// Every note the element sounds, in order. Rests sound none.
    pub fn to_notes(&self) -> Vec<Note> {
        match self {
            Element::Note(note) => vec![*note],
            Element::Chord(chord) => chord.to_notes(),
            Element::Rest(_) => Vec::new(),
            Element::Arpeggio(arp) => arp.notes(),
        }
    }

    pub fn is_rest(&self) -> bool {
        matches!(self, Element::Rest(_))
    }
}

impl From<Note> for Element {
    fn from(note: Note) -> Self {
        Element::Note(note)
    }
}

impl From<Chord> for Element {
    fn from(chord: Chord) -> Self {
        Element::Chord(chord)
    }
}

impl From<Rest> for Element {
    fn from(rest: Rest) -> Self {
        Element::Rest(rest)
    }
}

impl From<Arpeggio> for Element {
    fn from(arp: Arpeggio) -> Self {
        Element::Arpeggio(arp)
    }
}

impl fmt::Display for Element {
    /// Text form with a notation duration token: `C#4:8`, `Am7:4`, `r:2`,
    /// `C/up:16`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Note(note) => write!(f, "{}:{}", note, note.duration().notation_token()),
            Element::Chord(chord) => write!(f, "{}:{}", chord, self.duration().notation_token()),
            Element::Rest(rest) => write!(f, "r:{}", rest.duration().notation_token()),
            Element::Arpeggio(arp) => write!(
                f,
                "{}/{}:{}",
                arp.chord(),
                arp.pattern(),
                arp.step().notation_token()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::music::chord::ChordQuality;
    use crate::music::pitch::PitchClass;

    #[test]
    fn test_note_element() {
        let note = Note::new(PitchClass::Cs, 4).with_duration(Duration::EIGHTH);
        let element = Element::from(note);
        assert_eq!(element.duration(), Duration::EIGHTH);
        assert_eq!(element.to_notes(), vec![note]);
        assert_eq!(element.to_string(), "C#4:8");
    }

    #[test]
    fn test_chord_element() {
        let chord = Chord::new(PitchClass::A, ChordQuality::MinorSeventh, 3);
        let element = Element::from(chord.clone());
        assert_eq!(element.duration(), Duration::QUARTER);
        assert_eq!(element.to_notes(), chord.to_notes());
        assert_eq!(element.to_string(), "Am7:4");
    }

    #[test]
    fn test_rest_element() {
        let element = Element::from(Rest::new(Duration::HALF));
        assert!(element.is_rest());
        assert!(element.to_notes().is_empty());
        assert_eq!(element.duration(), Duration::HALF);
        assert_eq!(element.to_string(), "r:2");
    }

    #[test]
    fn test_arpeggio_element() {
        let chord = Chord::new(PitchClass::C, ChordQuality::Major, 4);
        let arp = Arpeggio::new(chord, ArpPattern::Up, 2, Duration::SIXTEENTH);
        let element = Element::from(arp);
        assert_eq!(element.to_notes().len(), 6);
        assert_eq!(element.duration(), Duration::SIXTEENTH.times(6));
        assert_eq!(element.to_string(), "C/up:16");
    }
    #[test]
    fn test_elements_yaml_round_trip() {
        let elements = vec![
            Element::from(Note::new(PitchClass::Eb, 3).with_duration(Duration::EIGHTH)),
            Element::from(Chord::new(PitchClass::G, ChordQuality::DominantSeventh, 3).with_inversion(1)),
            Element::from(Rest::new(Duration::QUARTER)),
            Element::from(Arpeggio::new(
                Chord::new(PitchClass::D, ChordQuality::Minor, 4),
                ArpPattern::DownUp,
                2,
                Duration::SIXTEENTH,
            )),
        ];
        let yaml = serde_yaml::to_string(&elements).unwrap();
        assert!(yaml.contains("type: arpeggio"));
        let parsed: Vec<Element> = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, elements);
    }
}
