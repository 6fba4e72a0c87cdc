// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Configuration for chordsmith.
//!
//! Defaults applied to built notes, custom scale definitions, and an
//! optional progression table. Read from YAML or TOML; every field has a
//! default so an empty file is valid.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::generators::progression::TransitionTable;
use crate::music::note::{Duration, Note, DEFAULT_OCTAVE, DEFAULT_VELOCITY};
use crate::music::pitch::PitchClass;
use crate::music::scale::{CustomScaleDefinition, ScaleRegistry};

/// Root configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TheoryConfig {
    /// Key used when none is given (e.g., "C", "Bb", "F#")
    #[serde(default = "default_key")]
    pub default_key: String,
    /// Scale used when none is given (e.g., "major", "dorian")
    #[serde(default = "default_scale")]
    pub default_scale: String,
    /// Octave of roots built without one
    #[serde(default = "default_octave")]
    pub default_octave: i8,
    /// Note length in whole notes (0.25 = quarter)
    #[serde(default = "default_duration")]
    pub default_duration: f64,
    /// Velocity (0-127)
    #[serde(default = "default_velocity")]
    pub default_velocity: u8,
    /// MIDI channel (0-15)
    #[serde(default)]
    pub default_channel: u8,
    /// Extra named scales
    #[serde(default)]
    pub scales: Vec<CustomScaleDefinition>,
    /// Weighted transitions `{ from: { to: weight } }` replacing the
    /// built-in functional table
    #[serde(default)]
    pub progression: Option<BTreeMap<String, BTreeMap<String, f64>>>,
}

fn default_key() -> String {
    "C".to_string()
}
fn default_scale() -> String {
    "major".to_string()
}
fn default_octave() -> i8 {
    DEFAULT_OCTAVE
}
fn default_duration() -> f64 {
    Duration::QUARTER.value()
}
fn default_velocity() -> u8 {
    DEFAULT_VELOCITY
}

impl Default for TheoryConfig {
    fn default() -> Self {
        Self {
            default_key: default_key(),
            default_scale: default_scale(),
            default_octave: default_octave(),
            default_duration: default_duration(),
            default_velocity: default_velocity(),
            default_channel: 0,
            scales: Vec::new(),
            progression: None,
        }
    }
}

impl TheoryConfig {
    /// Load a configuration file; `.toml` files are read as TOML, anything
    /// else as YAML
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        let config = if is_toml {
            Self::from_toml(&contents)
        } else {
            Self::from_yaml(&contents)
        };
        config.with_context(|| format!("Invalid config file: {:?}", path))
    }

    /// Parse a configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty document deserializes as unit, not as an empty map
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).context("Failed to parse YAML configuration")
    }

    /// Parse a configuration from TOML string
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse TOML configuration")
    }

    /// Serialize to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize configuration to YAML")
    }

    /// The configured default key
    pub fn key(&self) -> Result<PitchClass> {
        self.default_key
            .parse()
            .with_context(|| format!("Invalid default_key '{}'", self.default_key))
    }

    /// The configured note defaults, applied to a pitch
    pub fn note(&self, pitch: PitchClass) -> Note {
        Note::new(pitch, self.default_octave)
            .with_duration(Duration::new(self.default_duration))
            .with_velocity(self.default_velocity)
            .with_channel(self.default_channel)
    }

    /// Built-in scales plus every configured custom scale
    pub fn registry(&self) -> Result<ScaleRegistry> {
        let mut registry = ScaleRegistry::new();
        for def in &self.scales {
            registry
                .register(def)
                .with_context(|| format!("Invalid custom scale '{}'", def.name))?;
        }
        if registry.get_scale(PitchClass::C, &self.default_scale, 4).is_err() {
            return Err(anyhow!("Unknown default_scale '{}'", self.default_scale));
        }
        Ok(registry)
    }

    /// The configured progression table, or the functional default
    pub fn transition_table(&self) -> Result<TransitionTable> {
        match &self.progression {
            Some(weights) => {
                TransitionTable::from_weights(weights).context("Invalid progression table")
            }
            None => Ok(TransitionTable::functional()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_config() {
        let yaml = r#"
default_key: "Bb"
default_scale: dorian
default_octave: 3
default_duration: 0.125
default_velocity: 90
default_channel: 2

scales:
  - name: "hirajoshi"
    intervals: [0, 2, 3, 7, 8]

progression:
  ii:
    V: 1.0
  V:
    I: 3.0
    vi: 1.0
  I:
    ii: 1.0
  vi:
    ii: 1.0
"#;

        let config = TheoryConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.key().unwrap(), PitchClass::Bb);
        assert_eq!(config.default_scale, "dorian");
        assert_eq!(config.default_octave, 3);
        assert_eq!(config.scales.len(), 1);
        assert_eq!(config.scales[0].intervals, vec![0, 2, 3, 7, 8]);

        let note = config.note(PitchClass::F);
        assert_eq!(note.octave(), 3);
        assert_eq!(note.duration(), Duration::EIGHTH);
        assert_eq!(note.velocity(), 90);
        assert_eq!(note.channel(), 2);

        let table = config.transition_table().unwrap();
        assert!(table.allows("V", "vi"));
        assert!(!table.allows("V", "IV"));
    }

    #[test]
    fn test_parse_toml_config() {
        let text = r#"
default_key = "D"
default_octave = 5

[[scales]]
name = "pelog"
intervals = [0, 1, 3, 7, 8]

[progression.I]
V = 1.0

[progression.V]
I = 1.0
"#;

        let config = TheoryConfig::from_toml(text).unwrap();
        assert_eq!(config.key().unwrap(), PitchClass::D);
        assert_eq!(config.default_octave, 5);
        assert_eq!(config.default_velocity, 100);

        let registry = config.registry().unwrap();
        let pelog = registry.get_scale(PitchClass::D, "pelog", 4).unwrap();
        assert_eq!(pelog.len(), 5);
        assert!(config.transition_table().is_ok());
    }

    #[test]
    fn test_default_values() {
        for config in [
            TheoryConfig::from_yaml("").unwrap(),
            TheoryConfig::from_yaml("default_channel: 0").unwrap(),
            TheoryConfig::from_toml("").unwrap(),
        ] {
            assert_eq!(config, TheoryConfig::default());
        }

        let config = TheoryConfig::default();
        assert_eq!(config.key().unwrap(), PitchClass::C);
        assert_eq!(config.default_octave, 4);
        assert_eq!(config.default_duration, 0.25);
        assert_eq!(config.default_velocity, 100);
        assert_eq!(config.transition_table().unwrap(), TransitionTable::functional());
    }

    #[test]
    fn test_round_trip() {
        let original = TheoryConfig {
            default_key: "G".to_string(),
            default_scale: "mixolydian".to_string(),
            scales: vec![CustomScaleDefinition {
                name: "prometheus".to_string(),
                intervals: vec![0, 2, 4, 6, 9, 10],
            }],
            ..Default::default()
        };

        let yaml = original.to_yaml().unwrap();
        let parsed = TheoryConfig::from_yaml(&yaml).unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_invalid_values_are_reported() {
        let config = TheoryConfig::from_yaml("default_key: H").unwrap();
        assert!(config.key().is_err());

        let config = TheoryConfig::from_yaml("default_scale: nonsense").unwrap();
        assert!(config.registry().is_err());

        let yaml = r#"
scales:
  - name: "broken"
    intervals: [3, 1]
"#;
        let config = TheoryConfig::from_yaml(yaml).unwrap();
        let err = config.registry().unwrap_err();
        assert!(err.to_string().contains("broken"));

        let yaml = r#"
progression:
  I:
    IX: 1.0
"#;
        let config = TheoryConfig::from_yaml(yaml).unwrap();
        assert!(config.transition_table().is_err());
    }

    #[test]
    fn test_malformed_text() {
        assert!(TheoryConfig::from_yaml("this is not valid yaml: [").is_err());
        assert!(TheoryConfig::from_toml("default_octave = \"high\"").is_err());
    }
}
