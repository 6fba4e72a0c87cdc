// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

use std::env;

use anyhow::{anyhow, Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use chordsmith::generators::arpeggio::{expand, ArpPattern};
use chordsmith::generators::progression;
use chordsmith::music::key::{key_for_signature, signature_of, Accidental, KeyMode};
use chordsmith::music::{analyze, roman, Chord, Note, PitchClass, ScaleType};
use chordsmith::TheoryConfig;

fn print_usage() {
    println!("chordsmith - music theory toolkit");
    println!();
    println!("Usage: chordsmith [--config <FILE>] <COMMAND> [ARGS]");
    println!();
    println!("Commands:");
    println!("  scale [ROOT] [SCALE] [OCTAVE]          Spell a scale (e.g. scale D dorian)");
    println!("  chord <SYMBOL> [OCTAVE]                Build a chord (e.g. chord Am7/E)");
    println!("  analyze <NOTE>...                      Name the chord notes form (e.g. analyze E4 G4 C5)");
    println!("  roman <KEY> <SCALE> <NUMERAL>...       Resolve numerals (e.g. roman G major ii7 V7 I)");
    println!("  signature <major|minor> <N> <sharps|flats>");
    println!("                                         Key for a signature, and its scale");
    println!("  progression [START] [LENGTH] [SEED]    Sample a progression in the default key");
    println!("  arpeggio <SYMBOL> [PATTERN] [OCTAVES]  Arpeggiate a chord (up, down, up-down, down-up, order)");
    println!();
    println!("Options:");
    println!("  --config <FILE>   Load defaults, custom scales and progression weights (YAML or TOML)");
    println!("  --help            Show this help message");
    println!();
    println!("Set RUST_LOG=debug to trace construction and analysis.");
}

fn join<T: ToString>(items: &[T]) -> String {
    items.iter().map(|i| i.to_string()).collect::<Vec<_>>().join(" ")
}

fn parse_octave(arg: Option<&String>, default: i8) -> Result<i8> {
    match arg {
        Some(text) => text
            .parse()
            .with_context(|| format!("Invalid octave: {}", text)),
        None => Ok(default),
    }
}

fn parse_pitch(text: &str) -> Result<PitchClass> {
    text.parse()
        .with_context(|| format!("Invalid root: {}", text))
}

fn show_scale(config: &TheoryConfig, args: &[String]) -> Result<()> {
    let root = match args.first() {
        Some(text) => parse_pitch(text)?,
        None => config.key()?,
    };
    let name = args.get(1).unwrap_or(&config.default_scale);
    let octave = parse_octave(args.get(2), config.default_octave)?;

    let registry = config.registry()?;
    let scale = registry.get_scale(root, name, octave)?;
    println!("{}", scale);
    println!("{}", join(scale.notes()));
    Ok(())
}

fn show_chord(config: &TheoryConfig, args: &[String]) -> Result<()> {
    let symbol = args
        .first()
        .ok_or_else(|| anyhow!("chord requires a chord symbol"))?;
    let octave = parse_octave(args.get(1), config.default_octave)?;
    let chord = Chord::parse(symbol, octave)?;
    println!("{} ({} {})", chord, chord.root(), chord.quality());
    println!("{}", join(&chord.to_notes()));
    Ok(())
}

fn show_analysis(args: &[String]) -> Result<()> {
    if args.is_empty() {
        return Err(anyhow!("analyze requires at least one note"));
    }
    let notes = args
        .iter()
        .map(|text| text.parse::<Note>())
        .collect::<Result<Vec<_>, _>>()?;
    let result = analyze(&notes)?;
    println!("{}", result);
    println!("{}", Chord::from_analysis(&result));
    Ok(())
}

fn show_roman(args: &[String]) -> Result<()> {
    if args.len() < 3 {
        return Err(anyhow!("roman requires a key, a scale and at least one numeral"));
    }
    let key = parse_pitch(&args[0])?;
    let scale_type = ScaleType::from_str(&args[1])
        .ok_or_else(|| anyhow!("Unknown scale: {}", args[1]))?;
    let chords = roman::resolve_sequence(&args[2..], key, 4, scale_type)?;
    for chord in chords {
        println!("{:<8} {}", chord.symbol, chord.to_chord());
    }
    Ok(())
}

fn show_signature(args: &[String]) -> Result<()> {
    if args.len() < 3 {
        return Err(anyhow!("signature requires a mode, a count and sharps|flats"));
    }
    let mode = KeyMode::from_str(&args[0])
        .ok_or_else(|| anyhow!("Invalid mode: {}", args[0]))?;
    let count: u8 = args[1]
        .parse()
        .with_context(|| format!("Invalid accidental count: {}", args[1]))?;
    let accidental = Accidental::from_str(&args[2])
        .ok_or_else(|| anyhow!("Invalid accidental: {}", args[2]))?;

    let tonic = key_for_signature(mode, count, accidental)?;
    let scale_type = match mode {
        KeyMode::Major => ScaleType::Major,
        KeyMode::Minor => ScaleType::NaturalMinor,
    };
    let scale = chordsmith::music::Scale::new(tonic, scale_type, 4);
    println!("{}", scale);
    println!("{}", join(&scale.pitch_classes()));
    if let Some((count, accidental)) = signature_of(tonic, mode) {
        println!("signature: {} {}", count, accidental);
    }
    Ok(())
}

fn show_progression(config: &TheoryConfig, args: &[String]) -> Result<()> {
    let start = args.first().map(String::as_str).unwrap_or("I");
    let length: usize = match args.get(1) {
        Some(text) => text
            .parse()
            .with_context(|| format!("Invalid length: {}", text))?,
        None => 8,
    };
    let mut rng = match args.get(2) {
        Some(text) => StdRng::seed_from_u64(
            text.parse()
                .with_context(|| format!("Invalid seed: {}", text))?,
        ),
        None => StdRng::from_entropy(),
    };

    let key = config.key()?;
    let scale_type = ScaleType::from_str(&config.default_scale)
        .ok_or_else(|| anyhow!("Unknown default_scale: {}", config.default_scale))?;
    let table = config.transition_table()?;
    let chords = progression::sample_chords(
        &table,
        start,
        length,
        key,
        config.default_octave,
        scale_type,
        &mut rng,
    )?;
    for chord in chords {
        println!("{:<8} {}", chord.symbol, chord.to_chord());
    }
    Ok(())
}

fn show_arpeggio(config: &TheoryConfig, args: &[String]) -> Result<()> {
    let symbol = args
        .first()
        .ok_or_else(|| anyhow!("arpeggio requires a chord symbol"))?;
    let pattern = match args.get(1) {
        Some(text) => {
            ArpPattern::from_str(text).ok_or_else(|| anyhow!("Unknown pattern: {}", text))?
        }
        None => ArpPattern::Up,
    };
    let octaves: u8 = match args.get(2) {
        Some(text) => text
            .parse()
            .with_context(|| format!("Invalid octave count: {}", text))?,
        None => 1,
    };

    let chord = Chord::parse(symbol, config.default_octave)?;
    let step = config.note(chord.root()).duration();
    let run = expand(&chord.to_notes(), pattern, octaves, step);
    println!("{} {}", chord, pattern);
    println!(
        "{}",
        run.iter()
            .map(|n| format!("{}:{}", n, n.duration().notation_token()))
            .collect::<Vec<_>>()
            .join(" ")
    );
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let mut args: Vec<String> = env::args().skip(1).collect();

    let config = match args.iter().position(|a| a == "--config") {
        Some(i) => {
            if i + 1 >= args.len() {
                eprintln!("Error: --config requires a file path");
                std::process::exit(1);
            }
            let path = args.remove(i + 1);
            args.remove(i);
            TheoryConfig::load(&path)?
        }
        None => TheoryConfig::default(),
    };

    let Some(command) = args.first() else {
        println!("chordsmith - music theory toolkit");
        println!("Run with --help for usage information");
        return Ok(());
    };
    let rest = &args[1..];

    match command.as_str() {
        "scale" => show_scale(&config, rest)?,
        "chord" => show_chord(&config, rest)?,
        "analyze" => show_analysis(rest)?,
        "roman" => show_roman(rest)?,
        "signature" => show_signature(rest)?,
        "progression" => show_progression(&config, rest)?,
        "arpeggio" => show_arpeggio(&config, rest)?,
        "--help" | "-h" | "help" => print_usage(),
        other => {
            eprintln!("Unknown command: {}", other);
            print_usage();
            std::process::exit(1);
        }
    }

    Ok(())
}
