// Quantum Melody generator CLI entry point.
//
// Builds the circuit for an emotion, samples it, maps the outcomes to a
// melody, and writes the melody to a MIDI file.
//
// Usage:
//   cargo run -p quantum_melody_music -- [output.mid] [--emotion E] [--seed N]
//     [--config PATH] [--json]
//
// Emotions: happy, sad, calm; anything else plays the mixed preset.
// With --json the full response object (melody, base64 MIDI, message) is
// printed to stdout instead of the step-by-step report.

use std::path::Path;

use quantum_melody_music::logging::init_tracing;
use quantum_melody_music::midi::{MidiRenderer, SmfRenderer, write_midi};
use quantum_melody_music::pipeline::{MelodyRequest, generate, generate_melody};
use quantum_melody_music::{MelodyConfig, MusicError};
use quantum_melody_sim::prng::ShotRng;

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return;
    }

    let output_path = args
        .get(1)
        .filter(|s| !s.starts_with("--"))
        .map(|s| s.as_str())
        .unwrap_or("melody.mid");
    let emotion: String = parse_flag(&args, "--emotion").unwrap_or_else(|| "happy".to_string());
    let seed: Option<u64> = parse_flag(&args, "--seed");
    let config_path: Option<String> = parse_flag(&args, "--config");
    let json = args.iter().any(|a| a == "--json");

    let config = match config_path {
        Some(path) => MelodyConfig::load(Path::new(&path)).unwrap_or_else(|e| fail(e)),
        None => MelodyConfig::default(),
    };

    let mut rng = match seed {
        Some(s) => ShotRng::new(s),
        None => ShotRng::from_entropy().unwrap_or_else(|e| {
            eprintln!("Error: could not seed from OS entropy: {e}");
            std::process::exit(1);
        }),
    };
    let renderer = SmfRenderer::from_config(&config);

    if json {
        let response = generate(&MelodyRequest::new(emotion), &config, &mut rng, &renderer)
            .unwrap_or_else(|e| fail(e));
        match serde_json::to_string_pretty(&response) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("Failed to encode response: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    println!("=== Quantum Melody Generator ===");
    println!("Emotion: {emotion}");
    println!("Output: {output_path}");
    println!("Shots: {} -> up to {} notes", config.shots, config.target_length);
    if let Some(s) = seed {
        println!("Seed: {s}");
    }
    println!();

    println!("[1/3] Simulating circuit...");
    let generation = generate_melody(&emotion, &config, &mut rng).unwrap_or_else(|e| fail(e));
    println!("  Circuit: {}", generation.circuit);
    println!("  Counts: {}", generation.histogram);

    println!("[2/3] Mapping outcomes to notes...");
    let names: Vec<&str> = generation.melody.iter().map(|p| p.name()).collect();
    println!("  Melody ({} notes): {}", names.len(), names.join(" "));

    println!("[3/3] Writing MIDI to {output_path}...");
    if let Err(e) = write_midi(
        &renderer as &dyn MidiRenderer,
        &generation.melody,
        config.note_beats,
        Path::new(output_path),
    ) {
        fail(e);
    }
    let seconds =
        generation.melody.len() as f64 * config.note_beats * 60.0 / config.tempo_bpm as f64;
    println!("  Done! Duration: {seconds:.1}s");
    println!();
    println!("Play with: timidity {output_path} (or any MIDI player)");
}

fn fail(e: MusicError) -> ! {
    eprintln!("Error: {e}");
    std::process::exit(1);
}

fn print_usage() {
    println!("Usage: generate [output.mid] [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --emotion <E>      happy, sad, calm, or anything else (default: happy)");
    println!("  --seed <N>         Seed for reproducible sampling");
    println!("  --config <PATH>    JSON file overriding MelodyConfig fields");
    println!("  --json             Print the response object instead of writing a file");
    println!("  --help, -h         Show this help");
}

fn parse_flag<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|v| v.parse().ok())
}
