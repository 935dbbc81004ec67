// CLI entry point for the quantum melody HTTP server.
//
// Serves `POST /generate_music` until the process is killed. See
// `server.rs` for the worker pool and `handler.rs` for request handling.
//
// Usage:
//   server [OPTIONS]
//     --host <HOST>        Bind address (default: 127.0.0.1)
//     --port <PORT>        Listen port (default: 5000)
//     --workers <N>        Worker threads (default: 4)
//     --config <PATH>      JSON file overriding MelodyConfig fields

use std::path::Path;

use quantum_melody_music::MelodyConfig;
use quantum_melody_music::logging::init_tracing;
use quantum_melody_server::server::{ServerConfig, start_server};

fn main() {
    init_tracing();
    let config = parse_args();

    let (handle, addr) = match start_server(config) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Failed to start server: {e}");
            std::process::exit(1);
        }
    };

    println!("Serving on http://{addr}/generate_music");
    println!("Press Ctrl+C to stop.");

    // Workers run until the process exits; SIGINT/SIGTERM end it directly.
    handle.wait();
}

/// Parse command-line arguments into a `ServerConfig`. Plain
/// `std::env::args()` matching.
fn parse_args() -> ServerConfig {
    let mut config = ServerConfig::default();
    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "--host" => {
                i += 1;
                config.host = args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--host requires a value");
                    std::process::exit(1);
                });
            }
            "--port" => {
                i += 1;
                config.port = args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                    eprintln!("--port requires a valid port number");
                    std::process::exit(1);
                });
            }
            "--workers" => {
                i += 1;
                config.workers = args
                    .get(i)
                    .and_then(|s| s.parse().ok())
                    .filter(|&n: &usize| n > 0)
                    .unwrap_or_else(|| {
                        eprintln!("--workers requires a positive number");
                        std::process::exit(1);
                    });
            }
            "--config" => {
                i += 1;
                let Some(path) = args.get(i) else {
                    eprintln!("--config requires a path");
                    std::process::exit(1);
                };
                config.melody = MelodyConfig::load(Path::new(path)).unwrap_or_else(|e| {
                    eprintln!("{e}");
                    std::process::exit(1);
                });
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {other}");
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    config
}

fn print_usage() {
    println!("Usage: server [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --host <HOST>        Bind address (default: 127.0.0.1)");
    println!("  --port <PORT>        Listen port (default: 5000)");
    println!("  --workers <N>        Worker threads (default: 4)");
    println!("  --config <PATH>      JSON file overriding MelodyConfig fields");
    println!("  --help, -h           Show this help");
}
