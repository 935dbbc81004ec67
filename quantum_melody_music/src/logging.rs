// Process-wide tracing subscriber for the `generate` and `server` binaries.
//
// Library code only emits `tracing` events; installing a subscriber is the
// binary's job. The filter comes from `RUST_LOG` and defaults to `info`.
// Calling `init_tracing` more than once is harmless.

use std::sync::OnceLock;

use tracing_subscriber::EnvFilter;

static INIT_GUARD: OnceLock<()> = OnceLock::new();

pub fn init_tracing() {
    INIT_GUARD.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        // Another subscriber may already be installed (e.g. by an embedding
        // process); keep it.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}
