//! Stderr `tracing` subscriber.
//!
//! Standard error doubles as the diagnostic channel of the end-of-session
//! gate, so the binary keeps logging off unless asked for.

use tracing_subscriber::EnvFilter;

/// Environment variable holding a `tracing` filter directive.
pub const LOG_ENV: &str = "FROZENGATES_LOG";

/// Install the stderr subscriber for one hook invocation.
///
/// The runtime relays the stop gate's stderr to the agent verbatim, so log
/// lines share that channel with the LOC report. `level` is therefore `off`
/// unless the user passes `--log-level`; `FROZENGATES_LOG` overrides both.
/// Output is plain text without colors or timestamps. Only the first call
/// installs a subscriber.
pub fn init_subscriber(level: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .without_time()
        .compact()
        .try_init();
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
