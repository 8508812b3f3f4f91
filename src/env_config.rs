//! Shared environment configuration for binaries.
//!
//! Consolidates the `RUST_LOG`, `RAYON_NUM_THREADS` and `YATZY_RL_SEED` reads.

use crate::constants::DEFAULT_SEED;

/// Initialise `env_logger` with an `info` default, overridable via `RUST_LOG`.
/// Safe to call more than once.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
}

/// Read `RAYON_NUM_THREADS` (fallback `OMP_NUM_THREADS`, default 8).
/// Tolerates an already-initialized global pool. Returns thread count.
pub fn init_rayon_threads() -> usize {
    let num_threads = std::env::var("RAYON_NUM_THREADS")
        .or_else(|_| std::env::var("OMP_NUM_THREADS"))
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8);
    if rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()
        .is_err()
    {
        log::debug!("Rayon global pool already initialized");
    }
    log::info!("Rayon threads: {}", num_threads);
    num_threads
}

/// Read `YATZY_RL_SEED` (default 42).
pub fn default_seed() -> u64 {
    std::env::var("YATZY_RL_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_SEED)
}
