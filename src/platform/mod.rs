//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Wall-clock time (record timestamps, session seeds)
//! - The DOM renderer (web only)

#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(target_arch = "wasm32")]
pub use web::DomRenderer;

/// Milliseconds since the Unix epoch
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Milliseconds since the Unix epoch
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// Seed for a new session
pub fn session_seed() -> u64 {
    now_ms() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_is_after_2020() {
        assert!(now_ms() > 1_577_836_800_000.0);
        assert!(session_seed() > 0);
    }
}
