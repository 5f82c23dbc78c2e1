//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `foodme_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("foodme_core ping={}", foodme_core::ping());
    println!("foodme_core version={}", foodme_core::core_version());
}
