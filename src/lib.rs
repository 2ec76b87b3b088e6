// Rust Countdown Library
// Exports all modules for testing and reuse

pub mod services;
pub mod utils;
