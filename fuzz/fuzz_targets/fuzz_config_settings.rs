//! Fuzz target for settings file parsing and validation.

#![no_main]

use hz_config::{validate_settings, Settings};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Parsing and validation report errors, never panic.
    if let Ok(settings) = serde_json::from_slice::<Settings>(data) {
        let _ = validate_settings(&settings);
    }
});
