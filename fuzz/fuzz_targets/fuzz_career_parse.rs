//! Fuzz target for the career text format.
//!
//! Parsing must never panic, and anything that parses must survive a
//! render-and-reparse round trip.

#![no_main]

use hz_core::career::Career;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    if let Ok(career) = Career::parse(data) {
        let reparsed = Career::parse(&career.to_text()).expect("rendered career parses");
        assert_eq!(reparsed, career);
        let _ = career.stats();
    }
});
