#![no_main]
use libfuzzer_sys::fuzz_target;

/// Fuzz the version grammar.
///
/// Every string that parses must display and compare equal to itself.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(version) = board2kconf::VersionNumber::parse(s) {
            let _ = version.to_string();
            assert!(version.equals(&version));
        }
    }
});
