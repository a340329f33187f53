#![no_main]
use libfuzzer_sys::fuzz_target;

/// Fuzz `git describe` parsing and the firmware ordering key.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(fw) = board2kconf::FirmwareVersion::parse(s) {
            let _ = fw.ordering_key();
            let _ = fw.equals(&board2kconf::FirmwareComparand::Exact(fw.clone()));
        }
    }
});
