#![no_main]
use libfuzzer_sys::fuzz_target;

/// Fuzz requirement-line parsing and evaluation.
///
/// Feeds arbitrary UTF-8 to the dependency parser and evaluates whatever
/// parses against a fixed distribution.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(dep) = s.parse::<board2kconf::Dependency>() {
            let dist = board2kconf::Distribution::new(
                dep.distro_name.clone(),
                board2kconf::VersionNumber::parse_or_literal("1.0"),
            );
            let _ = dep.satisfied_by(&dist);
        }
    }
});
