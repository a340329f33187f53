//! Benchmarks for version parsing and requirement evaluation.

use board2kconf::{Dependency, Distribution, FirmwareVersion, RequirementSpecifier, VersionNumber};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

const VERSIONS: &[&str] = &[
    "1.2.3",
    "2!1.0rc1",
    "1.0.post2",
    "1.0.dev1+local.1",
    "0.12.0.post3.dev4",
];

fn benchmark_version_parse(c: &mut Criterion) {
    c.bench_function("parse_versions", |b| {
        b.iter(|| {
            for v in VERSIONS {
                black_box(VersionNumber::parse(black_box(v)).ok());
            }
        });
    });
}

fn benchmark_describe_parse(c: &mut Criterion) {
    c.bench_function("parse_describe", |b| {
        b.iter(|| {
            black_box(FirmwareVersion::parse(black_box("v0.12.0-45-gdeadbee-dirty")).ok());
        });
    });
}

fn benchmark_requirements(c: &mut Criterion) {
    let specs: Vec<RequirementSpecifier> = [">= 1.0", "!= 1.5", "< 3", "== 2.0.0"]
        .iter()
        .filter_map(|s| s.parse().ok())
        .collect();
    let candidate = VersionNumber::parse_or_literal("2.0.0");
    c.bench_function("evaluate_specifiers", |b| {
        b.iter(|| {
            for spec in &specs {
                black_box(spec.satisfied_by(black_box(&candidate)).ok());
            }
        });
    });

    let dep: Option<Dependency> = "urwid[curses] (>=2.1, !=2.1.1); python_version >= '3.8'"
        .parse()
        .ok();
    let dist = Distribution::new("urwid", VersionNumber::parse_or_literal("2.2"));
    c.bench_function("dependency_line", |b| {
        b.iter(|| {
            if let Some(dep) = &dep {
                black_box(dep.satisfied_by(black_box(&dist)).ok());
            }
        });
    });
}

criterion_group!(
    benches,
    benchmark_version_parse,
    benchmark_describe_parse,
    benchmark_requirements
);
criterion_main!(benches);
