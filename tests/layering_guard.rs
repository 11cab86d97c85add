//! Layering guardrails to keep the allocation engine free of IO and format concerns.
//!
//! `tagwright_core` must stay a pure engine: parsing libraries, serialization and CLI crates belong to
//! the `tagwright` crate. This test scans the core crate's `Cargo.toml` and fails if one of them
//! appears in `[dependencies]`.

const FORBIDDEN: &[&str] = &["regex", "serde", "serde_json", "clap", "tracing-subscriber"];

#[test]
fn core_does_not_depend_on_io_crates() {
    let manifest = include_str!("../crates/tagwright_core/Cargo.toml");
    let mut in_dependencies = false;

    for raw_line in manifest.lines() {
        let line = raw_line.trim();
        // Track when we enter/exit the `[dependencies]` table.
        if line.starts_with('[') {
            if line == "[dependencies]" {
                in_dependencies = true;
                continue;
            }
            if in_dependencies {
                break;
            }
        }

        if !in_dependencies || line.is_empty() || line.starts_with('#') {
            continue;
        }

        let name = line.split(['=', ' ']).next().unwrap_or("").trim();
        if FORBIDDEN.contains(&name) {
            panic!("`{name}` must not appear in tagwright_core [dependencies]");
        }
    }
}
