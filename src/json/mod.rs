//! Purpose: JSON/YAML decoding boundary that turns text into `Data`.
//! Exports: `parse` entrypoints and failure categorization, `yaml` normalization.
//! Role: Single seam for parser implementation so callsites avoid ad hoc decode logic.
//! Invariants: Both front-ends converge on the same `RawValue` representation.
//! Invariants: Helper APIs stay small and deterministic (no hidden global state).

pub mod parse;
pub mod yaml;
