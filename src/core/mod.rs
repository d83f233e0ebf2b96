// Pickup Tracker - core/mod.rs
//
// Core business logic layer: the import pipeline, view ordering and export.
// Dependencies: standard library, chrono, calamine, rust_xlsxwriter, csv.
// Must NOT depend on: ui, platform, app.

pub mod columns;
pub mod dedupe;
pub mod export;
pub mod filter;
pub mod import;
pub mod model;
pub mod normalize;
pub mod sort;
