// Pickup Tracker - ui/panels/mod.rs

pub mod about;
pub mod records;
pub mod summary;
pub mod toolbar;
