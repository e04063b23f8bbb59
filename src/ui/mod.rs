// src/ui/mod.rs
pub mod dialog;
pub mod intake;
pub mod results;
