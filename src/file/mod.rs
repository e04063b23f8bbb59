// src/file/mod.rs
pub mod export;
