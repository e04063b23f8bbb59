// src/state/mod.rs
pub mod app_state;
pub mod intake_state;

pub use app_state::{AppEvent, Session};
pub use intake_state::{FileIntake, PendingFile};
