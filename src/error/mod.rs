// src/error/mod.rs
//
// Crate-wide error handling

pub mod types;

pub use types::{AppError, AppResult};
