// src/domain/bird_count/mod.rs

pub mod entity;
pub mod invariants;

pub use entity::BirdCount;
pub use invariants::validate_time_range;
