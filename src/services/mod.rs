// src/services/mod.rs
//
// Service layer
//
// Services own the use-case logic. They talk to the domain and to the
// repository traits, never to SQL directly.

pub mod census_service;

pub use census_service::CensusService;
