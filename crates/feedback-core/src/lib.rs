//! # feedback-core
//!
//! Core types, traits, and abstractions for the transit feedback service.
//!
//! This crate defines:
//! - Domain models shared across all service crates
//! - Repository traits implemented by the persistence layer
//! - The error taxonomy and `Result` alias
//! - The priority classifier applied to every submission

pub mod error;
pub mod models;
pub mod priority;
pub mod traits;

pub use error::{Error, Result};
pub use models::*;
pub use priority::classify;
pub use traits::*;
