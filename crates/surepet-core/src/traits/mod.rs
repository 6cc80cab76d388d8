//! Core traits for the Sure Petcare client
//!
//! This module defines the abstract interface the rest of the system talks
//! through.
//!
//! - [`PetcareApi`]: the session-client boundary against the vendor cloud

pub mod petcare_api;

pub use petcare_api::PetcareApi;
