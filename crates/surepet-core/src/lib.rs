// # surepet-core
//
// Core library for the Sure Petcare cloud client.
//
// ## Architecture Overview
//
// This library provides everything except the HTTP transport:
// - **codes**: decoding of the vendor's integer status codes (lock state,
//   event type, movement type) into typed enums and labels
// - **types**: serde data model for the vendor's wire format
// - **PetcareApi**: trait boundary for the session client; the reqwest
//   implementation lives in the `surepet-client` crate
// - **config**: client configuration with validation
// - **error**: the crate-wide error type
//
// ## Design Principles
//
// 1. **Forward compatibility**: unknown status codes decode to an explicit
//    unknown outcome, never an error — new firmware introduces codes at will
// 2. **Thin boundary**: one HTTP request per API call, no retries, no
//    caching; failures surface to the caller unmodified
// 3. **Library-First**: the CLI is one consumer, not the API

pub mod codes;
pub mod config;
pub mod error;
pub mod traits;
pub mod types;

// Re-export core types for convenience
pub use codes::{CodeSpace, Decoded, EventKind, LockMode, MovementKind, decode};
pub use config::{ApiConfig, Credentials, SurepetConfig};
pub use error::{Error, Result};
pub use traits::PetcareApi;
pub use types::{
    Device, FlapStatus, Household, Pet, PetPosition, SessionToken, TimelineEntry,
};
