// # Petcare API Trait
//
// Defines the session-client boundary against the vendor cloud service.
//
// ## Implementations
//
// - SureHub: `surepet-client` crate (reqwest-based)
// - Test doubles: `tests/common/mod.rs`
//
// ## Usage
//
// ```rust,ignore
// use surepet_core::PetcareApi;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let api = /* PetcareApi implementation */;
//
//     let token = api.login().await?;
//     for household in api.households(&token).await? {
//         println!("{} ({})", household.name, household.id);
//     }
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

use crate::codes::TagProfile;
use crate::error::Result;
use crate::types::{
    Device, FlapStatus, Household, Pet, PetPosition, SessionToken, TagInfo, TimelineEntry,
};

/// Trait for session-client implementations
///
/// This is the only place the system touches the network. Implementations
/// perform exactly one HTTP request per method call and surface every
/// failure to the caller unmodified.
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
///
/// # Constraints
///
/// - No retry or backoff logic; a failed request is the caller's problem
/// - No token refresh: an expired or rejected token surfaces as
///   `Error::Authentication` and the caller decides whether to log in again
/// - No caching of responses between calls
#[async_trait]
pub trait PetcareApi: Send + Sync {
    /// Authenticate and obtain a session token
    ///
    /// Performs a single login call with the configured credentials and
    /// device id. There is no token lifecycle beyond this: the returned
    /// token is used until the vendor rejects it.
    async fn login(&self) -> Result<SessionToken>;

    /// List the households the account has access to
    async fn households(&self, token: &SessionToken) -> Result<Vec<Household>>;

    /// List the devices (hubs and flaps) of a household
    async fn devices(&self, token: &SessionToken, household_id: i64) -> Result<Vec<Device>>;

    /// List the pets of a household
    async fn pets(&self, token: &SessionToken, household_id: i64) -> Result<Vec<Pet>>;

    /// Fetch the status record of a flap device
    async fn flap_status(&self, token: &SessionToken, device_id: i64) -> Result<FlapStatus>;

    /// Fetch the last known position of a pet
    async fn pet_position(&self, token: &SessionToken, pet_id: i64) -> Result<PetPosition>;

    /// Fetch the tag registrations (with per-pet profiles) of the account's
    /// flap devices
    async fn tags(&self, token: &SessionToken) -> Result<Vec<TagInfo>>;

    /// Fetch the event timeline of a household, newest first
    async fn timeline(&self, token: &SessionToken, household_id: i64)
    -> Result<Vec<TimelineEntry>>;

    /// Set the tag profile of a pet on a flap device
    ///
    /// Returns whether the vendor acknowledged the new profile.
    async fn set_tag_profile(
        &self,
        token: &SessionToken,
        device_id: i64,
        tag_id: i64,
        profile: TagProfile,
    ) -> Result<bool>;
}
