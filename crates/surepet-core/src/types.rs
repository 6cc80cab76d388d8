//! Wire data model for the Sure Petcare cloud API
//!
//! Every response body is wrapped in a `{"data": ...}` envelope. Status
//! codes stay raw `i64` fields here; the typed views live in [`crate::codes`]
//! and are reached through the helper methods so an unrecognized code is
//! always representable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::codes::{
    CodeSpace, Decoded, Direction, EventKind, LockMode, PetLocation, ProductKind, decode,
};

/// Generic `{"data": ...}` response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// The wrapped payload
    pub data: T,
}

/// Bearer token returned by the login endpoint
///
/// The Debug implementation intentionally does NOT expose the token value.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wrap a raw token string
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for building an Authorization header
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SessionToken").field(&"<REDACTED>").finish()
    }
}

/// A household associated with the account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Household {
    pub id: i64,
    pub name: String,
    /// Olson timezone info, present when requested with `with[]=timezone`
    #[serde(default)]
    pub timezone: Option<TimezoneInfo>,
}

/// Timezone data attached to a household
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimezoneInfo {
    /// Olson timezone name, e.g. "Europe/Berlin"
    pub timezone: String,
    /// Offset from UTC in seconds
    #[serde(default)]
    pub utc_offset: i64,
}

/// A device (hub or flap) registered to a household
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    pub id: i64,
    pub name: String,
    pub product_id: i64,
}

impl Device {
    /// Typed product view, `None` for product ids we do not know
    pub fn product(&self) -> Option<ProductKind> {
        ProductKind::from_code(self.product_id)
    }

    /// Whether this device is a pet or cat flap
    pub fn is_flap(&self) -> bool {
        self.product().is_some_and(ProductKind::is_flap)
    }
}

/// A pet registered to a household
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pet {
    pub id: i64,
    pub name: String,
    pub tag_id: i64,
    #[serde(default)]
    pub photo: Option<Photo>,
}

/// Pet photo metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Photo {
    /// URL of the photo
    pub location: String,
}

/// Status record of a flap device
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlapStatus {
    /// Sum voltage of the four batteries
    #[serde(default)]
    pub battery: f64,
    #[serde(default)]
    pub online: bool,
    pub locking: Locking,
}

/// Lock section of a flap status record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Locking {
    /// Raw lock mode code, see [`LockMode`]
    pub mode: i64,
    /// Curfew sub-state, only meaningful in curfew mode
    #[serde(default)]
    pub curfew: Option<CurfewState>,
}

/// Curfew sub-state of the lock section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurfewState {
    /// Whether the curfew currently keeps the flap locked
    pub locked: bool,
    /// Daily lock time as "HH:MM"
    #[serde(default)]
    pub lock_time: Option<String>,
    /// Daily unlock time as "HH:MM"
    #[serde(default)]
    pub unlock_time: Option<String>,
}

impl FlapStatus {
    /// Typed lock mode view, `None` for codes we do not know
    pub fn lock_mode(&self) -> Option<LockMode> {
        LockMode::from_code(self.locking.mode)
    }

    /// Decode the raw lock code against the documented table
    pub fn decode_lock(&self) -> Decoded {
        decode(CodeSpace::LockState, self.locking.mode)
    }

    /// Whether the flap is currently locked in at least one direction
    ///
    /// In curfew mode the answer comes from the curfew record; `None` when
    /// the lock code is unrecognized or the curfew state is missing.
    pub fn locked(&self) -> Option<bool> {
        match self.lock_mode()? {
            LockMode::Unlocked => Some(false),
            LockMode::KeepPetsIn | LockMode::KeepPetsOut | LockMode::LockedBoth => Some(true),
            LockMode::Curfew => self.locking.curfew.as_ref().map(|c| c.locked),
        }
    }

    /// Curfew-aware lock description for display
    pub fn describe_lock(&self) -> String {
        match self.lock_mode() {
            Some(LockMode::Curfew) => match self.locking.curfew.as_ref() {
                Some(c) if c.locked => "Locked with curfew".to_string(),
                Some(_) => "Unlocked with curfew".to_string(),
                None => "Curfew enabled but state unknown".to_string(),
            },
            Some(mode) => mode.label().to_string(),
            None => self.decode_lock().to_string(),
        }
    }

    /// Voltage per battery, assuming the usual four cells
    ///
    /// Alkalines are generally due for replacement below ~1.2 V.
    pub fn battery_per_cell(&self) -> f64 {
        self.battery / 4.0
    }
}

/// Last reported position of a pet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PetPosition {
    #[serde(default)]
    pub tag_id: i64,
    /// Raw location code, see [`PetLocation`]
    #[serde(rename = "where")]
    pub where_code: i64,
    /// When the position was established
    #[serde(default)]
    pub since: Option<DateTime<Utc>>,
}

impl PetPosition {
    /// Typed location view, `None` for codes we do not know
    pub fn location(&self) -> Option<PetLocation> {
        PetLocation::from_code(self.where_code)
    }

    /// Location label for display, "Unknown" for unrecognized codes
    ///
    /// The chip reader sometimes misses a fast exit, so "Inside" can lag
    /// reality; the official app has the same limitation.
    pub fn describe(&self) -> &'static str {
        match self.location() {
            Some(loc) => loc.label(),
            None => "Unknown",
        }
    }
}

/// One entry of the household timeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub id: i64,
    /// Raw event type code, see [`EventKind`]
    #[serde(rename = "type")]
    pub kind: i64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Movement records attached to movement events
    #[serde(default)]
    pub movements: Vec<Movement>,
}

impl TimelineEntry {
    /// Typed event view, `None` for codes we do not know
    pub fn event(&self) -> Option<EventKind> {
        EventKind::from_code(self.kind)
    }

    /// Decode the raw event code against the documented table
    pub fn decode_event(&self) -> Decoded {
        decode(CodeSpace::EventType, self.kind)
    }

    /// Whether this entry is a registered-animal movement of the given tag
    pub fn is_movement_of(&self, tag_id: i64) -> bool {
        self.event() == Some(EventKind::RegisteredMovement)
            && self.movements.first().is_some_and(|m| m.tag_id == tag_id)
    }
}

/// Tag registration on a flap device, carrying the per-pet profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagInfo {
    /// Tag id, matching `Pet::tag_id`
    pub id: i64,
    /// Raw profile code, see [`crate::codes::TagProfile`]
    pub profile: i64,
}

impl TagInfo {
    /// Typed profile view, `None` for codes we do not know
    pub fn profile(&self) -> Option<crate::codes::TagProfile> {
        crate::codes::TagProfile::from_code(self.profile)
    }
}

/// A single animal crossing inside a timeline entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movement {
    pub tag_id: i64,
    /// Raw direction code, see [`Direction`]
    pub direction: i64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Movement {
    /// Typed direction view, `None` for codes we do not know
    pub fn direction(&self) -> Option<Direction> {
        Direction::from_code(self.direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_token_debug_is_redacted() {
        let token = SessionToken::new("super-secret-bearer");
        let debug = format!("{:?}", token);
        assert!(!debug.contains("super-secret-bearer"));
        assert!(debug.contains("REDACTED"));
        assert_eq!(token.as_str(), "super-secret-bearer");
    }

    #[test]
    fn deserialize_login_envelope() {
        let body = r#"{"data":{"token":"abc.def.ghi"}}"#;

        #[derive(Deserialize)]
        struct LoginData {
            token: SessionToken,
        }

        let envelope: Envelope<LoginData> = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.data.token.as_str(), "abc.def.ghi");
    }

    #[test]
    fn deserialize_flap_status_with_curfew() {
        let body = r#"{
            "data": {
                "battery": 5.2,
                "online": true,
                "locking": {
                    "mode": 4,
                    "curfew": {"locked": true, "lock_time": "19:00", "unlock_time": "07:00"}
                }
            }
        }"#;

        let status: Envelope<FlapStatus> = serde_json::from_str(body).unwrap();
        let status = status.data;
        assert!(status.online);
        assert_eq!(status.lock_mode(), Some(LockMode::Curfew));
        assert_eq!(status.locked(), Some(true));
        assert_eq!(status.describe_lock(), "Locked with curfew");
        assert!((status.battery_per_cell() - 1.3).abs() < 1e-9);
    }

    #[test]
    fn deserialize_flap_status_without_curfew_section() {
        let body = r#"{"battery": 4.8, "online": false, "locking": {"mode": 1}}"#;

        let status: FlapStatus = serde_json::from_str(body).unwrap();
        assert_eq!(status.lock_mode(), Some(LockMode::KeepPetsIn));
        assert_eq!(status.locked(), Some(true));
        assert_eq!(status.describe_lock(), "Keep pets in");
    }

    #[test]
    fn curfew_without_state_describes_as_unknown() {
        let status = FlapStatus {
            battery: 5.0,
            online: true,
            locking: Locking {
                mode: 4,
                curfew: None,
            },
        };
        assert_eq!(status.locked(), None);
        assert_eq!(status.describe_lock(), "Curfew enabled but state unknown");
    }

    #[test]
    fn unknown_lock_code_describes_without_panicking() {
        let status = FlapStatus {
            battery: 5.0,
            online: true,
            locking: Locking {
                mode: 9,
                curfew: None,
            },
        };
        assert_eq!(status.lock_mode(), None);
        assert_eq!(status.locked(), None);
        assert_eq!(status.describe_lock(), "unknown code 9");
    }

    #[test]
    fn deserialize_pet_position() {
        let body = r#"{"tag_id": 4711, "where": 2, "since": "2020-03-01T08:15:30Z"}"#;

        let position: PetPosition = serde_json::from_str(body).unwrap();
        assert_eq!(position.location(), Some(PetLocation::Outside));
        assert_eq!(position.describe(), "Outside");
        assert!(position.since.is_some());
    }

    #[test]
    fn pet_position_unknown_code() {
        let position: PetPosition = serde_json::from_str(r#"{"where": -1}"#).unwrap();
        assert_eq!(position.location(), None);
        assert_eq!(position.describe(), "Unknown");
    }

    #[test]
    fn deserialize_timeline_entry() {
        let body = r#"{
            "id": 1001,
            "type": 0,
            "created_at": "2020-03-01T08:15:30Z",
            "movements": [
                {"tag_id": 4711, "direction": 2, "created_at": "2020-03-01T08:15:29Z"}
            ]
        }"#;

        let entry: TimelineEntry = serde_json::from_str(body).unwrap();
        assert_eq!(entry.event(), Some(EventKind::RegisteredMovement));
        assert!(entry.is_movement_of(4711));
        assert!(!entry.is_movement_of(4712));
        assert_eq!(
            entry.movements[0].direction(),
            Some(Direction::LeftHouse)
        );
    }

    #[test]
    fn timeline_entry_with_unknown_type() {
        let entry: TimelineEntry =
            serde_json::from_str(r#"{"id": 7, "type": 12, "movements": []}"#).unwrap();
        assert_eq!(entry.event(), None);
        assert_eq!(entry.decode_event().to_string(), "unknown code 12");
        assert!(!entry.is_movement_of(1));
    }

    #[test]
    fn device_product_detection() {
        let hub: Device =
            serde_json::from_str(r#"{"id": 1, "name": "Hub", "product_id": 1}"#).unwrap();
        let flap: Device =
            serde_json::from_str(r#"{"id": 2, "name": "Back door", "product_id": 6}"#).unwrap();
        assert!(!hub.is_flap());
        assert!(flap.is_flap());
        assert_eq!(flap.product(), Some(ProductKind::CatFlap));
    }
}
