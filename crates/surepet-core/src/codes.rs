//! Status-code decoding for the Sure Petcare cloud API
//!
//! The vendor reports device and timeline state as small integer codes in
//! three independent spaces: flap lock state, timeline event type, and
//! movement type. The tables below are fixed at compile time and decoding is
//! a pure lookup. New firmware may introduce codes we have never seen, so
//! every decode path has an explicit unknown outcome instead of an error —
//! an unrecognized code must never be coerced to a known label or crash the
//! caller.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Flap lock state, reported in `locking.mode` of a device status record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockMode {
    /// Both directions open (code 0)
    Unlocked,
    /// Pets may enter but not leave (code 1)
    KeepPetsIn,
    /// Pets may leave but not enter (code 2)
    KeepPetsOut,
    /// Locked in both directions (code 3)
    LockedBoth,
    /// Lock follows a time schedule (code 4); whether the flap is currently
    /// locked lives in the separate curfew record
    Curfew,
}

impl LockMode {
    /// Map a raw lock code to its variant, `None` for unrecognized codes
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Unlocked),
            1 => Some(Self::KeepPetsIn),
            2 => Some(Self::KeepPetsOut),
            3 => Some(Self::LockedBoth),
            4 => Some(Self::Curfew),
            _ => None,
        }
    }

    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self {
            Self::Unlocked => "Unlocked",
            Self::KeepPetsIn => "Keep pets in",
            Self::KeepPetsOut => "Keep pets out",
            Self::LockedBoth => "Locked both ways",
            Self::Curfew => "Curfew mode",
        }
    }
}

/// Timeline event type, the `type` field of a timeline entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Movement of a registered animal (code 0)
    RegisteredMovement,
    /// The flap lock state changed (code 6)
    LockStatusChanged,
    /// Movement of an animal without a registered tag (code 7)
    UnregisteredMovement,
    /// Curfew information (code 20)
    CurfewInfo,
}

impl EventKind {
    /// Map a raw event code to its variant, `None` for unrecognized codes
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::RegisteredMovement),
            6 => Some(Self::LockStatusChanged),
            7 => Some(Self::UnregisteredMovement),
            20 => Some(Self::CurfewInfo),
            _ => None,
        }
    }

    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self {
            Self::RegisteredMovement => "Registered animal movement",
            Self::LockStatusChanged => "Lock status changed",
            Self::UnregisteredMovement => "Unregistered animal entered/left",
            Self::CurfewInfo => "Curfew info",
        }
    }
}

/// Movement type reported for a single animal crossing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    /// Animal was registered manually (code 0)
    ManualRegistration,
    /// Animal looked through the door without crossing (code 4)
    LookedThroughDoor,
    /// Crossing where the device could not tell the direction (code 6)
    EntryOrLeaving,
    /// Standard entry (code 8)
    Entry,
    /// Left the house; the vendor emits two codes (11 and 13) for this
    LeftHouse,
}

impl MovementKind {
    /// Map a raw movement code to its variant, `None` for unrecognized codes
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::ManualRegistration),
            4 => Some(Self::LookedThroughDoor),
            6 => Some(Self::EntryOrLeaving),
            8 => Some(Self::Entry),
            11 | 13 => Some(Self::LeftHouse),
            _ => None,
        }
    }

    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self {
            Self::ManualRegistration => "Manual registration",
            Self::LookedThroughDoor => "Looked through door",
            Self::EntryOrLeaving => "Standard entry or leaving",
            Self::Entry => "Standard entry",
            Self::LeftHouse => "Left house",
        }
    }
}

/// The three code spaces a raw status code can belong to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeSpace {
    /// Flap lock state ([`LockMode`])
    LockState,
    /// Timeline event type ([`EventKind`])
    EventType,
    /// Movement type ([`MovementKind`])
    MovementType,
}

/// Outcome of decoding a raw code
///
/// Unrecognized codes are carried through as [`Decoded::Unknown`] so callers
/// can still display something meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoded {
    /// The code is part of the documented table
    Known(&'static str),
    /// The code is outside the documented table
    Unknown(i64),
}

impl Decoded {
    /// Whether the code was recognized
    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }

    /// The label, if the code was recognized
    pub fn known_label(&self) -> Option<&'static str> {
        match self {
            Self::Known(label) => Some(label),
            Self::Unknown(_) => None,
        }
    }
}

impl fmt::Display for Decoded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(label) => f.write_str(label),
            Self::Unknown(code) => write!(f, "unknown code {}", code),
        }
    }
}

/// Decode a raw status code within the given code space
///
/// Pure lookup: no state, no I/O, and never panics. Codes outside the
/// documented tables decode to [`Decoded::Unknown`].
pub fn decode(space: CodeSpace, code: i64) -> Decoded {
    let label = match space {
        CodeSpace::LockState => LockMode::from_code(code).map(LockMode::label),
        CodeSpace::EventType => EventKind::from_code(code).map(EventKind::label),
        CodeSpace::MovementType => MovementKind::from_code(code).map(MovementKind::label),
    };
    match label {
        Some(label) => Decoded::Known(label),
        None => Decoded::Unknown(code),
    }
}

/// Product type of a device attached to a household
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductKind {
    /// The internet hub (code 1)
    Hub,
    /// Pet Door Connect (code 3)
    PetFlap,
    /// Cat Flap Connect (code 6)
    CatFlap,
}

impl ProductKind {
    /// Map a raw product id to its variant, `None` for unrecognized ids
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Hub),
            3 => Some(Self::PetFlap),
            6 => Some(Self::CatFlap),
            _ => None,
        }
    }

    /// Whether this device is a flap of either kind
    pub fn is_flap(self) -> bool {
        matches!(self, Self::PetFlap | Self::CatFlap)
    }

    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self {
            Self::Hub => "Hub",
            Self::PetFlap => "Pet flap",
            Self::CatFlap => "Cat flap",
        }
    }
}

/// Last known side of the door a pet is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PetLocation {
    /// Inside the house (code 1)
    Inside,
    /// Outside the house (code 2)
    Outside,
}

impl PetLocation {
    /// Map a raw location code to its variant, `None` for unrecognized codes
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Inside),
            2 => Some(Self::Outside),
            _ => None,
        }
    }

    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self {
            Self::Inside => "Inside",
            Self::Outside => "Outside",
        }
    }
}

/// Per-pet tag profile controlling whether the flap lets the pet out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagProfile {
    /// Pet is free to leave (code 2)
    Outdoor,
    /// Pet is kept indoors (code 3)
    Indoor,
}

impl TagProfile {
    /// Map a raw profile code to its variant, `None` for unrecognized codes
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            2 => Some(Self::Outdoor),
            3 => Some(Self::Indoor),
            _ => None,
        }
    }

    /// The raw code, as sent in profile update requests
    pub fn code(self) -> i64 {
        match self {
            Self::Outdoor => 2,
            Self::Indoor => 3,
        }
    }

    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self {
            Self::Outdoor => "Free to leave (outdoor pet)",
            Self::Indoor => "Locked in (indoor pet)",
        }
    }
}

/// Direction of a movement record inside a timeline entry
///
/// Not the same space as [`MovementKind`]: this is the coarse direction the
/// vendor attaches to each `movements[]` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Looked through without crossing (code 0)
    LookedThrough,
    /// Entered the house (code 1)
    EnteredHouse,
    /// Left the house (code 2)
    LeftHouse,
}

impl Direction {
    /// Map a raw direction code to its variant, `None` for unrecognized codes
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::LookedThrough),
            1 => Some(Self::EnteredHouse),
            2 => Some(Self::LeftHouse),
            _ => None,
        }
    }

    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self {
            Self::LookedThrough => "Looked through",
            Self::EnteredHouse => "Entered house",
            Self::LeftHouse => "Left house",
        }
    }
}
