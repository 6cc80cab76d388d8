//! Test doubles and common utilities for session-boundary contract tests
//!
//! This module provides a scripted [`PetcareApi`] double that verifies
//! boundary constraints (error passthrough, one request per operation)
//! without touching the network.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use surepet_core::codes::TagProfile;
use surepet_core::error::{Error, Result};
use surepet_core::traits::PetcareApi;
use surepet_core::types::{
    CurfewState, Device, FlapStatus, Household, Locking, Pet, PetPosition, SessionToken, TagInfo,
    TimelineEntry,
};

/// How the scripted API should fail, if at all
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureMode {
    /// Every call succeeds with canned data
    None,
    /// Every call fails as an authentication rejection
    Authentication,
    /// Every call fails as a transport error
    Transport,
    /// Every call fails as a rate limit
    RateLimited,
}

/// A scripted PetcareApi that counts calls and fails on demand
pub struct ScriptedApi {
    failure: FailureMode,
    login_calls: AtomicUsize,
    query_calls: AtomicUsize,
}

impl ScriptedApi {
    pub fn new(failure: FailureMode) -> Self {
        Self {
            failure,
            login_calls: AtomicUsize::new(0),
            query_calls: AtomicUsize::new(0),
        }
    }

    /// Number of times login() was called
    pub fn login_calls(&self) -> usize {
        self.login_calls.load(Ordering::SeqCst)
    }

    /// Number of times any query method was called
    pub fn query_calls(&self) -> usize {
        self.query_calls.load(Ordering::SeqCst)
    }

    fn scripted_failure(&self) -> Option<Error> {
        match self.failure {
            FailureMode::None => None,
            FailureMode::Authentication => Some(Error::auth("login rejected (status 401)")),
            FailureMode::Transport => Some(Error::http("connection reset by peer")),
            FailureMode::RateLimited => Some(Error::rate_limited("slow down")),
        }
    }

    fn count_query(&self) -> Result<()> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        match self.scripted_failure() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PetcareApi for ScriptedApi {
    async fn login(&self) -> Result<SessionToken> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        match self.scripted_failure() {
            Some(err) => Err(err),
            None => Ok(SessionToken::new("scripted-token")),
        }
    }

    async fn households(&self, _token: &SessionToken) -> Result<Vec<Household>> {
        self.count_query()?;
        Ok(vec![Household {
            id: 11,
            name: "Home".to_string(),
            timezone: None,
        }])
    }

    async fn devices(&self, _token: &SessionToken, _household_id: i64) -> Result<Vec<Device>> {
        self.count_query()?;
        Ok(vec![
            Device {
                id: 21,
                name: "Hub".to_string(),
                product_id: 1,
            },
            Device {
                id: 22,
                name: "Back door".to_string(),
                product_id: 6,
            },
        ])
    }

    async fn pets(&self, _token: &SessionToken, _household_id: i64) -> Result<Vec<Pet>> {
        self.count_query()?;
        Ok(vec![Pet {
            id: 31,
            name: "Flocke".to_string(),
            tag_id: 4711,
            photo: None,
        }])
    }

    async fn flap_status(&self, _token: &SessionToken, _device_id: i64) -> Result<FlapStatus> {
        self.count_query()?;
        Ok(FlapStatus {
            battery: 5.2,
            online: true,
            locking: Locking {
                mode: 4,
                curfew: Some(CurfewState {
                    locked: true,
                    lock_time: Some("19:00".to_string()),
                    unlock_time: Some("07:00".to_string()),
                }),
            },
        })
    }

    async fn pet_position(&self, _token: &SessionToken, _pet_id: i64) -> Result<PetPosition> {
        self.count_query()?;
        Ok(PetPosition {
            tag_id: 4711,
            where_code: 1,
            since: None,
        })
    }

    async fn tags(&self, _token: &SessionToken) -> Result<Vec<TagInfo>> {
        self.count_query()?;
        Ok(vec![TagInfo {
            id: 4711,
            profile: 3,
        }])
    }

    async fn timeline(
        &self,
        _token: &SessionToken,
        _household_id: i64,
    ) -> Result<Vec<TimelineEntry>> {
        self.count_query()?;
        let entries = serde_json::json!([
            {"id": 3, "type": 0, "movements": [{"tag_id": 4711, "direction": 2}]},
            {"id": 2, "type": 6, "movements": []},
            {"id": 1, "type": 17, "movements": []}
        ]);
        Ok(serde_json::from_value(entries).expect("canned timeline deserializes"))
    }

    async fn set_tag_profile(
        &self,
        _token: &SessionToken,
        _device_id: i64,
        _tag_id: i64,
        _profile: TagProfile,
    ) -> Result<bool> {
        self.count_query()?;
        Ok(true)
    }
}
