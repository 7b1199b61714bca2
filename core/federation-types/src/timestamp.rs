//! Second-precision UTC timestamps as they appear on the wire.
//!
//! Outbound timestamps are always rendered as `YYYY-MM-DDTHH:MM:SSZ`.
//! Inbound values may carry any RFC 3339 offset, or use the legacy
//! `YYYY-MM-DD HH:MM:SS UTC` rendering older pods emit.

use crate::Error;
use chrono::{DateTime, NaiveDateTime, SubsecRound, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const WIRE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";
const LEGACY_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// A UTC instant truncated to whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// The current time, truncated to seconds.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now().trunc_subsecs(0))
    }

    /// Creates a timestamp from seconds since the Unix epoch.
    pub fn from_unix(secs: i64) -> Result<Self, Error> {
        Utc.timestamp_opt(secs, 0)
            .single()
            .map(Self)
            .ok_or_else(|| Error::InvalidTimestamp(secs.to_string()))
    }

    /// Wraps a chrono instant, discarding sub-second precision.
    #[must_use]
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt.trunc_subsecs(0))
    }

    /// Parses a wire timestamp.
    pub fn parse(s: &str) -> Result<Self, Error> {
        let s = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(Self::from_datetime(dt.with_timezone(&Utc)));
        }
        NaiveDateTime::parse_from_str(s, LEGACY_FORMAT)
            .map(|naive| Self::from_datetime(naive.and_utc()))
            .map_err(|_| Error::InvalidTimestamp(s.to_string()))
    }

    /// Seconds since the Unix epoch.
    #[must_use]
    pub fn unix(&self) -> i64 {
        self.0.timestamp()
    }

    /// The underlying chrono instant.
    #[must_use]
    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }

    /// Renders the canonical wire form.
    #[must_use]
    pub fn to_wire(&self) -> String {
        self.0.format(WIRE_FORMAT).to_string()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(WIRE_FORMAT))
    }
}

impl FromStr for Timestamp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Timestamp {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Timestamp> for String {
    fn from(ts: Timestamp) -> Self {
        ts.to_wire()
    }
}
