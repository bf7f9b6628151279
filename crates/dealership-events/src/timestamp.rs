//! Canonical event timestamps.
//!
//! Every event timestamp is UTC, truncated to whole seconds, and round-trips
//! through ISO-8601. `CanonicalTimestamp` is the newtype the rest of the
//! codec builds on so "truncate then compare" only has to be gotten right
//! once.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A UTC timestamp truncated to seconds. `Ord`/`Eq` on this type is exactly
/// the last-writer-wins comparison used by every reconciler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CanonicalTimestamp(DateTime<Utc>);

impl CanonicalTimestamp {
    /// Truncate an arbitrary `DateTime<Utc>` to seconds, matching the
    /// source system's `datetime.replace(microsecond=0)` semantics.
    pub fn truncate(dt: DateTime<Utc>) -> Self {
        Self(dt.trunc_subsecs(0))
    }

    pub fn now() -> Self {
        Self::truncate(Utc::now())
    }

    pub fn inner(&self) -> DateTime<Utc> {
        self.0
    }
}

impl From<DateTime<Utc>> for CanonicalTimestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::truncate(dt)
    }
}

impl Serialize for CanonicalTimestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.to_rfc3339())
    }
}

impl<'de> Deserialize<'de> for CanonicalTimestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        let dt = DateTime::parse_from_rfc3339(&raw)
            .map_err(serde::de::Error::custom)?
            .with_timezone(&Utc);
        Ok(Self::truncate(dt))
    }
}

impl std::fmt::Display for CanonicalTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn truncates_microseconds() {
        let dt = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap() + chrono::Duration::microseconds(123_456);
        let ts = CanonicalTimestamp::truncate(dt);
        assert_eq!(ts.inner().timestamp_subsec_micros(), 0);
    }

    #[test]
    fn round_trips_through_json() {
        let ts = CanonicalTimestamp::now();
        let encoded = serde_json::to_string(&ts).unwrap();
        let decoded: CanonicalTimestamp = serde_json::from_str(&encoded).unwrap();
        assert_eq!(ts, decoded);
    }

    #[test]
    fn orders_by_instant() {
        let base = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let earlier = CanonicalTimestamp::truncate(base);
        let later = CanonicalTimestamp::truncate(base + chrono::Duration::seconds(1));
        assert!(later > earlier);
    }
}
