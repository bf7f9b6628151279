//! Common reconciliation primitives, §4.6.1.
//!
//! `apply_upsert` and `tombstone` are not separate functions here: every
//! store gateway's `upsert`/`set_tombstone` method already *is* that
//! primitive (§4.7 requires gateways to be single-record-transactional), so
//! a reconciler calls the gateway directly. `is_fresher` is the one pure
//! comparison every reconciler needs, and it is just `Ord` on
//! `CanonicalTimestamp`.

use dealership_events::CanonicalTimestamp;

/// `A.updated_at > B.updated_at`.
pub fn is_fresher(a: CanonicalTimestamp, b: CanonicalTimestamp) -> bool {
    a > b
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn later_timestamp_is_fresher() {
        let base = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let earlier = CanonicalTimestamp::truncate(base);
        let later = CanonicalTimestamp::truncate(base + chrono::Duration::seconds(1));
        assert!(is_fresher(later, earlier));
        assert!(!is_fresher(earlier, later));
        assert!(!is_fresher(earlier, earlier));
    }
}
