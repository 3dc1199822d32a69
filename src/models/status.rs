//! Classification of server-reported store statuses.
//!
//! Every place that needs to know whether a store can be refreshed, is still
//! processing, or is waiting for a trigger goes through [`classify`].

use super::store::DocumentStore;

/// Statuses that mean the last ingestion finished and a refresh may start.
pub const REFRESHABLE_STATUSES: &[&str] = &["UPSERTED"];

/// Statuses reported while ingestion is running.
pub const BUSY_STATUSES: &[&str] = &["SYNCING", "UPSERTING"];

/// Statuses that need an external trigger before anything happens.
pub const WAITING_STATUSES: &[&str] = &["STALE"];

/// Semantic bucket for a raw status string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusBucket {
    /// Terminal success; the store can be refreshed again.
    Refreshable,
    /// Ingestion in progress.
    Busy,
    /// Needs a new trigger.
    Waiting,
    /// Anything the service reports that we don't recognize.
    Unknown,
}

/// Map a raw status string to its bucket, ignoring case.
pub fn classify(status: &str) -> StatusBucket {
    let matches = |known: &[&str]| known.iter().any(|s| s.eq_ignore_ascii_case(status));

    if matches(REFRESHABLE_STATUSES) {
        StatusBucket::Refreshable
    } else if matches(BUSY_STATUSES) {
        StatusBucket::Busy
    } else if matches(WAITING_STATUSES) {
        StatusBucket::Waiting
    } else {
        StatusBucket::Unknown
    }
}

/// Stores whose current status is refreshable, in input order.
pub fn filter_refreshable(stores: &[DocumentStore]) -> Vec<DocumentStore> {
    stores
        .iter()
        .filter(|store| store.bucket() == StatusBucket::Refreshable)
        .cloned()
        .collect()
}

/// Split stores into (refreshable, skipped) keeping input order in both halves.
pub fn partition_refreshable(stores: Vec<DocumentStore>) -> (Vec<DocumentStore>, Vec<DocumentStore>) {
    stores
        .into_iter()
        .partition(|store| store.bucket() == StatusBucket::Refreshable)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(id: &str, status: &str) -> DocumentStore {
        DocumentStore {
            id: Some(id.to_string()),
            status: Some(status.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        assert_eq!(classify("UPSERTED"), StatusBucket::Refreshable);
        assert_eq!(classify("upserted"), StatusBucket::Refreshable);
        assert_eq!(classify("Upserted"), StatusBucket::Refreshable);
        assert_eq!(classify("syncing"), StatusBucket::Busy);
        assert_eq!(classify("UPSERTING"), StatusBucket::Busy);
        assert_eq!(classify("stale"), StatusBucket::Waiting);
    }

    #[test]
    fn test_classify_unknown() {
        for status in ["", "SYNC", "EMPTY", "NEW", "UPSERTED_PARTIAL", "UPSERT", " UPSERTED ", "SYNCING\n"] {
            assert_eq!(classify(status), StatusBucket::Unknown, "{status}");
        }
    }

    #[test]
    fn test_known_sets_are_disjoint() {
        for s in REFRESHABLE_STATUSES {
            assert!(!BUSY_STATUSES.contains(s));
            assert!(!WAITING_STATUSES.contains(s));
        }
        for s in BUSY_STATUSES {
            assert!(!WAITING_STATUSES.contains(s));
        }
    }

    #[test]
    fn test_filter_refreshable_excludes_busy_and_waiting() {
        let stores = vec![
            store("a", "UPSERTED"),
            // Contains "UPSERT" as a substring but is busy.
            store("b", "UPSERTING"),
            store("c", "STALE"),
            store("d", "upserted"),
            store("e", "EMPTY"),
        ];

        let ids: Vec<_> = filter_refreshable(&stores)
            .into_iter()
            .map(|s| s.id_or_unknown().to_string())
            .collect();
        assert_eq!(ids, vec!["a", "d"]);
    }

    #[test]
    fn test_missing_status_is_unknown() {
        let s = DocumentStore::default();
        assert_eq!(s.bucket(), StatusBucket::Unknown);
        assert!(filter_refreshable(&[s]).is_empty());
    }

    #[test]
    fn test_partition_refreshable() {
        let (ready, skipped) = partition_refreshable(vec![
            store("a", "SYNCING"),
            store("b", "UPSERTED"),
            store("c", "NEW"),
        ]);
        assert_eq!(ready.len(), 1);
        assert_eq!(ready[0].id_or_unknown(), "b");
        assert_eq!(skipped.len(), 2);
        assert_eq!(skipped[0].id_or_unknown(), "a");
    }
}
