//! Bounded job history storage.

use std::collections::{HashMap, VecDeque};
use std::sync::RwLock;

use leadflow_core::{JobId, JobRecord};

/// Maximum number of records retained before the oldest insertion is evicted.
pub const MAX_HISTORY: usize = 100;

/// History store error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum HistoryError {
    #[error("job not found: {0}")]
    NotFound(JobId),
}

/// Bounded, insertion-ordered record of job executions.
///
/// Eviction follows insertion order of the map, not business timestamps:
/// overwriting an existing id keeps its original insertion position and never
/// triggers eviction, so the eviction candidate is always the earliest
/// still-present key.
///
/// Safe for concurrent `put`/`get`/`recent` from many in-flight jobs; a
/// single shared instance behind `Arc` is sufficient.
#[derive(Debug)]
pub struct JobHistory {
    inner: RwLock<Inner>,
}

#[derive(Debug)]
struct Inner {
    records: HashMap<JobId, JobRecord>,
    /// Insertion order; front is the next eviction candidate.
    order: VecDeque<JobId>,
    capacity: usize,
}

impl JobHistory {
    pub fn new() -> Self {
        Self::with_capacity(MAX_HISTORY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: RwLock::new(Inner {
                records: HashMap::new(),
                order: VecDeque::new(),
                capacity,
            }),
        }
    }

    /// Insert or overwrite the record for its id.
    ///
    /// A new key past capacity evicts exactly one entry: the
    /// least-recently-inserted key still present. Overwrites never evict.
    pub fn put(&self, record: JobRecord) {
        let mut inner = self.inner.write().unwrap();

        if inner.records.contains_key(&record.id) {
            inner.records.insert(record.id, record);
            return;
        }

        inner.order.push_back(record.id);
        inner.records.insert(record.id, record);

        if inner.records.len() > inner.capacity {
            if let Some(oldest) = inner.order.pop_front() {
                inner.records.remove(&oldest);
            }
        }
    }

    /// Look up a record by id.
    ///
    /// Absence (never inserted, or already evicted) is expected control flow,
    /// not a system error.
    pub fn get(&self, id: JobId) -> Result<JobRecord, HistoryError> {
        let inner = self.inner.read().unwrap();
        inner
            .records
            .get(&id)
            .cloned()
            .ok_or(HistoryError::NotFound(id))
    }

    /// Up to `limit` records ordered by `started_at` descending.
    ///
    /// Ties keep insertion order (stable sort); callers must not rely on
    /// tie ordering.
    pub fn recent(&self, limit: usize) -> Vec<JobRecord> {
        let inner = self.inner.read().unwrap();
        let mut records: Vec<_> = inner
            .order
            .iter()
            .filter_map(|id| inner.records.get(id))
            .cloned()
            .collect();

        records.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        records.truncate(limit);
        records
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for JobHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use leadflow_core::{JobRequest, JobStatus};
    use serde_json::json;

    fn record() -> JobRecord {
        JobRecord::processing(JobId::new(), &JobRequest::new("cleanup.stale", json!({})))
    }

    #[test]
    fn get_returns_inserted_record() {
        let history = JobHistory::new();
        let r = record();
        let id = r.id;
        history.put(r);

        let fetched = history.get(id).unwrap();
        assert_eq!(fetched.id, id);
        assert_eq!(fetched.status, JobStatus::Processing);
    }

    #[test]
    fn get_on_absent_id_is_not_found() {
        let history = JobHistory::new();
        let id = JobId::new();
        assert!(matches!(history.get(id), Err(HistoryError::NotFound(e)) if e == id));
    }

    #[test]
    fn capacity_evicts_exactly_the_oldest_insertion() {
        let history = JobHistory::with_capacity(3);
        let records: Vec<_> = (0..4).map(|_| record()).collect();
        let ids: Vec<_> = records.iter().map(|r| r.id).collect();

        for r in records {
            history.put(r);
        }

        assert_eq!(history.len(), 3);
        assert!(matches!(history.get(ids[0]), Err(HistoryError::NotFound(_))));
        for &id in &ids[1..] {
            assert!(history.get(id).is_ok());
        }
    }

    #[test]
    fn full_capacity_eviction_matches_contract() {
        let history = JobHistory::new();
        let mut ids = Vec::new();
        for _ in 0..(MAX_HISTORY + 1) {
            let r = record();
            ids.push(r.id);
            history.put(r);
        }

        // The 101st distinct id evicts exactly the earliest-inserted key.
        assert_eq!(history.len(), MAX_HISTORY);
        assert!(history.get(ids[0]).is_err());
        assert!(history.get(ids[1]).is_ok());
        assert!(history.get(*ids.last().unwrap()).is_ok());
    }

    #[test]
    fn overwrite_does_not_evict_or_change_insertion_position() {
        let history = JobHistory::with_capacity(2);
        let first = record();
        let second = record();
        let (first_id, second_id) = (first.id, second.id);

        history.put(first.clone());
        history.put(second);

        // Overwriting the oldest key terminally does not count as an insertion.
        let mut updated = first;
        updated.mark_completed(json!({"ok": true}));
        history.put(updated);
        assert_eq!(history.len(), 2);
        assert_eq!(history.get(first_id).unwrap().status, JobStatus::Completed);

        // The next new key still evicts the original oldest insertion.
        history.put(record());
        assert!(history.get(first_id).is_err());
        assert!(history.get(second_id).is_ok());
    }

    #[test]
    fn recent_orders_by_started_at_descending() {
        let history = JobHistory::new();
        let base = Utc::now();

        let mut ids = Vec::new();
        for i in 0..4 {
            let mut r = record();
            r.started_at = base + Duration::milliseconds(i);
            ids.push(r.id);
            history.put(r);
        }

        let recent = history.recent(3);
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].id, ids[3]);
        assert_eq!(recent[1].id, ids[2]);
        assert_eq!(recent[2].id, ids[1]);
    }

    #[test]
    fn recent_with_large_limit_returns_everything() {
        let history = JobHistory::new();
        for _ in 0..5 {
            history.put(record());
        }
        assert_eq!(history.recent(50).len(), 5);
    }
}
