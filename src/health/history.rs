//! Time-indexed status history for a single instance.
//!
//! # Responsibilities
//! - Record status transitions with the wall-clock time they were observed
//! - Answer "what was the status at time t" for routing decisions
//! - Bound memory by evicting the oldest transitions
//!
//! # Design Decisions
//! - Readers load an immutable snapshot through `ArcSwap` and never block
//! - Writers are serialised by a mutex held across compare, append and publish,
//!   so two concurrent transitions can never both read the same "current" status
//! - Eviction happens on the private copy before publishing; readers see either
//!   the old snapshot or the trimmed one
//! - Observation timestamps are monotonic even if the wall clock steps back

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::SystemTime;

use arc_swap::ArcSwap;
use parking_lot::Mutex;

use crate::health::state::Status;

/// Maximum number of retained transitions per instance.
pub const MAX_HISTORY: usize = 1000;

/// A single recorded transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
    /// When the transition was observed.
    pub at: SystemTime,
    /// The status the instance moved to.
    pub status: Status,
}

#[derive(Debug)]
struct Snapshot {
    entries: VecDeque<StatusEntry>,
    current: Status,
}

/// Bounded, time-ordered log of status transitions.
#[derive(Debug)]
pub struct StatusHistory {
    snapshot: ArcSwap<Snapshot>,
    writer: Mutex<()>,
    capacity: usize,
}

impl StatusHistory {
    /// Create a history seeded with `initial` at the current time.
    pub fn new(initial: Status) -> Self {
        Self::with_capacity(initial, MAX_HISTORY)
    }

    pub fn with_capacity(initial: Status, capacity: usize) -> Self {
        Self::seeded_at(initial, SystemTime::now(), capacity)
    }

    pub(crate) fn seeded_at(initial: Status, at: SystemTime, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut entries = VecDeque::with_capacity(capacity.min(64));
        entries.push_back(StatusEntry {
            at,
            status: initial.clone(),
        });

        Self {
            snapshot: ArcSwap::from_pointee(Snapshot {
                entries,
                current: initial,
            }),
            writer: Mutex::new(()),
            capacity,
        }
    }

    /// The most recently recorded status.
    pub fn current(&self) -> Status {
        self.snapshot.load().current.clone()
    }

    /// Record `status` observed now.
    ///
    /// Returns the previous status if a transition was recorded, `None` if
    /// `status` equals the current one.
    pub fn record(&self, status: Status) -> Option<Status> {
        self.record_at(status, SystemTime::now())
    }

    pub(crate) fn record_at(&self, status: Status, observed: SystemTime) -> Option<Status> {
        let _writer = self.writer.lock();
        let snapshot = self.snapshot.load_full();

        if snapshot.current == status {
            return None;
        }

        let mut entries = snapshot.entries.clone();
        let at = match entries.back() {
            Some(last) if observed < last.at => last.at,
            _ => observed,
        };
        entries.push_back(StatusEntry {
            at,
            status: status.clone(),
        });
        while entries.len() > self.capacity {
            entries.pop_front();
        }

        self.snapshot.store(Arc::new(Snapshot {
            entries,
            current: status,
        }));

        Some(snapshot.current.clone())
    }

    /// Status of the latest entry recorded at or before `at`.
    ///
    /// Times earlier than every retained entry resolve to `UP`.
    pub fn status_at(&self, at: SystemTime) -> Status {
        let snapshot = self.snapshot.load();
        let idx = snapshot.entries.partition_point(|entry| entry.at <= at);
        match idx {
            0 => Status::up(),
            _ => snapshot.entries[idx - 1].status.clone(),
        }
    }

    /// Retained entries, oldest first.
    pub fn entries(&self) -> Vec<StatusEntry> {
        self.snapshot.load().entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.snapshot.load().entries.len()
    }

    /// Always false: a history is seeded on construction.
    pub fn is_empty(&self) -> bool {
        self.snapshot.load().entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::{Duration, UNIX_EPOCH};

    fn t(ms: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_millis(ms)
    }

    #[test]
    fn test_seeded_with_initial_status() {
        let history = StatusHistory::seeded_at(Status::down(), t(1_000), MAX_HISTORY);
        assert_eq!(history.len(), 1);
        assert_eq!(history.current(), "DOWN");
        assert_eq!(history.status_at(t(1_000)), "DOWN");
    }

    #[test]
    fn test_defaults_to_up_before_first_entry() {
        let history = StatusHistory::seeded_at(Status::down(), t(1_000), MAX_HISTORY);
        assert_eq!(history.status_at(t(999)), "UP");
        assert_eq!(history.status_at(UNIX_EPOCH), "UP");
    }

    #[test]
    fn test_repeated_status_is_not_recorded() {
        let history = StatusHistory::seeded_at(Status::up(), t(1_000), MAX_HISTORY);
        assert_eq!(history.record_at(Status::up(), t(2_000)), None);
        assert_eq!(history.len(), 1);

        assert_eq!(history.record_at(Status::down(), t(3_000)), Some(Status::up()));
        assert_eq!(history.record_at(Status::down(), t(4_000)), None);
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_status_at_walks_history() {
        let history = StatusHistory::seeded_at(Status::up(), t(1_000), MAX_HISTORY);
        history.record_at(Status::down(), t(2_000));
        history.record_at(Status::from("OUT_OF_SERVICE"), t(3_000));
        history.record_at(Status::up(), t(4_000));

        assert_eq!(history.status_at(t(1_500)), "UP");
        assert_eq!(history.status_at(t(2_000)), "DOWN");
        assert_eq!(history.status_at(t(2_999)), "DOWN");
        assert_eq!(history.status_at(t(3_500)), "OUT_OF_SERVICE");
        assert_eq!(history.status_at(t(9_000)), "UP");
        assert_eq!(history.current(), "UP");
    }

    #[test]
    fn test_clock_step_back_keeps_order() {
        let history = StatusHistory::seeded_at(Status::up(), t(5_000), MAX_HISTORY);
        history.record_at(Status::down(), t(4_000));

        let entries = history.entries();
        assert_eq!(entries[1].at, t(5_000));
        // Same timestamp: the later transition wins.
        assert_eq!(history.status_at(t(5_000)), "DOWN");
    }

    #[test]
    fn test_history_is_bounded() {
        let history = StatusHistory::seeded_at(Status::up(), t(0), MAX_HISTORY);
        for i in 0..1101u64 {
            history.record_at(Status::from(format!("STATUS_{i}")), t(i + 1));
        }

        let entries = history.entries();
        assert_eq!(entries.len(), MAX_HISTORY);
        assert_eq!(entries.first().unwrap().status, "STATUS_101");
        assert_eq!(entries.last().unwrap().status, "STATUS_1100");
        // Evicted range now predates the log.
        assert_eq!(history.status_at(t(50)), "UP");
    }

    #[test]
    fn test_concurrent_writers_do_not_lose_transitions() {
        let history = Arc::new(StatusHistory::new(Status::up()));
        let mut handles = Vec::new();

        for worker in 0..8 {
            let history = history.clone();
            handles.push(thread::spawn(move || {
                let mut recorded = 0;
                for i in 0..100 {
                    let label = format!("W{worker}_{i}");
                    if history.record(Status::from(label)).is_some() {
                        recorded += 1;
                    }
                }
                recorded
            }));
        }

        let recorded: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(recorded, 800);
        assert_eq!(history.len(), 801);
    }

    #[test]
    fn test_readers_see_consistent_snapshots() {
        let history = Arc::new(StatusHistory::with_capacity(Status::up(), 16));
        let writer = {
            let history = history.clone();
            thread::spawn(move || {
                for i in 0..2_000 {
                    history.record(Status::from(format!("S{i}")));
                }
            })
        };

        for _ in 0..2_000 {
            let entries = history.entries();
            assert!(!entries.is_empty());
            assert!(entries.len() <= 16);
            assert!(entries.windows(2).all(|w| w[0].at <= w[1].at && w[0].status != w[1].status));
        }
        writer.join().unwrap();
    }
}
