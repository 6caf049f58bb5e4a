//! Resolver counters.
//!
//! Tracks how often the resolver presses, loops on the same phase, gets stuck
//! or hands control back, and which shop items had no configured weight.

use std::collections::BTreeSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters shared between the resolver and whoever reports on it.
///
/// Uses atomics for lock-free access; only the unknown-item set takes a lock.
#[derive(Debug, Default)]
pub struct ResolverMetrics {
    /// Completed `resolve` calls
    resolutions: AtomicU64,

    /// Button presses issued
    presses: AtomicU64,

    /// Phase-to-phase transitions observed
    transitions: AtomicU64,

    /// Iterations where the phase did not change
    repeats: AtomicU64,

    /// Resolutions aborted on a stuck phase
    stuck_aborts: AtomicU64,

    /// Resolutions ended by an observation or input failure
    observation_failures: AtomicU64,

    /// Times the resolver waited for an operator
    operator_waits: AtomicU64,

    /// Shop ids seen without a configured weight
    unknown_items: Mutex<BTreeSet<String>>,
}

impl ResolverMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_resolution(&self) {
        self.resolutions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_presses(&self, count: u64) {
        self.presses.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_transition(&self) {
        self.transitions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_repeat(&self) {
        self.repeats.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_stuck(&self) {
        self.stuck_aborts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_observation_failure(&self) {
        self.observation_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_operator_wait(&self) {
        self.operator_waits.fetch_add(1, Ordering::Relaxed);
    }

    /// Remembers shop ids that fell back to the default weight.
    pub fn record_unknown_items<I>(&self, ids: I)
    where
        I: IntoIterator<Item = String>,
    {
        if let Ok(mut set) = self.unknown_items.lock() {
            set.extend(ids);
        }
    }

    pub fn presses(&self) -> u64 {
        self.presses.load(Ordering::Relaxed)
    }

    pub fn stuck_aborts(&self) -> u64 {
        self.stuck_aborts.load(Ordering::Relaxed)
    }

    pub fn unknown_items(&self) -> Vec<String> {
        self.unknown_items
            .lock()
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Reads every counter. Fields are read one by one, so a concurrent
    /// update may land between them.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            resolutions: self.resolutions.load(Ordering::Relaxed),
            presses: self.presses(),
            transitions: self.transitions.load(Ordering::Relaxed),
            repeats: self.repeats.load(Ordering::Relaxed),
            stuck_aborts: self.stuck_aborts(),
            observation_failures: self.observation_failures.load(Ordering::Relaxed),
            operator_waits: self.operator_waits.load(Ordering::Relaxed),
            unknown_items: self.unknown_items(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub resolutions: u64,
    pub presses: u64,
    pub transitions: u64,
    pub repeats: u64,
    pub stuck_aborts: u64,
    pub observation_failures: u64,
    pub operator_waits: u64,
    pub unknown_items: Vec<String>,
}
