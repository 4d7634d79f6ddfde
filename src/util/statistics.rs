//! Counters for barrier and marking events.
//!
//! Counting is off by default, and is enabled by the `count_barrier_events` option. The fast path
//! of the barrier is never counted: it must stay a single load and branch.

use std::sync::atomic::{AtomicUsize, Ordering};

use enum_map::EnumMap;

use crate::plan::MarkingPhase;

/// The outcome of one attempt to mark a candidate reference.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    /// The candidate was null.
    Null,
    /// The candidate is not on a collector-managed page.
    NonHeap,
    /// The object already had the marked color.
    AlreadyMarked,
    /// The object was marked by us and pushed to the gray queue.
    NewlyMarked,
}

pub struct BarrierStatistics {
    enabled: bool,
    slow_paths: EnumMap<MarkingPhase, AtomicUsize>,
    null: AtomicUsize,
    non_heap: AtomicUsize,
    already_marked: AtomicUsize,
    newly_marked: AtomicUsize,
}

impl BarrierStatistics {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            slow_paths: EnumMap::default(),
            null: AtomicUsize::new(0),
            non_heap: AtomicUsize::new(0),
            already_marked: AtomicUsize::new(0),
            newly_marked: AtomicUsize::new(0),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[inline(always)]
    pub fn record_slow_path(&self, phase: MarkingPhase) {
        if self.enabled {
            self.slow_paths[phase].fetch_add(1, Ordering::Relaxed);
        }
    }

    #[inline(always)]
    pub fn record_mark(&self, outcome: MarkOutcome) {
        if self.enabled {
            self.counter(outcome).fetch_add(1, Ordering::Relaxed);
        }
    }

    fn counter(&self, outcome: MarkOutcome) -> &AtomicUsize {
        match outcome {
            MarkOutcome::Null => &self.null,
            MarkOutcome::NonHeap => &self.non_heap,
            MarkOutcome::AlreadyMarked => &self.already_marked,
            MarkOutcome::NewlyMarked => &self.newly_marked,
        }
    }

    /// The number of barrier slow paths that observed the given phase.
    pub fn slow_paths_in(&self, phase: MarkingPhase) -> usize {
        self.slow_paths[phase].load(Ordering::Relaxed)
    }

    /// The number of mark attempts with the given outcome.
    pub fn marks(&self, outcome: MarkOutcome) -> usize {
        self.counter(outcome).load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        for (_, counter) in self.slow_paths.iter() {
            counter.store(0, Ordering::Relaxed);
        }
        self.null.store(0, Ordering::Relaxed);
        self.non_heap.store(0, Ordering::Relaxed);
        self.already_marked.store(0, Ordering::Relaxed);
        self.newly_marked.store(0, Ordering::Relaxed);
    }

    /// Log all the counters.
    pub fn dump(&self) {
        if !self.enabled {
            info!("Barrier statistics are disabled. Set count_barrier_events to enable them.");
            return;
        }
        for (phase, counter) in self.slow_paths.iter() {
            let count = counter.load(Ordering::Relaxed);
            if count != 0 {
                info!("barrier.slow.{} = {}", phase.name(), count);
            }
        }
        info!("mark.null = {}", self.marks(MarkOutcome::Null));
        info!("mark.non_heap = {}", self.marks(MarkOutcome::NonHeap));
        info!("mark.already_marked = {}", self.marks(MarkOutcome::AlreadyMarked));
        info!("mark.newly_marked = {}", self.marks(MarkOutcome::NewlyMarked));
    }
}
