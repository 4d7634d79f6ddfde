use std::sync::atomic::{AtomicBool, Ordering};

use atomic::Atomic;

use crate::plan::barriers::BarrierMask;
use crate::plan::MarkingPhase;
use crate::util::MarkColor;

/// This stores the process-wide marking state for a marking engine: the current phase, the two
/// mark colors and the global fast/slow barrier flag.
///
/// Everything here is read by mutators on barrier paths, which may run in contexts where taking a
/// lock is illegal. So every field is a plain atomic, every query is a single atomic load, and no
/// query caches a value across calls.
// Each marking engine owns its own state, rather than keeping these as statics, so independent
// engines can coexist (e.g. in tests).
pub struct GlobalMarkingState {
    /// The current marking phase.
    phase: Atomic<MarkingPhase>,
    /// Have the roles of the two colors been swapped an odd number of times? Both roles are
    /// derived from this one word, so a reader never sees a half-flipped pair.
    colors_flipped: AtomicBool,
    /// Is the global barrier choice the slow path? We store the negation, so that the
    /// zero-initialized value means the fast path. A collector that has not started never
    /// pays for the barrier.
    reference_check_is_slow: AtomicBool,
}

impl GlobalMarkingState {
    /// Get the current marking phase. This is a single atomic load.
    #[inline(always)]
    pub fn current_phase(&self) -> MarkingPhase {
        self.phase.load(Ordering::Acquire)
    }

    /// Move to the given phase. This is called by the coordinator that drives a collection cycle.
    ///
    /// # Panics
    /// Panics if the transition is not legal (see [`MarkingPhase::can_transition_to`]). An
    /// illegal transition means the coordinator is broken, and continuing would risk losing
    /// live objects.
    pub fn set_phase(&self, next: MarkingPhase) {
        let prev = self.current_phase();
        assert!(
            prev.can_transition_to(next),
            "Illegal marking phase transition: {:?} -> {:?}",
            prev,
            next
        );
        self.phase.store(next, Ordering::Release);
        if prev != next {
            debug!("Marking phase: {:?} -> {:?}", prev, next);
            probe!(cmsmark, phase_transition, prev as usize, next as usize);
        }
    }

    /// Get the colors that currently mean "marked" and "unmarked", in that order. This is a
    /// single atomic load, so the pair is always consistent even if a flip races with it.
    #[inline(always)]
    pub fn colors(&self) -> (MarkColor, MarkColor) {
        if self.colors_flipped.load(Ordering::Acquire) {
            (MarkColor::INITIAL_UNMARKED, MarkColor::INITIAL_MARKED)
        } else {
            (MarkColor::INITIAL_MARKED, MarkColor::INITIAL_UNMARKED)
        }
    }

    /// Get the color that currently means "marked".
    #[inline(always)]
    pub fn marked_color(&self) -> MarkColor {
        self.colors().0
    }

    /// Get the color that currently means "unmarked".
    #[inline(always)]
    pub fn unmarked_color(&self) -> MarkColor {
        self.colors().1
    }

    /// Swap the roles of the two mark colors. After this, every object that was marked in the
    /// previous cycle reads as unmarked, and no object header is touched.
    ///
    /// # Panics
    /// Panics if marking is in progress.
    pub fn flip_colors(&self) {
        let phase = self.current_phase();
        assert!(
            phase.allows_color_flip(),
            "Cannot flip mark colors during {:?}",
            phase
        );
        self.colors_flipped.fetch_xor(true, Ordering::AcqRel);
        let (marked, unmarked) = self.colors();
        debug!(
            "Flipped mark colors: marked = {}, unmarked = {}",
            marked, unmarked
        );
    }

    /// Is the global barrier choice the fast path?
    #[inline(always)]
    pub fn reference_check_is_fast(&self) -> bool {
        !self.reference_check_is_slow.load(Ordering::Acquire)
    }

    /// Set the global barrier choice. The coordinator sets this to slow only while a cycle's
    /// root and trace phases are active.
    pub fn set_reference_check_fast(&self, fast: bool) {
        self.reference_check_is_slow.store(!fast, Ordering::Release);
        debug!(
            "Reference check is now {}",
            if fast { "fast" } else { "slow" }
        );
    }

    /// Should a barrier at a call site with the given mask take the fast path? The call site's
    /// choice wins if the mask says it is authoritative. Otherwise, use the global flag.
    #[inline(always)]
    pub fn reference_check_is_fast_for(&self, mask: BarrierMask) -> bool {
        if mask.is_authoritative() {
            mask.allows_fast()
        } else {
            self.reference_check_is_fast()
        }
    }
}

impl Default for GlobalMarkingState {
    fn default() -> Self {
        Self {
            phase: Atomic::new(MarkingPhase::Idle),
            colors_flipped: AtomicBool::new(false),
            reference_check_is_slow: AtomicBool::new(false),
        }
    }
}
