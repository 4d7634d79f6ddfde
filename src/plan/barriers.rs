//! Reference barriers.
//!
//! Generated code calls a barrier before every store of a reference into memory. The barrier
//! first decides between the fast path (do nothing) and the slow path, using the call site's
//! [`BarrierMask`] and the engine's global flag. The slow path marks the value being overwritten,
//! and during root computation also the value being stored.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::util::constants::BYTES_IN_ADDRESS;
use crate::util::opaque_pointer::VMMutatorThread;
use crate::util::{Address, ObjectReference};
use crate::vm::slot::Slot;
use crate::vm::VMBinding;
use crate::MarkingEngine;

/// A compile-time mask attached to each barrier call site by the code generator.
///
/// If [`BarrierMask::USE_MASK`] is set, the call site's choice is authoritative, and
/// [`BarrierMask::ALLOW_FAST`] says whether that choice is the fast path. Otherwise the engine's
/// global flag decides. Other bits are ignored.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct BarrierMask(u32);

impl BarrierMask {
    /// The call site's fast/slow choice is authoritative.
    pub const USE_MASK: u32 = 0b01;
    /// The call site chooses the fast path. Only meaningful with `USE_MASK`.
    pub const ALLOW_FAST: u32 = 0b10;

    /// Follow the global flag.
    pub const DEFAULT: BarrierMask = BarrierMask(0);
    /// Always take the fast path at this call site.
    pub const FORCE_FAST: BarrierMask = BarrierMask(Self::USE_MASK | Self::ALLOW_FAST);
    /// Always take the slow path at this call site.
    pub const FORCE_SLOW: BarrierMask = BarrierMask(Self::USE_MASK);

    /// Create a mask from the bits emitted by the code generator.
    pub const fn from_bits(bits: u32) -> Self {
        BarrierMask(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Is this call site's fast/slow choice authoritative?
    #[inline(always)]
    pub const fn is_authoritative(self) -> bool {
        self.0 & Self::USE_MASK != 0
    }

    /// Does this call site choose the fast path?
    #[inline(always)]
    pub const fn allows_fast(self) -> bool {
        self.0 & Self::ALLOW_FAST != 0
    }
}

/// A barrier is attached to each mutator, and is invoked before the mutator stores a reference.
///
/// Barrier methods never block, never allocate and never fail. They may run while the mutator's
/// stack is close to its guard region.
pub trait Barrier<VM: VMBinding>: 'static + Send {
    /// Flush thread-local states. We do not buffer anything in the barrier, but a binding may
    /// call this at safepoints.
    fn flush(&mut self) {}

    /// The barrier for a store of `target` into the bound location `slot`. This must be called
    /// before the store, while `slot` still holds the old value.
    fn object_reference_write_pre(
        &mut self,
        slot: VM::VMSlot,
        target: ObjectReference,
        mask: BarrierMask,
    );

    /// The barrier for a store of `target` into the word at `slot`. This must be called before
    /// the store, while the word still holds the old value.
    ///
    /// # Safety
    /// `slot` must be a valid, word-aligned address of a word that holds a reference (or 0).
    unsafe fn address_reference_write_pre(
        &mut self,
        slot: Address,
        target: ObjectReference,
        mask: BarrierMask,
    );
}

/// A barrier that never marks. Used when the collector does not mark concurrently.
pub struct NoBarrier;

impl<VM: VMBinding> Barrier<VM> for NoBarrier {
    fn object_reference_write_pre(
        &mut self,
        _slot: VM::VMSlot,
        _target: ObjectReference,
        _mask: BarrierMask,
    ) {
    }

    unsafe fn address_reference_write_pre(
        &mut self,
        _slot: Address,
        _target: ObjectReference,
        _mask: BarrierMask,
    ) {
    }
}

/// The barrier for concurrent mark-sweep with sliding-views root computation.
///
/// During root computation, mutator stacks are scanned one at a time. A thread whose stack is
/// not scanned yet may hold only the new value of a store, while an already scanned thread may
/// have seen only the old value, so both must be marked. During tracing, the roots are closed and
/// everything reachable from the snapshot is traced through the gray queues; only an overwrite
/// can hide a reachable object, so only the old value is marked.
///
/// See [`MarkingPhase`](crate::plan::MarkingPhase).
pub struct SlidingViewsBarrier<VM: VMBinding> {
    engine: &'static MarkingEngine<VM>,
    tls: VMMutatorThread,
}

impl<VM: VMBinding> SlidingViewsBarrier<VM> {
    pub fn new(engine: &'static MarkingEngine<VM>, tls: VMMutatorThread) -> Self {
        Self { engine, tls }
    }

    #[inline(always)]
    fn is_fast(&self, mask: BarrierMask) -> bool {
        self.engine.state().reference_check_is_fast_for(mask)
    }

    /// The slow path shared by both call shapes. `old` is the value the store is about to
    /// overwrite.
    ///
    /// The phase is read once per call and never cached across calls, so a store always follows
    /// the phase it observes. Outside root computation and tracing nothing is marked.
    #[cold]
    #[inline(never)]
    fn reference_check_slow(&mut self, old: ObjectReference, target: ObjectReference) {
        let phase = self.engine.current_phase();
        self.engine.stats().record_slow_path(phase);
        if !phase.is_concurrent_marking() {
            return;
        }
        let tls = self.tls.0;
        self.engine.mark_if_reachable(tls, old);
        if phase.marks_new_value() {
            self.engine.mark_if_reachable(tls, target);
        }
        trace!(
            "Barrier slow path in {:?}: old = {}, new = {}",
            phase,
            old,
            target
        );
        probe!(cmsmark, barrier_slow, old.value(), target.value(), phase as usize);
    }
}

impl<VM: VMBinding> Barrier<VM> for SlidingViewsBarrier<VM> {
    #[inline(always)]
    fn object_reference_write_pre(
        &mut self,
        slot: VM::VMSlot,
        target: ObjectReference,
        mask: BarrierMask,
    ) {
        if !self.is_fast(mask) {
            let old = slot.load().unwrap_or(ObjectReference::NULL);
            self.reference_check_slow(old, target);
        }
    }

    #[inline(always)]
    unsafe fn address_reference_write_pre(
        &mut self,
        slot: Address,
        target: ObjectReference,
        mask: BarrierMask,
    ) {
        debug_assert!(slot.is_aligned_to(BYTES_IN_ADDRESS));
        if !self.is_fast(mask) {
            let raw = slot.atomic_load::<AtomicUsize>(Ordering::Relaxed);
            let old = ObjectReference::from_raw_address(Address::from_usize(raw));
            self.reference_check_slow(old, target);
        }
    }
}
