//! Per-mutator-thread context.

use crate::plan::barriers::{Barrier, NoBarrier, SlidingViewsBarrier};
use crate::util::opaque_pointer::VMMutatorThread;
use crate::util::options::BarrierSelector;
use crate::vm::VMBinding;
use crate::MarkingEngine;

/// A `Mutator` holds the per-thread state the marking engine needs on a mutator thread: the
/// thread handle (which identifies the thread's gray queue), and the thread's barrier.
///
/// A mutator is created by [`crate::memory_manager::bind_mutator`], and must only be used on its
/// own thread.
pub struct Mutator<VM: VMBinding> {
    pub(crate) barrier: Box<dyn Barrier<VM>>,
    pub(crate) mutator_tls: VMMutatorThread,
}

impl<VM: VMBinding> Mutator<VM> {
    pub(crate) fn new(engine: &'static MarkingEngine<VM>, mutator_tls: VMMutatorThread) -> Self {
        let barrier: Box<dyn Barrier<VM>> = match engine.options().barrier {
            BarrierSelector::NoBarrier => Box::new(NoBarrier),
            BarrierSelector::SlidingViews => Box::new(SlidingViewsBarrier::new(engine, mutator_tls)),
        };
        Mutator {
            barrier,
            mutator_tls,
        }
    }

    /// Get the mutator thread for this mutator context.
    pub fn get_tls(&self) -> VMMutatorThread {
        self.mutator_tls
    }

    /// Get the barrier of this mutator.
    pub fn barrier(&mut self) -> &mut dyn Barrier<VM> {
        &mut *self.barrier
    }

    /// Flush the thread-local state of this mutator, e.g. before the thread exits.
    pub fn flush(&mut self) {
        self.barrier.flush();
    }
}
