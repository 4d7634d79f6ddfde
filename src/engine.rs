use std::marker::PhantomData;
use std::sync::Arc;

use crate::global_state::GlobalMarkingState;
use crate::plan::marking;
use crate::plan::MarkingPhase;
use crate::util::opaque_pointer::VMThread;
use crate::util::options::Options;
use crate::util::statistics::BarrierStatistics;
use crate::util::ObjectReference;
use crate::vm::VMBinding;

/// A builder for the marking engine. It holds the options before the engine is built.
pub struct MarkingEngineBuilder {
    /// The options for this instance.
    pub options: Options,
}

impl MarkingEngineBuilder {
    /// Create a builder with the default options, overridden by `CMSMARK_*` environment
    /// variables.
    pub fn new() -> Self {
        MarkingEngineBuilder {
            options: Options::default(),
        }
    }

    /// Create a builder with the default options, ignoring environment variables.
    pub fn new_no_env_vars() -> Self {
        MarkingEngineBuilder {
            options: Options::new_with_defaults(),
        }
    }

    /// Set an option by name. Return false if the name is unknown or the value does not parse.
    pub fn set_option(&mut self, name: &str, val: &str) -> bool {
        self.options.set_from_str(name, val)
    }

    /// Build a marking engine from the current options.
    pub fn build<VM: VMBinding>(&self) -> MarkingEngine<VM> {
        MarkingEngine::new(Arc::new(self.options.clone()))
    }
}

impl Default for MarkingEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A marking engine instance. It owns the global marking state shared by all the mutators and
/// the tracer, and implements the marking primitive on top of the binding.
///
/// A binding normally creates one engine at boot (see [`crate::memory_manager::cmsmark_init`])
/// and keeps it for the lifetime of the process. Mutators hold a `'static` reference to it.
pub struct MarkingEngine<VM: VMBinding> {
    pub(crate) options: Arc<Options>,
    pub(crate) state: GlobalMarkingState,
    pub(crate) stats: BarrierStatistics,
    _p: PhantomData<VM>,
}

impl<VM: VMBinding> MarkingEngine<VM> {
    pub(crate) fn new(options: Arc<Options>) -> Self {
        let stats = BarrierStatistics::new(options.count_barrier_events);
        info!(
            "Initialized marking engine: barrier = {:?}, verify_page_ownership = {}",
            options.barrier, options.verify_page_ownership
        );
        MarkingEngine {
            options,
            state: GlobalMarkingState::default(),
            stats,
            _p: PhantomData,
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Get the global marking state.
    pub fn state(&self) -> &GlobalMarkingState {
        &self.state
    }

    /// Get the barrier and marking counters. They only count if `count_barrier_events` is set.
    pub fn stats(&self) -> &BarrierStatistics {
        &self.stats
    }

    #[inline(always)]
    pub fn current_phase(&self) -> MarkingPhase {
        self.state.current_phase()
    }

    pub fn set_phase(&self, phase: MarkingPhase) {
        self.state.set_phase(phase)
    }

    pub fn flip_colors(&self) {
        self.state.flip_colors()
    }

    pub fn set_reference_check_fast(&self, fast: bool) {
        self.state.set_reference_check_fast(fast)
    }

    /// Mark `object` on behalf of `tls` if it is a heap object not marked in this cycle. Return
    /// true if this call marked it.
    #[inline]
    pub fn mark_if_reachable(&self, tls: VMThread, object: ObjectReference) -> bool {
        marking::mark_if_reachable(self, tls, object)
    }

    /// Like [`MarkingEngine::mark_if_reachable`], but `object` must be a non-null reference to
    /// an object on a managed page.
    #[inline(always)]
    pub fn mark_if_reachable_inline(&self, tls: VMThread, object: ObjectReference) {
        marking::mark_if_reachable_inline(self, tls, object)
    }

    /// Mark an object the tracer found. Same as [`MarkingEngine::mark_if_reachable_inline`].
    #[inline(always)]
    pub fn mark_object(&self, object: ObjectReference, tls: VMThread) {
        self.mark_if_reachable_inline(tls, object)
    }

    /// Log the barrier counters, if counting is enabled.
    pub fn dump_statistics(&self) {
        if self.stats.is_enabled() {
            self.stats.dump();
        }
    }
}
