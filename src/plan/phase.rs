use bytemuck::NoUninit;
use enum_map::Enum;
use strum_macros::{EnumIter, IntoStaticStr};

/// The marking phase of the collector. There is one current phase per marking engine, and every
/// mutator thread reads it on every barrier slow path.
///
/// A normal cycle goes `Idle -> Requested -> Preparing -> ComputingRoots -> Tracing -> Idle`.
/// `StopTheWorld` is a fallback for a synchronous trace and is not part of the normal cycle.
#[repr(u8)]
#[derive(
    Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Copy, Clone, NoUninit, Enum, EnumIter, IntoStaticStr,
)]
pub enum MarkingPhase {
    /// Not used as a phase. This is the zero value, i.e. the phase of a state that has not
    /// been initialized yet.
    Dummy = 0,
    /// We are not doing anything at this point.
    Idle,
    /// Someone has asked for a GC to be started.
    Requested,
    /// No marking, but will be soon.
    Preparing,
    /// Mutator stacks are being scanned one at a time (sliding views). A reference store in this
    /// phase marks both the overwritten value and the newly stored value.
    ComputingRoots,
    /// The root set is closed and gray objects are being traced. A reference store in this
    /// phase only marks the overwritten value.
    Tracing,
    /// All mutators are stopped for a synchronous trace.
    StopTheWorld,
}

impl Default for MarkingPhase {
    fn default() -> Self {
        Self::Dummy
    }
}

impl MarkingPhase {
    /// Is concurrent marking in progress, i.e. does the barrier slow path have work to do?
    pub const fn is_concurrent_marking(self) -> bool {
        matches!(self, MarkingPhase::ComputingRoots | MarkingPhase::Tracing)
    }

    /// Does a reference store in this phase need to mark the newly stored value as well?
    pub const fn marks_new_value(self) -> bool {
        matches!(self, MarkingPhase::ComputingRoots)
    }

    /// Can we flip mark colors in this phase? Colors may only change while nothing is being marked.
    pub const fn allows_color_flip(self) -> bool {
        !matches!(
            self,
            MarkingPhase::ComputingRoots | MarkingPhase::Tracing | MarkingPhase::StopTheWorld
        )
    }

    /// Is `next` a legal phase to move to from this phase?
    ///
    /// A cycle only moves forward through the normal order. Any initialized phase may go back to
    /// `Idle`, either because the cycle is done or because it is cancelled. Any phase of a
    /// concurrent cycle (or no cycle) may fall back to `StopTheWorld`. Staying in the same phase
    /// is always allowed.
    pub fn can_transition_to(self, next: MarkingPhase) -> bool {
        use MarkingPhase::*;
        if self == next {
            return true;
        }
        match (self, next) {
            (_, Dummy) => false,
            (Dummy, Idle) => true,
            (Dummy, _) => false,
            (_, Idle) => true,
            (Idle, Requested)
            | (Requested, Preparing)
            | (Preparing, ComputingRoots)
            | (ComputingRoots, Tracing) => true,
            (StopTheWorld, _) => false,
            (_, StopTheWorld) => true,
            _ => false,
        }
    }

    /// The name of the phase, for logging and probes.
    pub fn name(self) -> &'static str {
        self.into()
    }
}
