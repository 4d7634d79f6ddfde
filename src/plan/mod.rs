//! The marking plan: the phase state machine, the barriers that mutators run on reference
//! stores, and the marking primitive they share with the tracer.

pub mod barriers;
pub(crate) mod marking;
mod mutator_context;
mod phase;

pub use barriers::{Barrier, BarrierMask};
pub use mutator_context::Mutator;
pub use phase::MarkingPhase;
