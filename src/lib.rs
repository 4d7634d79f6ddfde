//! cmsmark is the marking engine of a concurrent mark-sweep garbage collector.
//!
//! It implements the tri-color marking state shared by mutators and the tracer (the current
//! [`MarkingPhase`] and the two mark colors), the reference barriers that compiled code runs
//! before every reference store, the mark-if-necessary primitive that moves an object from white
//! to gray, and the decoder for the stack frame descriptors used to find roots in activation
//! records.
//!
//! The engine does not allocate objects, scan objects or schedule threads. A VM binds to it by
//! implementing [`vm::VMBinding`]: a page table that tells managed and owned pages apart, an
//! object model that swaps header colors, and per-thread gray queues that a tracer drains.
//!
//! A binding starts by creating an engine with [`memory_manager::cmsmark_init`], and binds each
//! mutator thread with [`memory_manager::bind_mutator`]. All the public functions for the binding
//! are in [`memory_manager`].

#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;
#[macro_use]
extern crate probe;

pub mod build_info;
mod engine;
pub mod global_state;
pub mod memory_manager;
pub mod plan;
pub mod util;
pub mod vm;

pub use crate::engine::{MarkingEngine, MarkingEngineBuilder};
pub use crate::plan::{BarrierMask, MarkingPhase, Mutator};
