//! VM-to-engine interface: safe Rust APIs.
//!
//! This module provides the API a VM binding calls into. We expect the binding to wrap these
//! functions for its compiled code, e.g. by exposing the barrier entry points to native code and
//! managing the unsafety of doing so.
//!
//! For mutators, this API provides a `Box<Mutator>`, and requires a `&mut Mutator` for the
//! barriers. A binding can keep the box in its thread-local storage, or turn it into a raw
//! pointer and forge a mutable reference from it. Either way, the binding must guarantee that a
//! mutator is only used by its own thread.

use crate::engine::{MarkingEngine, MarkingEngineBuilder};
use crate::plan::{BarrierMask, MarkingPhase, Mutator};
use crate::util::frame_descriptor::{FrameDescriptor, FrameInfo, FrameLayout};
use crate::util::opaque_pointer::*;
use crate::util::{Address, ObjectReference};
use crate::vm::slot::Slot;
use crate::vm::VMBinding;

/// Initialize a marking engine.
///
/// We expect a binding to initialize the engine in the following steps:
///
/// 1. Create a [`MarkingEngineBuilder`]. [`MarkingEngineBuilder::new`] reads `CMSMARK_*`
///    environment variables.
/// 2. Set options with [`MarkingEngineBuilder::set_option`].
/// 3. Call this function and keep the engine for the lifetime of the process. Mutators need a
///    `'static` reference to it, so a binding usually leaks the box or stores it in a lazily
///    initialized static.
///
/// Note that this method will attempt to initialize a logger. If the VM would like to use its own
/// logger, it should initialize the logger before calling this method.
pub fn cmsmark_init<VM: VMBinding>(builder: &MarkingEngineBuilder) -> Box<MarkingEngine<VM>> {
    match crate::util::logger::try_init() {
        Ok(_) => debug!("cmsmark initialized the logger."),
        Err(_) => debug!(
            "cmsmark failed to initialize the logger. Possibly a logger has been initialized by user."
        ),
    }
    info!("{}", *crate::build_info::CMSMARK_FULL_BUILD_INFO);
    Box::new(builder.build())
}

/// Request the engine to create a mutator context for a VM thread. The barrier of the mutator is
/// chosen by the `barrier` option.
///
/// Arguments:
/// * `engine`: A reference to the engine instance.
/// * `tls`: The thread that will use this mutator.
pub fn bind_mutator<VM: VMBinding>(
    engine: &'static MarkingEngine<VM>,
    tls: VMMutatorThread,
) -> Box<Mutator<VM>> {
    let mutator = Box::new(Mutator::new(engine, tls));
    debug!("Bound mutator {:?}", tls);
    mutator
}

/// Report to the engine that a mutator is no longer needed. The binding must not use the
/// mutator after this call.
pub fn destroy_mutator<VM: VMBinding>(mutator: &mut Mutator<VM>) {
    mutator.flush();
    debug!("Destroyed mutator {:?}", mutator.get_tls());
}

/// The barrier for a reference store into a bound location. Call this before the store, while
/// `slot` still holds the value being overwritten.
///
/// Arguments:
/// * `mutator`: The mutator for the current thread.
/// * `slot`: The location being written to.
/// * `target`: The reference being stored.
/// * `mask`: The call site's barrier mask.
#[inline(always)]
pub fn object_reference_write_pre<VM: VMBinding>(
    mutator: &mut Mutator<VM>,
    slot: VM::VMSlot,
    target: ObjectReference,
    mask: BarrierMask,
) {
    mutator
        .barrier
        .object_reference_write_pre(slot, target, mask);
}

/// Run the barrier, then store `target` into `slot`.
#[inline(always)]
pub fn object_reference_write<VM: VMBinding>(
    mutator: &mut Mutator<VM>,
    slot: VM::VMSlot,
    target: ObjectReference,
    mask: BarrierMask,
) {
    object_reference_write_pre(mutator, slot, target, mask);
    slot.store(target);
}

/// The barrier for a reference store to a raw address. Call this before the store, while the
/// word at `slot` still holds the value being overwritten.
///
/// # Safety
/// `slot` must be a valid, word-aligned address of a word that holds a reference or 0.
#[inline(always)]
pub unsafe fn address_reference_write_pre<VM: VMBinding>(
    mutator: &mut Mutator<VM>,
    slot: Address,
    target: ObjectReference,
    mask: BarrierMask,
) {
    mutator
        .barrier
        .address_reference_write_pre(slot, target, mask);
}

/// Mark `object` on behalf of `tls` if it is a heap object that is not marked in this cycle.
/// Null references and references to unmanaged pages are ignored. Return true if this call
/// marked the object.
pub fn mark_if_reachable<VM: VMBinding>(
    engine: &MarkingEngine<VM>,
    tls: VMThread,
    object: ObjectReference,
) -> bool {
    engine.mark_if_reachable(tls, object)
}

/// Mark `object` on behalf of `tls` without checking for null or unmanaged pages. The caller
/// must already know that `object` is on a managed page.
pub fn mark_if_reachable_inline<VM: VMBinding>(
    engine: &MarkingEngine<VM>,
    object: ObjectReference,
    tls: VMThread,
) {
    engine.mark_if_reachable_inline(tls, object)
}

/// Mark an object found by the tracer. This is the same as [`mark_if_reachable_inline`].
pub fn mark_object<VM: VMBinding>(
    engine: &MarkingEngine<VM>,
    object: ObjectReference,
    tls: VMThread,
) {
    engine.mark_object(object, tls)
}

/// Get the current marking phase. This is a single atomic load, and is safe to call from any
/// mutator context.
#[inline(always)]
pub fn current_phase<VM: VMBinding>(engine: &MarkingEngine<VM>) -> MarkingPhase {
    engine.current_phase()
}

/// Move the engine to a new marking phase. This is for the coordinator that drives collection
/// cycles.
///
/// # Panics
/// Panics if the transition is illegal.
pub fn set_phase<VM: VMBinding>(engine: &MarkingEngine<VM>, phase: MarkingPhase) {
    engine.set_phase(phase)
}

/// Swap the roles of the two mark colors at the start of a cycle.
///
/// # Panics
/// Panics if marking is in progress.
pub fn flip_mark_colors<VM: VMBinding>(engine: &MarkingEngine<VM>) {
    engine.flip_colors()
}

/// Set the global fast/slow choice for barriers whose call site does not decide.
pub fn set_reference_check_fast<VM: VMBinding>(engine: &MarkingEngine<VM>, fast: bool) {
    engine.set_reference_check_fast(fast)
}

/// Decode a frame descriptor word for a frame with or without a frame pointer.
///
/// # Safety
/// If bit 0 of `word` is clear, `word` must be the address of a valid overflow record that is
/// never freed.
pub unsafe fn decode_frame_descriptor(word: usize, has_frame_pointer: bool) -> FrameInfo {
    FrameDescriptor::from_raw(word).decode(FrameLayout::from_frame_pointer_omitted(
        !has_frame_pointer,
    ))
}
