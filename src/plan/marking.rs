//! The mark-if-necessary primitive: the white to gray transition.
//!
//! Both the barrier slow path and the tracer end up here. Marking sets the current marked color
//! in the object header with a single atomic swap. The thread that observes a different previous
//! color owns the object, and pushes it to its gray queue.

use crate::util::opaque_pointer::VMThread;
use crate::util::statistics::MarkOutcome;
use crate::util::ObjectReference;
use crate::vm::{GrayQueue, ObjectModel, PageTable, VMBinding};
use crate::MarkingEngine;

/// Mark `object` if it is a heap object that is not marked yet, and push it to the gray queue
/// of `tls`. Return true if we newly marked the object.
///
/// Null references and references to pages that the collector does not manage (e.g. static
/// data) are ignored.
#[inline]
pub(crate) fn mark_if_reachable<VM: VMBinding>(
    engine: &MarkingEngine<VM>,
    tls: VMThread,
    object: ObjectReference,
) -> bool {
    let outcome = if object.is_null() {
        MarkOutcome::Null
    } else if !VM::VMPageTable::is_managed_page(object.to_raw_address()) {
        MarkOutcome::NonHeap
    } else {
        attempt_mark(engine, tls, object)
    };
    engine.stats().record_mark(outcome);
    outcome == MarkOutcome::NewlyMarked
}

/// Mark `object` and push it to the gray queue of `tls` if it is not marked yet. Unlike
/// [`mark_if_reachable`], this does not check for null or for the page being managed. The
/// caller must already know that `object` is a heap object, e.g. the tracer draining a gray
/// queue.
#[inline(always)]
pub(crate) fn mark_if_reachable_inline<VM: VMBinding>(
    engine: &MarkingEngine<VM>,
    tls: VMThread,
    object: ObjectReference,
) {
    debug_assert!(!object.is_null(), "Inline marking of a null reference");
    let outcome = attempt_mark(engine, tls, object);
    engine.stats().record_mark(outcome);
}

#[inline(always)]
fn attempt_mark<VM: VMBinding>(
    engine: &MarkingEngine<VM>,
    tls: VMThread,
    object: ObjectReference,
) -> MarkOutcome {
    let (marked, unmarked) = engine.state().colors();
    if VM::VMObjectModel::get_and_set_color(object, marked) == marked {
        // Already gray or black.
        return MarkOutcome::AlreadyMarked;
    }
    check_page_ownership::<VM>(engine, object);
    VM::VMGrayQueue::push(tls, object, marked, unmarked);
    probe!(cmsmark, newly_marked, object.value());
    MarkOutcome::NewlyMarked
}

/// A newly marked object must be on a page owned by the marking thread. If it is not, the
/// compiler or the binding broke the contract, and we must not go on and corrupt the heap.
#[inline(always)]
fn check_page_ownership<VM: VMBinding>(engine: &MarkingEngine<VM>, object: ObjectReference) {
    if engine.options().verify_page_ownership {
        assert!(
            VM::VMPageTable::is_owned_page(object.to_raw_address()),
            "Marked object {} is not on a page owned by the marking thread",
            object
        );
    } else {
        debug_assert!(
            VM::VMPageTable::is_owned_page(object.to_raw_address()),
            "Marked object {} is not on a page owned by the marking thread",
            object
        );
    }
}
