use crate::util::opaque_pointer::VMThread;
use crate::util::{MarkColor, ObjectReference};
use crate::vm::VMBinding;

/// The per-thread queue of gray objects, i.e. objects that are marked but not yet scanned.
///
/// Each thread appends to its own queue, and the tracer drains all of them. No two threads ever
/// push to the same queue.
pub trait GrayQueue<VM: VMBinding> {
    /// Push a newly marked object to the gray queue of `tls`.
    ///
    /// The push must be visible to the tracer before the caller returns from the barrier.
    /// It must not block. The colors describe the transition of the header, so the tracer
    /// can tell objects marked in this cycle from stale entries.
    ///
    /// Arguments:
    /// * `tls`: The thread that marked the object and owns the queue.
    /// * `object`: The newly marked object.
    /// * `from_color`: The current marked color.
    /// * `to_color`: The current unmarked color.
    fn push(tls: VMThread, object: ObjectReference, from_color: MarkColor, to_color: MarkColor);
}
