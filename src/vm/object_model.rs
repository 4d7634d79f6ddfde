use crate::util::{MarkColor, ObjectReference};
use crate::vm::VMBinding;

/// Access to the mark state in object headers.
pub trait ObjectModel<VM: VMBinding> {
    /// Atomically set the color in the header of `object` to `color`, and return the color that
    /// was there before.
    ///
    /// This is the only way the marking engine changes object headers. It must be a single
    /// atomic read-modify-write, so that when several threads race to mark the same object, exactly
    /// one of them observes a previous color that is not `color`.
    ///
    /// Arguments:
    /// * `object`: A non-null object on a collector-managed page.
    /// * `color`: The color to set, which is the current marked color.
    fn get_and_set_color(object: ObjectReference, color: MarkColor) -> MarkColor;
}
