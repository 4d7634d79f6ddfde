//! The binding interface: traits that a VM implements so the marking engine can reach the
//! collaborators it does not own.
//!
//! The marking engine does not know how objects are allocated, how pages are handed out to
//! threads, or how gray objects are traced. It only asks the binding three things: which pages it
//! manages and owns ([`PageTable`]), how to swap the color in an object header ([`ObjectModel`]),
//! and where to put a newly grayed object ([`GrayQueue`]).

mod gray_queue;
mod object_model;
mod page_table;
pub mod slot;

pub use self::gray_queue::GrayQueue;
pub use self::object_model::ObjectModel;
pub use self::page_table::PageTable;
pub use self::slot::{SimpleSlot, Slot};


/// The `VMBinding` trait associates with each trait, and provides VM-specific types.
pub trait VMBinding
where
    Self: Sized + 'static + Send + Sync + Default,
{
    /// The binding's page table.
    type VMPageTable: PageTable;
    /// The binding's object header access.
    type VMObjectModel: ObjectModel<Self>;
    /// The binding's per-thread gray queues.
    type VMGrayQueue: GrayQueue<Self>;
    /// The type of reference slots in this VM.
    type VMSlot: Slot;
}
