//! This module provides the trait [`Slot`], which allows a VM to describe a bound location that
//! holds a reference: a field, an array element, a static variable, and so on.
//!
//! The reference barrier has two call shapes. One takes a raw address of a word that holds the
//! reference. The other takes a `Slot`, and lets the VM decide how to read the reference held
//! in it (e.g. a compressed or tagged reference). Both feed the same slow path.

use std::fmt::Debug;
use std::hash::Hash;

use atomic::Atomic;

use crate::util::{Address, ObjectReference};

/// `Slot` is an abstraction for the marking engine to load (and, for the wrapping barrier,
/// store) object references in memory.
///
/// A `Slot` value *points to* a slot, and is not the slot itself. A `Slot` can be
/// [copied](std::marker::Copy), and the copied `Slot` instance points to the same slot.
///
/// # Performance notes
///
/// `load` is called on the barrier slow path. Please ensure it has high performance.
pub trait Slot: Copy + Send + Debug + PartialEq + Eq + Hash {
    /// Load object reference from the slot.
    ///
    /// If the slot is not holding an object reference (for example, if it is holding null or a
    /// tagged non-reference value), this method should return `None`.
    fn load(&self) -> Option<ObjectReference>;

    /// Store the object reference `object` into the slot.
    fn store(&self, object: ObjectReference);
}

/// A simple slot implementation that represents a word-sized slot which holds the raw address of
/// an `ObjectReference`, or 0 if it is holding a null reference.
///
/// It is the default slot type, and should be suitable for most VMs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct SimpleSlot {
    slot_addr: *mut Atomic<Address>,
}

impl SimpleSlot {
    /// Create a simple slot from an address.
    ///
    /// Arguments:
    /// *   `address`: The address in memory where an `ObjectReference` is stored.
    pub fn from_address(address: Address) -> Self {
        Self {
            slot_addr: address.to_mut_ptr(),
        }
    }

    /// Get the address of the slot.
    pub fn as_address(&self) -> Address {
        Address::from_mut_ptr(self.slot_addr)
    }
}

unsafe impl Send for SimpleSlot {}

impl Slot for SimpleSlot {
    fn load(&self) -> Option<ObjectReference> {
        let addr = unsafe { (*self.slot_addr).load(atomic::Ordering::Relaxed) };
        if addr.is_zero() {
            None
        } else {
            Some(ObjectReference::from_raw_address(addr))
        }
    }

    fn store(&self, object: ObjectReference) {
        unsafe { (*self.slot_addr).store(object.to_raw_address(), atomic::Ordering::Relaxed) }
    }
}
