//! A mock binding. Every binding method forwards to a [`MockMethod`] in a global mock instance,
//! so a test can replace the behavior of the page table, the object model and the gray queue,
//! and count how often the engine calls them.

use crate::util::opaque_pointer::*;
use crate::util::{Address, MarkColor, ObjectReference};
use crate::vm::{GrayQueue, ObjectModel, PageTable, SimpleSlot, VMBinding};

use super::mock_method::*;

use std::sync::Mutex;

lazy_static! {
    // The mutex may get poisoned any time. Accessing this mutex needs to deal with the poisoned case.
    // One can use read/write_mockvm to access mock vm.
    static ref MOCK_VM_INSTANCE: Mutex<MockVM> = Mutex::new(MockVM::default());
}

// The closure runs after the lock is released, so mocked methods called from different threads
// run concurrently.
macro_rules! mock {
    ($fn: ident($($arg:expr),*)) => {{
        let closure = write_mockvm(|mock| mock.$fn.prepare_call());
        closure(($($arg),*))
    }};
}

pub fn read_mockvm<F, R>(func: F) -> R
where
    F: FnOnce(&MockVM) -> R,
{
    let lock = MOCK_VM_INSTANCE
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    func(&lock)
}

pub fn write_mockvm<F, R>(func: F) -> R
where
    F: FnOnce(&mut MockVM) -> R,
{
    let mut lock = MOCK_VM_INSTANCE
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    func(&mut lock)
}

/// Run a test with the mock binding created by `setup`. Tests that use the mock binding are
/// serialized, and `cleanup` runs even if the test panics.
pub fn with_mockvm<S, T, C>(setup: S, test: T, cleanup: C)
where
    S: FnOnce() -> MockVM,
    T: FnOnce() + std::panic::UnwindSafe,
    C: FnOnce(),
{
    super::serial_test(|| {
        // Setup
        {
            write_mockvm(|mock| *mock = setup());
        }
        super::with_cleanup(test, cleanup);
    })
}

/// A mock binding where every method panics if called.
pub fn default_setup() -> MockVM {
    MockVM::default()
}

pub fn no_cleanup() {}

pub struct MockVM {
    // page table
    pub is_managed_page: MockMethod<Address, bool>,
    pub is_owned_page: MockMethod<Address, bool>,
    // object model
    pub get_and_set_color: MockMethod<(ObjectReference, MarkColor), MarkColor>,
    // gray queue
    pub push: MockMethod<(VMThread, ObjectReference, MarkColor, MarkColor), ()>,
}

impl Default for MockVM {
    fn default() -> Self {
        Self {
            is_managed_page: MockMethod::new_unimplemented(),
            is_owned_page: MockMethod::new_fixed(Box::new(|_| true)),
            get_and_set_color: MockMethod::new_unimplemented(),
            push: MockMethod::new_unimplemented(),
        }
    }
}

impl VMBinding for MockVM {
    type VMPageTable = MockVM;
    type VMObjectModel = MockVM;
    type VMGrayQueue = MockVM;
    type VMSlot = SimpleSlot;
}

impl PageTable for MockVM {
    fn is_managed_page(addr: Address) -> bool {
        mock!(is_managed_page(addr))
    }

    fn is_owned_page(addr: Address) -> bool {
        mock!(is_owned_page(addr))
    }
}

impl ObjectModel<MockVM> for MockVM {
    fn get_and_set_color(object: ObjectReference, color: MarkColor) -> MarkColor {
        mock!(get_and_set_color(object, color))
    }
}

impl GrayQueue<MockVM> for MockVM {
    fn push(tls: VMThread, object: ObjectReference, from_color: MarkColor, to_color: MarkColor) {
        mock!(push(tls, object, from_color, to_color))
    }
}

/// The number of times the engine asked the page table or the object model anything.
pub fn oracle_calls() -> usize {
    read_mockvm(|mock| {
        mock.is_managed_page.call_count()
            + mock.is_owned_page.call_count()
            + mock.get_and_set_color.call_count()
    })
}
