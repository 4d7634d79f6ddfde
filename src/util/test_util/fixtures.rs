// Not every mock test uses every helper.
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::memory_manager;
use crate::plan::MarkingPhase;
use crate::util::opaque_pointer::*;
use crate::util::test_util::mock_method::MockMethod;
use crate::util::test_util::mock_vm::MockVM;
use crate::util::{Address, MarkColor, ObjectReference};
use crate::{MarkingEngine, MarkingEngineBuilder};

/// Where the mock heap starts. Mock objects are never dereferenced, so this only needs to be an
/// address that no test uses for real memory.
pub const MOCK_HEAP_START: usize = 0x1000_0000;
/// Bytes between two mock objects.
pub const MOCK_OBJECT_SIZE: usize = 16;

/// An entry pushed to a gray queue.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GrayPush {
    pub tls: VMThread,
    pub object: ObjectReference,
    pub from_color: MarkColor,
    pub to_color: MarkColor,
}

/// A fake heap of `n` objects. It backs the mock page table, keeps one header color per object,
/// and records the gray queue pushes.
pub struct MockHeap {
    headers: Vec<AtomicUsize>,
    owned: AtomicBool,
    pushes: Mutex<Vec<GrayPush>>,
}

impl MockHeap {
    pub fn new(objects: usize) -> Arc<Self> {
        Arc::new(MockHeap {
            // 0 is neither of the mark colors, so every object starts white.
            headers: (0..objects).map(|_| AtomicUsize::new(0)).collect(),
            owned: AtomicBool::new(true),
            pushes: Mutex::new(vec![]),
        })
    }

    pub fn object(&self, index: usize) -> ObjectReference {
        assert!(index < self.headers.len());
        ObjectReference::from_raw_address(unsafe {
            Address::from_usize(MOCK_HEAP_START + index * MOCK_OBJECT_SIZE)
        })
    }

    fn start(&self) -> usize {
        MOCK_HEAP_START
    }

    fn end(&self) -> usize {
        MOCK_HEAP_START + self.headers.len() * MOCK_OBJECT_SIZE
    }

    pub fn contains(&self, addr: Address) -> bool {
        (self.start()..self.end()).contains(&addr.as_usize())
    }

    fn index_of(&self, object: ObjectReference) -> usize {
        assert!(
            self.contains(object.to_raw_address()),
            "{} is not in the mock heap",
            object
        );
        (object.value() - MOCK_HEAP_START) / MOCK_OBJECT_SIZE
    }

    pub fn header(&self, object: ObjectReference) -> MarkColor {
        MarkColor::from_raw(self.headers[self.index_of(object)].load(Ordering::SeqCst))
    }

    pub fn set_header(&self, object: ObjectReference, color: MarkColor) {
        self.headers[self.index_of(object)].store(color.as_usize(), Ordering::SeqCst);
    }

    /// Make every page of the heap (not) owned by the calling thread.
    pub fn set_owned(&self, owned: bool) {
        self.owned.store(owned, Ordering::SeqCst);
    }

    pub fn pushes(&self) -> Vec<GrayPush> {
        self.pushes.lock().unwrap().clone()
    }

    pub fn pushed_objects(&self) -> Vec<ObjectReference> {
        self.pushes().iter().map(|p| p.object).collect()
    }

    pub fn clear_pushes(&self) {
        self.pushes.lock().unwrap().clear();
    }

    /// Create a mock binding backed by this heap.
    pub fn mock_vm(self: &Arc<Self>) -> MockVM {
        let heap = self.clone();
        let is_managed_page = MockMethod::new_fixed(Box::new(move |addr: Address| heap.contains(addr)));
        let heap = self.clone();
        let is_owned_page = MockMethod::new_fixed(Box::new(move |addr: Address| {
            heap.contains(addr) && heap.owned.load(Ordering::SeqCst)
        }));
        let heap = self.clone();
        let get_and_set_color =
            MockMethod::new_fixed(Box::new(move |(object, color): (ObjectReference, MarkColor)| {
                let prev = heap.headers[heap.index_of(object)].swap(color.as_usize(), Ordering::SeqCst);
                MarkColor::from_raw(prev)
            }));
        let heap = self.clone();
        let push = MockMethod::new_fixed(Box::new(
            move |(tls, object, from_color, to_color): (VMThread, ObjectReference, MarkColor, MarkColor)| {
                heap.pushes.lock().unwrap().push(GrayPush {
                    tls,
                    object,
                    from_color,
                    to_color,
                });
            },
        ));
        MockVM {
            is_managed_page,
            is_owned_page,
            get_and_set_color,
            push,
        }
    }
}

/// An address outside the mock heap, e.g. static data.
pub fn non_heap_object() -> ObjectReference {
    ObjectReference::from_raw_address(unsafe { Address::from_usize(0x2000_0000) })
}

/// A distinct thread handle per `id`.
pub fn mutator_tls(id: usize) -> VMMutatorThread {
    VMMutatorThread(VMThread(OpaquePointer::from_address(unsafe {
        Address::from_usize(id * 8)
    })))
}

/// Create an engine with the given options, and leak it, as a binding would.
pub fn create_engine(options: &[(&str, &str)]) -> &'static MarkingEngine<MockVM> {
    let mut builder = MarkingEngineBuilder::new_no_env_vars();
    for (name, val) in options {
        assert!(builder.set_option(name, val), "Bad option {}={}", name, val);
    }
    Box::leak(memory_manager::cmsmark_init::<MockVM>(&builder))
}

/// Drive an idle engine to `target` the way a coordinator starts a cycle: request, prepare,
/// switch the barriers to the slow path, then compute roots and trace.
pub fn start_marking(engine: &MarkingEngine<MockVM>, target: MarkingPhase) {
    assert!(matches!(
        target,
        MarkingPhase::ComputingRoots | MarkingPhase::Tracing
    ));
    engine.set_phase(MarkingPhase::Requested);
    engine.set_phase(MarkingPhase::Preparing);
    engine.set_reference_check_fast(false);
    engine.set_phase(MarkingPhase::ComputingRoots);
    if target == MarkingPhase::Tracing {
        engine.set_phase(MarkingPhase::Tracing);
    }
}

/// End the cycle: back to idle with fast barriers.
pub fn finish_marking(engine: &MarkingEngine<MockVM>) {
    engine.set_reference_check_fast(true);
    engine.set_phase(MarkingPhase::Idle);
}
