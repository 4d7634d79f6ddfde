use super::mock_test_prelude::*;

use crate::plan::MarkingPhase;

#[test]
#[should_panic(expected = "is not on a page owned by the marking thread")]
fn marking_object_on_foreign_page_panics() {
    let heap = MockHeap::new(1);
    let setup_heap = heap.clone();
    with_mockvm(
        move || setup_heap.mock_vm(),
        move || {
            let engine = create_engine(&[("verify_page_ownership", "true")]);
            start_marking(engine, MarkingPhase::Tracing);
            heap.set_owned(false);
            memory_manager::mark_object(engine, heap.object(0), mutator_tls(1).0);
        },
        no_cleanup,
    )
}

#[test]
fn marking_object_on_owned_page_passes_verification() {
    let heap = MockHeap::new(1);
    let setup_heap = heap.clone();
    with_mockvm(
        move || setup_heap.mock_vm(),
        move || {
            let engine = create_engine(&[("verify_page_ownership", "true")]);
            start_marking(engine, MarkingPhase::Tracing);
            assert!(memory_manager::mark_if_reachable(
                engine,
                mutator_tls(1).0,
                heap.object(0)
            ));
            assert_eq!(read_mockvm(|mock| mock.is_owned_page.call_count()), 1);
        },
        no_cleanup,
    )
}
