use super::mock_test_prelude::*;

use crate::plan::MarkingPhase;

#[test]
fn flipped_colors_make_marked_objects_white_again() {
    let heap = MockHeap::new(2);
    let setup_heap = heap.clone();
    with_mockvm(
        move || setup_heap.mock_vm(),
        move || {
            let engine = create_engine(&[]);
            let tls = mutator_tls(1).0;
            let a = heap.object(0);

            // Cycle 1
            start_marking(engine, MarkingPhase::Tracing);
            assert!(memory_manager::mark_if_reachable(engine, tls, a));
            assert!(!memory_manager::mark_if_reachable(engine, tls, a));
            let cycle1_color = heap.header(a);
            finish_marking(engine);

            // Cycle 2: the header is untouched, but now reads as unmarked.
            memory_manager::flip_mark_colors(engine);
            assert_eq!(engine.state().unmarked_color(), cycle1_color);
            assert_eq!(heap.header(a), cycle1_color);
            start_marking(engine, MarkingPhase::Tracing);
            assert!(memory_manager::mark_if_reachable(engine, tls, a));
            assert_eq!(heap.header(a), engine.state().marked_color());
            assert_ne!(heap.header(a), cycle1_color);
            assert_eq!(heap.pushes().len(), 2);
        },
        no_cleanup,
    )
}

#[test]
#[should_panic(expected = "Cannot flip mark colors")]
fn flip_during_root_computation_panics() {
    with_mockvm(
        default_setup,
        || {
            let engine = create_engine(&[]);
            start_marking(engine, MarkingPhase::ComputingRoots);
            memory_manager::flip_mark_colors(engine);
        },
        no_cleanup,
    )
}
