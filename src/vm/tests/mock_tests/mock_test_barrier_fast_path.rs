use super::mock_test_prelude::*;

use crate::plan::{BarrierMask, MarkingPhase};
use crate::util::Address;
use atomic::Atomic;
use std::sync::atomic::AtomicUsize;

// The default mock binding panics on any call, so reaching the page table, the object model or
// the gray queue fails the test.
#[test]
fn fast_path_never_reaches_the_binding() {
    with_mockvm(
        default_setup,
        || {
            let engine = create_engine(&[]);
            let mut mutator = memory_manager::bind_mutator(engine, mutator_tls(1));
            let slot = Atomic::new(unsafe { Address::from_usize(MOCK_HEAP_START) });
            let slot_ref = SimpleSlot::from_address(Address::from_ref(&slot));
            let word = AtomicUsize::new(MOCK_HEAP_START);
            let target = crate::util::ObjectReference::from_raw_address(unsafe {
                Address::from_usize(MOCK_HEAP_START + MOCK_OBJECT_SIZE)
            });

            let store = |mutator: &mut crate::Mutator<MockVM>| {
                memory_manager::object_reference_write_pre(mutator, slot_ref, target, BarrierMask::DEFAULT);
                unsafe {
                    memory_manager::address_reference_write_pre(
                        mutator,
                        Address::from_ref(&word),
                        target,
                        BarrierMask::DEFAULT,
                    );
                }
            };

            // The global flag stays fast through every phase.
            store(&mut mutator);
            for phase in [
                MarkingPhase::Requested,
                MarkingPhase::Preparing,
                MarkingPhase::ComputingRoots,
                MarkingPhase::Tracing,
                MarkingPhase::StopTheWorld,
            ] {
                engine.set_phase(phase);
                store(&mut mutator);
            }

            assert_eq!(oracle_calls(), 0);
            assert!(!read_mockvm(|mock| mock.push.is_called()));
        },
        no_cleanup,
    )
}

#[test]
fn forced_fast_call_site_overrides_global_slow_flag() {
    with_mockvm(
        default_setup,
        || {
            let engine = create_engine(&[]);
            start_marking(engine, MarkingPhase::ComputingRoots);
            assert!(!engine.state().reference_check_is_fast());
            let mut mutator = memory_manager::bind_mutator(engine, mutator_tls(1));
            let slot = Atomic::new(unsafe { Address::from_usize(MOCK_HEAP_START) });
            let slot_ref = SimpleSlot::from_address(Address::from_ref(&slot));

            memory_manager::object_reference_write_pre(
                &mut mutator,
                slot_ref,
                non_heap_object(),
                BarrierMask::FORCE_FAST,
            );

            assert_eq!(oracle_calls(), 0);
            assert!(!read_mockvm(|mock| mock.push.is_called()));
        },
        no_cleanup,
    )
}
