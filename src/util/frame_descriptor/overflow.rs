//! Out-of-line frame descriptors for frames whose masks do not fit in one word.
//!
//! `mask` bit layout:
//!
//! | Bits | Common                | No frame pointer      | With frame pointer   |
//! |------|-----------------------|-----------------------|----------------------|
//! | 0    | frame pointer omitted |                       |                      |
//! | 1    | has transition record |                       |                      |
//! | 2..  |                       | callee-save mask 2..6 | callee-save mask 2..5|
//! |      |                       | value mask 6..14      | value mask 5..11     |
//!
//! `variable_data` bit layout:
//!
//! | Bits   | No frame pointer    | With frame pointer  |
//! |--------|---------------------|---------------------|
//! | 11..14 |                     | entry size          |
//! | 14     | entry size (14..17) | has pinned pointers |
//! | 17     | has pinned pointers |                     |
//! | 22..32 | frame size          |                     |
//!
//! An overflow record carries no stack argument size and no argument mask.

use super::RootMask;
use crate::util::constants::BYTES_IN_WORD;

const FRAME_POINTER_OMITTED: usize = 1 << 0;
const HAS_TRANSITION_RECORD: usize = 1 << 1;

const CALLEE_SAVE_SHIFT: usize = 2;

const NO_FP_CALLEE_SAVE_BITS: usize = 4;
const NO_FP_VALUE_SHIFT: usize = CALLEE_SAVE_SHIFT + NO_FP_CALLEE_SAVE_BITS;
const NO_FP_VALUE_BITS: usize = 8;

const WITH_FP_CALLEE_SAVE_BITS: usize = 3;
const WITH_FP_VALUE_SHIFT: usize = CALLEE_SAVE_SHIFT + WITH_FP_CALLEE_SAVE_BITS;
const WITH_FP_VALUE_BITS: usize = 6;

const ENTRY_SIZE_BITS: u32 = 3;
const NO_FP_ENTRY_SIZE_SHIFT: u32 = 14;
const NO_FP_PINNED: u32 = 1 << 17;
const NO_FP_FRAME_SIZE_SHIFT: u32 = 22;
const WITH_FP_ENTRY_SIZE_SHIFT: u32 = 11;
const WITH_FP_PINNED: u32 = 1 << 14;

/// The overflow record. Its layout is shared with the code generator.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OverflowFrameDescriptor {
    pub mask: usize,
    pub variable_data: u32,
}

// A word followed by a 32 bit field, padded to two words.
static_assertions::const_assert_eq!(
    std::mem::size_of::<OverflowFrameDescriptor>(),
    2 * BYTES_IN_WORD
);

impl OverflowFrameDescriptor {
    pub const fn new(mask: usize, variable_data: u32) -> Self {
        Self {
            mask,
            variable_data,
        }
    }

    pub const fn is_frame_pointer_omitted(&self) -> bool {
        self.mask & FRAME_POINTER_OMITTED != 0
    }

    pub const fn has_transition_record(&self) -> bool {
        self.mask & HAS_TRANSITION_RECORD != 0
    }

    pub const fn callee_save_mask_no_fp(&self) -> RootMask {
        RootMask::from_bits((self.mask >> CALLEE_SAVE_SHIFT) & ((1 << NO_FP_CALLEE_SAVE_BITS) - 1))
    }

    pub const fn callee_save_value_mask_no_fp(&self) -> RootMask {
        RootMask::from_bits((self.mask >> NO_FP_VALUE_SHIFT) & ((1 << NO_FP_VALUE_BITS) - 1))
    }

    /// The frame size in words.
    pub const fn frame_size_no_fp(&self) -> usize {
        (self.variable_data >> NO_FP_FRAME_SIZE_SHIFT) as usize
    }

    /// The size of each entry in the frame's out-of-line slot table.
    pub const fn entry_size_no_fp(&self) -> usize {
        ((self.variable_data >> NO_FP_ENTRY_SIZE_SHIFT) & ((1 << ENTRY_SIZE_BITS) - 1)) as usize
    }

    /// Does the frame hold pinned pointers?
    pub const fn has_pinned_pointers_no_fp(&self) -> bool {
        self.variable_data & NO_FP_PINNED != 0
    }

    pub const fn callee_save_mask_with_fp(&self) -> RootMask {
        RootMask::from_bits(
            (self.mask >> CALLEE_SAVE_SHIFT) & ((1 << WITH_FP_CALLEE_SAVE_BITS) - 1),
        )
    }

    pub const fn callee_save_value_mask_with_fp(&self) -> RootMask {
        RootMask::from_bits((self.mask >> WITH_FP_VALUE_SHIFT) & ((1 << WITH_FP_VALUE_BITS) - 1))
    }

    pub const fn entry_size_with_fp(&self) -> usize {
        ((self.variable_data >> WITH_FP_ENTRY_SIZE_SHIFT) & ((1 << ENTRY_SIZE_BITS) - 1)) as usize
    }

    pub const fn has_pinned_pointers_with_fp(&self) -> bool {
        self.variable_data & WITH_FP_PINNED != 0
    }
}
