//! The one-word frame descriptor emitted for each call site.
//!
//! If bit 0 is set, the word encodes the frame directly. Otherwise the word is a pointer to an
//! [`OverflowFrameDescriptor`]. Bit layout of the compact form:
//!
//! | Bits   | Common                 | No frame pointer       | With frame pointer     |
//! |--------|------------------------|------------------------|------------------------|
//! | 0      | is compressed          |                        |                        |
//! | 1      | frame pointer omitted  |                        |                        |
//! | 2..6   | stack arg size (words) |                        |                        |
//! | 6      | has transition record  |                        |                        |
//! | 7..    |                        | callee-save mask 7..11 | callee-save mask 7..10 |
//! |        |                        | value mask 11..19      | value mask 10..16      |
//! |        |                        | frame size 19..24      | argument mask 16..     |
//! |        |                        | argument mask 24..     |                        |

use super::overflow::OverflowFrameDescriptor;
use super::RootMask;

const IS_COMPRESSED: usize = 1 << 0;
const FRAME_POINTER_OMITTED: usize = 1 << 1;
const HAS_TRANSITION_RECORD: usize = 1 << 6;

const STACK_ARG_SIZE_SHIFT: usize = 2;
const STACK_ARG_SIZE_BITS: usize = 4;

const CALLEE_SAVE_SHIFT: usize = 7;

// No frame pointer
const NO_FP_CALLEE_SAVE_BITS: usize = 4;
const NO_FP_VALUE_SHIFT: usize = CALLEE_SAVE_SHIFT + NO_FP_CALLEE_SAVE_BITS;
const NO_FP_VALUE_BITS: usize = 8;
const NO_FP_FRAME_SIZE_SHIFT: usize = NO_FP_VALUE_SHIFT + NO_FP_VALUE_BITS;
const NO_FP_FRAME_SIZE_BITS: usize = 5;
const NO_FP_ARGUMENT_SHIFT: usize = NO_FP_FRAME_SIZE_SHIFT + NO_FP_FRAME_SIZE_BITS;

// With frame pointer
const WITH_FP_CALLEE_SAVE_BITS: usize = 3;
const WITH_FP_VALUE_SHIFT: usize = CALLEE_SAVE_SHIFT + WITH_FP_CALLEE_SAVE_BITS;
const WITH_FP_VALUE_BITS: usize = 6;
const WITH_FP_ARGUMENT_SHIFT: usize = WITH_FP_VALUE_SHIFT + WITH_FP_VALUE_BITS;

const fn field(word: usize, shift: usize, bits: usize) -> usize {
    (word >> shift) & ((1 << bits) - 1)
}

#[repr(transparent)]
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct CompressedFrameDescriptor(usize);

impl CompressedFrameDescriptor {
    pub const fn from_raw(word: usize) -> Self {
        CompressedFrameDescriptor(word)
    }

    pub const fn as_usize(self) -> usize {
        self.0
    }

    /// Does the word encode the frame directly? If not, it points to an overflow record.
    #[inline(always)]
    pub const fn is_compressed(self) -> bool {
        self.0 & IS_COMPRESSED != 0
    }

    /// Get the overflow record this word points to.
    ///
    /// # Safety
    /// The word must not be compressed, and must point to a valid overflow record that lives at
    /// least as long as `'a`. The code generator's metadata tables are never freed, so `'static`
    /// is the usual choice.
    pub unsafe fn overflow_descriptor<'a>(self) -> &'a OverflowFrameDescriptor {
        debug_assert!(!self.is_compressed());
        &*(self.0 as *const OverflowFrameDescriptor)
    }

    #[inline(always)]
    pub const fn is_frame_pointer_omitted(self) -> bool {
        self.0 & FRAME_POINTER_OMITTED != 0
    }

    /// Is there a transition record in this frame, i.e. is this a boundary between managed and
    /// unmanaged frames?
    #[inline(always)]
    pub const fn has_transition_record(self) -> bool {
        self.0 & HAS_TRANSITION_RECORD != 0
    }

    /// The size of the arguments passed on the stack, in words.
    #[inline(always)]
    pub const fn stack_arg_size(self) -> usize {
        field(self.0, STACK_ARG_SIZE_SHIFT, STACK_ARG_SIZE_BITS)
    }

    pub const fn argument_mask_no_fp(self) -> RootMask {
        RootMask::from_bits(self.0 >> NO_FP_ARGUMENT_SHIFT)
    }

    pub const fn callee_save_value_mask_no_fp(self) -> RootMask {
        RootMask::from_bits(field(self.0, NO_FP_VALUE_SHIFT, NO_FP_VALUE_BITS))
    }

    pub const fn callee_save_mask_no_fp(self) -> RootMask {
        RootMask::from_bits(field(self.0, CALLEE_SAVE_SHIFT, NO_FP_CALLEE_SAVE_BITS))
    }

    /// The frame size in words, not counting the return address.
    pub const fn frame_size_no_fp(self) -> usize {
        field(self.0, NO_FP_FRAME_SIZE_SHIFT, NO_FP_FRAME_SIZE_BITS)
    }

    pub const fn argument_mask_with_fp(self) -> RootMask {
        RootMask::from_bits(self.0 >> WITH_FP_ARGUMENT_SHIFT)
    }

    pub const fn callee_save_value_mask_with_fp(self) -> RootMask {
        RootMask::from_bits(field(self.0, WITH_FP_VALUE_SHIFT, WITH_FP_VALUE_BITS))
    }

    pub const fn callee_save_mask_with_fp(self) -> RootMask {
        RootMask::from_bits(field(self.0, CALLEE_SAVE_SHIFT, WITH_FP_CALLEE_SAVE_BITS))
    }
}

impl std::fmt::Debug for CompressedFrameDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CompressedFrameDescriptor({:#x})", self.0)
    }
}
