//! Stack frame descriptors for precise root scanning.
//!
//! The code generator emits one descriptor word per call site. The stack walker decodes it to
//! find which words of the activation record hold references. Decoding is pure bit extraction:
//! every bit pattern decodes to something, and nothing here needs synchronization.

mod compressed;
mod overflow;

use crate::util::constants::BITS_IN_WORD;
use crate::util::conversions;

pub use compressed::CompressedFrameDescriptor;
pub use overflow::OverflowFrameDescriptor;

/// The two frame layouts. A frame either keeps a frame pointer or omits it, and the meaning of
/// the descriptor bits above the common fields depends on which.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FrameLayout {
    NoFramePointer,
    WithFramePointer,
}

impl FrameLayout {
    pub const fn from_frame_pointer_omitted(omitted: bool) -> Self {
        if omitted {
            FrameLayout::NoFramePointer
        } else {
            FrameLayout::WithFramePointer
        }
    }

    /// The number of filler slots between the callee-save area and the scanned region, above it.
    pub const fn in_between_slots_above(self) -> usize {
        match self {
            // The return address.
            FrameLayout::NoFramePointer => 1,
            // The return address and the saved frame pointer.
            FrameLayout::WithFramePointer => 2,
        }
    }

    /// The number of filler slots below the scanned region.
    pub const fn in_between_slots_below(self) -> usize {
        0
    }
}

/// A set of slot indices in a frame, one bit per slot. Bit `i` set means slot `i` holds a
/// reference (or, for a value mask, a non-reference that must be skipped).
#[repr(transparent)]
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct RootMask(usize);

impl RootMask {
    pub const EMPTY: RootMask = RootMask(0);

    pub const fn from_bits(bits: usize) -> Self {
        RootMask(bits)
    }

    pub const fn bits(self) -> usize {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, slot: usize) -> bool {
        slot < BITS_IN_WORD && self.0 & (1 << slot) != 0
    }

    pub const fn count(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterate over the set slot indices, lowest first.
    pub fn iter(self) -> RootMaskIter {
        RootMaskIter(self.0)
    }
}

impl std::fmt::Debug for RootMask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RootMask({:#b})", self.0)
    }
}

impl IntoIterator for RootMask {
    type Item = usize;
    type IntoIter = RootMaskIter;

    fn into_iter(self) -> RootMaskIter {
        self.iter()
    }
}

pub struct RootMaskIter(usize);

impl Iterator for RootMaskIter {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.0 == 0 {
            return None;
        }
        let slot = self.0.trailing_zeros() as usize;
        // Clear the lowest set bit.
        self.0 &= self.0 - 1;
        Some(slot)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.0.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for RootMaskIter {}

/// A frame descriptor, tagged by its encoding.
#[derive(Copy, Clone, Debug)]
pub enum FrameDescriptor<'a> {
    /// The word encodes the frame itself.
    Compact(CompressedFrameDescriptor),
    /// The word points to an out-of-line record.
    Overflow(&'a OverflowFrameDescriptor),
}

impl FrameDescriptor<'static> {
    /// Classify a raw descriptor word from the code generator's tables.
    ///
    /// # Safety
    /// If bit 0 of `word` is clear, `word` must be the address of a valid
    /// [`OverflowFrameDescriptor`] that is never freed.
    pub unsafe fn from_raw(word: usize) -> Self {
        let compressed = CompressedFrameDescriptor::from_raw(word);
        if compressed.is_compressed() {
            FrameDescriptor::Compact(compressed)
        } else {
            FrameDescriptor::Overflow(compressed.overflow_descriptor())
        }
    }
}

impl<'a> FrameDescriptor<'a> {
    pub fn from_overflow(overflow: &'a OverflowFrameDescriptor) -> Self {
        FrameDescriptor::Overflow(overflow)
    }

    pub fn is_compressed(&self) -> bool {
        matches!(self, FrameDescriptor::Compact(_))
    }

    pub fn is_frame_pointer_omitted(&self) -> bool {
        match self {
            FrameDescriptor::Compact(d) => d.is_frame_pointer_omitted(),
            FrameDescriptor::Overflow(o) => o.is_frame_pointer_omitted(),
        }
    }

    pub fn has_transition_record(&self) -> bool {
        match self {
            FrameDescriptor::Compact(d) => d.has_transition_record(),
            FrameDescriptor::Overflow(o) => o.has_transition_record(),
        }
    }

    /// The layout recorded in the descriptor itself.
    pub fn layout(&self) -> FrameLayout {
        FrameLayout::from_frame_pointer_omitted(self.is_frame_pointer_omitted())
    }

    /// Decode every field for the given layout.
    pub fn decode(&self, layout: FrameLayout) -> FrameInfo {
        let mut info = FrameInfo {
            layout,
            frame_pointer_omitted: self.is_frame_pointer_omitted(),
            has_transition_record: self.has_transition_record(),
            stack_arg_size: None,
            argument_mask: None,
            callee_save_mask: RootMask::EMPTY,
            callee_save_value_mask: RootMask::EMPTY,
            frame_size: None,
            entry_size: None,
            has_pinned_pointers: false,
            in_between_slots_above: layout.in_between_slots_above(),
            in_between_slots_below: layout.in_between_slots_below(),
        };
        match (self, layout) {
            (FrameDescriptor::Compact(d), FrameLayout::NoFramePointer) => {
                info.stack_arg_size = Some(d.stack_arg_size());
                info.argument_mask = Some(d.argument_mask_no_fp());
                info.callee_save_mask = d.callee_save_mask_no_fp();
                info.callee_save_value_mask = d.callee_save_value_mask_no_fp();
                info.frame_size = Some(d.frame_size_no_fp());
            }
            (FrameDescriptor::Compact(d), FrameLayout::WithFramePointer) => {
                info.stack_arg_size = Some(d.stack_arg_size());
                info.argument_mask = Some(d.argument_mask_with_fp());
                info.callee_save_mask = d.callee_save_mask_with_fp();
                info.callee_save_value_mask = d.callee_save_value_mask_with_fp();
            }
            (FrameDescriptor::Overflow(o), FrameLayout::NoFramePointer) => {
                info.callee_save_mask = o.callee_save_mask_no_fp();
                info.callee_save_value_mask = o.callee_save_value_mask_no_fp();
                info.frame_size = Some(o.frame_size_no_fp());
                info.entry_size = Some(o.entry_size_no_fp());
                info.has_pinned_pointers = o.has_pinned_pointers_no_fp();
            }
            (FrameDescriptor::Overflow(o), FrameLayout::WithFramePointer) => {
                info.callee_save_mask = o.callee_save_mask_with_fp();
                info.callee_save_value_mask = o.callee_save_value_mask_with_fp();
                info.entry_size = Some(o.entry_size_with_fp());
                info.has_pinned_pointers = o.has_pinned_pointers_with_fp();
            }
        }
        info
    }
}

/// The decoded fields of a frame descriptor. A field is `None` if the encoding has no room for
/// it in this layout.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FrameInfo {
    pub layout: FrameLayout,
    pub frame_pointer_omitted: bool,
    pub has_transition_record: bool,
    /// In words.
    pub stack_arg_size: Option<usize>,
    pub argument_mask: Option<RootMask>,
    pub callee_save_mask: RootMask,
    /// Callee-save slots holding non-reference values.
    pub callee_save_value_mask: RootMask,
    /// In words.
    pub frame_size: Option<usize>,
    pub entry_size: Option<usize>,
    pub has_pinned_pointers: bool,
    pub in_between_slots_above: usize,
    pub in_between_slots_below: usize,
}

impl FrameInfo {
    /// The frame size in bytes, if the descriptor records it.
    pub fn frame_size_in_bytes(&self) -> Option<usize> {
        self.frame_size.map(conversions::words_to_bytes)
    }

    /// The size of the stack arguments in bytes, if the descriptor records it.
    pub fn stack_arg_size_in_bytes(&self) -> Option<usize> {
        self.stack_arg_size.map(conversions::words_to_bytes)
    }
}
