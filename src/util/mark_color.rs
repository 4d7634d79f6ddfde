use bytemuck::NoUninit;
use std::fmt;

/// A mark color is an opaque machine word stored in every object header.
///
/// The collector keeps two colors, `marked` and `unmarked`, and swaps their roles at every cycle.
/// An object whose header holds the current `marked` color has been visited in this cycle;
/// after the swap, the same header value reads as `unmarked` without touching the object.
#[repr(transparent)]
#[derive(Copy, Clone, Eq, PartialEq, Hash, NoUninit)]
pub struct MarkColor(usize);

impl MarkColor {
    /// The color that means "marked" when a marking state is created.
    pub const INITIAL_MARKED: MarkColor = MarkColor(0b01);
    /// The color that means "unmarked" when a marking state is created.
    pub const INITIAL_UNMARKED: MarkColor = MarkColor(0b10);

    /// Create a color from its raw header value.
    pub const fn from_raw(raw: usize) -> MarkColor {
        MarkColor(raw)
    }

    /// The raw header value of the color.
    pub const fn as_usize(self) -> usize {
        self.0
    }
}

impl fmt::Debug for MarkColor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "MarkColor({:#b})", self.0)
    }
}

impl fmt::Display for MarkColor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:#b}", self.0)
    }
}
