//! Utilities used by the rest of the crate: addresses, colors, options, logging, statistics and
//! the frame descriptor decoder.

/// Address and object reference types.
pub mod address;
/// Constants for bits, bytes and words.
pub mod constants;
/// Word and alignment conversions.
pub mod conversions;
/// Decoding of stack frame descriptors.
pub mod frame_descriptor;
/// Logger initialization.
pub mod logger;
/// The two mark colors.
pub mod mark_color;
/// Wrappers for raw pointers passed from the VM.
pub mod opaque_pointer;
/// Engine options.
pub mod options;
/// Barrier and marking counters.
pub mod statistics;


pub use self::address::Address;
pub use self::address::ObjectReference;
pub use self::mark_color::MarkColor;
pub use self::opaque_pointer::*;
