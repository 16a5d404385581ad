//! Facilities for emulating a byte-addressable memory bus split into
//! disjoint address ranges.

use std::fmt;

mod dump;
mod map;
mod span;
mod unit;

pub use map::{FLASH_BASE, FLASH_LEN, MemoryMap};
pub use span::Span;
pub use unit::{DEFAULT_BLOCK_LEN, MemoryUnit};

//===========================================================================//

/// How a faulting memory access should be treated.
///
/// Every read and write operation takes a `Tolerance` by value.  Strict
/// accesses surface their failure to the caller; lenient accesses swallow
/// it, the way a probing debugger would rather see zeroes than abort.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Tolerance {
    /// Surface the failure to the caller.
    Strict,
    /// Suppress the failure: reads yield `0x00`, writes become no-ops.
    Lenient,
}

//===========================================================================//

/// An error raised by a memory unit or memory map operation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MemError {
    /// An address fell outside the bounds of the addressed unit.
    OutOfRange {
        /// The offending address.
        addr: u32,
        /// The first address of the addressed unit.
        first: u32,
        /// The last address of the addressed unit.
        last: u32,
    },
    /// A single-byte write was given a value that does not fit in a byte.
    ValueOutOfDomain {
        /// The offending value.
        value: u32,
    },
    /// A new range would overlap one already registered in the map.
    RangeConflict {
        /// The first address of the rejected range.
        first: u32,
        /// The last address of the rejected range.
        last: u32,
        /// The first address of the range it collides with.
        existing_first: u32,
        /// The last address of the range it collides with.
        existing_last: u32,
    },
    /// No registered range contains the requested address.
    NoSuchAddress {
        /// The unowned address.
        addr: u32,
    },
    /// A range was declared with zero length, or would extend past the top
    /// of the 32-bit bus.
    InvalidRange {
        /// The declared start address.
        start: u32,
        /// The declared length, in bytes.
        length: u32,
    },
}

impl fmt::Display for MemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemError::OutOfRange { addr, first, last } => write!(
                f,
                "address 0x{addr:08x} out of range 0x{first:08x}..=0x{last:08x}"
            ),
            MemError::ValueOutOfDomain { value } => {
                write!(f, "value 0x{value:x} does not fit in a byte")
            }
            MemError::RangeConflict {
                first,
                last,
                existing_first,
                existing_last,
            } => write!(
                f,
                "range 0x{first:08x}..=0x{last:08x} overlaps existing range \
                 0x{existing_first:08x}..=0x{existing_last:08x}"
            ),
            MemError::NoSuchAddress { addr } => {
                write!(f, "no registered range contains address 0x{addr:08x}")
            }
            MemError::InvalidRange { start, length } => write!(
                f,
                "invalid range: start=0x{start:08x} length={length}"
            ),
        }
    }
}

impl std::error::Error for MemError {}

//===========================================================================//
