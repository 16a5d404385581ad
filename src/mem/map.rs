use super::{MemError, MemoryUnit, Span, Tolerance};

//===========================================================================//

/// Base address of the flash region in the standard programmer layout.
pub const FLASH_BASE: u32 = 0x1000_0000;

/// Size in bytes of the flash region in the standard programmer layout.
pub const FLASH_LEN: u32 = 1024 * 1024;

//===========================================================================//

/// An ordered collection of non-overlapping memory units.
///
/// Units are kept sorted by ascending start address, and no two units'
/// inclusive address ranges ever intersect.  Every addressed access is
/// routed to the unit that owns the address.
pub struct MemoryMap {
    units: Vec<MemoryUnit>,
}

impl MemoryMap {
    /// Returns a map with no registered ranges.
    pub fn new() -> MemoryMap {
        MemoryMap { units: Vec::new() }
    }

    /// Returns a map with the standard programmer layout: a single flash
    /// region of [`FLASH_LEN`] bytes at [`FLASH_BASE`].
    pub fn standard() -> MemoryMap {
        let mut map = MemoryMap::new();
        map.add_range(FLASH_BASE, FLASH_LEN, "Flash")
            .expect("standard layout is a valid range");
        map
    }

    /// Registers a new range, keeping the units sorted by start address.
    ///
    /// A candidate whose inclusive interval intersects any existing unit's
    /// is rejected with `RangeConflict` and the map is left unmodified;
    /// sharing a boundary byte is a conflict, while exact adjacency (the
    /// next range starting one past this one's end) is legal.
    pub fn add_range(
        &mut self,
        start: u32,
        length: u32,
        description: &str,
    ) -> Result<(), MemError> {
        let unit = MemoryUnit::new(start, length, description)?;
        let span = unit.span();
        // Scan forward for the insertion point, checking every unit before
        // it for intersection.
        let mut index = self.units.len();
        for (i, existing) in self.units.iter().enumerate() {
            if existing.start() > start {
                index = i;
                break;
            }
            if existing.span().intersects(span) {
                return Err(conflict(span, existing));
            }
        }
        // The scan stops at the successor without having checked it, and
        // the candidate cannot reach any unit beyond it.
        if let Some(next) = self.units.get(index) {
            if next.span().intersects(span) {
                return Err(conflict(span, next));
            }
        }
        self.units.insert(index, unit);
        Ok(())
    }

    /// Returns the unit whose range contains `addr`.
    pub fn find_unit(&self, addr: u32) -> Result<&MemoryUnit, MemError> {
        self.units
            .iter()
            .find(|unit| unit.span().contains(addr))
            .ok_or(MemError::NoSuchAddress { addr })
    }

    fn find_unit_mut(
        &mut self,
        addr: u32,
    ) -> Result<&mut MemoryUnit, MemError> {
        self.units
            .iter_mut()
            .find(|unit| unit.span().contains(addr))
            .ok_or(MemError::NoSuchAddress { addr })
    }

    /// Reads the byte at `addr` from the owning unit.  When no unit owns
    /// the address, a strict read fails with `NoSuchAddress` and a lenient
    /// read yields `0x00`.
    pub fn read(&self, addr: u32, tol: Tolerance) -> Result<u8, MemError> {
        match self.find_unit(addr) {
            Ok(unit) => unit.read(addr, tol),
            Err(_) if tol == Tolerance::Lenient => Ok(0x00),
            Err(err) => Err(err),
        }
    }

    /// Reads `count` consecutive bytes starting at `addr` from the owning
    /// unit.  A block access is bounded by that unit; it never continues
    /// into a neighbor.
    pub fn read_block(
        &self,
        addr: u32,
        count: usize,
        tol: Tolerance,
    ) -> Result<Vec<u8>, MemError> {
        match self.find_unit(addr) {
            Ok(unit) => unit.read_block(addr, count, tol),
            Err(_) if tol == Tolerance::Lenient => Ok(vec![0x00; count]),
            Err(err) => Err(err),
        }
    }

    /// Writes a single byte value at `addr` via the owning unit.  When no
    /// unit owns the address, a strict write fails with `NoSuchAddress` and
    /// a lenient write is a no-op.
    pub fn write(
        &mut self,
        addr: u32,
        value: u32,
        tol: Tolerance,
    ) -> Result<(), MemError> {
        match self.find_unit_mut(addr) {
            Ok(unit) => unit.write(addr, value, tol),
            Err(_) if tol == Tolerance::Lenient => Ok(()),
            Err(err) => Err(err),
        }
    }

    /// Writes `bytes` contiguously starting at `addr` via the owning unit.
    /// The write is all-or-nothing, bounded by that unit.
    pub fn write_block(
        &mut self,
        addr: u32,
        bytes: &[u8],
        tol: Tolerance,
    ) -> Result<(), MemError> {
        match self.find_unit_mut(addr) {
            Ok(unit) => unit.write_block(addr, bytes, tol),
            Err(_) if tol == Tolerance::Lenient => Ok(()),
            Err(err) => Err(err),
        }
    }

    /// Zeroes every unit's buffer; the registered ranges are unchanged.
    pub fn clear(&mut self) {
        for unit in &mut self.units {
            unit.clear();
        }
    }

    /// Returns the registered units, in ascending address order.
    pub fn units(&self) -> &[MemoryUnit] {
        &self.units
    }
}

impl Default for MemoryMap {
    fn default() -> MemoryMap {
        MemoryMap::new()
    }
}

fn conflict(span: Span, existing: &MemoryUnit) -> MemError {
    MemError::RangeConflict {
        first: span.first(),
        last: span.last(),
        existing_first: existing.start(),
        existing_last: existing.end(),
    }
}

//===========================================================================//


//===========================================================================//
