use super::{MemoryMap, MemoryUnit};
use std::fmt;
use std::io;

//===========================================================================//

const ROW_LEN: usize = 16;

const SEPARATOR: &str = "================================";

/// Writes one hexdump row: address, hex bytes, ASCII gutter.
fn fmt_row(f: &mut fmt::Formatter<'_>, addr: u32, row: &[u8]) -> fmt::Result {
    write!(f, "{addr:08x}: ")?;
    for i in 0..ROW_LEN {
        if i == ROW_LEN / 2 {
            f.write_str(" ")?;
        }
        match row.get(i) {
            Some(byte) => write!(f, "{byte:02x} ")?,
            None => f.write_str("   ")?,
        }
    }
    f.write_str(" |")?;
    for &byte in row {
        let ch = if (0x20..=0x7e).contains(&byte) { byte as char } else { '.' };
        write!(f, "{ch}")?;
    }
    writeln!(f, "|")
}

fn fmt_listing(
    f: &mut fmt::Formatter<'_>,
    start: u32,
    data: &[u8],
) -> fmt::Result {
    for (i, row) in data.chunks(ROW_LEN).enumerate() {
        fmt_row(f, start + (i * ROW_LEN) as u32, row)?;
    }
    Ok(())
}

/// Formats a unit size the way the bus hardware docs write them.
fn size_label(len: usize) -> String {
    if len < 1024 {
        format!("{len}B")
    } else if len < 1024 * 1024 {
        format!("{}kB", len >> 10)
    } else {
        format!("{}MB", len >> 20)
    }
}

//===========================================================================//

impl fmt::Display for MemoryUnit {
    /// Renders the unit's contents as an address-annotated hex listing.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_listing(f, self.start(), self.data())
    }
}

impl fmt::Display for MemoryMap {
    /// Renders every unit's metadata and contents in ascending address
    /// order.  Diagnostic output only.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for unit in self.units() {
            writeln!(f, "{SEPARATOR}")?;
            if unit.description().is_empty() {
                writeln!(f, "{} range", size_label(unit.len()))?;
            } else {
                writeln!(
                    f,
                    "{} \"{}\"",
                    size_label(unit.len()),
                    unit.description()
                )?;
            }
            writeln!(f, "start:  0x{:08x}", unit.start())?;
            writeln!(f, "end:    0x{:08x}", unit.end())?;
            writeln!(f, "length: 0x{:x} ({} bytes)", unit.len(), unit.len())?;
            write!(f, "{unit}")?;
        }
        Ok(())
    }
}

impl MemoryMap {
    /// Writes the textual dump of the whole address space to `writer`.
    pub fn dump_to<W: io::Write>(&self, writer: &mut W) -> io::Result<()> {
        write!(writer, "{self}")
    }
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::size_label;
    use crate::mem::{MemoryMap, MemoryUnit, Tolerance};

    #[test]
    fn size_labels() {
        assert_eq!(size_label(0x10), "16B");
        assert_eq!(size_label(0x1000), "4kB");
        assert_eq!(size_label(0x100000), "1MB");
    }

    #[test]
    fn unit_listing() {
        let mut unit = MemoryUnit::new(0x10, 16, "").unwrap();
        unit.write_block(0x10, b"Hi", Tolerance::Strict).unwrap();
        assert_eq!(
            unit.to_string(),
            "00000010: 48 69 00 00 00 00 00 00  \
             00 00 00 00 00 00 00 00  |Hi..............|\n"
        );
    }

    #[test]
    fn partial_row_is_padded() {
        let unit = MemoryUnit::new(0x00, 4, "").unwrap();
        // Missing bytes pad to the full row width, so the ASCII gutter
        // stays aligned across rows.
        let expected =
            format!("00000000: 00 00 00 00{}|....|\n", " ".repeat(39));
        assert_eq!(unit.to_string(), expected);
    }

    #[test]
    fn map_dump_has_per_unit_headers() {
        let mut map = MemoryMap::new();
        map.add_range(0x10, 16, "scratch").unwrap();
        map.add_range(0x40, 4, "").unwrap();
        let text = map.to_string();
        assert!(text.contains("16B \"scratch\""));
        assert!(text.contains("start:  0x00000010"));
        assert!(text.contains("end:    0x0000001f"));
        assert!(text.contains("length: 0x10 (16 bytes)"));
        assert!(text.contains("4B range"));
        assert!(text.contains("00000040: 00 00 00 00"));
    }

    #[test]
    fn dump_to_writes_the_display_form() {
        let mut map = MemoryMap::new();
        map.add_range(0x10, 16, "scratch").unwrap();
        let mut buffer = Vec::new();
        map.dump_to(&mut buffer).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), map.to_string());
    }
}

//===========================================================================//
