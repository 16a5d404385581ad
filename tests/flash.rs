use flashsim::ingest::{IngestError, Ingestor};
use flashsim::mem::{FLASH_BASE, MemError, MemoryMap, Tolerance};

//===========================================================================//

/// Builds one S-record line with a correct checksum.
fn record(digit: char, addr: u32, addr_bytes: usize, data: &[u8]) -> String {
    let mut body = vec![(addr_bytes + data.len() + 1) as u8];
    body.extend_from_slice(&addr.to_be_bytes()[4 - addr_bytes..]);
    body.extend_from_slice(data);
    let sum: u32 = body.iter().map(|&byte| u32::from(byte)).sum();
    let mut line = format!("S{digit}");
    for byte in &body {
        line.push_str(&format!("{byte:02X}"));
    }
    line.push_str(&format!("{:02X}", !(sum as u8)));
    line
}

fn flash_contents(ingestor: &Ingestor, addr: u32, count: usize) -> Vec<u8> {
    ingestor
        .map()
        .read_block(addr, count, Tolerance::Strict)
        .unwrap()
}

//===========================================================================//

#[test]
fn full_transfer_lands_in_flash() {
    let mut ingestor = Ingestor::new(MemoryMap::standard());
    let lines = [
        record('0', 0, 2, b"hello"),
        record('3', 0x1000_0010, 4, &[0xaa, 0xbb, 0xcc]),
        record('3', 0x1000_0020, 4, &[0x01, 0x02]),
        record('7', FLASH_BASE, 4, &[]),
    ];
    for line in &lines {
        ingestor.ingest_line(line).unwrap();
    }
    assert_eq!(
        flash_contents(&ingestor, 0x1000_0010, 4),
        vec![0xaa, 0xbb, 0xcc, 0x00]
    );
    assert_eq!(
        flash_contents(&ingestor, 0x1000_0020, 2),
        vec![0x01, 0x02]
    );
}

#[test]
fn corrupted_checksum_leaves_memory_blank() {
    let mut ingestor = Ingestor::new(MemoryMap::standard());
    let line = record('3', 0x1000_0010, 4, &[0xaa, 0xbb, 0xcc]);
    // Flip one payload digit without fixing the checksum.
    let corrupted = line.replace("AABBCC", "AABBCD");
    assert_ne!(line, corrupted);
    assert_eq!(
        ingestor.ingest_line(&corrupted),
        Err(IngestError::Checksum)
    );
    assert_eq!(
        flash_contents(&ingestor, 0x1000_0010, 3),
        vec![0x00, 0x00, 0x00]
    );
}

#[test]
fn unsupported_record_type_never_mutates() {
    let mut ingestor = Ingestor::new(MemoryMap::standard());
    ingestor
        .ingest_line(&record('3', 0x1000_0000, 4, &[0x11, 0x22]))
        .unwrap();
    let before = flash_contents(&ingestor, FLASH_BASE, 0x40);

    // A well-formed 16-bit data record; this programmer is 32-bit only.
    let result = ingestor.ingest_line(&record('1', 0x0010, 2, &[0x33]));
    assert_eq!(
        result,
        Err(IngestError::UnsupportedRecord { tag: "S1".to_string() })
    );
    // S5 record-count records are likewise refused.
    let result = ingestor.ingest_line(&record('5', 0x0003, 2, &[]));
    assert_eq!(
        result,
        Err(IngestError::UnsupportedRecord { tag: "S5".to_string() })
    );
    assert_eq!(flash_contents(&ingestor, FLASH_BASE, 0x40), before);
}

#[test]
fn payload_outside_the_layout_is_refused() {
    let mut ingestor = Ingestor::new(MemoryMap::standard());
    let result = ingestor.ingest_line(&record('3', 0x2000_0000, 4, &[0xff]));
    assert_eq!(
        result,
        Err(IngestError::Mem(MemError::NoSuchAddress {
            addr: 0x2000_0000
        }))
    );

    // A payload straddling the end of flash is refused whole.
    let end = FLASH_BASE + 1024 * 1024 - 1;
    let result =
        ingestor.ingest_line(&record('3', end, 4, &[0x01, 0x02, 0x03]));
    assert!(matches!(
        result,
        Err(IngestError::Mem(MemError::OutOfRange { .. }))
    ));
    assert_eq!(flash_contents(&ingestor, end, 1), vec![0x00]);
}

#[test]
fn erase_all_resets_the_address_space() {
    let mut ingestor = Ingestor::new(MemoryMap::standard());
    ingestor
        .ingest_line(&record('3', 0x1000_0010, 4, &[0xaa, 0xbb, 0xcc]))
        .unwrap();
    ingestor.erase_all();
    assert_eq!(
        flash_contents(&ingestor, 0x1000_0010, 3),
        vec![0x00, 0x00, 0x00]
    );
}

//===========================================================================//
