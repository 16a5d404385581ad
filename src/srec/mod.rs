//! Facilities for parsing Motorola S-record transfer lines.
//!
//! A record line is an `S` tag, a type digit, and a run of hex digit
//! pairs: a one-byte count, an address whose width depends on the type, an
//! optional data payload, and a one-byte checksum.  The count covers the
//! address, data, and checksum bytes.

use std::fmt;

//===========================================================================//

/// Broad classification of a transfer record.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RecordKind {
    /// Start-of-transfer header (`S0`).
    Header,
    /// Data payload addressed with a 32-bit address (`S3`), the only data
    /// width this programmer speaks.
    Data,
    /// End-of-transfer terminator (`S7`).
    Terminator,
    /// A well-formed record of a type the programmer does not use.
    Other,
}

/// The structured fields of one transfer record line.
///
/// Address and data are kept as hex text; decoding them into integers and
/// bytes is the consumer's business.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RawRecord {
    /// Broad classification of the record.
    pub kind: RecordKind,
    /// The record's type tag, e.g. `"S3"`.
    pub tag: String,
    /// The declared byte count (address + data + checksum bytes).
    pub declared_len: usize,
    /// The address field, as hex text.
    pub addr: String,
    /// The data field, as hex text (two digits per byte).
    pub data: String,
    /// The record's checksum byte.
    pub checksum: u8,
}

//===========================================================================//

/// An error encountered while parsing a transfer record line.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RecordError {
    /// The line does not begin with `S` followed by a known type digit.
    BadTag {
        /// The malformed or unknown tag text.
        tag: String,
    },
    /// The line contains a character that is not a hexadecimal digit.
    BadDigit {
        /// The offending character.
        digit: char,
    },
    /// The line is shorter than its smallest legal form.
    Truncated {
        /// The number of characters actually present.
        len: usize,
    },
    /// A declared length disagrees with the length actually present.
    CountMismatch {
        /// The declared byte count.
        declared: usize,
        /// The byte count actually present.
        actual: usize,
    },
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordError::BadTag { tag } => {
                write!(f, "not a record tag: {tag:?}")
            }
            RecordError::BadDigit { digit } => {
                write!(f, "not a hex digit: {digit:?}")
            }
            RecordError::Truncated { len } => {
                write!(f, "record truncated at {len} characters")
            }
            RecordError::CountMismatch { declared, actual } => write!(
                f,
                "record declares {declared} bytes but carries {actual}"
            ),
        }
    }
}

impl std::error::Error for RecordError {}

//===========================================================================//

/// The collaborator contract for turning raw lines into validated records.
///
/// The ingestor consumes record lines strictly through this trait: `parse`
/// extracts the structured fields, and `checksum_ok` is an independent
/// predicate over the raw line that must pass before the parsed fields are
/// trusted.
pub trait RecordParser {
    /// Parses one line into its structured fields.
    fn parse(&self, line: &str) -> Result<RawRecord, RecordError>;

    /// Returns true if the line's checksum matches its contents.
    fn checksum_ok(&self, line: &str) -> bool;
}

//===========================================================================//

/// Decodes hex text into bytes, two digits per byte.
pub fn decode_hex_bytes(text: &str) -> Result<Vec<u8>, RecordError> {
    let digits: Vec<char> = text.chars().collect();
    if digits.len() % 2 != 0 {
        return Err(RecordError::Truncated { len: digits.len() });
    }
    let mut bytes = Vec::with_capacity(digits.len() / 2);
    for pair in digits.chunks(2) {
        bytes.push((hex_value(pair[0])? << 4) | hex_value(pair[1])?);
    }
    Ok(bytes)
}

/// Decodes an address field of up to eight hex digits.
pub fn decode_hex_u32(text: &str) -> Result<u32, RecordError> {
    let digits: Vec<char> = text.chars().collect();
    if digits.len() > 8 {
        return Err(RecordError::CountMismatch {
            declared: 8,
            actual: digits.len(),
        });
    }
    let mut value = 0u32;
    for &digit in &digits {
        value = (value << 4) | u32::from(hex_value(digit)?);
    }
    Ok(value)
}

fn hex_value(digit: char) -> Result<u8, RecordError> {
    digit
        .to_digit(16)
        .map(|value| value as u8)
        .ok_or(RecordError::BadDigit { digit })
}

/// Decodes the hex digit pair at `index`.
fn byte_at(chars: &[char], index: usize) -> Result<u8, RecordError> {
    Ok((hex_value(chars[index])? << 4) | hex_value(chars[index + 1])?)
}

/// Returns the number of address bytes for a record type digit.
fn addr_len(digit: char) -> Option<usize> {
    match digit {
        '0' | '1' | '5' | '9' => Some(2),
        '2' | '6' | '8' => Some(3),
        '3' | '7' => Some(4),
        _ => None,
    }
}

fn classify(tag: &str) -> RecordKind {
    match tag {
        "S0" => RecordKind::Header,
        "S3" => RecordKind::Data,
        "S7" => RecordKind::Terminator,
        _ => RecordKind::Other,
    }
}

//===========================================================================//

/// The production parser for Motorola S-record lines.
#[derive(Clone, Copy, Debug, Default)]
pub struct SrecParser;

impl SrecParser {
    /// Returns a new S-record parser.
    pub fn new() -> SrecParser {
        SrecParser
    }
}

impl RecordParser for SrecParser {
    fn parse(&self, line: &str) -> Result<RawRecord, RecordError> {
        let chars: Vec<char> = line.trim().chars().collect();
        // Smallest legal record: tag, count, 2-byte address, checksum.
        if chars.len() < 10 {
            return Err(RecordError::Truncated { len: chars.len() });
        }
        let tag: String = chars[..2].iter().collect();
        if chars[0] != 'S' {
            return Err(RecordError::BadTag { tag });
        }
        let Some(addr_bytes) = addr_len(chars[1]) else {
            return Err(RecordError::BadTag { tag });
        };
        if chars.len() % 2 != 0 {
            return Err(RecordError::Truncated { len: chars.len() });
        }
        let declared_len = usize::from(byte_at(&chars, 2)?);
        let actual = (chars.len() - 4) / 2;
        if actual != declared_len {
            return Err(RecordError::CountMismatch {
                declared: declared_len,
                actual,
            });
        }
        if declared_len < addr_bytes + 1 {
            return Err(RecordError::Truncated { len: chars.len() });
        }
        let addr: String = chars[4..4 + 2 * addr_bytes].iter().collect();
        let data: String =
            chars[4 + 2 * addr_bytes..chars.len() - 2].iter().collect();
        let checksum = byte_at(&chars, chars.len() - 2)?;
        // Hex validity of every field is part of the structure.
        decode_hex_u32(&addr)?;
        decode_hex_bytes(&data)?;
        Ok(RawRecord {
            kind: classify(&tag),
            tag,
            declared_len,
            addr,
            data,
            checksum,
        })
    }

    fn checksum_ok(&self, line: &str) -> bool {
        let chars: Vec<char> = line.trim().chars().collect();
        if chars.len() < 10 || chars.len() % 2 != 0 {
            return false;
        }
        // Sum every byte from the count field through the data field; the
        // final byte must be the one's complement of the low byte.
        let mut sum: u32 = 0;
        for index in (2..chars.len() - 2).step_by(2) {
            match byte_at(&chars, index) {
                Ok(byte) => sum += u32::from(byte),
                Err(_) => return false,
            }
        }
        match byte_at(&chars, chars.len() - 2) {
            Ok(checksum) => checksum == !(sum as u8),
            Err(_) => false,
        }
    }
}

//===========================================================================//


//===========================================================================//
