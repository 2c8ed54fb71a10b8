// Binary trie blob container: header parsing and validation
//
// Layout:
// - bytes 0..4:   cookie1 (magic number)
// - bytes 4..8:   cookie2 (magic number)
// - bytes 8..12:  format version
// - bytes 12..16: record count
// - bytes 16..:   `record count` records of 12 bytes each
//
// All integers are little-endian.

use crate::TrieError;

const COOKIE1: u32 = 0x4258_454C; // "LEXB"
const COOKIE2: u32 = 0x0001_7A7C;

/// Current blob format version.
pub const VERSION: u32 = 1;

/// Size of the blob header in bytes.
pub const HEADER_SIZE: usize = 16;

/// Parsed blob header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlobHeader {
    pub version: u32,
    pub record_count: u32,
}

fn read_u32(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}

/// Parse and validate the 16-byte blob header.
pub fn parse_header(data: &[u8]) -> Result<BlobHeader, TrieError> {
    if data.len() < HEADER_SIZE {
        return Err(TrieError::TooShort {
            expected: HEADER_SIZE,
            actual: data.len(),
        });
    }

    if read_u32(data, 0) != COOKIE1 || read_u32(data, 4) != COOKIE2 {
        return Err(TrieError::InvalidMagic);
    }

    let version = read_u32(data, 8);
    if version != VERSION {
        return Err(TrieError::UnsupportedVersion(version));
    }

    Ok(BlobHeader {
        version,
        record_count: read_u32(data, 12),
    })
}

/// Encode a header for `record_count` records.
pub fn write_header(record_count: u32) -> [u8; HEADER_SIZE] {
    let mut buf = [0u8; HEADER_SIZE];
    buf[..4].copy_from_slice(&COOKIE1.to_le_bytes());
    buf[4..8].copy_from_slice(&COOKIE2.to_le_bytes());
    buf[8..12].copy_from_slice(&VERSION.to_le_bytes());
    buf[12..16].copy_from_slice(&record_count.to_le_bytes());
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_round_trip() {
        let buf = write_header(42);
        let header = parse_header(&buf).unwrap();
        assert_eq!(header.version, VERSION);
        assert_eq!(header.record_count, 42);
    }

    #[test]
    fn reject_too_short() {
        let err = parse_header(&[0u8; 8]).unwrap_err();
        assert!(matches!(
            err,
            TrieError::TooShort {
                expected: 16,
                actual: 8
            }
        ));
    }

    #[test]
    fn reject_invalid_magic() {
        let mut buf = write_header(1);
        buf[0] = 0xFF;
        assert!(matches!(parse_header(&buf), Err(TrieError::InvalidMagic)));
    }

    #[test]
    fn reject_unknown_version() {
        let mut buf = write_header(1);
        buf[8..12].copy_from_slice(&7u32.to_le_bytes());
        assert!(matches!(
            parse_header(&buf),
            Err(TrieError::UnsupportedVersion(7))
        ));
    }

    #[test]
    fn header_with_trailing_data() {
        let mut data = write_header(3).to_vec();
        data.extend_from_slice(&[0u8; 36]);
        assert_eq!(parse_header(&data).unwrap().record_count, 3);
    }
}
