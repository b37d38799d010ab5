//! Little-endian binary reader with position tracking.

use crate::KrbError;

/// Cursor over a borrowed byte slice.
///
/// Offsets reported in errors are relative to the start of the slice the
/// reader was created with.
#[derive(Debug, Clone)]
pub struct BinaryReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> BinaryReader<'a> {
    /// Create a new binary reader.
    pub fn new(data: &'a [u8]) -> Self {
        BinaryReader { data, pos: 0 }
    }

    /// Create a reader positioned at `offset` over the same data.
    pub fn at(&self, offset: usize) -> Result<BinaryReader<'a>, KrbError> {
        if offset > self.data.len() {
            return Err(KrbError::UnexpectedEof {
                offset,
                needed: 0,
            });
        }
        Ok(BinaryReader {
            data: self.data,
            pos: offset,
        })
    }

    /// Current position.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Remaining bytes.
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Check if at end.
    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    fn ensure(&self, needed: usize) -> Result<(), KrbError> {
        if self.remaining() < needed {
            return Err(KrbError::UnexpectedEof {
                offset: self.pos,
                needed,
            });
        }
        Ok(())
    }

    /// Read a single byte.
    pub fn read_u8(&mut self) -> Result<u8, KrbError> {
        self.ensure(1)?;
        let b = self.data[self.pos];
        self.pos += 1;
        Ok(b)
    }

    /// Read a little-endian u16.
    pub fn read_u16(&mut self) -> Result<u16, KrbError> {
        let bytes = self.read_bytes(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    /// Read a little-endian u32.
    pub fn read_u32(&mut self) -> Result<u32, KrbError> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Read `len` raw bytes.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], KrbError> {
        self.ensure(len)?;
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    /// Advance past `len` bytes.
    pub fn skip(&mut self, len: usize) -> Result<(), KrbError> {
        self.ensure(len)?;
        self.pos += len;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_little_endian() {
        let data = [0x01, 0x34, 0x12, 0x78, 0x56, 0x34, 0x12];
        let mut reader = BinaryReader::new(&data);
        assert_eq!(reader.read_u8().unwrap(), 1);
        assert_eq!(reader.read_u16().unwrap(), 0x1234);
        assert_eq!(reader.read_u32().unwrap(), 0x1234_5678);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_eof_reports_offset() {
        let data = [0u8; 3];
        let mut reader = BinaryReader::new(&data);
        reader.skip(2).unwrap();
        let err = reader.read_u16().unwrap_err();
        assert_eq!(
            err,
            KrbError::UnexpectedEof {
                offset: 2,
                needed: 2
            }
        );
    }

    #[test]
    fn test_at_repositions() {
        let data = [9u8, 8, 7];
        let reader = BinaryReader::new(&data);
        let mut moved = reader.at(2).unwrap();
        assert_eq!(moved.read_u8().unwrap(), 7);
        assert!(reader.at(4).is_err());
    }
}
