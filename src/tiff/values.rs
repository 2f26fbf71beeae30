//! TIFF tag value reading.
//!
//! Decoded entries carry either their value bytes inline or an offset to
//! them. This module resolves both cases to typed values: inline values are
//! served from the entry, offset values are fetched with one follow-up range
//! request sized from the entry's field type and count.

use bytes::Bytes;

use crate::error::TiffError;
use crate::io::RangeReader;

use super::entry::{EntryValue, IfdEntry};
use super::header::{ByteOrder, TiffHeader};
use super::tags::FieldType;

/// Reads tag values from a TIFF file.
///
/// Combines a RangeReader with the session header so every decode respects
/// the file's byte order.
pub struct ValueReader<'a, R: RangeReader + ?Sized> {
    reader: &'a R,
    header: &'a TiffHeader,
}

impl<'a, R: RangeReader + ?Sized> ValueReader<'a, R> {
    /// Create a new ValueReader.
    pub fn new(reader: &'a R, header: &'a TiffHeader) -> Self {
        Self { reader, header }
    }

    /// Get the byte order from the header.
    #[inline]
    pub fn byte_order(&self) -> ByteOrder {
        self.header.byte_order
    }

    /// Read the raw value bytes for an entry.
    ///
    /// Inline values are returned directly; offset values are fetched from
    /// the file in a single range request.
    pub async fn read_bytes(&self, entry: &IfdEntry) -> Result<Bytes, TiffError> {
        match &entry.value {
            EntryValue::Inline(bytes) => Ok(bytes.clone()),
            EntryValue::Offset(offset) => {
                let size = entry.value_byte_size() as usize;
                let bytes = self.reader.read_exact_at(*offset, size).await?;
                Ok(bytes)
            }
        }
    }

    /// Read a single u32 value from an entry.
    ///
    /// Handles Short and Long field types, converting as needed.
    pub async fn read_u32(&self, entry: &IfdEntry) -> Result<u32, TiffError> {
        if entry.count != 1 {
            return Err(TiffError::InvalidTagValue {
                tag: entry.tag,
                message: format!("expected count 1, got {}", entry.count),
            });
        }

        let bytes = self.read_bytes(entry).await?;
        let byte_order = self.header.byte_order;

        match entry.field_type {
            FieldType::Short => Ok(byte_order.read_u16(&bytes) as u32),
            FieldType::Long => Ok(byte_order.read_u32(&bytes)),
            other => Err(TiffError::InvalidTagValue {
                tag: entry.tag,
                message: format!("expected Short or Long, got {:?}", other),
            }),
        }
    }

    /// Read a single u64 value from an entry.
    ///
    /// Handles Short, Long, and Long8 field types, converting as needed.
    pub async fn read_u64(&self, entry: &IfdEntry) -> Result<u64, TiffError> {
        if entry.count != 1 {
            return Err(TiffError::InvalidTagValue {
                tag: entry.tag,
                message: format!("expected count 1, got {}", entry.count),
            });
        }

        let bytes = self.read_bytes(entry).await?;
        let byte_order = self.header.byte_order;

        match entry.field_type {
            FieldType::Short => Ok(byte_order.read_u16(&bytes) as u64),
            FieldType::Long => Ok(byte_order.read_u32(&bytes) as u64),
            FieldType::Long8 => Ok(byte_order.read_u64(&bytes)),
            other => Err(TiffError::InvalidTagValue {
                tag: entry.tag,
                message: format!("expected Short, Long, or Long8, got {:?}", other),
            }),
        }
    }

    /// Read an array of u64 values from an entry.
    ///
    /// This is the primary method for reading TileOffsets and TileByteCounts.
    /// The entire array is fetched in a single range request.
    pub async fn read_u64_array(&self, entry: &IfdEntry) -> Result<Vec<u64>, TiffError> {
        let count = entry.count as usize;
        if count == 0 {
            return Ok(Vec::new());
        }

        let bytes = self.read_bytes(entry).await?;
        let byte_order = self.header.byte_order;

        let mut values = Vec::with_capacity(count);

        match entry.field_type {
            FieldType::Short => {
                for i in 0..count {
                    values.push(byte_order.read_u16(&bytes[i * 2..]) as u64);
                }
            }
            FieldType::Long => {
                for i in 0..count {
                    values.push(byte_order.read_u32(&bytes[i * 4..]) as u64);
                }
            }
            FieldType::Long8 => {
                for i in 0..count {
                    values.push(byte_order.read_u64(&bytes[i * 8..]));
                }
            }
            other => {
                return Err(TiffError::InvalidTagValue {
                    tag: entry.tag,
                    message: format!("expected Short, Long, or Long8 for array, got {:?}", other),
                });
            }
        }

        Ok(values)
    }

    /// Read an array of u32 values from an entry.
    pub async fn read_u32_array(&self, entry: &IfdEntry) -> Result<Vec<u32>, TiffError> {
        let count = entry.count as usize;
        if count == 0 {
            return Ok(Vec::new());
        }

        let bytes = self.read_bytes(entry).await?;
        let byte_order = self.header.byte_order;

        let mut values = Vec::with_capacity(count);

        match entry.field_type {
            FieldType::Short => {
                for i in 0..count {
                    values.push(byte_order.read_u16(&bytes[i * 2..]) as u32);
                }
            }
            FieldType::Long => {
                for i in 0..count {
                    values.push(byte_order.read_u32(&bytes[i * 4..]));
                }
            }
            other => {
                return Err(TiffError::InvalidTagValue {
                    tag: entry.tag,
                    message: format!("expected Short or Long for u32 array, got {:?}", other),
                });
            }
        }

        Ok(values)
    }

    /// Read a string value from an entry (ASCII type).
    ///
    /// The string is expected to be null-terminated. The null terminator
    /// is stripped from the result.
    pub async fn read_string(&self, entry: &IfdEntry) -> Result<String, TiffError> {
        if entry.field_type != FieldType::Ascii {
            return Err(TiffError::InvalidTagValue {
                tag: entry.tag,
                message: format!("expected Ascii type for string, got {:?}", entry.field_type),
            });
        }

        let bytes = self.read_bytes(entry).await?;

        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        let s = String::from_utf8_lossy(&bytes[..end]).into_owned();

        Ok(s)
    }

    /// Read raw bytes from an entry (for UNDEFINED or opaque data).
    pub async fn read_raw_bytes(&self, entry: &IfdEntry) -> Result<Bytes, TiffError> {
        self.read_bytes(entry).await
    }
}

// =============================================================================
// Tests
// =============================================================================
