//! IFD entry decoding.
//!
//! An IFD entry is a fixed-size record identifying one metadata field:
//!
//! ```text
//! +----------------+--------------+------------------------------------+
//! |          offset|          size|                               value|
//! +----------------+--------------+------------------------------------+
//! |               0|             2|                            tag code|
//! |               2|             2|                       field type id|
//! |               4|   offset_size|                         value count|
//! |  4+offset_size |   offset_size|  value bytes, or offset to them if |
//! |                |              |  the value exceeds the field width |
//! +----------------+--------------+------------------------------------+
//! ```
//!
//! Whether the last field holds the value itself or an offset to it is not
//! flagged on disk; it must be recomputed from the field type, the count,
//! and the variant's offset width.

use bytes::Bytes;

use crate::error::TiffError;

use super::header::{ByteOrder, FieldWidths};
use super::tags::{FieldType, TiffTag};

// =============================================================================
// EntryValue
// =============================================================================

/// Location of an entry's value bytes.
///
/// Exactly one branch holds for any decoded entry: values whose total byte
/// size fits within the variant's offset width are stored inline in the
/// record, everything larger lives behind an offset elsewhere in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryValue {
    /// Raw value bytes stored directly in the record, already truncated to
    /// the computed value size (empty for count 0)
    Inline(Bytes),

    /// Byte offset in the file where the value bytes live
    Offset(u64),
}

// =============================================================================
// IfdEntry
// =============================================================================

/// One decoded IFD entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfdEntry {
    /// Numeric tag code
    pub tag: u16,

    /// Field type of the value elements
    pub field_type: FieldType,

    /// Number of value elements
    pub count: u64,

    /// Inline value bytes or offset to them
    pub value: EntryValue,
}

impl IfdEntry {
    /// Decode one fixed-size entry record.
    ///
    /// `record` must be exactly `widths.entry_size()` bytes. An unknown
    /// field type id yields `UnknownFieldType`, which callers treat as a
    /// per-entry condition: drop the entry, keep the directory.
    pub fn parse(
        record: &[u8],
        byte_order: ByteOrder,
        widths: FieldWidths,
    ) -> Result<Self, TiffError> {
        debug_assert_eq!(record.len(), widths.entry_size());

        let offset_size = widths.offset_size;

        let tag = byte_order.read_u16(&record[0..2]);
        let type_id = byte_order.read_u16(&record[2..4]);
        let field_type =
            FieldType::from_u16(type_id).ok_or(TiffError::UnknownFieldType(type_id))?;

        let count = byte_order.read_uint(&record[4..4 + offset_size], offset_size);
        let slot = &record[4 + offset_size..4 + 2 * offset_size];

        let value_size = field_type.size_in_bytes() as u64 * count;

        // Inline values are left-justified in the slot, in file byte order;
        // the raw bytes are the value. Count 0 is an empty inline value.
        let value = if value_size <= offset_size as u64 {
            EntryValue::Inline(Bytes::copy_from_slice(&slot[..value_size as usize]))
        } else {
            EntryValue::Offset(byte_order.read_uint(slot, offset_size))
        };

        Ok(IfdEntry {
            tag,
            field_type,
            count,
            value,
        })
    }

    /// Total byte size of this entry's value.
    #[inline]
    pub fn value_byte_size(&self) -> u64 {
        self.field_type.size_in_bytes() as u64 * self.count
    }

    /// Whether the value is stored inline in the record.
    #[inline]
    pub fn is_inline(&self) -> bool {
        matches!(self.value, EntryValue::Inline(_))
    }

    /// The inline value bytes, if stored inline.
    pub fn inline_bytes(&self) -> Option<&Bytes> {
        match &self.value {
            EntryValue::Inline(bytes) => Some(bytes),
            EntryValue::Offset(_) => None,
        }
    }

    /// The value offset, if stored out of line.
    pub fn value_offset(&self) -> Option<u64> {
        match self.value {
            EntryValue::Inline(_) => None,
            EntryValue::Offset(offset) => Some(offset),
        }
    }

    /// Symbolic name for the tag code, if it is a well-known tag.
    pub fn tag_name(&self) -> Option<TiffTag> {
        TiffTag::from_u16(self.tag)
    }
}

// =============================================================================
// Tests
// =============================================================================
