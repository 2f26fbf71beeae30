//! TIFF header reading.
//!
//! This module handles the fixed-offset TIFF and BigTIFF headers, which
//! determine everything about the rest of the parse: byte order, format
//! variant, field widths, and the location of the first IFD.
//!
//! # TIFF Header Structure
//!
//! ## Classic TIFF (8 bytes)
//! ```text
//! Bytes 0-1: Byte order (0x4949 = little-endian "II", 0x4D4D = big-endian "MM")
//! Bytes 2-3: Version (42 = 0x002A)
//! Bytes 4-7: Offset to first IFD (4 bytes)
//! ```
//!
//! ## BigTIFF (16 bytes)
//! ```text
//! Bytes 0-1: Byte order (0x4949 = little-endian "II", 0x4D4D = big-endian "MM")
//! Bytes 2-3: Version (43 = 0x002B)
//! Bytes 4-5: Offset byte size (must be 8)
//! Bytes 6-7: Reserved (must be 0)
//! Bytes 8-15: Offset to first IFD (8 bytes)
//! ```

use crate::error::TiffError;
use crate::io::RangeReader;

// =============================================================================
// Constants
// =============================================================================

/// Magic bytes indicating little-endian byte order ("II" for Intel)
const BYTE_ORDER_LITTLE_ENDIAN: u16 = 0x4949;

/// Magic bytes indicating big-endian byte order ("MM" for Motorola)
const BYTE_ORDER_BIG_ENDIAN: u16 = 0x4D4D;

/// Version number for classic TIFF
const VERSION_TIFF: u16 = 42;

/// Version number for BigTIFF
const VERSION_BIGTIFF: u16 = 43;

// =============================================================================
// ByteOrder
// =============================================================================

/// Byte order (endianness) of a TIFF file.
///
/// TIFF files declare their byte order in the first two bytes of the header.
/// All multi-byte values in the file must be read respecting this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// Little-endian ("II" = Intel)
    LittleEndian,
    /// Big-endian ("MM" = Motorola)
    BigEndian,
}

impl ByteOrder {
    /// Read a u16 from a byte slice using this byte order.
    ///
    /// # Panics
    /// Panics if the slice has fewer than 2 bytes.
    #[inline]
    pub fn read_u16(self, bytes: &[u8]) -> u16 {
        match self {
            ByteOrder::LittleEndian => u16::from_le_bytes([bytes[0], bytes[1]]),
            ByteOrder::BigEndian => u16::from_be_bytes([bytes[0], bytes[1]]),
        }
    }

    /// Read a u32 from a byte slice using this byte order.
    ///
    /// # Panics
    /// Panics if the slice has fewer than 4 bytes.
    #[inline]
    pub fn read_u32(self, bytes: &[u8]) -> u32 {
        match self {
            ByteOrder::LittleEndian => {
                u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
            }
            ByteOrder::BigEndian => u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
        }
    }

    /// Read a u64 from a byte slice using this byte order.
    ///
    /// # Panics
    /// Panics if the slice has fewer than 8 bytes.
    #[inline]
    pub fn read_u64(self, bytes: &[u8]) -> u64 {
        match self {
            ByteOrder::LittleEndian => u64::from_le_bytes([
                bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
            ]),
            ByteOrder::BigEndian => u64::from_be_bytes([
                bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
            ]),
        }
    }

    /// Read an unsigned integer of `width` bytes (2, 4, or 8).
    ///
    /// Used for the variant-dependent count and offset fields.
    ///
    /// # Panics
    /// Panics if `width` is not 2, 4, or 8.
    #[inline]
    pub fn read_uint(self, bytes: &[u8], width: usize) -> u64 {
        match width {
            2 => self.read_u16(bytes) as u64,
            4 => self.read_u32(bytes) as u64,
            8 => self.read_u64(bytes),
            _ => unreachable!("invalid field width {}", width),
        }
    }
}

// =============================================================================
// FormatVariant / FieldWidths
// =============================================================================

/// The two on-disk TIFF layouts, distinguished by the header version field.
///
/// The variant is fixed for the lifetime of a parse session and determines
/// the width of every count and offset field that follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatVariant {
    /// Classic TIFF (version 42): 32-bit offsets, 16-bit entry counts
    Classic,
    /// BigTIFF (version 43): 64-bit offsets and entry counts
    Big,
}

impl FormatVariant {
    /// Field widths for this variant, bound once after header decode.
    #[inline]
    pub const fn field_widths(self) -> FieldWidths {
        match self {
            FormatVariant::Classic => FieldWidths {
                offset_size: 4,
                count_size: 2,
            },
            FormatVariant::Big => FieldWidths {
                offset_size: 8,
                count_size: 8,
            },
        }
    }
}

/// Width of the variant-dependent fields, derived from [`FormatVariant`].
///
/// Threading this value through the entry and IFD decoders avoids scattering
/// variant checks across the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldWidths {
    /// Width of offset and value/offset fields (4 for classic, 8 for BigTIFF)
    pub offset_size: usize,

    /// Width of the IFD entry-count field (2 for classic, 8 for BigTIFF)
    pub count_size: usize,
}

impl FieldWidths {
    /// Size of one IFD entry record in bytes.
    ///
    /// Classic TIFF: 12 bytes (2 tag + 2 type + 4 count + 4 value/offset)
    /// BigTIFF: 20 bytes (2 tag + 2 type + 8 count + 8 value/offset)
    #[inline]
    pub const fn entry_size(&self) -> usize {
        2 + 2 + 2 * self.offset_size
    }
}

// =============================================================================
// TiffHeader
// =============================================================================

/// Parsed TIFF file header.
///
/// Contains the essential information needed to begin parsing IFDs:
/// - Byte order for reading all subsequent values
/// - Format variant (affects entry sizes and offset widths)
/// - Location of the first IFD
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TiffHeader {
    /// Byte order for all multi-byte values in the file
    pub byte_order: ByteOrder,

    /// Classic TIFF or BigTIFF
    pub variant: FormatVariant,

    /// Offset to the first IFD in the file
    pub first_ifd_offset: u64,
}

impl TiffHeader {
    /// Read and validate the TIFF header from a remote source.
    ///
    /// Issues two range requests: 4 bytes at offset 0 to determine byte order
    /// and variant, then the variant-sized second header at offset 4 for the
    /// first IFD offset.
    ///
    /// # Errors
    /// - `InvalidMagic` if byte order bytes are not II or MM
    /// - `InvalidVersion` if version is not 42 or 43
    /// - `InvalidBigTiffOffsetSize` if the BigTIFF offset size is not 8
    /// - `InvalidBigTiffReserved` if the BigTIFF reserved field is not 0
    /// - `Io` if a range fetch fails or comes back short
    pub async fn fetch<R: RangeReader + ?Sized>(reader: &R) -> Result<Self, TiffError> {
        let first = reader.read_exact_at(0, 4).await?;

        // Bytes 0-1: read as little-endian because we are matching a fixed
        // byte pattern, not a file-order value
        let magic = ByteOrder::LittleEndian.read_u16(&first[0..2]);
        let byte_order = match magic {
            BYTE_ORDER_LITTLE_ENDIAN => ByteOrder::LittleEndian,
            BYTE_ORDER_BIG_ENDIAN => ByteOrder::BigEndian,
            _ => return Err(TiffError::InvalidMagic(magic)),
        };

        // Bytes 2-3: version, in file byte order
        let version = byte_order.read_u16(&first[2..4]);

        match version {
            VERSION_TIFF => {
                // Classic TIFF: 4-byte first IFD offset at bytes 4-7
                let second = reader.read_exact_at(4, 4).await?;
                let first_ifd_offset = byte_order.read_u32(&second) as u64;

                Ok(TiffHeader {
                    byte_order,
                    variant: FormatVariant::Classic,
                    first_ifd_offset,
                })
            }
            VERSION_BIGTIFF => {
                // BigTIFF: 12 more bytes at offset 4
                let second = reader.read_exact_at(4, 12).await?;

                let offset_size = byte_order.read_u16(&second[0..2]);
                if offset_size != 8 {
                    return Err(TiffError::InvalidBigTiffOffsetSize(offset_size));
                }

                let reserved = byte_order.read_u16(&second[2..4]);
                if reserved != 0 {
                    return Err(TiffError::InvalidBigTiffReserved(reserved));
                }

                let first_ifd_offset = byte_order.read_u64(&second[4..12]);

                Ok(TiffHeader {
                    byte_order,
                    variant: FormatVariant::Big,
                    first_ifd_offset,
                })
            }
            _ => Err(TiffError::InvalidVersion(version)),
        }
    }

    /// Whether this is a BigTIFF file.
    #[inline]
    pub const fn is_bigtiff(&self) -> bool {
        matches!(self.variant, FormatVariant::Big)
    }

    /// Field widths for this file's variant.
    #[inline]
    pub const fn field_widths(&self) -> FieldWidths {
        self.variant.field_widths()
    }
}

// =============================================================================
// Tests
// =============================================================================
