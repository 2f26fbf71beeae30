//! TIFF/BigTIFF structural metadata parsing.
//!
//! # Key Concepts
//!
//! - **Byte order**: TIFF files declare their endianness (II = little-endian,
//!   MM = big-endian) in the header. All multi-byte values must be read
//!   respecting this order.
//!
//! - **Classic TIFF vs BigTIFF**: Classic TIFF uses 32-bit offsets and 16-bit
//!   entry counts, BigTIFF uses 64-bit for both. The widths are bound once
//!   after header decode and threaded through the parser.
//!
//! - **IFD (Image File Directory)**: A node in a singly-linked list of tag
//!   collections. Each directory is fetched with two range requests and
//!   decoded in on-disk order.
//!
//! - **Inline vs offset values**: Small values are stored inline in the IFD
//!   entry, larger values are stored at an offset pointed to by the entry.

mod entry;
mod header;
mod ifd;
mod tags;
mod values;

pub use entry::{EntryValue, IfdEntry};
pub use header::{ByteOrder, FieldWidths, FormatVariant, TiffHeader};
pub use ifd::{walk_chain, Ifd, DEFAULT_MAX_IFDS};
pub use tags::{FieldType, TiffTag};
pub use values::ValueReader;
