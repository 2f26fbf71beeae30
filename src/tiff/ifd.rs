//! IFD decoding and directory chain traversal.
//!
//! An IFD (Image File Directory) is one node in the file's metadata chain:
//!
//! ```text
//! +--------------+--------------+------------------------------+
//! |        offset|          size|                         value|
//! +--------------+--------------+------------------------------+
//! |             0|    count_size|    n - number of entries     |
//! |    count_size|  n*entry_size|    entry records, in order   |
//! |           ...|   offset_size|    offset of next IFD (0 =   |
//! |              |              |    end of chain)             |
//! +--------------+--------------+------------------------------+
//! ```
//!
//! Each directory is fetched with exactly two range requests: one for the
//! entry count, one for the entry block plus the next-IFD offset. The chain
//! itself is inherently sequential; each directory's location is only known
//! after decoding its predecessor.

use tracing::{debug, warn};

use crate::error::TiffError;
use crate::io::RangeReader;

use super::entry::IfdEntry;
use super::header::TiffHeader;
use super::tags::TiffTag;

/// Default cap on the number of directories followed in one chain walk.
///
/// The on-disk format imposes no bound on the next-IFD chain, so a corrupt
/// or malicious file could form a cycle or an arbitrarily long list. The
/// walk stops at this many directories unless the caller raises the limit.
pub const DEFAULT_MAX_IFDS: usize = 100;

// =============================================================================
// Ifd
// =============================================================================

/// One parsed Image File Directory.
#[derive(Debug, Clone, PartialEq)]
pub struct Ifd {
    /// Byte offset of this directory in the file
    pub offset: u64,

    /// Entry count as declared on disk.
    ///
    /// May exceed `entries.len()` when entries with unknown field types
    /// were dropped during decoding.
    pub entry_count: u64,

    /// Decoded entries, in on-disk order
    pub entries: Vec<IfdEntry>,

    /// Byte offset of the next directory (0 = end of chain)
    pub next_ifd_offset: u64,
}

impl Ifd {
    /// Fetch and decode the directory at `offset`.
    ///
    /// Issues two range requests: the entry count, then the entry block and
    /// trailing next-IFD offset in a single read. Entries with unknown field
    /// types are dropped; any other failure aborts the directory.
    pub async fn fetch<R: RangeReader + ?Sized>(
        reader: &R,
        offset: u64,
        header: &TiffHeader,
    ) -> Result<Self, TiffError> {
        let widths = header.field_widths();
        let byte_order = header.byte_order;

        let count_bytes = reader.read_exact_at(offset, widths.count_size).await?;
        let entry_count = byte_order.read_uint(&count_bytes, widths.count_size);

        // The count field is attacker-controlled; a 64-bit BigTIFF count can
        // overflow the body-length arithmetic or demand more bytes than the
        // file holds. Validate before sizing anything from it.
        let body_start = offset + widths.count_size as u64;
        let body_len = entry_count
            .checked_mul(widths.entry_size() as u64)
            .and_then(|n| n.checked_add(widths.offset_size as u64))
            .filter(|&n| {
                body_start
                    .checked_add(n)
                    .is_some_and(|end| end <= reader.size())
            })
            .ok_or(TiffError::InvalidEntryCount {
                offset,
                count: entry_count,
            })?;

        let body = reader.read_exact_at(body_start, body_len as usize).await?;

        Self::parse_body(offset, entry_count, &body, header)
    }

    /// Decode the entry block and next-IFD offset from one buffer.
    ///
    /// `body` holds `entry_count` fixed-size records followed by the
    /// next-IFD offset.
    fn parse_body(
        offset: u64,
        entry_count: u64,
        body: &[u8],
        header: &TiffHeader,
    ) -> Result<Self, TiffError> {
        let widths = header.field_widths();
        let byte_order = header.byte_order;
        let entry_size = widths.entry_size();

        let mut entries = Vec::with_capacity(entry_count as usize);
        for i in 0..entry_count as usize {
            let record = &body[i * entry_size..(i + 1) * entry_size];
            match IfdEntry::parse(record, byte_order, widths) {
                Ok(entry) => entries.push(entry),
                // Unknown field type: drop this entry, keep the directory
                Err(TiffError::UnknownFieldType(type_id)) => {
                    debug!(
                        ifd_offset = offset,
                        entry_index = i,
                        field_type = type_id,
                        "dropping IFD entry with unknown field type"
                    );
                }
                // Keep the lossy policy scoped to unknown types
                Err(other) => return Err(other),
            }
        }

        let next_ifd_offset =
            byte_order.read_uint(&body[entry_count as usize * entry_size..], widths.offset_size);

        Ok(Ifd {
            offset,
            entry_count,
            entries,
            next_ifd_offset,
        })
    }

    /// Get an entry by well-known tag.
    pub fn get_entry(&self, tag: TiffTag) -> Option<&IfdEntry> {
        self.get_entry_by_code(tag.as_u16())
    }

    /// Get an entry by numeric tag code.
    pub fn get_entry_by_code(&self, code: u16) -> Option<&IfdEntry> {
        self.entries.iter().find(|e| e.tag == code)
    }
}

// =============================================================================
// Chain walk
// =============================================================================

/// Follow the next-IFD chain from the header's first-directory offset.
///
/// Directories are returned in link order. The walk terminates on a zero
/// next-IFD offset, or after `max_ifds` directories as a defensive bound
/// against cycles and unbounded chains. Any failure while decoding a
/// directory aborts the walk; partial chains are not returned.
pub async fn walk_chain<R: RangeReader + ?Sized>(
    reader: &R,
    header: &TiffHeader,
    max_ifds: usize,
) -> Result<Vec<Ifd>, TiffError> {
    let mut ifds = Vec::new();
    let mut offset = header.first_ifd_offset;

    while offset != 0 && ifds.len() < max_ifds {
        let ifd = Ifd::fetch(reader, offset, header).await?;
        debug!(
            offset,
            entries = ifd.entries.len(),
            next = ifd.next_ifd_offset,
            "decoded IFD"
        );
        offset = ifd.next_ifd_offset;
        ifds.push(ifd);
    }

    if offset != 0 {
        warn!(
            max_ifds,
            next = offset,
            "IFD chain did not terminate within limit; stopping walk"
        );
    }

    Ok(ifds)
}

// =============================================================================
// Tests
// =============================================================================
