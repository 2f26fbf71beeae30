//! COG reader session.
//!
//! A [`CogReader`] owns one transport connection for the lifetime of a parse
//! session. Opening it decodes the header and walks the whole IFD chain up
//! front; the remaining metadata (out-of-line tag values, tile byte ranges)
//! is fetched on demand through the same connection. Dropping the reader
//! releases the connection on every exit path.
//!
//! Requests against one session are issued sequentially; the transport is
//! a single request/response round-trip with no internal queuing. Multiple
//! independent sessions may run concurrently.

use bytes::Bytes;
use reqwest::Client;
use tracing::debug;

use crate::error::TiffError;
use crate::io::{HttpRangeReader, RangeReader};
use crate::tiff::{walk_chain, Ifd, TiffHeader, TiffTag, ValueReader, DEFAULT_MAX_IFDS};

/// Incremental TIFF/BigTIFF metadata reader over a byte-range source.
#[derive(Debug)]
pub struct CogReader<R: RangeReader> {
    reader: R,
    header: TiffHeader,
    ifds: Vec<Ifd>,
}

impl CogReader<HttpRangeReader> {
    /// Open a remote TIFF/BigTIFF file over HTTP.
    ///
    /// Creates a dedicated HTTP client for this session, decodes the header,
    /// and walks the full IFD chain. Any malformed-header or transport
    /// failure during the walk aborts the open; no partial result is
    /// returned.
    pub async fn open(url: &str) -> Result<Self, TiffError> {
        Self::open_with_limit(url, DEFAULT_MAX_IFDS).await
    }

    /// Open with a caller-chosen cap on the IFD chain length.
    ///
    /// The cap guards against cyclic or unbounded next-IFD chains in corrupt
    /// input; see [`DEFAULT_MAX_IFDS`].
    pub async fn open_with_limit(url: &str, max_ifds: usize) -> Result<Self, TiffError> {
        let reader = HttpRangeReader::new(Client::new(), url)
            .await
            .map_err(TiffError::Io)?;
        Self::from_reader(reader, max_ifds).await
    }
}

impl<R: RangeReader> CogReader<R> {
    /// Build a session over an existing byte-range source.
    ///
    /// Useful for non-HTTP backends and for testing against in-memory data.
    pub async fn from_reader(reader: R, max_ifds: usize) -> Result<Self, TiffError> {
        let header = TiffHeader::fetch(&reader).await?;
        let ifds = walk_chain(&reader, &header, max_ifds).await?;

        debug!(
            source = reader.identifier(),
            variant = ?header.variant,
            byte_order = ?header.byte_order,
            ifds = ifds.len(),
            "opened TIFF metadata session"
        );

        Ok(Self {
            reader,
            header,
            ifds,
        })
    }

    /// The decoded file header.
    pub fn header(&self) -> &TiffHeader {
        &self.header
    }

    /// All directories in the chain, in link order.
    pub fn ifds(&self) -> &[Ifd] {
        &self.ifds
    }

    /// One directory by chain index.
    pub fn ifd(&self, index: usize) -> Option<&Ifd> {
        self.ifds.get(index)
    }

    /// Identifier of the underlying source (URL for HTTP).
    pub fn identifier(&self) -> &str {
        self.reader.identifier()
    }

    /// Value reader bound to this session's source and header.
    pub fn values(&self) -> ValueReader<'_, R> {
        ValueReader::new(&self.reader, &self.header)
    }

    /// Resolve the byte range of one tile in one directory.
    ///
    /// Reads the TileOffsets and TileByteCounts arrays; each call issues its
    /// own range requests for out-of-line arrays (no caching).
    pub async fn tile_location(
        &self,
        ifd_index: usize,
        tile_index: usize,
    ) -> Result<(u64, u64), TiffError> {
        let ifd = self.ifd(ifd_index).ok_or_else(|| {
            TiffError::IndexOutOfRange(format!(
                "IFD {} of {}",
                ifd_index,
                self.ifds.len()
            ))
        })?;

        let offsets_entry = ifd
            .get_entry(TiffTag::TileOffsets)
            .ok_or(TiffError::MissingTag("TileOffsets"))?;
        let counts_entry = ifd
            .get_entry(TiffTag::TileByteCounts)
            .ok_or(TiffError::MissingTag("TileByteCounts"))?;

        let values = self.values();
        let offsets = values.read_u64_array(offsets_entry).await?;
        let byte_counts = values.read_u64_array(counts_entry).await?;

        match (offsets.get(tile_index), byte_counts.get(tile_index)) {
            (Some(&offset), Some(&count)) => Ok((offset, count)),
            _ => Err(TiffError::IndexOutOfRange(format!(
                "tile {} of {}",
                tile_index,
                offsets.len().min(byte_counts.len())
            ))),
        }
    }

    /// Fetch the raw (still compressed) bytes of one tile.
    ///
    /// The payload is returned exactly as stored; decompression is up to
    /// the caller.
    pub async fn read_tile(&self, ifd_index: usize, tile_index: usize) -> Result<Bytes, TiffError> {
        let (offset, byte_count) = self.tile_location(ifd_index, tile_index).await?;
        let bytes = self
            .reader
            .read_exact_at(offset, byte_count as usize)
            .await?;
        Ok(bytes)
    }
}
