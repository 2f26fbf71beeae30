//! # COG Reader
//!
//! An incremental metadata reader for remote TIFF/BigTIFF files, such as
//! Cloud-Optimized GeoTIFFs, accessed over HTTP range requests.
//!
//! Instead of downloading a whole file to discover its structure, this crate
//! fetches only the byte ranges that hold structural metadata: the header,
//! each IFD (Image File Directory) in the chain, and - on demand - the value
//! bytes a tag points at. That is enough for a tiled-image consumer to learn
//! dimensions, compression, and tile layout before deciding which pixel byte
//! ranges to fetch next.
//!
//! ## Features
//!
//! - **Range-based parsing**: two requests for the header, two per IFD,
//!   one per out-of-line tag value
//! - **Both variants**: classic TIFF (32-bit offsets) and BigTIFF (64-bit),
//!   in either byte order
//! - **Lossy tag policy**: an entry with an unknown field type is dropped;
//!   the directory and chain survive
//! - **Pluggable transport**: anything implementing [`RangeReader`] works;
//!   an HTTP implementation is included
//!
//! ## Example
//!
//! ```rust,no_run
//! use cog_reader::CogReader;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cog = CogReader::open("https://example.com/image.tif").await?;
//!
//!     println!("{:?}, {} directories", cog.header().variant, cog.ifds().len());
//!     for ifd in cog.ifds() {
//!         println!("IFD at {} with {} entries", ifd.offset, ifd.entries.len());
//!     }
//!
//!     // Raw compressed bytes of the first tile of the first directory
//!     let tile = cog.read_tile(0, 0).await?;
//!     println!("tile is {} bytes", tile.len());
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod io;
pub mod reader;
pub mod tiff;

// Re-export commonly used types
pub use error::{IoError, TiffError};
pub use io::{HttpRangeReader, RangeReader};
pub use reader::CogReader;
pub use tiff::{
    walk_chain, ByteOrder, EntryValue, FieldType, FieldWidths, FormatVariant, Ifd, IfdEntry,
    TiffHeader, TiffTag, ValueReader, DEFAULT_MAX_IFDS,
};
