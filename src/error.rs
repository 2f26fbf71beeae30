use thiserror::Error;

/// I/O errors that can occur when reading from remote storage
#[derive(Debug, Clone, Error)]
pub enum IoError {
    /// HTTP-level error (non-success status, protocol failure)
    #[error("HTTP error: {0}")]
    Http(String),

    /// Requested range exceeds resource bounds
    #[error("Range out of bounds: requested {requested} bytes at offset {offset}, size is {size}")]
    RangeOutOfBounds {
        offset: u64,
        requested: u64,
        size: u64,
    },

    /// Server returned fewer bytes than requested
    #[error("Short read: requested {requested} bytes at offset {offset}, got {actual}")]
    ShortRead {
        offset: u64,
        requested: u64,
        actual: u64,
    },

    /// Network or connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The resource URL could not be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Errors that can occur when parsing TIFF structure.
///
/// Header-level and I/O failures abort the whole parse. `UnknownFieldType`
/// is the one recoverable case: the IFD decoder drops the offending entry
/// and keeps going.
#[derive(Debug, Clone, Error)]
pub enum TiffError {
    /// I/O error while reading the file
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// Invalid TIFF magic bytes (not II or MM)
    #[error("Invalid TIFF magic bytes: expected 0x4949 (II) or 0x4D4D (MM), got 0x{0:04X}")]
    InvalidMagic(u16),

    /// Invalid TIFF version number
    #[error("Invalid TIFF version: expected 42 (TIFF) or 43 (BigTIFF), got {0}")]
    InvalidVersion(u16),

    /// Invalid BigTIFF offset byte size (must be 8)
    #[error("Invalid BigTIFF offset byte size: expected 8, got {0}")]
    InvalidBigTiffOffsetSize(u16),

    /// Invalid BigTIFF reserved field (must be 0)
    #[error("Invalid BigTIFF reserved field: expected 0, got {0}")]
    InvalidBigTiffReserved(u16),

    /// IFD entry count that cannot fit in the file
    #[error("Implausible entry count {count} for IFD at offset {offset}")]
    InvalidEntryCount { offset: u64, count: u64 },

    /// Unknown field type in an IFD entry
    #[error("Unknown field type: {0}")]
    UnknownFieldType(u16),

    /// Required tag is missing from the IFD
    #[error("Missing required tag: {0}")]
    MissingTag(&'static str),

    /// Tag has unexpected type or count
    #[error("Invalid value for tag {tag}: {message}")]
    InvalidTagValue { tag: u16, message: String },

    /// IFD index or tile index out of range
    #[error("Index out of range: {0}")]
    IndexOutOfRange(String),
}
