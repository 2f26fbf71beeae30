//! End-to-end tests for the reader session: tag value resolution and tile
//! byte-range lookups.

use cog_reader::error::TiffError;
use cog_reader::tiff::{TiffTag, DEFAULT_MAX_IFDS};
use cog_reader::CogReader;

use super::test_utils::{ByteOrderType, IfdSpec, TiffBuilder, TrackingMockReader};

/// Blobs are laid out before any IFD, so their offsets depend only on the
/// header variant and the blobs themselves. Probe with an IFD-less build.
fn blob_offsets(byte_order: ByteOrderType, bigtiff: bool, blobs: &[Vec<u8>]) -> Vec<u64> {
    let mut probe = blobs.iter().cloned().fold(
        TiffBuilder::new(byte_order, bigtiff),
        |b, blob| b.blob(blob),
    );
    probe.build();
    (0..blobs.len()).map(|i| probe.blob_offset(i)).collect()
}

fn tiled_file(byte_order: ByteOrderType, tiles: &[Vec<u8>]) -> Vec<u8> {
    let offsets = blob_offsets(byte_order, false, tiles);
    let counts: Vec<u64> = tiles.iter().map(|t| t.len() as u64).collect();

    let mut builder = tiles
        .iter()
        .cloned()
        .fold(TiffBuilder::new(byte_order, false), |b, t| b.blob(t))
        .ifd(
            IfdSpec::new()
                .entry(256, 3, 512)
                .entry(257, 3, 512)
                .entry(322, 3, 256)
                .entry(323, 3, 256)
                .array(324, 4, &offsets) // TileOffsets, LONG
                .array(325, 4, &counts), // TileByteCounts, LONG
        );
    builder.build()
}

#[tokio::test]
async fn tile_location_resolves_offset_and_count() {
    let tiles = vec![vec![0xAA; 40], vec![0xBB; 60]];
    let expected = blob_offsets(ByteOrderType::LittleEndian, false, &tiles);
    let data = tiled_file(ByteOrderType::LittleEndian, &tiles);

    let reader = TrackingMockReader::new(data);
    let cog = CogReader::from_reader(reader, DEFAULT_MAX_IFDS)
        .await
        .unwrap();

    assert_eq!(cog.tile_location(0, 0).await.unwrap(), (expected[0], 40));
    assert_eq!(cog.tile_location(0, 1).await.unwrap(), (expected[1], 60));
}

#[tokio::test]
async fn read_tile_returns_stored_payload() {
    let tiles = vec![vec![0xAA; 40], vec![0xBB; 60]];
    let data = tiled_file(ByteOrderType::BigEndian, &tiles);

    let reader = TrackingMockReader::new(data);
    let cog = CogReader::from_reader(reader, DEFAULT_MAX_IFDS)
        .await
        .unwrap();

    let first = cog.read_tile(0, 0).await.unwrap();
    assert_eq!(first.as_ref(), &tiles[0][..]);
    let second = cog.read_tile(0, 1).await.unwrap();
    assert_eq!(second.as_ref(), &tiles[1][..]);
}

#[tokio::test]
async fn tile_location_without_offsets_tag_is_missing_tag() {
    let data = TiffBuilder::new(ByteOrderType::LittleEndian, false)
        .ifd(IfdSpec::new().entry(256, 3, 512))
        .build();

    let reader = TrackingMockReader::new(data);
    let cog = CogReader::from_reader(reader, DEFAULT_MAX_IFDS)
        .await
        .unwrap();

    let err = cog.tile_location(0, 0).await.unwrap_err();
    assert!(matches!(err, TiffError::MissingTag("TileOffsets")));
}

#[tokio::test]
async fn tile_index_past_end_is_out_of_range() {
    let tiles = vec![vec![0xAA; 40]];
    let data = tiled_file(ByteOrderType::LittleEndian, &tiles);

    let reader = TrackingMockReader::new(data);
    let cog = CogReader::from_reader(reader, DEFAULT_MAX_IFDS)
        .await
        .unwrap();

    let err = cog.tile_location(0, 5).await.unwrap_err();
    assert!(matches!(err, TiffError::IndexOutOfRange(_)));

    let err = cog.tile_location(3, 0).await.unwrap_err();
    assert!(matches!(err, TiffError::IndexOutOfRange(_)));
}

#[tokio::test]
async fn reads_inline_and_out_of_line_strings() {
    let data = TiffBuilder::new(ByteOrderType::LittleEndian, false)
        .ifd(
            IfdSpec::new()
                // "abc" + NUL is 4 bytes, exactly fills the classic slot
                .ascii(270, "abc")
                // long enough to force an out-of-line value
                .ascii(305, "cog-reader test fixture"),
        )
        .build();

    let reader = TrackingMockReader::new(data);
    let cog = CogReader::from_reader(reader, DEFAULT_MAX_IFDS)
        .await
        .unwrap();

    let ifd = cog.ifd(0).unwrap();
    let values = cog.values();

    let description = ifd.get_entry(TiffTag::ImageDescription).unwrap();
    assert!(description.is_inline());
    assert_eq!(values.read_string(description).await.unwrap(), "abc");

    let software = ifd.get_entry_by_code(305).unwrap();
    assert!(!software.is_inline());
    assert_eq!(
        values.read_string(software).await.unwrap(),
        "cog-reader test fixture"
    );
}

#[tokio::test]
async fn reads_numeric_arrays_in_both_layouts() {
    let data = TiffBuilder::new(ByteOrderType::BigEndian, false)
        .ifd(
            IfdSpec::new()
                // two SHORTs fit the 4-byte slot
                .array(258, 3, &[8, 8])
                // four LONGs must go out of line
                .array(273, 4, &[100, 200, 300, 400]),
        )
        .build();

    let reader = TrackingMockReader::new(data);
    let cog = CogReader::from_reader(reader, DEFAULT_MAX_IFDS)
        .await
        .unwrap();

    let ifd = cog.ifd(0).unwrap();
    let values = cog.values();

    let bits = ifd.get_entry(TiffTag::BitsPerSample).unwrap();
    assert!(bits.is_inline());
    assert_eq!(values.read_u32_array(bits).await.unwrap(), vec![8, 8]);

    let strips = ifd.get_entry(TiffTag::StripOffsets).unwrap();
    assert!(!strips.is_inline());
    assert_eq!(
        values.read_u64_array(strips).await.unwrap(),
        vec![100, 200, 300, 400]
    );
}

#[tokio::test]
async fn bigtiff_tile_lookup_with_long8_arrays() {
    let tiles = vec![vec![0x11; 32], vec![0x22; 48], vec![0x33; 16]];
    let offsets = blob_offsets(ByteOrderType::LittleEndian, true, &tiles);
    let counts: Vec<u64> = tiles.iter().map(|t| t.len() as u64).collect();

    let mut builder = tiles
        .iter()
        .cloned()
        .fold(TiffBuilder::new(ByteOrderType::LittleEndian, true), |b, t| {
            b.blob(t)
        })
        .ifd(
            IfdSpec::new()
                .array(324, 16, &offsets) // TileOffsets, LONG8
                .array(325, 16, &counts), // TileByteCounts, LONG8
        );
    let data = builder.build();

    let reader = TrackingMockReader::new(data);
    let cog = CogReader::from_reader(reader, DEFAULT_MAX_IFDS)
        .await
        .unwrap();

    assert_eq!(cog.tile_location(0, 2).await.unwrap(), (offsets[2], 16));
    let tile = cog.read_tile(0, 1).await.unwrap();
    assert_eq!(tile.as_ref(), &tiles[1][..]);
}

#[tokio::test]
async fn out_of_line_value_costs_one_extra_request() {
    let tiles = vec![vec![0xAA; 40], vec![0xBB; 60]];
    let data = tiled_file(ByteOrderType::LittleEndian, &tiles);

    let reader = TrackingMockReader::new(data);
    let counter = reader.request_counter();
    let cog = CogReader::from_reader(reader, DEFAULT_MAX_IFDS)
        .await
        .unwrap();

    let after_open = counter.get();
    // TileOffsets and TileByteCounts are both out of line: two fetches.
    cog.tile_location(0, 0).await.unwrap();
    assert_eq!(counter.get(), after_open + 2);
}
